//! Call parser for span contents
//!
//! Interprets the text between `${` and `}` as a function call, a
//! `rand:MIN:MAX` shorthand, or a variable reference.

use std::sync::LazyLock;

use regex::Regex;

use ile_domain::Expression;

#[allow(clippy::expect_used)]
static CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_]+)\(([^\r\n\x{2028}\x{2029}]*)\)$").expect("call pattern is valid")
});

#[allow(clippy::expect_used)]
static RAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^rand:([0-9]+):([0-9]+)$").expect("rand pattern is valid"));

/// Parses a span's content.
///
/// Grammar, tried in order:
/// 1. `name(args)` where `name` is word characters: a [`Expression::Call`]
///    with the raw, still-quoted arguments.
/// 2. `rand:MIN:MAX` with unsigned integers that fit in `i64`: a
///    [`Expression::RandShorthand`].
/// 3. Anything else: a [`Expression::VarRef`] naming the content verbatim.
#[must_use]
pub fn parse_expression(content: &str) -> Expression {
    if let Some((name, args)) = parse_call(content) {
        return Expression::Call {
            name: name.to_string(),
            args,
        };
    }

    if let Some(captures) = RAND_RE.captures(content)
        && let (Ok(min), Ok(max)) = (captures[1].parse::<i64>(), captures[2].parse::<i64>())
    {
        return Expression::RandShorthand { min, max };
    }

    Expression::VarRef {
        name: content.to_string(),
    }
}

/// Returns true if `text` has the `name(args)` shape.
#[must_use]
pub fn is_call(text: &str) -> bool {
    CALL_RE.is_match(text)
}

fn parse_call(text: &str) -> Option<(&str, Vec<String>)> {
    let captures = CALL_RE.captures(text)?;
    let name = captures.get(1)?.as_str();
    let args = captures.get(2)?.as_str();
    Some((name, split_arguments(args)))
}

/// Splits an argument list on top-level commas.
///
/// Parentheses nest; a `'` or `"` opens a string that only the same quote
/// closes, unless that quote follows a backslash. Quotes stay in the
/// argument text. Arguments are trimmed, and a trailing empty argument is
/// dropped.
#[must_use]
pub fn split_arguments(args: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;
    let mut quote: Option<char> = None;
    let mut previous: Option<char> = None;

    for ch in args.chars() {
        match quote {
            Some(open) => {
                current.push(ch);
                if ch == open && previous != Some('\\') {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                '(' => {
                    depth += 1;
                    current.push(ch);
                }
                ')' => {
                    depth -= 1;
                    current.push(ch);
                }
                ',' if depth == 0 => {
                    parts.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(ch),
            },
        }
        previous = Some(ch);
    }

    let last = current.trim();
    if !last.is_empty() {
        parts.push(last.to_string());
    }
    parts
}

/// Trims `arg` and strips one pair of matching surrounding quotes.
///
/// No escape sequences are decoded.
#[must_use]
pub fn unquote(arg: &str) -> &str {
    let trimmed = arg.trim();
    for quote in ['\'', '"'] {
        if trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return trimmed.get(1..trimmed.len() - 1).unwrap_or_default();
        }
    }
    trimmed
}
