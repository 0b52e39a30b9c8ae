//! Span finder for `${...}` regions

use ile_domain::Span;

const OPEN: &str = "${";

/// Returns true if `text` contains an expression opener.
#[must_use]
pub fn has_expression(text: &str) -> bool {
    text.contains(OPEN)
}

/// Finds the top-level `${...}` spans of `text`, left to right.
///
/// Nesting is counted only on `${`; a bare `{` does not open a level but
/// any `}` closes one. Scanning stops at an unterminated `${`; everything
/// from it onward is left as literal text.
///
/// # Examples
///
/// ```
/// use ile_application::ile::span::find_spans;
///
/// let spans = find_spans("a ${set(x, ${y})} b ${x}");
/// assert_eq!(spans.len(), 2);
/// assert_eq!(spans[0].content, "set(x, ${y})");
/// assert_eq!(spans[1].start, 20);
/// ```
#[must_use]
pub fn find_spans(text: &str) -> Vec<Span> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = text.get(cursor..).and_then(|rest| rest.find(OPEN)) {
        let open = cursor + offset;
        match closing_brace(bytes, open) {
            Some(close) => {
                spans.push(Span::new(&text[open..=close], open));
                cursor = close + 1;
            }
            None => break,
        }
    }

    spans
}

/// Byte index of the `}` balancing the `${` at `open`.
fn closing_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (i, &byte) in bytes.iter().enumerate().skip(open + OPEN.len()) {
        match byte {
            b'{' if bytes[i - 1] == b'$' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raws(text: &str) -> Vec<String> {
        find_spans(text).into_iter().map(|s| s.raw).collect()
    }

    #[test]
    fn test_no_spans() {
        assert!(find_spans("plain text {with} braces").is_empty());
        assert!(!has_expression("$ {not} one"));
    }

    #[test]
    fn test_sequential_spans() {
        assert_eq!(raws("${a}${a}${a}"), vec!["${a}", "${a}", "${a}"]);
    }

    #[test]
    fn test_nested_span_is_one_top_level_span() {
        let spans = find_spans("x${tbl(${row}, name)}y");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].raw, "${tbl(${row}, name)}");
        assert_eq!(spans[0].content, "tbl(${row}, name)");
        assert_eq!(spans[0].start, 1);
    }

    #[test]
    fn test_bare_brace_closes_a_level() {
        // The `}` of `{k}` balances the opener, so the span ends early.
        assert_eq!(raws("${a{k}b}"), vec!["${a{k}"]);
    }

    #[test]
    fn test_trailing_unterminated_opener() {
        assert_eq!(raws("${"), Vec::<String>::new());
        assert_eq!(raws("${oops} ${"), vec!["${oops}"]);
    }

    #[test]
    fn test_unterminated_opener_hides_later_spans() {
        // The outer opener never balances, so nothing after it is a span.
        assert_eq!(raws("${x ${a} tail"), Vec::<String>::new());
        assert_eq!(raws("${a} ${x ${b} tail"), vec!["${a}"]);
    }

    #[test]
    fn test_multibyte_text_offsets() {
        let text = "あなたの番号は${n}です";
        let spans = find_spans(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(&text[spans[0].range()], "${n}");
    }
}
