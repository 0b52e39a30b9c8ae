//! Built-in functions
//!
//! The pure parts of the function table: name dispatch, arity, lenient
//! number parsing and random ranges. Lookups that need storage run in the
//! engine.

use std::sync::LazyLock;

use regex::Regex;

use crate::ports::RandomSource;

#[allow(clippy::expect_used)]
static FLOAT_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
        .expect("float pattern is valid")
});

#[allow(clippy::expect_used)]
static INT_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?[0-9]+").expect("integer pattern is valid"));

/// Information about a built-in function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinInfo {
    /// Function name as written in templates.
    pub name: &'static str,
    /// Accepted argument counts.
    pub arities: &'static [usize],
    /// Human-readable description.
    pub description: &'static str,
    /// Example usage.
    pub example: &'static str,
}

/// The named functions a template may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `set(key, value)`
    Set,
    /// `rand(min, max)`
    Rand,
    /// `tbl(row, field)` or `tbl(generation, row, field)`
    Tbl,
    /// `get_name(prefix, suffix)`
    GetName,
    /// `get_url(name)`
    GetUrl,
    /// `img_conv(prefix, suffix)`
    ImgConv,
}

impl Builtin {
    /// All built-ins, in table order.
    pub const ALL: [Self; 6] = [
        Self::Set,
        Self::Rand,
        Self::Tbl,
        Self::GetName,
        Self::GetUrl,
        Self::ImgConv,
    ];

    /// Looks up a built-in by its template name. Names are case-sensitive.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    /// The template name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Rand => "rand",
            Self::Tbl => "tbl",
            Self::GetName => "get_name",
            Self::GetUrl => "get_url",
            Self::ImgConv => "img_conv",
        }
    }

    /// Returns true if the built-in accepts `count` arguments.
    #[must_use]
    pub fn accepts(self, count: usize) -> bool {
        self.info().arities.contains(&count)
    }

    /// Describes the built-in.
    #[must_use]
    pub const fn info(self) -> BuiltinInfo {
        match self {
            Self::Set => BuiltinInfo {
                name: "set",
                arities: &[2],
                description: "Binds a variable for the rest of the expansion; expands to nothing",
                example: "${set(row, ${rand:1:10})}",
            },
            Self::Rand => BuiltinInfo {
                name: "rand",
                arities: &[2],
                description: "Uniform random integer between floor(min) and floor(max), inclusive",
                example: "${rand(1, 100)}",
            },
            Self::Tbl => BuiltinInfo {
                name: "tbl",
                arities: &[2, 3],
                description: "Cell of the latest active rule table, or of a given generation",
                example: "${tbl(${row}, message)}",
            },
            Self::GetName => BuiltinInfo {
                name: "get_name",
                arities: &[2],
                description: "Concatenates prefix and suffix",
                example: "${get_name(card_, ${row})}",
            },
            Self::GetUrl => BuiltinInfo {
                name: "get_url",
                arities: &[1],
                description: "Public URL of the image with the given name",
                example: "${get_url(card_01)}",
            },
            Self::ImgConv => BuiltinInfo {
                name: "img_conv",
                arities: &[2],
                description: "Public URL of the image named prefix + suffix",
                example: "${img_conv(card_, ${row})}",
            },
        }
    }

    /// Returns a list of all built-ins with descriptions.
    #[must_use]
    pub fn available() -> Vec<BuiltinInfo> {
        Self::ALL.into_iter().map(Self::info).collect()
    }
}

/// Parses the leading decimal number of `text`, ignoring leading whitespace.
///
/// `"3.7kg"` is `3.7`; text with no leading number is `None`.
#[must_use]
pub fn parse_number_prefix(text: &str) -> Option<f64> {
    FLOAT_PREFIX_RE
        .find(text.trim_start())
        .and_then(|m| m.as_str().parse().ok())
}

/// Parses the leading integer of `text`, ignoring leading whitespace.
///
/// `"12th"` is `12`; `"1.9"` is `1`.
#[must_use]
pub fn parse_integer_prefix(text: &str) -> Option<i64> {
    INT_PREFIX_RE
        .find(text.trim_start())
        .and_then(|m| m.as_str().parse().ok())
}

/// Draws a random integer in `min..=max`; empty when `min > max`.
#[must_use]
pub fn random_between<R: RandomSource + ?Sized>(random: &R, min: i64, max: i64) -> String {
    if min > max {
        return String::new();
    }
    random.random_int(min, max).to_string()
}

/// `rand(min, max)` over textual bounds, floored.
///
/// Non-numeric or out-of-range bounds expand to nothing.
#[must_use]
pub fn random_from_text<R: RandomSource + ?Sized>(random: &R, min: &str, max: &str) -> String {
    match (
        parse_number_prefix(min).and_then(floor_to_i64),
        parse_number_prefix(max).and_then(floor_to_i64),
    ) {
        (Some(min), Some(max)) => random_between(random, min, max),
        _ => String::new(),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn floor_to_i64(value: f64) -> Option<i64> {
    let floored = value.floor();
    (floored.is_finite() && floored >= i64::MIN as f64 && floored < i64::MAX as f64)
        .then_some(floored as i64)
}

/// `get_name(prefix, suffix)`; an empty prefix expands to nothing.
#[must_use]
pub fn image_name(prefix: &str, suffix: &str) -> String {
    if prefix.is_empty() {
        return String::new();
    }
    format!("{prefix}{suffix}")
}
