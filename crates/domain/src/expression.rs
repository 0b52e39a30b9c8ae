//! Expression types for `${...}` template syntax.

use std::ops::Range;

use serde::Serialize;

/// One `${...}` occurrence in the string currently being rewritten.
///
/// Spans are recomputed on every evaluation pass; the byte offsets are only
/// valid for the string they were found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    /// The full text including the `${` and `}` delimiters.
    pub raw: String,

    /// The text between the delimiters.
    pub content: String,

    /// Byte offset of the leading `$`.
    pub start: usize,
}

impl Span {
    /// Creates a span from its raw text and start offset.
    ///
    /// `raw` must begin with `${` and end with `}`.
    #[must_use]
    pub fn new(raw: impl Into<String>, start: usize) -> Self {
        let raw = raw.into();
        let content = raw
            .get(2..raw.len().saturating_sub(1))
            .unwrap_or_default()
            .to_string();
        Self {
            raw,
            content,
            start,
        }
    }

    /// Byte offset one past the closing `}`.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.raw.len()
    }

    /// Byte range covered by the span.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// The interpretation of a span's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expression {
    /// `name(arg, ...)`; arguments are kept raw until evaluation.
    Call {
        /// Function name.
        name: String,
        /// Unevaluated argument text, trimmed.
        args: Vec<String>,
    },

    /// `rand:MIN:MAX`.
    RandShorthand {
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },

    /// Anything else names a variable, verbatim.
    VarRef {
        /// Variable name.
        name: String,
    },
}

impl Expression {
    /// Returns true for a call to `set`.
    #[must_use]
    pub fn is_assignment(&self) -> bool {
        matches!(self, Self::Call { name, .. } if name == "set")
    }
}
