//! Reply template shapes
//!
//! A stored reply template is either a bare array of messages or an
//! envelope object:
//!
//! ```json
//! {
//!   "__vars__": [{"row": "${rand:1:10}"}, {"name": "${tbl(${row}, name)}"}],
//!   "__messages__": [{"type": "text", "text": "Hello ${name}"}]
//! }
//! ```
//!
//! `__vars__` may also be a plain object. The array form binds strictly in
//! array order; the object form binds in document order, which authors
//! should not rely on.

use serde_json::Value;

/// Key of the variable block in an envelope.
pub const VARS_KEY: &str = "__vars__";

/// Key of the message list in an envelope.
pub const MESSAGES_KEY: &str = "__messages__";

/// One variable to seed before messages are expanded.
#[derive(Debug, Clone, PartialEq)]
pub struct VarBinding<'a> {
    /// Variable name.
    pub name: &'a str,
    /// Unexpanded value.
    pub value: &'a Value,
    /// Keys after the first in an array element; these are not bound.
    pub ignored_keys: Vec<&'a str>,
}

/// The `__vars__` block of an envelope.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum VarsBlock<'a> {
    /// Array of single-key objects, bound in array order.
    Ordered(Vec<VarBinding<'a>>),
    /// Plain object, bound in document order.
    Unordered(Vec<VarBinding<'a>>),
    /// Absent or not an array/object.
    #[default]
    Empty,
}

impl<'a> VarsBlock<'a> {
    fn from_value(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Self::Ordered(
                items
                    .iter()
                    .filter_map(Value::as_object)
                    .filter_map(|object| {
                        let mut entries = object.iter();
                        let (name, value) = entries.next()?;
                        Some(VarBinding {
                            name: name.as_str(),
                            value,
                            ignored_keys: entries.map(|(k, _)| k.as_str()).collect(),
                        })
                    })
                    .collect(),
            ),
            Value::Object(object) => Self::Unordered(
                object
                    .iter()
                    .map(|(name, value)| VarBinding {
                        name: name.as_str(),
                        value,
                        ignored_keys: Vec::new(),
                    })
                    .collect(),
            ),
            _ => Self::Empty,
        }
    }

    /// Bindings in the order they must be evaluated.
    #[must_use]
    pub fn bindings(&self) -> &[VarBinding<'a>] {
        match self {
            Self::Ordered(bindings) | Self::Unordered(bindings) => bindings,
            Self::Empty => &[],
        }
    }

    /// Returns true for the array form.
    #[must_use]
    pub const fn is_ordered(&self) -> bool {
        matches!(self, Self::Ordered(_))
    }
}

/// A `{__vars__, __messages__}` envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<'a> {
    /// Variables to seed.
    pub vars: VarsBlock<'a>,
    /// The message array, if `__messages__` is an array.
    pub messages: Option<&'a [Value]>,
}

/// Classification of a raw template value.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateInput<'a> {
    /// A bare message array.
    Messages(&'a [Value]),
    /// An object carrying `__vars__`.
    Envelope(Envelope<'a>),
    /// Anything else; expands to no messages.
    Unsupported,
}

impl<'a> TemplateInput<'a> {
    /// Classifies a template without evaluating anything.
    #[must_use]
    pub fn classify(input: &'a Value) -> Self {
        match input {
            Value::Array(messages) => Self::Messages(messages),
            Value::Object(object) => match object.get(VARS_KEY) {
                Some(vars) => Self::Envelope(Envelope {
                    vars: VarsBlock::from_value(vars),
                    messages: object
                        .get(MESSAGES_KEY)
                        .and_then(Value::as_array)
                        .map(Vec::as_slice),
                }),
                None => Self::Unsupported,
            },
            _ => Self::Unsupported,
        }
    }
}

/// The messages a template would send if expansion were skipped.
///
/// Used as the fallback reply when expansion fails.
#[must_use]
pub fn unprocessed_messages(input: &Value) -> Vec<Value> {
    match TemplateInput::classify(input) {
        TemplateInput::Messages(messages) => messages.to_vec(),
        TemplateInput::Envelope(envelope) => {
            envelope.messages.map(<[Value]>::to_vec).unwrap_or_default()
        }
        TemplateInput::Unsupported => Vec::new(),
    }
}
