//! Static inspection of templates
//!
//! Reports how the engine would read each `${...}` span without evaluating
//! anything, so template authors can spot typos and arity mistakes.

use serde::Serialize;
use serde_json::Value;

use ile_domain::{Expression, Span};

use super::functions::Builtin;
use super::parser::parse_expression;
use super::span::find_spans;

/// One top-level span and its parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpanReport {
    /// The span as found.
    pub span: Span,
    /// How its content parses.
    pub expression: Expression,
    /// Problem the engine would silently turn into an empty string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// The spans of one string leaf of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeafReport {
    /// JSON pointer to the leaf.
    pub path: String,
    /// Top-level spans of the leaf.
    pub spans: Vec<SpanReport>,
}

/// Reports the top-level spans of `text`.
#[must_use]
pub fn inspect(text: &str) -> Vec<SpanReport> {
    find_spans(text)
        .into_iter()
        .map(|span| {
            let expression = parse_expression(&span.content);
            let warning = warning_for(&expression);
            SpanReport {
                span,
                expression,
                warning,
            }
        })
        .collect()
}

/// Reports every string leaf of `value` that contains spans, in source order.
#[must_use]
pub fn inspect_value(value: &Value) -> Vec<LeafReport> {
    let mut reports = Vec::new();
    collect(value, String::new(), &mut reports);
    reports
}

fn collect(value: &Value, path: String, reports: &mut Vec<LeafReport>) {
    match value {
        Value::String(text) => {
            let spans = inspect(text);
            if !spans.is_empty() {
                reports.push(LeafReport { path, spans });
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                collect(item, format!("{path}/{index}"), reports);
            }
        }
        Value::Object(object) => {
            for (key, item) in object {
                collect(item, format!("{path}/{}", escape_pointer(key)), reports);
            }
        }
        _ => {}
    }
}

fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

fn warning_for(expression: &Expression) -> Option<String> {
    let Expression::Call { name, args } = expression else {
        return None;
    };
    match Builtin::from_name(name) {
        None => Some(format!("unknown function `{name}`")),
        Some(builtin) if !builtin.accepts(args.len()) => Some(format!(
            "`{name}` takes {} argument(s), got {}",
            join_arities(builtin.info().arities),
            args.len()
        )),
        Some(_) => None,
    }
}

fn join_arities(arities: &[usize]) -> String {
    arities
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" or ")
}
