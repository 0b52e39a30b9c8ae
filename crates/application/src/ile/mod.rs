//! Inline Logic Engine
//!
//! Expands `${...}` expressions inside JSON reply templates: variable
//! references, `set` assignments, random numbers and tenant-scoped table
//! and image lookups.
//!
//! # Usage
//!
//! ```
//! use ile_application::ile::parser::{parse_expression, split_arguments};
//! use ile_domain::Expression;
//!
//! let parsed = parse_expression("get_name('a,b', 'c')");
//! assert_eq!(
//!     parsed,
//!     Expression::Call {
//!         name: "get_name".to_string(),
//!         args: vec!["'a,b'".to_string(), "'c'".to_string()],
//!     }
//! );
//! assert_eq!(split_arguments("1, rand(1, 2)"), vec!["1", "rand(1, 2)"]);
//! ```

mod engine;
pub mod functions;
pub mod inspect;
pub mod parser;
pub mod span;

pub use engine::{IleError, IleResult, MAX_PASSES, TemplateEngine};
pub use functions::{Builtin, BuiltinInfo};
pub use inspect::{LeafReport, SpanReport, inspect, inspect_value};
pub use parser::{is_call, parse_expression, split_arguments, unquote};
pub use span::{find_spans, has_expression};
