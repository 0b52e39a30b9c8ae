//! ILE Application - Evaluator, ports and use cases
//!
//! This crate contains the Inline Logic Engine itself and the use cases
//! built on it. It defines ports (traits) for the storage it reads from;
//! adapters live in the infrastructure crate.

pub mod error;
pub mod ile;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{ApplicationError, ApplicationResult};
pub use ile::{IleError, IleResult, MAX_PASSES, TemplateEngine};
