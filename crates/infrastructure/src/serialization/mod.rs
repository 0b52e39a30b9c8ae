//! Deterministic JSON serialization for store snapshots and CLI output.
//!
//! - Object keys keep their document order
//! - 2-space indentation
//! - Trailing newline

mod json;

pub use json::*;
