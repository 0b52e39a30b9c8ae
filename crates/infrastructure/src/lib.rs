//! ILE Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod persistence;
pub mod serialization;

pub use adapters::{SeededRandom, ThreadRandom};
pub use persistence::{InMemoryStore, SnapshotError, StoreSnapshot, load_snapshot, save_snapshot};
pub use serialization::{SerializationError, from_json, to_json_stable};
