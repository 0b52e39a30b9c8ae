//! Stores backing the repository ports

mod memory_store;
mod snapshot;

pub use memory_store::InMemoryStore;
pub use snapshot::{SnapshotError, StoreSnapshot, load_snapshot, save_snapshot};
