//! JSON snapshots of the store.
//!
//! A snapshot file holds everything the engine reads:
//!
//! ```json
//! {
//!   "generations": [{"id": "g1", "tenant_id": "t1", "rule_id": "r1",
//!                    "generation_number": 1, "uploaded_at": "2024-01-01T00:00:00Z",
//!                    "is_active": true}],
//!   "rows": [{"generation_id": "g1", "row_number": 1, "data": {"name": "Alice"}}],
//!   "images": [{"id": "i1", "tenant_id": "t1", "name": "logo", "url": "https://cdn/logo.png"}],
//!   "auto_replies": []
//! }
//! ```
//!
//! Every section is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use ile_domain::{AutoReply, ImageAsset, RuleGeneration, RuleRow};

use crate::serialization::{SerializationError, from_json, to_json_stable};

/// Errors that can occur reading or writing a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The file could not be read or written.
    #[error("snapshot I/O error at {path}: {source}")]
    Io {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not a valid snapshot.
    #[error("invalid snapshot: {0}")]
    Serialization(#[from] SerializationError),
}

/// Everything the in-memory store holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSnapshot {
    /// Rule table generations.
    pub generations: Vec<RuleGeneration>,
    /// Rows of every generation.
    pub rows: Vec<RuleRow>,
    /// Uploaded images.
    pub images: Vec<ImageAsset>,
    /// Configured auto-replies.
    pub auto_replies: Vec<AutoReply>,
}

/// Reads a snapshot file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub async fn load_snapshot(path: &Path) -> Result<StoreSnapshot, SnapshotError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let snapshot: StoreSnapshot = from_json(&raw)?;
    debug!(
        path = %path.display(),
        generations = snapshot.generations.len(),
        rows = snapshot.rows.len(),
        images = snapshot.images.len(),
        auto_replies = snapshot.auto_replies.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

/// Writes a snapshot file as stable JSON.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be serialized or written.
pub async fn save_snapshot(path: &Path, snapshot: &StoreSnapshot) -> Result<(), SnapshotError> {
    let json = to_json_stable(snapshot)?;
    tokio::fs::write(path, json)
        .await
        .map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_sections_default_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        tokio::fs::write(&path, br#"{"images": []}"#).await.unwrap();

        let snapshot = load_snapshot(&path).await.unwrap();
        assert_eq!(snapshot, StoreSnapshot::default());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let snapshot: StoreSnapshot = serde_json::from_value(serde_json::json!({
            "images": [{"id": "i1", "tenant_id": "t1", "name": "logo", "url": "https://cdn/logo.png"}]
        }))
        .unwrap();

        save_snapshot(&path, &snapshot).await.unwrap();
        assert_eq!(load_snapshot(&path).await.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn test_missing_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = load_snapshot(&path).await.unwrap_err();
        assert!(matches!(err, SnapshotError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        tokio::fs::write(&path, b"{\"rows\": 3}").await.unwrap();
        assert!(matches!(
            load_snapshot(&path).await.unwrap_err(),
            SnapshotError::Serialization(_)
        ));
    }
}
