//! JSON text for templates, snapshots and CLI output.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// A value could not be written as JSON.
    #[error("JSON serialization failed: {0}")]
    Serialize(serde_json::Error),

    /// Text is not valid JSON for the expected type.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),
}

/// Writes `value` as pretty JSON with a trailing newline.
///
/// Object keys come out in the order the value holds them, so a template
/// read with [`from_json`] is written back in document order.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable<T: Serialize + ?Sized>(value: &T) -> Result<String, SerializationError> {
    let mut json = serde_json::to_string_pretty(value).map_err(SerializationError::Serialize)?;
    json.push('\n');
    Ok(json)
}

/// Parses JSON text.
///
/// # Errors
///
/// Returns an error if the text is invalid or doesn't match `T`.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, SerializationError> {
    serde_json::from_str(json).map_err(SerializationError::Deserialize)
}
