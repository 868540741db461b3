//! Snapshot encoding for the persisted task collection.
//!
//! A snapshot is a single JSON array holding every task in collection
//! order. Decoding ignores unknown fields and fills in defaults for the
//! optional ones, so snapshots written by older or newer versions still
//! read.

use crate::task::Task;

/// Error type for snapshot encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization failed.
    #[error("snapshot encode error: {0}")]
    Encode(String),
    /// The stored text is not a valid snapshot.
    #[error("snapshot decode error: {0}")]
    Decode(String),
}

/// Encodes the full collection as snapshot text.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialization fails.
pub fn encode_snapshot(tasks: &[Task]) -> Result<String, CodecError> {
    serde_json::to_string(tasks).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decodes snapshot text back into a collection.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if the text is not a JSON array of tasks.
pub fn decode_snapshot(text: &str) -> Result<Vec<Task>, CodecError> {
    serde_json::from_str(text).map_err(|e| CodecError::Decode(e.to_string()))
}
