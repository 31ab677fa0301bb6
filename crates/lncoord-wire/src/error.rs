//! Error types for encoding and decoding.

use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, WireError>;

/// Errors raised while encoding or decoding records and payloads.
#[derive(Debug, Error)]
pub enum WireError {
    /// JSON serialization or deserialization failed.
    #[error("json codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// A pair identifier inside a payload was malformed.
    #[error(transparent)]
    Pair(#[from] lncoord_types::PairError),
}
