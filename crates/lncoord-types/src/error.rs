//! Error types for the data model.

use thiserror::Error;

/// Result type alias for data model operations.
pub type Result<T> = std::result::Result<T, PairError>;

/// Errors raised while constructing or decoding pair identifiers.
#[derive(Debug, Error)]
pub enum PairError {
    /// A node identifier had the wrong length.
    #[error("node id must be exactly {expected} bytes, got {got}")]
    InvalidNodeIdLength {
        /// Required length.
        expected: usize,
        /// Length of the rejected input.
        got: usize,
    },

    /// A node identifier is not a valid compressed secp256k1 point.
    #[error("node id is not a valid secp256k1 public key: {0}")]
    InvalidNodeId(#[from] secp256k1::Error),

    /// An encoded pair key had the wrong length.
    #[error("pair key must be exactly {expected} bytes, got {got}")]
    InvalidPairKeyLength {
        /// Required length.
        expected: usize,
        /// Length of the rejected input.
        got: usize,
    },
}
