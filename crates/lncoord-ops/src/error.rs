//! Error types for the aggregation engine.

use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, OpsError>;

/// Errors surfaced by registration, query, and sweep operations.
#[derive(Debug, Error)]
pub enum OpsError {
    /// The request failed validation. Caller-visible as invalid-argument.
    #[error(transparent)]
    Validation(#[from] lncoord_valid::ValidationError),

    /// A storage operation failed. Caller-visible as internal.
    #[error(transparent)]
    Store(#[from] lncoord_store::StoreError),

    /// A payload could not be encoded or decoded. Caller-visible as
    /// internal.
    #[error(transparent)]
    Wire(#[from] lncoord_wire::WireError),
}

impl OpsError {
    /// True for failures caused by the caller's input rather than by this
    /// service.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, OpsError::Validation(_))
    }
}
