//! Request validation and sanitization for lncoord.
//!
//! Registration requests pass through two gates before they reach storage:
//!
//! 1. **Validation** ([`validate_register_request`]): rejects the whole
//!    request on the first malformed pair. Node identifiers must be 33-byte
//!    compressed secp256k1 points, amounts must be non-negative, satoshi and
//!    millisatoshi fields must agree, and at least one pair must still be
//!    within the staleness threshold. The last rule stops contributors from
//!    filling the store with history the sweeper would immediately drop.
//! 2. **Sanitization** ([`sanitize_register_request`]): removes the stale
//!    pairs from an already-validated request. Validation guaranteed at
//!    least one fresh pair, so the sanitized request is never empty.
//!
//! Both gates take the current time as a parameter; no wall clock is read
//! here.

pub mod error;
pub mod stale;
pub mod validate;

pub use error::{NodeField, ValidationError};
pub use stale::{format_duration, is_history_stale};
pub use validate::{sanitize_register_request, validate_register_request};
