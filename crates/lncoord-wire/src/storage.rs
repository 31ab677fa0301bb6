//! Stored-value codec.
//!
//! Each record is persisted as compact JSON with zero-valued fields omitted,
//! keyed by the raw 66-byte pair key. The encoding is self-describing, so
//! adding optional fields later does not invalidate existing databases.

use lncoord_types::PairData;

use crate::error::Result;

/// Encode a record for storage.
pub fn encode_history(history: &PairData) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(history)?)
}

/// Decode a stored record.
pub fn decode_history(bytes: &[u8]) -> Result<PairData> {
    Ok(serde_json::from_slice(bytes)?)
}
