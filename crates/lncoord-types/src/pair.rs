//! Directed node pairs and their observation records.

use serde::{Deserialize, Serialize};

use crate::constants::{MSAT_PER_SAT, NODE_ID_LEN, PAIR_KEY_LEN};
use crate::error::PairError;
use crate::Timestamp;

/// A Lightning node identifier: a 33-byte compressed secp256k1 public key.
///
/// Equality is byte equality. Construction via [`NodeId::parse`] verifies
/// that the bytes are a valid compressed curve point; [`NodeId::new`] trusts
/// the caller and is meant for bytes that were already validated, such as
/// keys read back from the store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub [u8; NODE_ID_LEN]);

impl NodeId {
    /// Wrap already-validated bytes.
    pub fn new(bytes: [u8; NODE_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse and fully validate a node identifier.
    ///
    /// Checks the length first, then that the bytes decode as a compressed
    /// secp256k1 point, so callers can distinguish the two failure modes.
    pub fn parse(bytes: &[u8]) -> Result<Self, PairError> {
        let raw: [u8; NODE_ID_LEN] =
            bytes
                .try_into()
                .map_err(|_| PairError::InvalidNodeIdLength {
                    expected: NODE_ID_LEN,
                    got: bytes.len(),
                })?;
        secp256k1::PublicKey::from_slice(&raw)?;
        Ok(Self(raw))
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8; NODE_ID_LEN] {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl std::fmt::Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeId({})", hex::encode(self.0))
    }
}

/// A directed node pair. `(A, B)` and `(B, A)` are distinct records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    /// The node the payment was forwarded from.
    pub node_from: NodeId,
    /// The node the payment was forwarded to.
    pub node_to: NodeId,
}

impl PairKey {
    /// Create a pair key from two node identifiers.
    pub fn new(node_from: NodeId, node_to: NodeId) -> Self {
        Self { node_from, node_to }
    }

    /// Encode as the fixed-width storage key `node_from || node_to`.
    pub fn to_bytes(&self) -> [u8; PAIR_KEY_LEN] {
        let mut out = [0u8; PAIR_KEY_LEN];
        out[..NODE_ID_LEN].copy_from_slice(&self.node_from.0);
        out[NODE_ID_LEN..].copy_from_slice(&self.node_to.0);
        out
    }

    /// Split a stored key back into its two node identifiers.
    ///
    /// Only the length is checked; stored keys were curve-validated at
    /// registration time.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PairError> {
        if bytes.len() != PAIR_KEY_LEN {
            return Err(PairError::InvalidPairKeyLength {
                expected: PAIR_KEY_LEN,
                got: bytes.len(),
            });
        }
        let mut from = [0u8; NODE_ID_LEN];
        let mut to = [0u8; NODE_ID_LEN];
        from.copy_from_slice(&bytes[..NODE_ID_LEN]);
        to.copy_from_slice(&bytes[NODE_ID_LEN..]);
        Ok(Self {
            node_from: NodeId::new(from),
            node_to: NodeId::new(to),
        })
    }
}

impl std::fmt::Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}->{}", self.node_from, self.node_to)
    }
}

/// The aggregated observation record for one directed pair.
///
/// Timestamps are UNIX seconds, zero meaning "never observed". Amounts are
/// non-negative; the satoshi fields always mirror the millisatoshi fields
/// divided by 1000. Zero-valued fields are omitted from the JSON encoding,
/// matching the wire convention for unpopulated fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairData {
    /// When a payment over this pair last failed.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub fail_time: Timestamp,
    /// Amount of the last failed payment, in satoshis.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub fail_amt_sat: i64,
    /// Amount of the last failed payment, in millisatoshis. Zero encodes an
    /// amount-independent failure.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub fail_amt_msat: i64,
    /// When a payment over this pair last succeeded.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub success_time: Timestamp,
    /// Amount of the largest known successful payment, in satoshis.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub success_amt_sat: i64,
    /// Amount of the largest known successful payment, in millisatoshis.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub success_amt_msat: i64,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

impl PairData {
    /// The most recent of the two observation timestamps.
    pub fn last_observed(&self) -> Timestamp {
        self.fail_time.max(self.success_time)
    }

    /// Recompute the satoshi fields from the millisatoshi fields.
    ///
    /// Integer floor division; this is the canonical direction, the msat
    /// fields are authoritative.
    pub fn rederive_sat_fields(&mut self) {
        self.fail_amt_sat = self.fail_amt_msat / MSAT_PER_SAT;
        self.success_amt_sat = self.success_amt_msat / MSAT_PER_SAT;
    }
}
