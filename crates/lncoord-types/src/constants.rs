//! Data model constants.

/// Length in bytes of a node identifier (a compressed secp256k1 public key).
pub const NODE_ID_LEN: usize = 33;

/// Length in bytes of an encoded pair key (`node_from || node_to`).
pub const PAIR_KEY_LEN: usize = 2 * NODE_ID_LEN;

/// Millisatoshis per satoshi.
pub const MSAT_PER_SAT: i64 = 1000;
