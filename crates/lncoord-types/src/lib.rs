//! Core data model for the lncoord mission control coordinator.
//!
//! Mission control data is a historical record of payment routing attempts
//! along directed edges of the Lightning payment graph. Contributing nodes
//! report, per directed node pair, when a payment last succeeded or failed
//! and at which amount. This crate defines the types shared by every other
//! lncoord crate:
//!
//! - [`NodeId`]: a 33-byte compressed secp256k1 public key identifying a node
//! - [`PairKey`]: a directed `(from, to)` node pair
//! - [`PairData`]: the observation record for one pair, carrying the
//!   success/failure timestamps and the liquidity band amounts
//!
//! The amounts in a [`PairData`] define a *liquidity band*: amounts up to
//! `success_amt_msat` are believed routable, amounts from `fail_amt_msat`
//! upwards are believed to fail.

pub mod constants;
pub mod error;
pub mod pair;

pub use constants::{MSAT_PER_SAT, NODE_ID_LEN, PAIR_KEY_LEN};
pub use error::{PairError, Result};
pub use pair::{NodeId, PairData, PairKey};

/// UNIX timestamp in whole seconds. Zero means "never observed".
pub type Timestamp = i64;
