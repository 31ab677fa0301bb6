//! Wire and storage encodings for lncoord.
//!
//! Two encodings live here:
//!
//! - **RPC payloads** ([`payload`]): the request/response bodies carried by
//!   the JSON gateway. `bytes` fields (node identifiers) are base64 strings,
//!   per gateway convention; zero-valued numeric fields are omitted.
//! - **Stored values** ([`storage`]): each `PairData` record is persisted as
//!   self-describing compact JSON under its raw 66-byte pair key. Binary
//!   keys keep storage minimal, JSON values keep debugging trivial and give
//!   optional fields forward compatibility.

pub mod error;
pub mod payload;
pub mod storage;

pub use error::{Result, WireError};
pub use payload::{
    PairHistory, QueryAggregatedMissionControlRequest, QueryAggregatedMissionControlResponse,
    RegisterMissionControlRequest, RegisterMissionControlResponse,
};
pub use storage::{decode_history, encode_history};
