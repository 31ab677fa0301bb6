//! Validation error types.

use thiserror::Error;

use crate::stale::format_duration;

/// Which endpoint of a directed pair a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeField {
    /// The `node_from` identifier.
    NodeFrom,
    /// The `node_to` identifier.
    NodeTo,
}

impl std::fmt::Display for NodeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeField::NodeFrom => write!(f, "node_from"),
            NodeField::NodeTo => write!(f, "node_to"),
        }
    }
}

/// Reasons a registration request is rejected.
///
/// Every variant maps to an invalid-argument failure on the RPC surface.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The request carried no pairs at all.
    #[error("request must include at least one pair")]
    EmptyRequest,

    /// A node identifier was malformed (wrong length or not on the curve).
    #[error("invalid {field}: {source}")]
    InvalidNodeId {
        /// Which endpoint was rejected.
        field: NodeField,
        /// The underlying parse failure.
        source: lncoord_types::PairError,
    },

    /// A pair arrived without its history record.
    #[error("history cannot be empty")]
    MissingHistory,

    /// An amount field was negative.
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },

    /// The satoshi and millisatoshi fields of an amount disagree.
    #[error("{sat_field} ({sat} sat) does not match {msat_field} ({msat} msat)")]
    UnitMismatch {
        /// Name of the satoshi field.
        sat_field: &'static str,
        /// Value of the satoshi field.
        sat: i64,
        /// Name of the millisatoshi field.
        msat_field: &'static str,
        /// Value of the millisatoshi field.
        msat: i64,
    },

    /// Every pair in the request was older than the staleness threshold.
    #[error(
        "all history data pairs exceed the configured threshold of {} and cannot be registered",
        fmt_threshold(.threshold_secs)
    )]
    AllPairsStale {
        /// The configured staleness threshold in seconds.
        threshold_secs: i64,
    },
}

fn fmt_threshold(threshold_secs: &i64) -> String {
    format_duration(*threshold_secs)
}
