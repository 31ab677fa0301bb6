//! The lncoord aggregation engine.
//!
//! This crate ties the validation, merge, and storage layers into the two
//! service operations and the background sweeper:
//!
//! - [`Coordinator::register_mission_control`]: validate → sanitize → merge
//!   every surviving pair against the stored records inside one batched
//!   write transaction.
//! - [`Coordinator::query_aggregated_mission_control`]: stream the full
//!   aggregated view out of one read transaction.
//! - [`Coordinator::run_cleanup_routine`]: periodically delete records
//!   whose most recent observation fell behind the staleness threshold.
//!
//! The merge itself ([`merge_pair_data`]) is a pure function; everything
//! time-dependent takes the clock as a parameter so it stays testable.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod merge;
pub mod query;
pub mod register;
pub mod sweeper;

pub use config::EngineConfig;
pub use coordinator::{current_timestamp, Coordinator};
pub use error::{OpsError, Result};
pub use merge::merge_pair_data;
pub use register::RegisterOutcome;
pub use sweeper::sweep;
