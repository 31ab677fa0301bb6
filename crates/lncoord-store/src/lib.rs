//! Key/value storage adapter for lncoord.
//!
//! The mission control bucket is one table in a file-backed SQLite database:
//! raw 66-byte pair keys mapping to JSON-encoded history records. The
//! adapter exposes exactly the capability set the pipeline needs:
//!
//! - **Scoped transactions**: [`MissionControlDb::view`] (read-only) and
//!   [`MissionControlDb::update`] (read-write) run a closure against the
//!   [`Bucket`], committing on success and rolling back on any error path.
//! - **Batched writes**: [`MissionControlDb::batch`] queues a write job on a
//!   dedicated worker that coalesces concurrent jobs into one physical
//!   commit, bounded by `max_batch_size` jobs and `max_batch_delay`. High
//!   registration rates therefore do not pay one commit per request.
//! - **Exclusive open**: the database is opened in exclusive locking mode
//!   with a busy timeout, so a second process opening the same file waits up
//!   to `file_lock_timeout` and then fails.
//!
//! One connection per process, shared behind a mutex; the mutex is the
//! serialization point for conflicting transactions. Tests run against an
//! in-memory database through the same code paths
//! ([`MissionControlDb::open_in_memory`]).

pub mod batch;
pub mod error;
pub mod kv;

pub use error::{Result, StoreError};
pub use kv::{Bucket, MissionControlDb, StoreConfig};
