//! The coordinator: the object handlers and the sweeper operate on.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use lncoord_store::MissionControlDb;

use crate::config::EngineConfig;

/// Aggregates registrations into the store and serves the aggregated view.
///
/// Operation implementations live in the [`crate::register`] and
/// [`crate::query`] modules; the sweeper in [`crate::sweeper`].
pub struct Coordinator {
    pub(crate) db: Arc<MissionControlDb>,
    pub(crate) config: EngineConfig,
}

impl Coordinator {
    /// Create a coordinator over an opened store.
    pub fn new(db: Arc<MissionControlDb>, config: EngineConfig) -> Self {
        Self { db, config }
    }

    /// The underlying store handle.
    pub fn db(&self) -> &Arc<MissionControlDb> {
        &self.db
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Current wall clock time as UNIX seconds.
pub fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
