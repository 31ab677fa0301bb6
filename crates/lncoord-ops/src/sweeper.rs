//! The staleness sweeper.
//!
//! A single long-lived task removes records whose most recent observation
//! fell behind the staleness threshold. One sweep runs immediately at
//! startup, then one per tick. Sweeps never overlap each other; they do
//! overlap registrations, which the store serializes at the transaction
//! level. A sweep failure is logged and retried at the next tick, never
//! surfaced to users.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use lncoord_store::{MissionControlDb, Result as StoreResult, StoreError};
use lncoord_valid::{format_duration, is_history_stale};
use lncoord_wire::decode_history;

use crate::config::EngineConfig;
use crate::coordinator::{current_timestamp, Coordinator};

impl Coordinator {
    /// Run the cleanup loop until the shutdown signal fires.
    ///
    /// Intended to be spawned as its own task. An in-progress sweep runs to
    /// completion; the signal is observed between sweeps.
    pub async fn run_cleanup_routine(&self, mut shutdown: watch::Receiver<bool>) {
        let interval_secs = self.config.stale_data_cleanup_interval_secs;
        tracing::info!(
            interval = %format_duration(interval_secs as i64),
            "cleanup routine started to remove stale mission control data"
        );

        sweep_and_log(&self.db, &self.config);

        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
        // The first tick of a tokio interval fires immediately; the startup
        // sweep above already covered it.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => sweep_and_log(&self.db, &self.config),
                _ = shutdown.changed() => {
                    tracing::info!("cleanup routine stopping");
                    return;
                }
            }
        }
    }
}

fn sweep_and_log(db: &Arc<MissionControlDb>, config: &EngineConfig) {
    tracing::info!("running cleanup routine to remove stale mission control data");
    match sweep(db, config.history_threshold_secs, current_timestamp()) {
        Ok(removed) => {
            tracing::info!(removed, "cleanup routine completed successfully");
        }
        Err(err) => {
            // Transient: the next tick retries.
            tracing::error!(error = %err, "cleanup routine failed");
        }
    }
}

/// Run one sweep: delete every stale record in a single write transaction.
///
/// Returns the number of records removed. Takes the current time as a
/// parameter so tests control the clock.
pub fn sweep(db: &MissionControlDb, history_threshold_secs: i64, now: i64) -> StoreResult<usize> {
    db.update(|bucket| {
        // Collect first, delete after: the iteration must not observe its
        // own deletions.
        let mut stale_keys: Vec<Vec<u8>> = Vec::new();
        bucket.for_each(|key, value| {
            let history = decode_history(value).map_err(|err| {
                tracing::error!(
                    key = %hex::encode(key),
                    error = %err,
                    "failed to decode stored history"
                );
                StoreError::invalid_record(err.to_string())
            })?;
            if is_history_stale(&history, history_threshold_secs, now) {
                stale_keys.push(key.to_vec());
            }
            Ok(())
        })?;

        for key in &stale_keys {
            bucket.delete(key)?;
            tracing::debug!(key = %hex::encode(key), "stale data removed");
        }
        Ok(stale_keys.len())
    })
}
