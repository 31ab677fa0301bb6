//! Serving the aggregated view.

use lncoord_store::StoreError;
use lncoord_types::{PairData, PairKey};
use lncoord_wire::decode_history;

use crate::coordinator::Coordinator;
use crate::error::Result;

impl Coordinator {
    /// Return every aggregated pair currently stored.
    ///
    /// Runs in one read-only transaction, so the result reflects a
    /// consistent snapshot of committed registrations.
    pub fn query_aggregated_mission_control(&self) -> Result<Vec<(PairKey, PairData)>> {
        tracing::info!("received aggregated mission control query");

        let pairs = self.db.view(|bucket| {
            // Presize from the store's key count; the count is a hint, the
            // vector grows if new keys landed in between.
            let mut out = Vec::with_capacity(bucket.key_count()?);
            bucket.for_each(|key, value| {
                let pair_key = PairKey::from_bytes(key)
                    .map_err(|err| StoreError::invalid_record(err.to_string()))?;
                let history = decode_history(value).map_err(|err| {
                    tracing::error!(
                        key = %hex::encode(key),
                        error = %err,
                        "failed to decode stored history"
                    );
                    StoreError::invalid_record(err.to_string())
                })?;
                out.push((pair_key, history));
                Ok(())
            })?;
            Ok(out)
        })?;

        tracing::info!(pairs = pairs.len(), "retrieved pairs from the database");
        Ok(pairs)
    }
}
