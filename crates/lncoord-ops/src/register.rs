//! The registration pipeline: validate, sanitize, read-modify-write batch.

use std::collections::HashMap;

use lncoord_store::StoreError;
use lncoord_types::{PairData, PairKey};
use lncoord_valid::{sanitize_register_request, validate_register_request};
use lncoord_wire::{decode_history, encode_history, RegisterMissionControlRequest};

use crate::coordinator::{current_timestamp, Coordinator};
use crate::error::Result;
use crate::merge::merge_pair_data;

/// Outcome of a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterOutcome {
    /// Number of pairs merged into the store.
    pub registered: usize,
    /// Number of stale pairs dropped from the request before merging.
    pub stale_removed: usize,
}

impl RegisterOutcome {
    /// The caller-visible registration summary.
    pub fn success_message(&self) -> String {
        let mut message = format!("Successfully registered {} pairs", self.registered);
        if self.stale_removed > 0 {
            message.push_str(&format!(
                " and removed {} stale pairs",
                self.stale_removed
            ));
        }
        message
    }
}

impl Coordinator {
    /// Register contributed mission control data.
    ///
    /// The request is validated and sanitized first; the surviving pairs
    /// are then merged against the stored records inside a single batched
    /// write transaction. Multiple concurrent registrations may share one
    /// physical commit.
    pub async fn register_mission_control(
        &self,
        mut req: RegisterMissionControlRequest,
    ) -> Result<RegisterOutcome> {
        let now = current_timestamp();
        validate_register_request(&req, self.config.history_threshold_secs, now)?;

        tracing::info!(
            pairs = req.pairs.len(),
            "received mission control registration"
        );

        let stale_removed =
            sanitize_register_request(&mut req, self.config.history_threshold_secs, now);
        if stale_removed > 0 {
            tracing::info!(removed = stale_removed, "removed stale history pairs");
        }

        // Decode into domain records up front; the batch job below may be
        // re-executed and must stay cheap and read-only over this data.
        let mut records: Vec<(PairKey, PairData)> = Vec::with_capacity(req.pairs.len());
        for pair in &req.pairs {
            let key = pair.pair_key()?;
            let Some(mut history) = pair.history else {
                // Sanitization drops history-less pairs; nothing to do.
                continue;
            };
            history.rederive_sat_fields();
            records.push((key, history));
        }

        let registered = records.len();
        let relax_interval = self.config.min_failure_relax_interval_secs;

        self.db
            .batch(move |bucket| {
                // Load every stored record into memory, keyed by pair.
                let mut stored: HashMap<PairKey, PairData> =
                    HashMap::with_capacity(bucket.key_count()?);
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
                    stored.insert(pair_key, history);
                    Ok(())
                })?;

                // Merge the request pairs in list order and write back the
                // touched records.
                for (key, incoming) in &records {
                    match stored.get_mut(key) {
                        Some(current) => merge_pair_data(current, incoming, relax_interval),
                        None => {
                            stored.insert(*key, *incoming);
                        }
                    }

                    let value = encode_history(&stored[key])
                        .map_err(|err| StoreError::invalid_record(err.to_string()))?;
                    bucket.put(&key.to_bytes(), &value)?;
                }

                tracing::info!(
                    pairs = records.len(),
                    "pairs processed and stored successfully"
                );
                Ok(())
            })
            .await?;

        Ok(RegisterOutcome {
            registered,
            stale_removed,
        })
    }
}
