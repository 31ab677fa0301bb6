//! Configuration for the aggregation engine.

/// Tunables for staleness handling and merge behavior.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How old a record's most recent observation may be before the record
    /// is considered stale, in seconds.
    pub history_threshold_secs: i64,
    /// How often the background sweeper runs, in seconds.
    pub stale_data_cleanup_interval_secs: u64,
    /// Window within which a newer failure may not raise the failure
    /// amount, in seconds.
    pub min_failure_relax_interval_secs: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // 10 minutes
            history_threshold_secs: 600,
            // 1 hour
            stale_data_cleanup_interval_secs: 3_600,
            // 1 minute
            min_failure_relax_interval_secs: 60,
        }
    }
}

impl EngineConfig {
    /// Set the staleness threshold.
    pub fn with_history_threshold(mut self, secs: i64) -> Self {
        self.history_threshold_secs = secs;
        self
    }

    /// Set the sweep interval.
    pub fn with_cleanup_interval(mut self, secs: u64) -> Self {
        self.stale_data_cleanup_interval_secs = secs;
        self
    }

    /// Set the failure relaxation window.
    pub fn with_min_failure_relax_interval(mut self, secs: i64) -> Self {
        self.min_failure_relax_interval_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.history_threshold_secs, 10 * 60);
        assert_eq!(config.stale_data_cleanup_interval_secs, 60 * 60);
        assert_eq!(config.min_failure_relax_interval_secs, 60);
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::default()
            .with_history_threshold(120)
            .with_cleanup_interval(5)
            .with_min_failure_relax_interval(1);
        assert_eq!(config.history_threshold_secs, 120);
        assert_eq!(config.stale_data_cleanup_interval_secs, 5);
        assert_eq!(config.min_failure_relax_interval_secs, 1);
    }
}
