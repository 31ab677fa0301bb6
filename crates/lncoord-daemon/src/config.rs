//! Daemon configuration, loaded from TOML.
//!
//! The file lives at `<app-dir>/lncoord.toml`. If it does not exist at
//! startup, one populated with defaults is written there so operators have
//! a file to edit.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use lncoord_ops::EngineConfig;
use lncoord_store::StoreConfig;

use crate::error::{DaemonError, Result};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILENAME: &str = "lncoord.toml";

/// Default directory name for database files, under the app directory.
const DEFAULT_DATABASE_DIRNAME: &str = "data";

/// Get the default application directory.
///
/// Priority:
/// 1. `LNCOORD_DATA_DIR` environment variable (if set)
/// 2. Platform-specific data directory
/// 3. Fallback to `$HOME/.lncoord`
pub fn default_app_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LNCOORD_DATA_DIR") {
        return PathBuf::from(dir);
    }

    directories::ProjectDirs::from("io", "lncoord", "lncoord")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".lncoord")
        })
}

/// Top-level daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Server endpoint and engine settings.
    pub server: ServerConfig,
    /// Database location and batching settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub log: LogConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self::with_app_dir(&default_app_dir())
    }
}

impl DaemonConfig {
    /// Default configuration rooted at the given application directory.
    pub fn with_app_dir(app_dir: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::new(app_dir),
            log: LogConfig::default(),
        }
    }

    /// Load configuration from a file, or return `Ok(None)` if it does not
    /// exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(Some(toml::from_str(&contents)?))
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|err| DaemonError::config(format!("failed to serialize config: {err}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Load the configuration file, writing one with defaults first if it
    /// does not exist yet.
    pub fn load_or_init(path: &Path, app_dir: &Path) -> Result<Self> {
        match Self::load(path)? {
            Some(config) => Ok(config),
            None => {
                let config = Self::with_app_dir(app_dir);
                config.save(path)?;
                tracing::info!(path = %path.display(), "wrote default configuration file");
                Ok(config)
            }
        }
    }

    /// The storage configuration slice.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            dir_path: self.database.dir_path.clone(),
            file: self.database.file.clone(),
            file_lock_timeout_ms: self.database.file_lock_timeout_ms,
            max_batch_size: self.database.max_batch_size,
            max_batch_delay_ms: self.database.max_batch_delay_ms,
        }
    }

    /// The engine configuration slice.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            history_threshold_secs: self.server.history_threshold_secs,
            stale_data_cleanup_interval_secs: self.server.stale_data_cleanup_interval_secs,
            min_failure_relax_interval_secs: self.server.min_failure_relax_interval_secs,
        }
    }

    /// The address the gateway listens on.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.listen_host, self.server.listen_port)
    }
}

/// Server endpoint and engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address the JSON gateway binds to.
    pub listen_host: String,
    /// Port the JSON gateway listens on.
    pub listen_port: u16,
    /// Staleness cutoff for contributed and stored history, in seconds.
    pub history_threshold_secs: i64,
    /// How often the stale-data sweeper runs, in seconds.
    pub stale_data_cleanup_interval_secs: u64,
    /// Window within which a newer failure may not relax the failure
    /// amount, in seconds.
    pub min_failure_relax_interval_secs: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            listen_host: "0.0.0.0".to_string(),
            listen_port: 8081,
            history_threshold_secs: engine.history_threshold_secs,
            stale_data_cleanup_interval_secs: engine.stale_data_cleanup_interval_secs,
            min_failure_relax_interval_secs: engine.min_failure_relax_interval_secs,
        }
    }
}

/// Database location and batching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Directory where the database file is stored.
    pub dir_path: PathBuf,
    /// Database file name.
    pub file: String,
    /// How long to wait for the database file lock at startup, in
    /// milliseconds.
    pub file_lock_timeout_ms: u64,
    /// Maximum number of write operations batched into one commit.
    pub max_batch_size: usize,
    /// Maximum delay before a batch of writes is committed, in
    /// milliseconds.
    pub max_batch_delay_ms: u64,
}

impl DatabaseConfig {
    fn new(app_dir: &Path) -> Self {
        let store = StoreConfig::default();
        Self {
            dir_path: app_dir.join(DEFAULT_DATABASE_DIRNAME),
            file: store.file,
            file_lock_timeout_ms: store.file_lock_timeout_ms,
            max_batch_size: store.max_batch_size,
            max_batch_delay_ms: store.max_batch_delay_ms,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new(&default_app_dir())
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level: `error`, `warn`, `info`, `debug`, or `trace`.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DaemonConfig::with_app_dir(Path::new("/var/lib/lncoord"));
        assert_eq!(config.server.listen_port, 8081);
        assert_eq!(config.server.history_threshold_secs, 600);
        assert_eq!(
            config.database.dir_path,
            PathBuf::from("/var/lib/lncoord/data")
        );
        assert_eq!(config.database.file, "mission_control.db");
        assert_eq!(config.database.max_batch_size, 1000);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.listen_addr(), "0.0.0.0:8081");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILENAME);

        let mut config = DaemonConfig::with_app_dir(dir.path());
        config.server.listen_port = 9000;
        config.server.history_threshold_secs = 120;
        config.save(&path).unwrap();

        let loaded = DaemonConfig::load(&path).unwrap().unwrap();
        assert_eq!(loaded.server.listen_port, 9000);
        assert_eq!(loaded.server.history_threshold_secs, 120);
    }

    #[test]
    fn test_load_missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(DaemonConfig::load(&path).unwrap().is_none());
    }

    #[test]
    fn test_load_or_init_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILENAME);

        let config = DaemonConfig::load_or_init(&path, dir.path()).unwrap();
        assert!(path.exists());
        assert_eq!(config.server.listen_port, 8081);

        // Second call loads the file it just wrote.
        let again = DaemonConfig::load_or_init(&path, dir.path()).unwrap();
        assert_eq!(again.server.listen_port, 8081);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILENAME);
        std::fs::write(&path, "[server]\nlisten_port = 9999\n").unwrap();

        let config = DaemonConfig::load(&path).unwrap().unwrap();
        assert_eq!(config.server.listen_port, 9999);
        assert_eq!(config.server.history_threshold_secs, 600);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_engine_and_store_slices() {
        let config = DaemonConfig::with_app_dir(Path::new("/tmp/lncoord"));
        let engine = config.engine_config();
        assert_eq!(engine.history_threshold_secs, 600);
        assert_eq!(engine.min_failure_relax_interval_secs, 60);

        let store = config.store_config();
        assert_eq!(store.db_path(), PathBuf::from("/tmp/lncoord/data/mission_control.db"));
        assert_eq!(store.max_batch_delay_ms, 10);
    }
}
