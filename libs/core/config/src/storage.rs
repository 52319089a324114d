use crate::{ConfigError, FromEnv, env_or_default, env_parse_or_default};
use std::path::PathBuf;
use std::time::Duration;

/// Flat-file storage configuration for the item catalog
#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Location of the JSON document holding the item collection
    pub data_path: PathBuf,
    /// How often the document's modification time is polled
    pub poll_interval: Duration,
}

impl StorageConfig {
    pub fn new(data_path: impl Into<PathBuf>, poll_interval: Duration) -> Self {
        Self {
            data_path: data_path.into(),
            poll_interval,
        }
    }
}

impl FromEnv for StorageConfig {
    /// - DATA_PATH: defaults to data/items.json
    /// - STATS_POLL_INTERVAL_MS: defaults to 5000
    fn from_env() -> Result<Self, ConfigError> {
        let data_path = PathBuf::from(env_or_default("DATA_PATH", "data/items.json"));
        let poll_ms: u64 = env_parse_or_default("STATS_POLL_INTERVAL_MS", 5000)?;

        if poll_ms == 0 {
            return Err(ConfigError::ParseError {
                key: "STATS_POLL_INTERVAL_MS".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            data_path,
            poll_interval: Duration::from_millis(poll_ms),
        })
    }
}
