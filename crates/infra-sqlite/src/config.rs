// Store Configuration

use queuedesk_core::error::{AppError, Result};
use std::time::Duration;

pub const DEFAULT_DB_PATH: &str = "~/.queuedesk/documents.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_BUSY_TIMEOUT_SECS: u64 = 5;

const ENV_DB_PATH: &str = "QUEUEDESK_DB_PATH";
const ENV_MAX_CONNECTIONS: &str = "QUEUEDESK_DB_MAX_CONNECTIONS";
const ENV_BUSY_TIMEOUT_SECS: &str = "QUEUEDESK_DB_BUSY_TIMEOUT_SECS";

/// SQLite document store settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// File path or `sqlite:` URL (`sqlite::memory:` for an in-memory store)
    pub database_url: String,
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: shellexpand::tilde(DEFAULT_DB_PATH).into_owned(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            busy_timeout: Duration::from_secs(DEFAULT_BUSY_TIMEOUT_SECS),
        }
    }
}

impl StoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: shellexpand::tilde(&database_url.into()).into_owned(),
            ..Default::default()
        }
    }

    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Default::default()
        }
    }

    /// Read `QUEUEDESK_DB_PATH`, `QUEUEDESK_DB_MAX_CONNECTIONS` and
    /// `QUEUEDESK_DB_BUSY_TIMEOUT_SECS`, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match lookup(ENV_DB_PATH) {
            Some(path) => Self::new(path),
            None => Self::default(),
        };

        if let Some(raw) = lookup(ENV_MAX_CONNECTIONS) {
            config.max_connections = parse_setting(ENV_MAX_CONNECTIONS, &raw)?;
            if config.max_connections == 0 {
                return Err(AppError::Config(format!(
                    "{} must be at least 1",
                    ENV_MAX_CONNECTIONS
                )));
            }
        }

        if let Some(raw) = lookup(ENV_BUSY_TIMEOUT_SECS) {
            config.busy_timeout = Duration::from_secs(parse_setting(ENV_BUSY_TIMEOUT_SECS, &raw)?);
        }

        Ok(config)
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

fn parse_setting<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} has an invalid value: {:?}", key, raw)))
}
