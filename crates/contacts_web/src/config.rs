//! Environment-driven server configuration.
//!
//! Every key has a default; a present but unparsable value is an error.

use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use thiserror::Error;

pub const PORT_KEY: &str = "CONTACTS_PORT";
pub const DB_PATH_KEY: &str = "CONTACTS_DB_PATH";
pub const LOG_LEVEL_KEY: &str = "CONTACTS_LOG_LEVEL";
pub const LOG_DIR_KEY: &str = "CONTACTS_LOG_DIR";

/// Database path selecting the in-memory store.
pub const MEMORY_DB_PATH: &str = ":memory:";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value `{value}`: {message}")]
    Invalid {
        key: &'static str,
        value: String,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub db_path: String,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default_log_dir = env::temp_dir().join("contacts-logs");

        Ok(Self {
            port: try_load(&lookup, PORT_KEY, "3000")?,
            db_path: lookup(DB_PATH_KEY).unwrap_or_else(|| "contacts.sqlite3".to_string()),
            log_level: lookup(LOG_LEVEL_KEY)
                .unwrap_or_else(|| contacts_core::default_log_level().to_string()),
            log_dir: lookup(LOG_DIR_KEY)
                .map(PathBuf::from)
                .unwrap_or(default_log_dir),
        })
    }

    pub fn address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn uses_memory_store(&self) -> bool {
        self.db_path == MEMORY_DB_PATH
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| default.to_string());

    value.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
        key,
        value: value.clone(),
        message: err.to_string(),
    })
}
