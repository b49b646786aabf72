//! Runtime configuration.
//!
//! Settings are read from the environment (optionally seeded from a `.env`
//! file by the binary) and select where the snapshot is stored.
//!
//! # Environment Variables
//!
//! - `STORAGE_MODE`: `json_file` (default) | `in_memory`
//! - `DATA_FILE`: Path of the JSON data file (default: `data.json`)
//! - `HOST`: Server host address (default: `0.0.0.0`)
//! - `PORT`: Server port (default: `5000`)
//! - `WORKER_THREADS`: Number of tokio worker threads (default: logical CPU count)

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use super::store::{InMemoryStore, JsonFileStore, SnapshotStore};

/// Default path of the JSON data file.
pub const DEFAULT_DATA_FILE: &str = "data.json";
/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default bind port.
pub const DEFAULT_PORT: u16 = 5000;

// =============================================================================
// Configuration Error
// =============================================================================

/// Errors that can occur while reading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// `STORAGE_MODE` is not a recognized value.
    #[error("Invalid storage mode: {0}. Expected 'json_file' or 'in_memory'")]
    InvalidStorageMode(String),

    /// `PORT` is not a valid port number.
    #[error("Invalid port: {0}")]
    InvalidPort(String),

    /// `DATA_FILE` is set but blank.
    #[error("DATA_FILE must not be empty")]
    EmptyDataFile,

    /// `WORKER_THREADS` is zero or not a number.
    #[error("Invalid worker thread count: {0}. Expected a positive integer")]
    InvalidWorkerThreads(String),
}

// =============================================================================
// Storage Mode
// =============================================================================

/// Where the snapshot lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// Pretty-printed JSON file on disk.
    #[default]
    JsonFile,
    /// Process memory only. Nothing survives a restart.
    InMemory,
}

impl FromStr for StorageMode {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "json_file" | "json" | "file" => Ok(Self::JsonFile),
            "in_memory" | "inmemory" | "memory" => Ok(Self::InMemory),
            _ => Err(ConfigurationError::InvalidStorageMode(value.to_string())),
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Storage backend.
    pub storage_mode: StorageMode,
    /// Path of the data file (used when `storage_mode` is `JsonFile`).
    pub data_file: PathBuf,
    /// Host to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Tokio worker threads. `None` keeps the runtime default.
    pub worker_threads: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_mode: StorageMode::default(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            worker_threads: None,
        }
    }
}

impl AppConfig {
    /// Creates a configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if any variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Creates a configuration from an arbitrary variable lookup.
    ///
    /// Unset and whitespace-only values fall back to defaults, except
    /// `DATA_FILE`: a set but blank `DATA_FILE` is rejected.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if any variable holds an invalid value.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigurationError> {
        let defaults = Self::default();
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let storage_mode = read("STORAGE_MODE")
            .map(|value| value.parse::<StorageMode>())
            .transpose()?
            .unwrap_or(defaults.storage_mode);

        let data_file = match lookup("DATA_FILE") {
            Some(value) if value.trim().is_empty() => {
                return Err(ConfigurationError::EmptyDataFile);
            }
            Some(value) => PathBuf::from(value.trim()),
            None => defaults.data_file,
        };

        let host = read("HOST").unwrap_or(defaults.host);

        let port = read("PORT")
            .map(|value| {
                value
                    .parse::<u16>()
                    .map_err(|_| ConfigurationError::InvalidPort(value))
            })
            .transpose()?
            .unwrap_or(defaults.port);

        let worker_threads = read("WORKER_THREADS")
            .map(|value| match value.parse::<usize>() {
                Ok(0) | Err(_) => Err(ConfigurationError::InvalidWorkerThreads(value)),
                Ok(threads) => Ok(threads),
            })
            .transpose()?;

        Ok(Self {
            storage_mode,
            data_file,
            host,
            port,
            worker_threads,
        })
    }

    /// Returns the `host:port` string to bind.
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Creates the snapshot store selected by `storage_mode`.
    #[must_use]
    pub fn create_store(&self) -> Arc<dyn SnapshotStore> {
        match self.storage_mode {
            StorageMode::JsonFile => Arc::new(JsonFileStore::new(&self.data_file)),
            StorageMode::InMemory => Arc::new(InMemoryStore::new()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[rstest]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.port, 5000);
        assert_eq!(config.data_file, PathBuf::from("data.json"));
        assert_eq!(config.storage_mode, StorageMode::JsonFile);
    }

    #[rstest]
    fn test_reads_all_variables() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("STORAGE_MODE", "in_memory"),
            ("DATA_FILE", "/var/lib/taskboard/data.json"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.storage_mode, StorageMode::InMemory);
        assert_eq!(
            config.data_file,
            PathBuf::from("/var/lib/taskboard/data.json")
        );
        assert_eq!(config.socket_addr(), "127.0.0.1:8080");
    }

    #[rstest]
    #[case("json_file", StorageMode::JsonFile)]
    #[case("JSON", StorageMode::JsonFile)]
    #[case("memory", StorageMode::InMemory)]
    #[case(" In_Memory ", StorageMode::InMemory)]
    fn test_storage_mode_parsing(#[case] input: &str, #[case] expected: StorageMode) {
        assert_eq!(input.parse::<StorageMode>().unwrap(), expected);
    }

    #[rstest]
    fn test_invalid_storage_mode() {
        let result = AppConfig::from_lookup(lookup_from(&[("STORAGE_MODE", "postgres")]));

        assert_eq!(
            result,
            Err(ConfigurationError::InvalidStorageMode("postgres".to_string()))
        );
    }

    #[rstest]
    #[case("not-a-port")]
    #[case("70000")]
    fn test_invalid_port(#[case] port: &str) {
        let result = AppConfig::from_lookup(lookup_from(&[("PORT", port)]));

        assert!(matches!(result, Err(ConfigurationError::InvalidPort(_))));
    }

    #[rstest]
    fn test_worker_threads_read_when_set() {
        let config = AppConfig::from_lookup(lookup_from(&[("WORKER_THREADS", " 4 ")])).unwrap();

        assert_eq!(config.worker_threads, Some(4));
    }

    #[rstest]
    #[case("0")]
    #[case("-2")]
    #[case("many")]
    fn test_invalid_worker_threads(#[case] threads: &str) {
        let result = AppConfig::from_lookup(lookup_from(&[("WORKER_THREADS", threads)]));

        assert_eq!(
            result,
            Err(ConfigurationError::InvalidWorkerThreads(threads.to_string()))
        );
    }

    #[rstest]
    #[case("HOST")]
    #[case("PORT")]
    #[case("STORAGE_MODE")]
    #[case("WORKER_THREADS")]
    fn test_blank_values_fall_back_to_defaults(#[case] key: &str) {
        let config = AppConfig::from_lookup(lookup_from(&[(key, "   ")])).unwrap();

        assert_eq!(config, AppConfig::default());
    }

    #[rstest]
    fn test_blank_data_file_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[("DATA_FILE", "  ")]));

        assert_eq!(result, Err(ConfigurationError::EmptyDataFile));
    }

    #[rstest]
    fn test_in_memory_store_starts_empty() {
        let config = AppConfig {
            storage_mode: StorageMode::InMemory,
            ..AppConfig::default()
        };

        let snapshot = config.create_store().load().unwrap();

        assert!(snapshot.is_empty());
    }
}
