//! Infrastructure module for storage and configuration.
//!
//! This module contains the repository, the snapshot stores it persists
//! through, and environment-driven configuration.

pub mod config;
pub mod repository;
pub mod store;

pub use config::{AppConfig, ConfigurationError, StorageMode};
pub use repository::{Repository, RepositoryError};
pub use store::{InMemoryStore, JsonFileStore, Snapshot, SnapshotStore, StoreError};
