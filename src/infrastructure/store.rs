//! Snapshot persistence.
//!
//! The whole state of the application is one JSON document with two
//! top-level mappings, `tasks` and `comments`, each keyed by record id.
//! Stores only mirror that document; the repository is the authority.
//!
//! # Implementations
//!
//! - [`JsonFileStore`]: writes the document to a file, replacing it through a
//!   temp file and rename.
//! - [`InMemoryStore`]: keeps the last saved document in memory.
//!
//! Neither implementation locks against other processes. A single writer
//! is assumed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Comment, CommentId, Task, TaskId};

// =============================================================================
// Store Error
// =============================================================================

/// Errors that can occur while loading or saving a snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The in-memory store lock was poisoned by a panicking writer.
    #[error("Store lock poisoned")]
    Poisoned,
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// The persisted document.
///
/// Both mappings preserve insertion order, so the file lists records in the
/// order they were created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Tasks keyed by id.
    #[serde(default)]
    pub tasks: IndexMap<TaskId, Task>,
    /// Comments keyed by id.
    #[serde(default)]
    pub comments: IndexMap<CommentId, Comment>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the snapshot holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.comments.is_empty()
    }
}

// =============================================================================
// Snapshot Store
// =============================================================================

/// Storage backend for snapshots.
pub trait SnapshotStore: Send + Sync + std::fmt::Debug {
    /// Loads the last saved snapshot.
    ///
    /// Returns an empty snapshot if nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if existing state cannot be read or decoded.
    fn load(&self) -> Result<Snapshot, StoreError>;

    /// Replaces the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the snapshot cannot be encoded or written.
    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
}

// =============================================================================
// JSON File Store
// =============================================================================

/// Stores the snapshot as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file is not touched until the first `load` or `save`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Snapshot, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No data file found, starting empty");
                return Ok(Snapshot::new());
            }
            Err(error) => return Err(StoreError::io(&self.path, error)),
        };

        let snapshot: Snapshot = serde_json::from_str(&contents)?;
        tracing::info!(
            path = %self.path.display(),
            tasks = snapshot.tasks.len(),
            comments = snapshot.comments.len(),
            "Loaded snapshot"
        );
        Ok(snapshot)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(snapshot)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|error| StoreError::io(parent, error))?;
        }

        let temp_path = self.temp_path();
        fs::write(&temp_path, json).map_err(|error| StoreError::io(&temp_path, error))?;
        fs::rename(&temp_path, &self.path).map_err(|error| StoreError::io(&self.path, error))?;

        tracing::debug!(
            path = %self.path.display(),
            tasks = snapshot.tasks.len(),
            comments = snapshot.comments.len(),
            "Saved snapshot"
        );
        Ok(())
    }
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// Keeps the last saved snapshot in memory.
///
/// State does not survive the process.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    snapshot: Mutex<Snapshot>,
}

impl InMemoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that starts with `snapshot` already saved.
    #[must_use]
    pub const fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
        }
    }
}

impl SnapshotStore for InMemoryStore {
    fn load(&self) -> Result<Snapshot, StoreError> {
        self.snapshot
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| StoreError::Poisoned)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let mut guard = self.snapshot.lock().map_err(|_| StoreError::Poisoned)?;
        *guard = snapshot.clone();
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
