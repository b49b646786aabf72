//! Shared handler state and the health endpoint.

use std::sync::Arc;

use axum::Json;
use tokio::sync::RwLock;

use super::dto::HealthResponse;
use super::error::ApiErrorResponse;
use crate::domain::Timestamp;
use crate::infrastructure::{Repository, SnapshotStore};

// =============================================================================
// Application State
// =============================================================================

/// Shared application dependencies.
///
/// The repository sits behind one `RwLock`: reads share the lock, while a
/// mutation and its snapshot write happen inside a single write guard so
/// concurrent requests cannot lose each other's updates.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Task and comment repository.
    pub repository: Arc<RwLock<Repository>>,
}

impl AppState {
    /// Creates a new `AppState` around an opened repository.
    #[must_use]
    pub fn new(repository: Repository) -> Self {
        Self {
            repository: Arc::new(RwLock::new(repository)),
        }
    }

    /// Opens a repository over `store` and wraps it.
    #[must_use]
    pub fn from_store(store: Arc<dyn SnapshotStore>) -> Self {
        Self::new(Repository::open(store))
    }

    /// Runs `change` under the write lock on the blocking thread pool.
    ///
    /// Mutations write the snapshot with synchronous file I/O, so they are
    /// kept off the async worker threads. The lock is held until `change`
    /// returns.
    ///
    /// # Errors
    ///
    /// Returns whatever `change` returns, or a 500 if the blocking task
    /// panicked or was cancelled.
    pub async fn mutate<T, F>(&self, change: F) -> Result<T, ApiErrorResponse>
    where
        T: Send + 'static,
        F: FnOnce(&mut Repository) -> Result<T, ApiErrorResponse> + Send + 'static,
    {
        let mut repository = Arc::clone(&self.repository).write_owned().await;

        tokio::task::spawn_blocking(move || change(&mut repository))
            .await
            .unwrap_or_else(|error| {
                tracing::error!(%error, "Repository task failed");
                Err(ApiErrorResponse::internal_error("An internal error occurred"))
            })
    }
}

// =============================================================================
// GET /health Handler
// =============================================================================

/// Health check endpoint.
///
/// Does not touch the repository.
///
/// # Response
///
/// - **200 OK**: Service is healthy
///
/// ```json
/// {
///   "status": "healthy",
///   "timestamp": "2024-01-01T00:00:00.000000+00:00",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Timestamp::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{InMemoryStore, Snapshot, StoreError};
    use rstest::rstest;
    use std::sync::Mutex;
    use std::thread::ThreadId;

    #[rstest]
    #[tokio::test]
    async fn test_health_check_reports_healthy() {
        let Json(response) = health_check().await;

        assert_eq!(response.status, "healthy");
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
        assert!(chrono::DateTime::parse_from_rfc3339(&response.timestamp).is_ok());
    }

    /// Records the thread each save runs on.
    #[derive(Debug, Default)]
    struct ThreadRecordingStore {
        inner: InMemoryStore,
        save_threads: Mutex<Vec<ThreadId>>,
    }

    impl SnapshotStore for ThreadRecordingStore {
        fn load(&self) -> Result<Snapshot, StoreError> {
            self.inner.load()
        }

        fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
            self.save_threads
                .lock()
                .unwrap()
                .push(std::thread::current().id());
            self.inner.save(snapshot)
        }
    }

    #[rstest]
    #[tokio::test]
    async fn test_mutate_saves_off_the_calling_thread() {
        let store = Arc::new(ThreadRecordingStore::default());
        let state = AppState::from_store(Arc::clone(&store) as Arc<dyn SnapshotStore>);

        let task = state
            .mutate(|repository| Ok(repository.create_task("Off thread", None)?))
            .await
            .unwrap();

        let save_threads = store.save_threads.lock().unwrap().clone();
        assert_eq!(save_threads.len(), 1);
        assert_ne!(save_threads[0], std::thread::current().id());
        assert_eq!(
            state.repository.read().await.get_task(&task.id).unwrap(),
            task
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_mutate_passes_errors_through() {
        let state = AppState::from_store(Arc::new(InMemoryStore::new()));

        let error = state
            .mutate(|repository| Ok(repository.create_task("  ", None)?))
            .await
            .unwrap_err();

        assert_eq!(error.status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[tokio::test]
    async fn test_app_state_shares_repository() {
        let state = AppState::from_store(Arc::new(InMemoryStore::new()));
        let clone = state.clone();

        state
            .repository
            .write()
            .await
            .create_task("Shared", None)
            .unwrap();

        assert_eq!(clone.repository.read().await.list_tasks().len(), 1);
    }
}
