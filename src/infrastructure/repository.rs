//! Task and comment repository.
//!
//! The repository owns the authoritative in-memory collections. Every
//! successful mutation writes the full snapshot through the configured
//! [`SnapshotStore`] before it returns, so a response is only sent once the
//! change is durable.
//!
//! Mutations are staged on a copy of the collections and committed only
//! after the store accepts them. A failed write therefore leaves the
//! repository exactly as it was after the last successful write.

use std::sync::Arc;

use thiserror::Error;

use super::store::{Snapshot, SnapshotStore, StoreError};
use crate::domain::{Comment, CommentId, CommentPatch, Task, TaskId, TaskPatch, Timestamp};

// =============================================================================
// Repository Error
// =============================================================================

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A required field was missing or blank.
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// No record with the given id exists.
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: String },

    /// The snapshot could not be written.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl RepositoryError {
    /// Creates a validation error for `field`.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    fn task_not_found(id: &TaskId) -> Self {
        Self::NotFound {
            entity: "Task",
            id: id.to_string(),
        }
    }

    fn comment_not_found(id: &CommentId) -> Self {
        Self::NotFound {
            entity: "Comment",
            id: id.to_string(),
        }
    }
}

/// Rejects `value` if it is blank. The value itself is kept as given.
fn require_text(
    field: &'static str,
    label: &str,
    value: &str,
) -> Result<String, RepositoryError> {
    if value.trim().is_empty() {
        Err(RepositoryError::validation(
            field,
            format!("{label} cannot be empty"),
        ))
    } else {
        Ok(value.to_string())
    }
}

// =============================================================================
// Repository
// =============================================================================

/// In-memory task and comment collections mirrored to a snapshot store.
#[derive(Debug)]
pub struct Repository {
    state: Snapshot,
    store: Arc<dyn SnapshotStore>,
}

impl Repository {
    /// Opens a repository, loading the last saved snapshot from `store`.
    ///
    /// A snapshot that cannot be read is logged and replaced by empty state;
    /// the next successful mutation overwrites it.
    #[must_use]
    pub fn open(store: Arc<dyn SnapshotStore>) -> Self {
        let state = store.load().unwrap_or_else(|error| {
            tracing::warn!(%error, "Failed to load snapshot, starting with empty storage");
            Snapshot::new()
        });
        Self { state, store }
    }

    /// Returns the number of tasks and comments currently held.
    #[must_use]
    pub fn counts(&self) -> (usize, usize) {
        (self.state.tasks.len(), self.state.comments.len())
    }

    /// Applies `change` to a copy of the state, saves it, then commits it.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut Snapshot) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let mut staged = self.state.clone();
        let value = change(&mut staged)?;
        self.store.save(&staged).inspect_err(|error| {
            tracing::error!(%error, "Failed to persist snapshot, change discarded");
        })?;
        self.state = staged;
        Ok(value)
    }

    // -------------------------------------------------------------------------
    // Tasks
    // -------------------------------------------------------------------------

    /// Creates a task with a fresh id and the current time.
    ///
    /// # Errors
    ///
    /// - `Validation` if `title` is blank.
    /// - `Storage` if the snapshot cannot be written.
    pub fn create_task(
        &mut self,
        title: &str,
        description: Option<&str>,
    ) -> Result<Task, RepositoryError> {
        let title = require_text("title", "Title", title)?;
        let task = Task::new(TaskId::generate(), title, Timestamp::now())
            .with_description(description.unwrap_or_default());

        self.commit(|state| {
            state.tasks.insert(task.id.clone(), task.clone());
            Ok(())
        })?;

        tracing::debug!(task_id = %task.id, "Created task");
        Ok(task)
    }

    /// Returns the task with the given id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such task exists.
    pub fn get_task(&self, id: &TaskId) -> Result<Task, RepositoryError> {
        self.state
            .tasks
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::task_not_found(id))
    }

    /// Returns every task in insertion order.
    #[must_use]
    pub fn list_tasks(&self) -> Vec<Task> {
        self.state.tasks.values().cloned().collect()
    }

    /// Merges the supplied fields of `patch` into a task.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such task exists.
    /// - `Validation` if the patch is empty or supplies a blank title.
    /// - `Storage` if the snapshot cannot be written.
    pub fn update_task(&mut self, id: &TaskId, patch: TaskPatch) -> Result<Task, RepositoryError> {
        let existing = self.get_task(id)?;

        if patch.is_empty() {
            return Err(RepositoryError::validation("body", "No data provided"));
        }

        let patch = TaskPatch {
            title: patch
                .title
                .map(|title| require_text("title", "Title", &title))
                .transpose()?,
            description: patch.description,
        };
        let updated = existing.apply(patch);

        self.commit(|state| {
            state.tasks.insert(updated.id.clone(), updated.clone());
            Ok(())
        })?;

        tracing::debug!(task_id = %id, "Updated task");
        Ok(updated)
    }

    /// Deletes a task and every comment whose `task_id` matches it.
    ///
    /// Comments are found by scanning the whole comment collection; no
    /// index from task to comments is kept.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such task exists.
    /// - `Storage` if the snapshot cannot be written.
    pub fn delete_task(&mut self, id: &TaskId) -> Result<Task, RepositoryError> {
        let (task, cascaded) = self.commit(|state| {
            let task = state
                .tasks
                .shift_remove(id)
                .ok_or_else(|| RepositoryError::task_not_found(id))?;
            let before = state.comments.len();
            state.comments.retain(|_, comment| comment.task_id != *id);
            Ok((task, before - state.comments.len()))
        })?;

        tracing::debug!(task_id = %id, cascaded, "Deleted task");
        Ok(task)
    }

    // -------------------------------------------------------------------------
    // Comments
    // -------------------------------------------------------------------------

    /// Creates a comment under `task_id`.
    ///
    /// The task is not required to exist. `author` defaults to
    /// [`crate::domain::ANONYMOUS_AUTHOR`].
    ///
    /// # Errors
    ///
    /// - `Validation` if `content` is blank.
    /// - `Storage` if the snapshot cannot be written.
    pub fn create_comment(
        &mut self,
        task_id: &TaskId,
        content: &str,
        author: Option<&str>,
    ) -> Result<Comment, RepositoryError> {
        let content = require_text("content", "Content", content)?;
        let mut comment = Comment::new(
            CommentId::generate(),
            task_id.clone(),
            content,
            Timestamp::now(),
        );
        if let Some(author) = author {
            comment = comment.with_author(author);
        }

        self.commit(|state| {
            state.comments.insert(comment.id.clone(), comment.clone());
            Ok(())
        })?;

        tracing::debug!(comment_id = %comment.id, task_id = %task_id, "Created comment");
        Ok(comment)
    }

    /// Returns the comment with the given id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such comment exists.
    pub fn get_comment(&self, id: &CommentId) -> Result<Comment, RepositoryError> {
        self.state
            .comments
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::comment_not_found(id))
    }

    /// Returns the comments attached to `task_id`, in insertion order.
    ///
    /// This is a linear filter over all comments.
    #[must_use]
    pub fn list_comments_for_task(&self, task_id: &TaskId) -> Vec<Comment> {
        self.state
            .comments
            .values()
            .filter(|comment| comment.task_id == *task_id)
            .cloned()
            .collect()
    }

    /// Merges the supplied fields of `patch` into a comment and refreshes
    /// its `updated_at`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such comment exists.
    /// - `Validation` if the patch is empty or supplies blank content.
    /// - `Storage` if the snapshot cannot be written.
    pub fn update_comment(
        &mut self,
        id: &CommentId,
        patch: CommentPatch,
    ) -> Result<Comment, RepositoryError> {
        let existing = self.get_comment(id)?;

        if patch.is_empty() {
            return Err(RepositoryError::validation("body", "No data provided"));
        }

        let patch = CommentPatch {
            content: patch
                .content
                .map(|content| require_text("content", "Content", &content))
                .transpose()?,
            author: patch.author,
        };
        let updated = existing.apply(patch, Timestamp::now());

        self.commit(|state| {
            state.comments.insert(updated.id.clone(), updated.clone());
            Ok(())
        })?;

        tracing::debug!(comment_id = %id, "Updated comment");
        Ok(updated)
    }

    /// Deletes a single comment.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such comment exists.
    /// - `Storage` if the snapshot cannot be written.
    pub fn delete_comment(&mut self, id: &CommentId) -> Result<Comment, RepositoryError> {
        let comment = self.commit(|state| {
            state
                .comments
                .shift_remove(id)
                .ok_or_else(|| RepositoryError::comment_not_found(id))
        })?;

        tracing::debug!(comment_id = %id, "Deleted comment");
        Ok(comment)
    }
}

// =============================================================================
// Tests
// =============================================================================
