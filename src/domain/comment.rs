//! Comment domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::{TaskId, Timestamp};

/// Author recorded when a comment is created without one.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Unique identifier for a comment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(String);

impl CommentId {
    /// Creates a `CommentId` from an existing string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Generates a new `CommentId` from a random UUID (v4).
    ///
    /// **Note**: This is an impure function.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for CommentId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for CommentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CommentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A comment attached to a task.
///
/// `task_id` is a free-form reference: it is not checked against existing
/// tasks, so a comment may outlive or predate the task it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier.
    pub id: CommentId,
    /// Task this comment belongs to.
    pub task_id: TaskId,
    /// Comment body, never empty.
    pub content: String,
    /// Author name.
    pub author: String,
    /// Creation time. Never changes after the comment is created.
    pub created_at: Timestamp,
    /// Time of the last successful update.
    pub updated_at: Timestamp,
}

impl Comment {
    /// Creates a new comment authored by [`ANONYMOUS_AUTHOR`].
    #[must_use]
    pub fn new(
        id: CommentId,
        task_id: TaskId,
        content: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            task_id,
            content: content.into(),
            author: ANONYMOUS_AUTHOR.to_string(),
            updated_at: created_at.clone(),
            created_at,
        }
    }

    /// Returns a copy of the comment with the given author.
    #[must_use]
    pub fn with_author(self, author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            ..self
        }
    }

    /// Applies a patch and stamps `updated_at` with `now`.
    #[must_use]
    pub fn apply(self, patch: CommentPatch, now: Timestamp) -> Self {
        Self {
            content: patch.content.unwrap_or(self.content),
            author: patch.author.unwrap_or(self.author),
            updated_at: now,
            ..self
        }
    }
}

/// Partial update for a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentPatch {
    /// Replacement content.
    pub content: Option<String>,
    /// Replacement author.
    pub author: Option<String>,
}

impl CommentPatch {
    /// Returns true if the patch supplies no field at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.content.is_none() && self.author.is_none()
    }
}
