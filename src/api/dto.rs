//! Data Transfer Objects for API requests and responses.
//!
//! This module contains DTOs that are separate from domain models,
//! providing a clean API contract. Response DTOs also derive `Deserialize`
//! so the dashboard client can decode them.

use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use crate::domain::{Comment, CommentPatch, Task, TaskPatch};

// =============================================================================
// Task DTOs
// =============================================================================

/// Request DTO for creating a new task.
///
/// `title` is optional here so that a missing title is reported as a
/// validation error instead of a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    /// Title of the task.
    #[serde(default)]
    pub title: Option<String>,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request DTO for updating a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title for the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description for the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<UpdateTaskRequest> for TaskPatch {
    fn from(request: UpdateTaskRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
        }
    }
}

/// Response DTO for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Task ID.
    pub id: String,
    /// Title of the task.
    pub title: String,
    /// Description of the task.
    pub description: String,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title.clone(),
            description: task.description.clone(),
            created_at: task.created_at.to_rfc3339(),
        }
    }
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self::from(&task)
    }
}

/// Response DTO for `DELETE /tasks/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTaskResponse {
    /// Acknowledgement message.
    pub message: String,
    /// The task that was removed.
    pub task: TaskResponse,
}

impl From<Task> for DeleteTaskResponse {
    fn from(task: Task) -> Self {
        Self {
            message: "Task deleted successfully".to_string(),
            task: TaskResponse::from(task),
        }
    }
}

// =============================================================================
// Comment DTOs
// =============================================================================

/// Request DTO for creating a comment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    /// Comment body.
    #[serde(default)]
    pub content: Option<String>,
    /// Optional author; defaults to `Anonymous`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Request DTO for updating a comment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    /// New content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl From<UpdateCommentRequest> for CommentPatch {
    fn from(request: UpdateCommentRequest) -> Self {
        Self {
            content: request.content,
            author: request.author,
        }
    }
}

/// Response DTO for a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentResponse {
    /// Comment ID.
    pub id: String,
    /// Referenced task ID.
    pub task_id: String,
    /// Comment body.
    pub content: String,
    /// Author name.
    pub author: String,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last update timestamp (RFC 3339).
    pub updated_at: String,
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            task_id: comment.task_id.to_string(),
            content: comment.content.clone(),
            author: comment.author.clone(),
            created_at: comment.created_at.to_rfc3339(),
            updated_at: comment.updated_at.to_rfc3339(),
        }
    }
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self::from(&comment)
    }
}

/// Response DTO for `GET /tasks/{id}/comments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCommentsResponse {
    /// The task id the comments were filtered by.
    pub task_id: String,
    /// Matching comments in insertion order.
    pub comments: Vec<CommentResponse>,
    /// Number of comments returned.
    pub count: usize,
}

impl TaskCommentsResponse {
    /// Builds the envelope for `task_id`.
    #[must_use]
    pub fn new(task_id: impl Into<String>, comments: Vec<CommentResponse>) -> Self {
        Self {
            task_id: task_id.into(),
            count: comments.len(),
            comments,
        }
    }
}

/// Response DTO for `DELETE /comments/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteCommentResponse {
    /// Acknowledgement message.
    pub message: String,
    /// The comment that was removed.
    pub comment: CommentResponse,
}

impl From<Comment> for DeleteCommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            message: "Comment deleted successfully".to_string(),
            comment: CommentResponse::from(comment),
        }
    }
}

// =============================================================================
// Health DTO
// =============================================================================

/// Health check response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Time the check was answered (RFC 3339).
    pub timestamp: String,
    /// Service version.
    pub version: String,
}

// =============================================================================
// Validation
// =============================================================================

/// Requires a field to be present in the request body.
///
/// Blank values are passed through; the repository rejects those with its
/// own message.
///
/// # Errors
///
/// Returns `ValidationError` with `message` if `value` is `None`.
pub fn require_field(
    field: &str,
    value: Option<String>,
    message: &str,
) -> Result<String, ValidationError> {
    value.ok_or_else(|| ValidationError::single(field, message))
}

// =============================================================================
// Tests
// =============================================================================
