//! API module for HTTP handlers.
//!
//! This module contains route definitions and request/response handlers.

pub mod comments;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod tasks;

pub use comments::{create_comment, delete_comment, get_comment, list_comments, update_comment};
pub use dto::{
    CommentResponse, CreateCommentRequest, CreateTaskRequest, DeleteCommentResponse,
    DeleteTaskResponse, HealthResponse, TaskCommentsResponse, TaskResponse, UpdateCommentRequest,
    UpdateTaskRequest,
};
pub use error::{ApiError, ApiErrorResponse, FieldError, ValidationError};
pub use handlers::{AppState, health_check};
pub use routes::create_router;
pub use tasks::{create_task, delete_task, get_task, list_tasks, update_task};
