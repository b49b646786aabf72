//! Domain module for task management.
//!
//! This module contains the task and comment records and their value objects.

pub mod comment;
pub mod task;

pub use comment::{ANONYMOUS_AUTHOR, Comment, CommentId, CommentPatch};
pub use task::{Task, TaskId, TaskPatch, Timestamp};
