//! HTTP handlers for comment endpoints.
//!
//! Comments are created and listed under a task path, but the task id is
//! taken as given: nothing checks that the task exists.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use super::dto::{
    CommentResponse, CreateCommentRequest, DeleteCommentResponse, TaskCommentsResponse,
    UpdateCommentRequest, require_field,
};
use super::error::ApiErrorResponse;
use super::handlers::AppState;
use crate::domain::{CommentId, TaskId};

/// `POST /tasks/{id}/comments`
///
/// # Errors
///
/// Returns 400 if `content` is missing or blank, or the body is malformed.
pub async fn create_comment(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiErrorResponse> {
    let Json(request) = payload?;
    let content = require_field("content", request.content, "Content is required")?;

    let task_id = TaskId::from(task_id);
    let comment = state
        .mutate(move |repository| {
            Ok(repository.create_comment(&task_id, &content, request.author.as_deref())?)
        })
        .await?;

    tracing::info!(comment_id = %comment.id, task_id = %comment.task_id, "Comment created");
    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}

/// `GET /tasks/{id}/comments`
///
/// Always succeeds; an unknown task id simply yields an empty list.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Json<TaskCommentsResponse> {
    let comments = state
        .repository
        .read()
        .await
        .list_comments_for_task(&TaskId::from(task_id.as_str()))
        .iter()
        .map(CommentResponse::from)
        .collect();

    Json(TaskCommentsResponse::new(task_id, comments))
}

/// `GET /comments/{id}`
///
/// # Errors
///
/// Returns 404 if the comment does not exist.
pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CommentResponse>, ApiErrorResponse> {
    let comment = state
        .repository
        .read()
        .await
        .get_comment(&CommentId::from(id))?;
    Ok(Json(CommentResponse::from(comment)))
}

/// `PUT /comments/{id}`
///
/// # Errors
///
/// - 404 if the comment does not exist.
/// - 400 if the body is empty, malformed or supplies blank content.
pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCommentRequest>, JsonRejection>,
) -> Result<Json<CommentResponse>, ApiErrorResponse> {
    let comment_id = CommentId::from(id);
    let request = payload.map_err(ApiErrorResponse::from);

    let comment = state
        .mutate(move |repository| {
            repository.get_comment(&comment_id)?;
            let Json(request) = request?;
            Ok(repository.update_comment(&comment_id, request.into())?)
        })
        .await?;
    Ok(Json(CommentResponse::from(comment)))
}

/// `DELETE /comments/{id}`
///
/// # Errors
///
/// Returns 404 if the comment does not exist.
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteCommentResponse>, ApiErrorResponse> {
    let comment_id = CommentId::from(id);
    let comment = state
        .mutate(move |repository| Ok(repository.delete_comment(&comment_id)?))
        .await?;

    tracing::info!(comment_id = %comment.id, "Comment deleted");
    Ok(Json(DeleteCommentResponse::from(comment)))
}
