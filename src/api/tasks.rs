//! HTTP handlers for task endpoints.
//!
//! Every handler resolves to one repository call. Read handlers take the
//! shared lock; mutating handlers go through [`AppState::mutate`], which
//! holds the write lock across the change and its snapshot write.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use super::dto::{
    CreateTaskRequest, DeleteTaskResponse, TaskResponse, UpdateTaskRequest, require_field,
};
use super::error::ApiErrorResponse;
use super::handlers::AppState;
use crate::domain::TaskId;

// =============================================================================
// GET /tasks
// =============================================================================

/// Lists every task in insertion order.
pub async fn list_tasks(State(state): State<AppState>) -> Json<Vec<TaskResponse>> {
    let repository = state.repository.read().await;
    Json(
        repository
            .list_tasks()
            .iter()
            .map(TaskResponse::from)
            .collect(),
    )
}

// =============================================================================
// POST /tasks
// =============================================================================

/// Creates a new task.
///
/// # Request Body
///
/// ```json
/// { "title": "Task title", "description": "Optional description" }
/// ```
///
/// # Response
///
/// - **201 Created**: Task created successfully
/// - **400 Bad Request**: Missing or blank title, or malformed body
/// - **500 Internal Server Error**: Snapshot could not be written
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] for the failures listed above.
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiErrorResponse> {
    let Json(request) = payload?;
    let title = require_field("title", request.title, "Title is required")?;

    let task = state
        .mutate(move |repository| {
            Ok(repository.create_task(&title, request.description.as_deref())?)
        })
        .await?;

    tracing::info!(task_id = %task.id, "Task created");
    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

// =============================================================================
// GET /tasks/{id}
// =============================================================================

/// Returns one task.
///
/// # Errors
///
/// Returns 404 if the task does not exist.
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, ApiErrorResponse> {
    let task = state.repository.read().await.get_task(&TaskId::from(id))?;
    Ok(Json(TaskResponse::from(task)))
}

// =============================================================================
// PUT /tasks/{id}
// =============================================================================

/// Updates the title and/or description of a task.
///
/// Omitted fields keep their current values.
///
/// # Errors
///
/// - 404 if the task does not exist.
/// - 400 if the body is empty, malformed or supplies a blank title.
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<TaskResponse>, ApiErrorResponse> {
    let task_id = TaskId::from(id);
    let request = payload.map_err(ApiErrorResponse::from);

    let task = state
        .mutate(move |repository| {
            // An unknown id wins over a bad body.
            repository.get_task(&task_id)?;
            let Json(request) = request?;
            Ok(repository.update_task(&task_id, request.into())?)
        })
        .await?;
    Ok(Json(TaskResponse::from(task)))
}

// =============================================================================
// DELETE /tasks/{id}
// =============================================================================

/// Deletes a task together with all of its comments.
///
/// # Errors
///
/// Returns 404 if the task does not exist.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteTaskResponse>, ApiErrorResponse> {
    let task_id = TaskId::from(id);
    let task = state
        .mutate(move |repository| Ok(repository.delete_task(&task_id)?))
        .await?;

    tracing::info!(task_id = %task.id, "Task deleted");
    Ok(Json(DeleteTaskResponse::from(task)))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryStore;
    use rstest::{fixture, rstest};
    use std::sync::Arc;

    #[fixture]
    fn state() -> AppState {
        AppState::from_store(Arc::new(InMemoryStore::new()))
    }

    fn create_request(title: Option<&str>) -> Result<Json<CreateTaskRequest>, JsonRejection> {
        Ok(Json(CreateTaskRequest {
            title: title.map(str::to_string),
            description: None,
        }))
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_task_returns_created(state: AppState) {
        let (status, Json(task)) = create_task(State(state.clone()), create_request(Some("Buy milk")))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "");

        let Json(tasks) = list_tasks(State(state)).await;
        assert_eq!(tasks, vec![task]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_task_missing_title(state: AppState) {
        let error = create_task(State(state), create_request(None))
            .await
            .unwrap_err();

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.error.error, "Title is required");
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_task_blank_title(state: AppState) {
        let error = create_task(State(state), create_request(Some("   ")))
            .await
            .unwrap_err();

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.error.error, "Title cannot be empty");
    }

    #[rstest]
    #[tokio::test]
    async fn test_get_task_not_found(state: AppState) {
        let error = get_task(State(state), Path("missing".to_string()))
            .await
            .unwrap_err();

        assert_eq!(error.status, StatusCode::NOT_FOUND);
        assert_eq!(error.error.error, "Task not found");
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_task_unknown_id_is_404(state: AppState) {
        let error = update_task(
            State(state),
            Path("missing".to_string()),
            Ok(Json(UpdateTaskRequest::default())),
        )
        .await
        .unwrap_err();

        assert_eq!(error.status, StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_task_empty_body_is_400(state: AppState) {
        let (_, Json(task)) = create_task(State(state.clone()), create_request(Some("T")))
            .await
            .unwrap();

        let error = update_task(
            State(state),
            Path(task.id),
            Ok(Json(UpdateTaskRequest::default())),
        )
        .await
        .unwrap_err();

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.error.error, "No data provided");
    }

    #[rstest]
    #[tokio::test]
    async fn test_delete_task_returns_acknowledgement(state: AppState) {
        let (_, Json(task)) = create_task(State(state.clone()), create_request(Some("Gone")))
            .await
            .unwrap();

        let Json(response) = delete_task(State(state.clone()), Path(task.id.clone()))
            .await
            .unwrap();

        assert_eq!(response.message, "Task deleted successfully");
        assert_eq!(response.task, task);
        assert!(get_task(State(state), Path(task.id)).await.is_err());
    }
}
