//! Routing definitions.
//!
//! All endpoints live under `/api`.

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::comments::{create_comment, delete_comment, get_comment, list_comments, update_comment};
use super::handlers::{AppState, health_check};
use super::tasks::{create_task, delete_task, get_task, list_tasks, update_task};

/// Creates the API router with all routes and middleware.
///
/// # Examples
///
/// ```ignore
/// use taskboard::api::{AppState, create_router};
///
/// let state = AppState::from_store(config.create_store());
/// let router = create_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
/// axum::serve(listener, router).await?;
/// ```
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health_check))
        // Tasks
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        // Comments
        .route(
            "/tasks/{id}/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/comments/{id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        );

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(state)
}

/// The single-page front end is served from another origin during
/// development, so every origin is allowed.
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
