//! End-to-end tests for the REST API through the full router.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use rstest::rstest;
use serde_json::json;

use common::{create_test_app, send, send_request};

// =============================================================================
// Tasks
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_task_lifecycle() {
    let app = create_test_app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({ "title": "Buy milk" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Buy milk");
    assert_eq!(created["description"], "");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, listing) = send(&app, Method::GET, "/api/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing, json!([created]));

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/tasks/{id}"),
        Some(json!({ "description": "2%" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Buy milk");
    assert_eq!(updated["description"], "2%");
    assert_eq!(updated["created_at"], created["created_at"]);

    let (status, deleted) = send(&app, Method::DELETE, &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["message"], "Task deleted successfully");
    assert_eq!(deleted["task"], updated);

    let (status, error) = send(&app, Method::GET, &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error, json!({ "error": "Task not found" }));
}

#[rstest]
#[case(json!({}), "Title is required")]
#[case(json!({ "title": "" }), "Title cannot be empty")]
#[case(json!({ "title": "   ", "description": "x" }), "Title cannot be empty")]
#[tokio::test]
async fn test_create_task_validation(#[case] body: serde_json::Value, #[case] message: &str) {
    let app = create_test_app();

    let (status, error) = send(&app, Method::POST, "/api/tasks", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], message);

    let (_, listing) = send(&app, Method::GET, "/api/tasks", None).await;
    assert_eq!(listing, json!([]));
}

#[rstest]
#[tokio::test]
async fn test_text_fields_stored_as_given() {
    let app = create_test_app();

    let (status, task) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({ "title": "  Buy milk  " })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["title"], "  Buy milk  ");

    let (status, comment) = send(
        &app,
        Method::POST,
        "/api/tasks/x/comments",
        Some(json!({ "content": " hi " })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(comment["content"], " hi ");
}

#[rstest]
#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = create_test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/tasks")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let (status, error) = send_request(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"].is_string());
}

#[rstest]
#[tokio::test]
async fn test_update_task_errors() {
    let app = create_test_app();
    let (_, created) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({ "title": "Keep" })),
    )
    .await;
    let uri = format!("/api/tasks/{}", created["id"].as_str().unwrap());

    let (status, error) = send(&app, Method::PUT, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "No data provided");

    let (status, error) = send(&app, Method::PUT, &uri, Some(json!({ "title": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "Title cannot be empty");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/tasks/missing",
        Some(json!({ "title": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, unchanged) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(unchanged, created);
}

#[rstest]
#[tokio::test]
async fn test_delete_unknown_task_is_404() {
    let app = create_test_app();

    let (status, error) = send(&app, Method::DELETE, "/api/tasks/missing", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], "Task not found");
}

// =============================================================================
// Comments
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_deleting_task_removes_its_comments() {
    let app = create_test_app();
    let (_, task) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({ "title": "Parent" })),
    )
    .await;
    let task_id = task["id"].as_str().unwrap();
    let comments_uri = format!("/api/tasks/{task_id}/comments");

    let (_, first) = send(
        &app,
        Method::POST,
        &comments_uri,
        Some(json!({ "content": "one" })),
    )
    .await;
    let (_, second) = send(
        &app,
        Method::POST,
        &comments_uri,
        Some(json!({ "content": "two", "author": "Ada" })),
    )
    .await;
    let (_, unrelated) = send(
        &app,
        Method::POST,
        "/api/tasks/other/comments",
        Some(json!({ "content": "stays" })),
    )
    .await;

    let (status, _) = send(&app, Method::DELETE, &format!("/api/tasks/{task_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    for comment in [&first, &second] {
        let uri = format!("/api/comments/{}", comment["id"].as_str().unwrap());
        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    let uri = format!("/api/comments/{}", unrelated["id"].as_str().unwrap());
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, unrelated);
}

#[rstest]
#[tokio::test]
async fn test_comments_under_unknown_task_are_listed() {
    let app = create_test_app();
    let uri = "/api/tasks/no-such-task/comments";

    let (status, comment) = send(&app, Method::POST, uri, Some(json!({ "content": "orphan" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(comment["task_id"], "no-such-task");
    assert_eq!(comment["author"], "Anonymous");
    assert_eq!(comment["created_at"], comment["updated_at"]);

    let (status, listing) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        listing,
        json!({ "task_id": "no-such-task", "comments": [comment], "count": 1 })
    );
}

#[rstest]
#[tokio::test]
async fn test_comment_update_and_delete() {
    let app = create_test_app();
    let (_, comment) = send(
        &app,
        Method::POST,
        "/api/tasks/t/comments",
        Some(json!({ "content": "draft", "author": "Ada" })),
    )
    .await;
    let uri = format!("/api/comments/{}", comment["id"].as_str().unwrap());

    let (status, updated) = send(&app, Method::PUT, &uri, Some(json!({ "content": "final" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["content"], "final");
    assert_eq!(updated["author"], "Ada");
    assert_eq!(updated["created_at"], comment["created_at"]);

    let (status, error) = send(&app, Method::PUT, &uri, Some(json!({ "content": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "Content cannot be empty");

    let (status, deleted) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["message"], "Comment deleted successfully");
    assert_eq!(deleted["comment"], updated);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test]
async fn test_create_comment_requires_content() {
    let app = create_test_app();

    let (status, error) = send(
        &app,
        Method::POST,
        "/api/tasks/t/comments",
        Some(json!({ "author": "Ada" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "Content is required");
}

// =============================================================================
// Health & Routing
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_health() {
    let app = create_test_app();

    let (status, body) = send(&app, Method::GET, "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].as_str().unwrap().ends_with("+00:00"));
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[rstest]
#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = create_test_app();

    let (status, _) = send(&app, Method::GET, "/api/nothing-here", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
