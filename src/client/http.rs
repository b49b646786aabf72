//! REST client for the taskboard API.
//!
//! [`TaskBoardApi`] mirrors the REST surface one method per endpoint so the
//! dashboard can run against the real server or an in-process stand-in.

use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::api::{
    ApiError, CommentResponse, CreateCommentRequest, CreateTaskRequest, DeleteCommentResponse,
    DeleteTaskResponse, HealthResponse, TaskCommentsResponse, TaskResponse, UpdateCommentRequest,
    UpdateTaskRequest,
};
use crate::domain::{CommentId, TaskId};

// =============================================================================
// Client Error
// =============================================================================

/// Error type for client calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the response could not be decoded.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The base URL cannot carry a path.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Returns the HTTP status if the server answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Request(_) | Self::InvalidUrl(_) => None,
            Self::Status { status, .. } => Some(*status),
        }
    }
}

// =============================================================================
// TaskBoardApi
// =============================================================================

/// Operations the dashboard needs from the backend.
#[allow(async_fn_in_trait)]
pub trait TaskBoardApi {
    async fn list_tasks(&self) -> Result<Vec<TaskResponse>, ClientError>;

    async fn get_task(&self, id: &TaskId) -> Result<TaskResponse, ClientError>;

    async fn create_task(&self, request: &CreateTaskRequest)
    -> Result<TaskResponse, ClientError>;

    async fn update_task(
        &self,
        id: &TaskId,
        request: &UpdateTaskRequest,
    ) -> Result<TaskResponse, ClientError>;

    async fn delete_task(&self, id: &TaskId) -> Result<DeleteTaskResponse, ClientError>;

    async fn list_comments(&self, task_id: &TaskId)
    -> Result<TaskCommentsResponse, ClientError>;

    async fn create_comment(
        &self,
        task_id: &TaskId,
        request: &CreateCommentRequest,
    ) -> Result<CommentResponse, ClientError>;

    async fn update_comment(
        &self,
        id: &CommentId,
        request: &UpdateCommentRequest,
    ) -> Result<CommentResponse, ClientError>;

    async fn delete_comment(&self, id: &CommentId) -> Result<DeleteCommentResponse, ClientError>;

    async fn health(&self) -> Result<HealthResponse, ClientError>;
}

// =============================================================================
// HttpClient
// =============================================================================

/// [`TaskBoardApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    /// Server origin, e.g. `http://127.0.0.1:5000`, without a trailing slash.
    base_url: String,
}

impl HttpClient {
    /// Creates a client for the server at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a client that reuses an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds `<base>/api/<segments...>`, percent-encoding each segment so
    /// ids containing `/`, `?` or `#` stay within one path segment.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let invalid =
            |reason: String| ClientError::InvalidUrl(format!("{}: {reason}", self.base_url));

        let mut url = Url::parse(&self.base_url).map_err(|error| invalid(error.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = match response.json::<ApiError>().await {
            Ok(body) => body.error,
            Err(_) => fallback_message(status),
        };
        tracing::debug!(status = status.as_u16(), %message, "API call failed");

        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

fn fallback_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_string)
}

impl TaskBoardApi for HttpClient {
    async fn list_tasks(&self) -> Result<Vec<TaskResponse>, ClientError> {
        self.send(self.client.get(self.url(&["tasks"])?)).await
    }

    async fn get_task(&self, id: &TaskId) -> Result<TaskResponse, ClientError> {
        self.send(self.client.get(self.url(&["tasks", id.as_str()])?))
            .await
    }

    async fn create_task(
        &self,
        request: &CreateTaskRequest,
    ) -> Result<TaskResponse, ClientError> {
        self.send(self.client.post(self.url(&["tasks"])?).json(request))
            .await
    }

    async fn update_task(
        &self,
        id: &TaskId,
        request: &UpdateTaskRequest,
    ) -> Result<TaskResponse, ClientError> {
        self.send(
            self.client
                .put(self.url(&["tasks", id.as_str()])?)
                .json(request),
        )
        .await
    }

    async fn delete_task(&self, id: &TaskId) -> Result<DeleteTaskResponse, ClientError> {
        self.send(self.client.delete(self.url(&["tasks", id.as_str()])?))
            .await
    }

    async fn list_comments(
        &self,
        task_id: &TaskId,
    ) -> Result<TaskCommentsResponse, ClientError> {
        self.send(
            self.client
                .get(self.url(&["tasks", task_id.as_str(), "comments"])?),
        )
        .await
    }

    async fn create_comment(
        &self,
        task_id: &TaskId,
        request: &CreateCommentRequest,
    ) -> Result<CommentResponse, ClientError> {
        self.send(
            self.client
                .post(self.url(&["tasks", task_id.as_str(), "comments"])?)
                .json(request),
        )
        .await
    }

    async fn update_comment(
        &self,
        id: &CommentId,
        request: &UpdateCommentRequest,
    ) -> Result<CommentResponse, ClientError> {
        self.send(
            self.client
                .put(self.url(&["comments", id.as_str()])?)
                .json(request),
        )
        .await
    }

    async fn delete_comment(&self, id: &CommentId) -> Result<DeleteCommentResponse, ClientError> {
        self.send(self.client.delete(self.url(&["comments", id.as_str()])?))
            .await
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.send(self.client.get(self.url(&["health"])?)).await
    }
}
