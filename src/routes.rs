//! HTTP routes for the blog API.
//!
//! Each submodule exposes a `*_routes()` constructor returning a
//! `Router<AppState>`; `server::router` merges them.

mod ai;
mod blogs;
mod categories;

use std::fmt::Display;

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};

use crate::server::AppState;

pub use ai::ai_routes;
pub use blogs::blog_routes;
pub use categories::category_routes;

/// Handler result type: JSON body on success, `ApiError` otherwise.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error response carrying a status code and a JSON body with an `error` field.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: Value,
}

impl ApiError {
    /// `{ "error": message }` with the given status.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    /// `{ "error": message, "success": false }`, the shape used by the AI endpoints.
    pub fn unsuccessful(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, message).with_field("success", false)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Adds the underlying error text as `details`.
    pub fn with_details(self, details: impl Display) -> Self {
        self.with_field("details", details.to_string())
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        if let Value::Object(map) = &mut self.body {
            map.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        tracing::error!(error = %format!("{error:#}"), "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
    }
}

/// Unreadable request bodies (wrong content type, malformed JSON, wrong field
/// types) answer 400 with a JSON body instead of axum's plain-text rejection.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), "rejected request body");
        Self::unsuccessful(StatusCode::BAD_REQUEST, "Invalid request body")
            .with_details(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// `GET /` liveness banner.
pub fn root_routes() -> Router<AppState> {
    Router::new().route("/", get(root))
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Startup Blog API is running!" }))
}
