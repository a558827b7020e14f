//! Request-level errors and how each one is rendered to the client.

use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::http::response::relay;
use crate::translator::ValidationError;

pub const RATE_LIMIT_MESSAGE: &str = "GitHub API rate limit exceeded";
pub const NOT_FOUND_MESSAGE: &str = "Repository not found";
pub const TRANSPORT_MESSAGE: &str = "Upstream request failed";
pub const TIMEOUT_MESSAGE: &str = "Request timed out";
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Error body for validation failures and mapped upstream errors.
#[derive(Debug, Serialize)]
pub struct ErrorMessage<'a> {
    pub message: &'a str,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Rejected query parameter; the upstream was never called.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Upstream answered 403.
    #[error("{}", RATE_LIMIT_MESSAGE)]
    RateLimited,

    /// Upstream answered 404.
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,

    /// Any other non-success upstream answer.
    #[error("upstream returned {status}")]
    Upstream {
        status: StatusCode,
        content_type: Option<HeaderValue>,
        body: Bytes,
    },

    /// No usable response at all (connect failure, DNS, truncated body).
    #[error("upstream transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The configured inbound request timeout elapsed.
    #[error("{}", TIMEOUT_MESSAGE)]
    TimedOut,

    /// A middleware failure other than a timeout.
    #[error("middleware error: {0}")]
    Middleware(axum::BoxError),
}

impl ApiError {
    /// Render the error. Unmapped upstream errors are answered with 400
    /// unless `preserve_upstream_status` is set.
    pub fn into_response_with(self, preserve_upstream_status: bool) -> Response {
        match self {
            ApiError::Validation(e) => message(StatusCode::BAD_REQUEST, &e.to_string()),
            ApiError::RateLimited => message(StatusCode::BAD_REQUEST, RATE_LIMIT_MESSAGE),
            ApiError::NotFound => message(StatusCode::BAD_REQUEST, NOT_FOUND_MESSAGE),
            ApiError::Upstream {
                status,
                content_type,
                body,
            } => {
                let status = if preserve_upstream_status {
                    status
                } else {
                    StatusCode::BAD_REQUEST
                };
                relay(status, content_type, body)
            }
            ApiError::Transport(_) => message(StatusCode::BAD_GATEWAY, TRANSPORT_MESSAGE),
            ApiError::TimedOut => message(StatusCode::GATEWAY_TIMEOUT, TIMEOUT_MESSAGE),
            ApiError::Middleware(_) => message(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE),
        }
    }
}

impl From<axum::BoxError> for ApiError {
    fn from(err: axum::BoxError) -> Self {
        if err.is::<tower::timeout::error::Elapsed>() {
            ApiError::TimedOut
        } else {
            ApiError::Middleware(err)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.into_response_with(false)
    }
}

fn message(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorMessage { message })).into_response()
}
