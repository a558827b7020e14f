//! Response construction for relayed upstream bodies.
//!
//! # Design Decisions
//! - Upstream bodies are passed through byte-for-byte, never re-serialized
//! - The upstream `Content-Type` is kept; JSON is assumed when it is missing

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;

use crate::translator::upstream::UpstreamResponse;

/// Build a response carrying `body` unchanged.
pub fn relay(status: StatusCode, content_type: Option<HeaderValue>, body: Bytes) -> Response {
    let content_type =
        content_type.unwrap_or_else(|| HeaderValue::from_static("application/json"));

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    response
}

/// 200 with the upstream success body.
pub fn relay_success(upstream: UpstreamResponse) -> Response {
    relay(StatusCode::OK, upstream.content_type, upstream.body)
}
