//! Route handlers: API description, label listing, issue listing.

use std::time::Instant;

use axum::{
    extract::{Path, RawQuery, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};

use crate::http::request::request_id;
use crate::http::response::relay_success;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::translator::{api_description, IssueQuery, Resource};

pub async fn describe() -> Response {
    let start = Instant::now();
    let response = Json(api_description()).into_response();
    metrics::record_request("describe", response.status().as_u16(), start);
    response
}

pub async fn list_labels(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);
    tracing::debug!(request_id = %request_id, owner = %owner, repo = %repo, "Listing labels");

    let target = state.upstream.target(&owner, &repo, Resource::Labels);
    let response = match state.upstream.fetch(&target).await {
        Ok(upstream) => relay_success(upstream),
        Err(e) => {
            tracing::info!(request_id = %request_id, error = %e, "Label listing failed");
            e.into_response_with(state.preserve_error_status)
        }
    };

    metrics::record_request("labels", response.status().as_u16(), start);
    response
}

pub async fn list_issues(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);
    tracing::debug!(
        request_id = %request_id,
        owner = %owner,
        repo = %repo,
        query = ?query,
        "Listing issues"
    );

    let forwarded = match IssueQuery::parse(query.as_deref()).validate() {
        Ok(pairs) => pairs,
        Err(e) => {
            tracing::info!(request_id = %request_id, error = %e, "Rejected issue query");
            metrics::record_validation_failure(&e);
            let response = crate::error::ApiError::from(e).into_response();
            metrics::record_request("issues", response.status().as_u16(), start);
            return response;
        }
    };

    let target = state
        .upstream
        .target(&owner, &repo, Resource::Issues)
        .with_query(forwarded);

    let response = match state.upstream.fetch(&target).await {
        Ok(upstream) => relay_success(upstream),
        Err(e) => {
            tracing::info!(request_id = %request_id, error = %e, "Issue listing failed");
            e.into_response_with(state.preserve_error_status)
        }
    };

    metrics::record_request("issues", response.status().as_u16(), start);
    response
}
