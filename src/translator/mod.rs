//! Query translation subsystem.
//!
//! # Data Flow
//! ```text
//! inbound path + query
//!     → params.rs (allow-lists, ordered validation)
//!     → upstream.rs (build {owner}/{repo}/{resource}?..., call upstream)
//!     → error.rs / http::response (relay body or mapped error)
//! ```
//!
//! # Design Decisions
//! - Validation fails fast: the upstream is never called for a bad query
//! - 403 and 404 get stable messages; other upstream errors pass through
//! - One upstream call per request, no retries

pub mod description;
pub mod params;
pub mod upstream;

pub use description::api_description;
pub use params::{IssueQuery, ValidationError, ALLOWED_DIRECTION, ALLOWED_SORT, ALLOWED_STATE};
pub use upstream::{Resource, UpstreamClient, UpstreamResponse, UpstreamTarget};
