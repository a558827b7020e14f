//! GitHub issues/labels proxy library.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod translator;

pub use config::schema::ProxyConfig;
pub use error::ApiError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
