//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handlers and upstream client produce:
//!     → logging.rs (structured log events, request ID on every line)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, when enabled)
//! ```

pub mod logging;
pub mod metrics;
