//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! dispatch, http host, config watcher produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows from the HTTP host into every dispatch span
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
