//! Event dispatch.
//!
//! # Data Flow
//! ```text
//! InboundEvent
//!     → router.rs (normalize; OPTIONS + CORS? → preflight, done)
//!     → routing::RouteRegistry::find (first match wins, else 404)
//!     → allowed-method check (else 405)
//!     → middleware::run_chain (may short-circuit)
//!     → route handler
//!     → finalize.rs (validate, content type, cache control, CORS)
//!     → report.rs (log 4xx as warn, 5xx as error)
//!     → Response
//! ```
//!
//! # Design Decisions
//! - One logical task per event, no parallel sub-tasks
//! - Only the route registry and CORS lists are shared, both read-only

pub mod finalize;
pub mod report;
pub mod router;

pub use finalize::finalize;
pub use report::{report, RequestSummary, Severity};
pub use router::{Router, RouterBuilder, RouterOptions};
