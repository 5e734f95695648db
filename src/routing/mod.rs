//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming event path
//!     → router.rs (scan registry in order)
//!     → matcher.rs (test template, extract :params)
//!     → Return: RouteMatch { route, params } or None
//!
//! Route Compilation (at startup):
//!     RouteBuilder[]
//!     → Compile path templates
//!     → Prepend health-check route
//!     → Freeze as immutable RouteRegistry
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same input always matches same route
//! - First match wins (registration order)

pub mod context;
pub mod handler;
pub mod matcher;
pub mod route;
pub mod router;

pub use context::{Context, PATH_PARAMS_KEY};
pub use handler::{handler_fn, respond_with, Handler, HandlerResult, SharedHandler};
pub use matcher::PathTemplate;
pub use route::{Route, RouteBuilder};
pub use router::{RouteMatch, RouteRegistry};
