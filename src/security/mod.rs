//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Normalized event:
//!     → cors.rs (OPTIONS + CORS enabled? answer preflight, skip routing)
//!     → routing / middleware / handler
//!     → cors.rs (compute headers for the final response)
//! ```
//!
//! # Design Decisions
//! - Exact origins are trusted, AMP caches are trusted by suffix
//! - Unknown origins get no CORS headers rather than an error

pub mod cors;

pub use cors::CorsPolicy;
