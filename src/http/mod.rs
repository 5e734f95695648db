//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! ALB event (JSON) or HTTP request
//!     → request.rs (HTTP request → InboundEvent, request ID)
//!     → event.rs (normalize: method, host, origin, payload)
//!     → [dispatch::Router]
//!     → response.rs (ALB response shape, error builders)
//!     → server.rs (ALB response → HTTP response)
//! ```

pub mod event;
pub mod request;
pub mod response;
pub mod server;

pub use event::{Event, InboundEvent};
pub use request::{request_id, X_REQUEST_ID};
pub use response::{
    is_error_status, ErrorBody, ErrorKind, HeaderMap, Response, CACHE_CONTROL, CONTENT_TYPE,
    INVALID_RESPONSE_DETAIL, JSON_CONTENT_TYPE,
};
pub use server::HttpServer;
