//! CORS policy engine.
//!
//! # Responsibilities
//! - Decide which CORS header set (if any) a response carries
//! - Answer preflight requests without touching the route registry
//!
//! # Design Decisions
//! - Rules are evaluated in a fixed priority order, first hit wins:
//!   1. origin is in the allow-list
//!   2. origin ends with an AMP cache suffix
//!   3. `amp-same-origin: true` request header
//!   4. nothing
//! - Read-only after construction; shared across dispatches without locks
//! - A preflight whose origin matches no rule still gets a 200, just
//!   without CORS headers

use axum::http::Method;

use crate::http::{Event, HeaderMap, InboundEvent, Response};

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ALLOW_CREDENTIALS: &str = "Access-Control-Allow-Credentials";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";

/// Methods advertised to allow-listed and same-origin AMP callers.
pub const FULL_METHODS: &str = "GET, POST, PATCH, PUT, DELETE, OPTIONS";

/// Methods advertised to AMP cache origins.
pub const AMP_METHODS: &str = "GET, POST, OPTIONS";

/// Request header sent by AMP runtimes for same-origin fetches.
pub const AMP_SAME_ORIGIN: &str = "amp-same-origin";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsPolicy {
    allow_list: Vec<String>,
    amp_suffixes: Vec<String>,
}

impl CorsPolicy {
    pub fn new(allow_list: Vec<String>, amp_suffixes: Vec<String>) -> Self {
        Self {
            allow_list,
            amp_suffixes,
        }
    }

    /// CORS is on when at least one exact origin is allowed.
    pub fn is_enabled(&self) -> bool {
        !self.allow_list.is_empty()
    }

    pub fn allow_list(&self) -> &[String] {
        &self.allow_list
    }

    pub fn amp_suffixes(&self) -> &[String] {
        &self.amp_suffixes
    }

    /// Whether `method` should be answered as a preflight.
    pub fn is_preflight(&self, method: &Method) -> bool {
        self.is_enabled() && *method == Method::OPTIONS
    }

    /// CORS headers for a request from `origin`.
    pub fn headers_for(&self, origin: Option<&str>, request: &InboundEvent) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Some(origin) = origin {
            if self.allow_list.iter().any(|allowed| allowed == origin) {
                insert_cors(&mut headers, origin, FULL_METHODS);
                return headers;
            }

            if self.amp_suffixes.iter().any(|suffix| origin.ends_with(suffix.as_str())) {
                insert_cors(&mut headers, origin, AMP_METHODS);
                return headers;
            }
        }

        if request.header(AMP_SAME_ORIGIN) == Some("true") {
            insert_cors(&mut headers, "*", FULL_METHODS);
        }

        headers
    }

    /// 200 preflight answer carrying only the CORS headers for `event`.
    pub fn preflight(&self, event: &Event) -> Response {
        let headers = self.headers_for(event.origin(), event.inbound());
        tracing::debug!(
            path = %event.path(),
            origin = event.origin().unwrap_or("-"),
            cors = !headers.is_empty(),
            "Answering preflight"
        );

        let mut response = Response::ok(true);
        if !headers.is_empty() {
            response.multi_value_headers = Some(headers);
        }
        response
    }
}

fn insert_cors(headers: &mut HeaderMap, origin: &str, methods: &str) {
    headers.insert(ALLOW_ORIGIN.to_string(), vec![origin.to_string()]);
    headers.insert(ALLOW_CREDENTIALS.to_string(), vec!["true".to_string()]);
    headers.insert(ALLOW_METHODS.to_string(), vec![methods.to_string()]);
}
