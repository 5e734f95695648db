//! Request translation.
//!
//! # Responsibilities
//! - Read the request ID the host layer attached
//! - Turn an HTTP request into the ALB event shape
//!
//! # Design Decisions
//! - Always produce the multi-valued shape, like an ALB target group with
//!   multi-value headers enabled
//! - Non UTF-8 bodies are decoded lossily; the event never claims base64

use std::collections::HashMap;

use axum::body::Bytes;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::http::event::InboundEvent;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID set by the request-id layer, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Build the ALB event for an HTTP request whose body has been collected.
pub fn to_inbound_event(parts: &Parts, body: &Bytes) -> InboundEvent {
    let mut headers: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in parts.headers.iter() {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        headers.entry(name.as_str().to_string()).or_default().push(value);
    }

    let mut query: HashMap<String, Vec<String>> = HashMap::new();
    if let Some(raw) = parts.uri.query() {
        for (name, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            query.entry(name.into_owned()).or_default().push(value.into_owned());
        }
    }

    let body = if body.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(body).into_owned())
    };

    InboundEvent {
        http_method: parts.method.as_str().to_string(),
        path: parts.uri.path().to_string(),
        headers: None,
        multi_value_headers: Some(headers),
        query_string_parameters: None,
        multi_value_query_string_parameters: Some(query),
        body,
        is_base64_encoded: false,
    }
}
