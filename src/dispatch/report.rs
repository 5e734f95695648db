//! Error reporting.
//!
//! Every error-class response is logged once, after finalization. Client
//! errors (4xx) are warnings; everything else is an error. The log line
//! carries the error detail and correlation ID from the body when the body
//! is a structured error, and the raw body otherwise.

use std::borrow::Cow;

use crate::http::{ErrorBody, Response};

/// Log level an error response is reported at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warn,
    Error,
}

/// Which request produced the response.
#[derive(Debug, Clone, Copy)]
pub struct RequestSummary<'a> {
    pub host: Option<&'a str>,
    pub path: &'a str,
    pub method: &'a str,
}

/// `None` for non-error statuses.
pub fn severity(status_code: u16) -> Option<Severity> {
    match status_code / 100 {
        0..=3 => None,
        4 => Some(Severity::Warn),
        _ => Some(Severity::Error),
    }
}

/// Detail and correlation ID of an error body; the raw body when unstructured.
pub fn error_detail(response: &Response) -> (Cow<'_, str>, Option<String>) {
    match serde_json::from_str::<ErrorBody>(&response.body) {
        Ok(body) => (Cow::Owned(body.detail), Some(body.id.to_string())),
        Err(_) => (Cow::Borrowed(response.body.as_str()), None),
    }
}

/// Log `response` if it is an error.
pub fn report(response: &Response, request: RequestSummary<'_>) {
    let Some(severity) = severity(response.status_code) else {
        return;
    };

    let (detail, error_id) = error_detail(response);
    let host = request.host.unwrap_or("-");
    let error_id = error_id.as_deref().unwrap_or("-");

    match severity {
        Severity::Warn => tracing::warn!(
            status = response.status_code,
            error_id,
            "{}. Host: {} Path: {} Method: {}",
            detail,
            host,
            request.path,
            request.method
        ),
        Severity::Error => tracing::error!(
            status = response.status_code,
            error_id,
            "{}. Host: {} Path: {} Method: {}",
            detail,
            host,
            request.path,
            request.method
        ),
    }
}
