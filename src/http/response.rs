//! Response value and builders.
//!
//! # Responsibilities
//! - Model the ALB response shape
//! - Serialize structured bodies; pass string bodies through
//! - Build the canonical error responses (each with a correlation ID)
//!
//! # Design Decisions
//! - Reason phrases come from `http::StatusCode::canonical_reason`
//! - Headers are multi-valued and ordered by name for stable output
//! - An empty body is replaced by the reason phrase

use std::collections::BTreeMap;

use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Multi-valued response headers.
pub type HeaderMap = BTreeMap<String, Vec<String>>;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CACHE_CONTROL: &str = "Cache-Control";

/// The single content type this dispatcher produces.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Detail used when a handler produced something that is not a response.
pub const INVALID_RESPONSE_DETAIL: &str = "Server replied with an invalid response";

/// Response returned to the load balancer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub is_base64_encoded: bool,
    pub status_code: u16,
    pub status_description: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_value_headers: Option<HeaderMap>,
}

impl Response {
    /// Build a response from any body value.
    ///
    /// Strings pass through untouched; everything else is JSON-encoded.
    pub fn new(body: impl Into<Value>, status_code: u16) -> Self {
        let body = match body.into() {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        Self::raw(body, status_code)
    }

    /// 200 response with the given body.
    pub fn ok(body: impl Into<Value>) -> Self {
        Self::new(body, 200)
    }

    /// Serialize `data` as the body.
    pub fn json<T: Serialize>(data: &T, status_code: u16) -> Result<Self, serde_json::Error> {
        Ok(Self::raw(serde_json::to_string(data)?, status_code))
    }

    fn raw(body: String, status_code: u16) -> Self {
        let body = if body.is_empty() {
            reason_phrase(status_code).to_string()
        } else {
            body
        };

        Self {
            is_base64_encoded: false,
            status_code,
            status_description: status_description(status_code),
            body,
            multi_value_headers: None,
        }
    }

    /// Canonical error response.
    pub fn error(kind: ErrorKind, detail: Option<&str>) -> Self {
        let status_code = kind.status_code();
        let body = ErrorBody {
            id: Uuid::new_v4(),
            detail: detail
                .map(str::to_owned)
                .unwrap_or_else(|| reason_phrase(status_code).to_string()),
        };
        // ErrorBody always serializes
        let json = serde_json::to_string(&body).unwrap_or_default();
        Self::raw(json, status_code)
    }

    pub fn not_found(detail: impl AsRef<str>) -> Self {
        Self::error(ErrorKind::NotFound, Some(detail.as_ref()))
    }

    pub fn method_not_allowed(detail: impl AsRef<str>) -> Self {
        Self::error(ErrorKind::MethodNotAllowed, Some(detail.as_ref()))
    }

    pub fn not_implemented(detail: impl AsRef<str>) -> Self {
        Self::error(ErrorKind::NotImplemented, Some(detail.as_ref()))
    }

    pub fn bad_request(detail: impl AsRef<str>) -> Self {
        Self::error(ErrorKind::BadRequest, Some(detail.as_ref()))
    }

    pub fn not_authorized(detail: impl AsRef<str>) -> Self {
        Self::error(ErrorKind::NotAuthorized, Some(detail.as_ref()))
    }

    pub fn not_acceptable(detail: impl AsRef<str>) -> Self {
        Self::error(ErrorKind::NotAcceptable, Some(detail.as_ref()))
    }

    pub fn unsupported_media_type(detail: impl AsRef<str>) -> Self {
        Self::error(ErrorKind::UnsupportedMediaType, Some(detail.as_ref()))
    }

    pub fn conflict(detail: impl AsRef<str>) -> Self {
        Self::error(ErrorKind::Conflict, Some(detail.as_ref()))
    }

    pub fn internal_server_error(detail: impl AsRef<str>) -> Self {
        Self::error(ErrorKind::InternalServerError, Some(detail.as_ref()))
    }

    /// Add a header value (appends when the name already exists).
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.multi_value_headers
            .get_or_insert_with(HeaderMap::new)
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// First value of a response header.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.multi_value_headers
            .as_ref()
            .and_then(|headers| headers.get(name))
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Parse the body back into a structured value.
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    pub fn is_error(&self) -> bool {
        is_error_status(self.status_code)
    }

    /// Check the response is well formed.
    pub fn validate(&self) -> bool {
        StatusCode::from_u16(self.status_code).is_ok() && !self.status_description.trim().is_empty()
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub id: Uuid,
    pub detail: String,
}

/// The canonical error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    MethodNotAllowed,
    NotImplemented,
    BadRequest,
    NotAuthorized,
    NotAcceptable,
    UnsupportedMediaType,
    Conflict,
    InternalServerError,
}

impl ErrorKind {
    pub fn status_code(self) -> u16 {
        let status = match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorKind::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::NotAuthorized => StatusCode::FORBIDDEN,
            ErrorKind::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            ErrorKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        };
        status.as_u16()
    }
}

/// 4xx and 5xx (and anything above) are errors.
pub fn is_error_status(status_code: u16) -> bool {
    status_code / 100 > 3
}

/// Canonical reason phrase, or "Unknown Status" for unregistered codes.
pub fn reason_phrase(status_code: u16) -> &'static str {
    StatusCode::from_u16(status_code)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status")
}

/// `"<code> <reason phrase>"`.
pub fn status_description(status_code: u16) -> String {
    format!("{} {}", status_code, reason_phrase(status_code))
}
