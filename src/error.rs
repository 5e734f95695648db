//! Error types shared across the dispatcher.
//!
//! # Design Decisions
//! - Expected failures (no route, wrong method) are *responses*, not errors
//! - `HandlerError` is what user code returns when it genuinely faults
//! - `DispatchError` only surfaces faults the dispatcher cannot answer itself

use thiserror::Error;

/// A fault raised by a route handler or middleware.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Free-form failure message.
    #[error("{0}")]
    Message(String),

    /// Body (de)serialization failure inside a handler.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Any other boxed error.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// Failure of a whole dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A middleware returned `Err`.
    #[error("middleware #{index} failed on {path}: {source}")]
    Middleware {
        index: usize,
        path: String,
        #[source]
        source: HandlerError,
    },

    /// The matched handler returned `Err`.
    #[error("handler for {method} {path} failed: {source}")]
    Handler {
        method: String,
        path: String,
        #[source]
        source: HandlerError,
    },
}

/// Invalid inbound event.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("Invalid HTTP method {method:?} for path: {path}")]
    InvalidMethod { method: String, path: String },
}

/// Invalid path template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("path template must start with '/': {0:?}")]
    MissingLeadingSlash(String),

    #[error("empty parameter name in template {0:?}")]
    EmptyParameter(String),

    #[error("empty segment in template {0:?}")]
    EmptySegment(String),

    #[error("duplicate parameter {name:?} in template {template:?}")]
    DuplicateParameter { template: String, name: String },
}

/// Invalid route definition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error(transparent)]
    Template(#[from] TemplateError),
}
