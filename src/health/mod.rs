//! Health checking.
//!
//! # Responsibilities
//! - Define the health capability (`is_healthy`)
//! - Provide the always-healthy default
//! - Build the `/healthcheck` route that every registry starts with
//!
//! # Design Decisions
//! - The route is fixed: same path, GET only, always first
//! - Callers swap the *check*, never the route shape
//! - Unhealthy answers with a plain InternalServerError

use std::sync::Arc;

use axum::http::Method;
use serde_json::json;

use crate::http::Response;
use crate::routing::matcher::PathTemplate;
use crate::routing::{handler_fn, Route};

/// Well-known path of the health-check route.
pub const HEALTH_CHECK_PATH: &str = "/healthcheck";

/// Something that can report whether the service is healthy.
pub trait HealthCheck: Send + Sync {
    fn is_healthy(&self) -> bool;
}

/// Default check: always healthy.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysHealthy;

impl HealthCheck for AlwaysHealthy {
    fn is_healthy(&self) -> bool {
        true
    }
}

impl<F> HealthCheck for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_healthy(&self) -> bool {
        self()
    }
}

/// Response for a healthy service: `{"healthy": true}`.
pub fn healthy_response() -> Response {
    Response::ok(json!({ "healthy": true }))
}

/// The health-check route backed by `check`.
pub fn health_route(check: Arc<dyn HealthCheck>) -> Route {
    let handler = handler_fn(move |_event, _ctx| {
        let healthy = check.is_healthy();
        Box::pin(async move {
            if healthy {
                Ok(healthy_response())
            } else {
                tracing::warn!("Health check reported unhealthy");
                Ok(Response::error(crate::http::ErrorKind::InternalServerError, None))
            }
        })
    });

    Route::builder(HEALTH_CHECK_PATH)
        .allowed_methods([Method::GET])
        .get(handler)
        .with_template(PathTemplate::literal(HEALTH_CHECK_PATH))
}
