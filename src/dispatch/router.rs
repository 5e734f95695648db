//! The dispatcher.
//!
//! # Responsibilities
//! - Normalize the inbound event
//! - Answer CORS preflights before any route matching
//! - Match a route, enforce its allowed methods, run middleware and handler
//! - Finalize and report every response
//!
//! # Design Decisions
//! - Expected failures (no route, method not allowed) are responses
//! - `dispatch` propagates handler faults; `handle` never fails
//! - Immutable after construction; reconfiguration builds a new router

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use axum::http::Method;
use futures_util::FutureExt;

use crate::dispatch::finalize::finalize;
use crate::dispatch::report::{report, RequestSummary};
use crate::error::{DispatchError, EventError};
use crate::health::{AlwaysHealthy, HealthCheck};
use crate::http::{ErrorKind, Event, InboundEvent, Response};
use crate::middleware::{run_chain, ChainOutcome};
use crate::observability::metrics;
use crate::routing::{Context, Route, RouteRegistry};
use crate::security::CorsPolicy;

/// Construction options for [`Router`].
#[derive(Clone)]
pub struct RouterOptions {
    /// Exact origins granted CORS; non-empty turns preflight handling on.
    pub allow_list: Vec<String>,
    /// Origin suffixes of AMP caches.
    pub amp_suffixes: Vec<String>,
    /// Backs the `/healthcheck` route.
    pub health_check: Arc<dyn HealthCheck>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            allow_list: Vec::new(),
            amp_suffixes: Vec::new(),
            health_check: Arc::new(AlwaysHealthy),
        }
    }
}

impl fmt::Debug for RouterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterOptions")
            .field("allow_list", &self.allow_list)
            .field("amp_suffixes", &self.amp_suffixes)
            .finish_non_exhaustive()
    }
}

/// In-process ALB event dispatcher.
#[derive(Clone)]
pub struct Router {
    registry: Arc<RouteRegistry>,
    cors: Arc<CorsPolicy>,
    health_check: Arc<dyn HealthCheck>,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::default()
    }

    /// Router over `routes` with no CORS and the default health check.
    pub fn new(routes: Vec<Route>) -> Self {
        Self::with_options(routes, RouterOptions::default())
    }

    pub fn with_options(routes: Vec<Route>, options: RouterOptions) -> Self {
        let registry = RouteRegistry::new(routes, options.health_check.clone());
        tracing::debug!(
            routes = registry.len(),
            cors = !options.allow_list.is_empty(),
            "Router built"
        );

        Self {
            registry: Arc::new(registry),
            cors: Arc::new(CorsPolicy::new(options.allow_list, options.amp_suffixes)),
            health_check: options.health_check,
        }
    }

    /// New router over the same routes with different options.
    pub fn rebuild(&self, options: RouterOptions) -> Self {
        Self::with_options(self.registry.user_routes().to_vec(), options)
    }

    /// New router over the same routes and health check with different CORS lists.
    pub fn with_cors(&self, allow_list: Vec<String>, amp_suffixes: Vec<String>) -> Self {
        self.rebuild(RouterOptions {
            allow_list,
            amp_suffixes,
            health_check: self.health_check.clone(),
        })
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    pub fn cors(&self) -> &CorsPolicy {
        &self.cors
    }

    /// Dispatch one event.
    ///
    /// Returns `Err` only when a middleware or handler fails.
    pub async fn dispatch(&self, inbound: InboundEvent) -> Result<Response, DispatchError> {
        let start = Instant::now();
        let event = match Event::normalize(inbound) {
            Ok(event) => event,
            Err(err) => return Ok(self.reject(err, start)),
        };
        self.dispatch_event(&event, start).await
    }

    /// Dispatch one event, turning every fault into an InternalServerError.
    pub async fn handle(&self, inbound: InboundEvent) -> Response {
        let start = Instant::now();
        let event = match Event::normalize(inbound) {
            Ok(event) => event,
            Err(err) => return self.reject(err, start),
        };

        let outcome = AssertUnwindSafe(self.dispatch_event(&event, start))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                tracing::error!(error = %err, path = %event.path(), "Dispatch failed");
                self.fault(&event, start)
            }
            Err(panic) => {
                tracing::error!(
                    panic = panic_message(panic.as_ref()),
                    path = %event.path(),
                    "Dispatch panicked"
                );
                self.fault(&event, start)
            }
        }
    }

    async fn dispatch_event(&self, event: &Event, start: Instant) -> Result<Response, DispatchError> {
        if self.cors.is_preflight(event.method()) {
            metrics::record_preflight();
            return Ok(self.cors.preflight(event));
        }

        let (response, cache_ttl) = self.route(event).await?;
        Ok(self.complete(response, cache_ttl, event, start))
    }

    async fn route(&self, event: &Event) -> Result<(Response, u32), DispatchError> {
        let Some(found) = self.registry.find(event.path()) else {
            let detail = format!("No route found for path {}", event.path());
            return Ok((Response::not_found(detail), 0));
        };
        let route = found.route;

        if !route.allows(event.method()) {
            let detail = self.method_not_allowed_detail(event, route);
            return Ok((Response::method_not_allowed(detail), 0));
        }

        let mut ctx = Context::for_request(route.context(), found.params);

        let response = match run_chain(route.middleware(), event, &mut ctx).await? {
            ChainOutcome::ShortCircuit { response, .. } => response,
            ChainOutcome::Completed => match route.handler(event.method()) {
                Some(handler) => handler.call(event, &mut ctx).await.map_err(|source| {
                    DispatchError::Handler {
                        method: event.method().to_string(),
                        path: event.path().to_string(),
                        source,
                    }
                })?,
                None => Response::internal_server_error(format!(
                    "No handler registered for method {} on path {}",
                    event.method(),
                    route.path()
                )),
            },
        };

        Ok((response, route.cache_ttl()))
    }

    fn method_not_allowed_detail(&self, event: &Event, route: &Route) -> String {
        let mut allowed: Vec<&str> = Vec::with_capacity(route.allowed_methods().len() + 1);
        if self.cors.is_enabled() {
            allowed.push("OPTIONS");
        }
        allowed.extend(route.allowed_methods().iter().map(Method::as_str));

        format!(
            "Method: {} is not allowed for path: {}. Allowed methods: {}",
            event.method(),
            event.path(),
            allowed.join(",")
        )
    }

    fn complete(&self, response: Response, cache_ttl: u32, event: &Event, start: Instant) -> Response {
        let response = finalize(response, cache_ttl, &self.cors, Some(event));
        report(
            &response,
            RequestSummary {
                host: event.host(),
                path: event.path(),
                method: event.method().as_str(),
            },
        );
        metrics::record_dispatch(event.method().as_str(), response.status_code, start);
        response
    }

    fn fault(&self, event: &Event, start: Instant) -> Response {
        let response = Response::error(ErrorKind::InternalServerError, None);
        self.complete(response, 0, event, start)
    }

    fn reject(&self, err: EventError, start: Instant) -> Response {
        let EventError::InvalidMethod { method, path } = &err;
        let response = finalize(Response::bad_request(err.to_string()), 0, &self.cors, None);
        report(
            &response,
            RequestSummary {
                host: None,
                path: path.as_str(),
                method: method.as_str(),
            },
        );
        metrics::record_dispatch("INVALID", response.status_code, start);
        response
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.registry.len())
            .field("cors", &self.cors)
            .finish()
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

/// Builder for [`Router`].
#[derive(Default)]
pub struct RouterBuilder {
    routes: Vec<Route>,
    options: RouterOptions,
}

impl RouterBuilder {
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn routes<I>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = Route>,
    {
        self.routes.extend(routes);
        self
    }

    pub fn allow_list<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.allow_list = origins.into_iter().map(Into::into).collect();
        self
    }

    pub fn amp_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.amp_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn health_check(mut self, check: impl HealthCheck + 'static) -> Self {
        self.options.health_check = Arc::new(check);
        self
    }

    pub fn build(self) -> Router {
        Router::with_options(self.routes, self.options)
    }
}
