//! Route definitions.
//!
//! # Responsibilities
//! - Hold a compiled path template and its per-verb handlers
//! - Carry route-level context, middleware, cache TTL and allowed methods
//!
//! # Design Decisions
//! - Built once through `RouteBuilder`, immutable afterwards
//! - Cheap to clone: handlers and middleware are shared via `Arc`
//! - An allowed method without a handler is legal to build; dispatch
//!   reports it as a server error

use std::collections::HashMap;
use std::fmt;

use axum::http::Method;
use serde_json::{Map, Value};

use crate::error::RouteError;
use crate::middleware::SharedMiddleware;
use crate::routing::handler::SharedHandler;
use crate::routing::matcher::PathTemplate;

#[derive(Clone)]
pub struct Route {
    template: PathTemplate,
    context: Map<String, Value>,
    middleware: Vec<SharedMiddleware>,
    cache_ttl: u32,
    allowed_methods: Vec<Method>,
    handlers: HashMap<Method, SharedHandler>,
}

impl Route {
    pub fn builder(path: impl Into<String>) -> RouteBuilder {
        RouteBuilder::new(path)
    }

    pub fn path(&self) -> &str {
        self.template.as_str()
    }

    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    pub fn context(&self) -> &Map<String, Value> {
        &self.context
    }

    pub fn middleware(&self) -> &[SharedMiddleware] {
        &self.middleware
    }

    /// Seconds a successful response may be cached.
    pub fn cache_ttl(&self) -> u32 {
        self.cache_ttl
    }

    /// Allowed methods, in declared order.
    pub fn allowed_methods(&self) -> &[Method] {
        &self.allowed_methods
    }

    pub fn allows(&self, method: &Method) -> bool {
        self.allowed_methods.contains(method)
    }

    pub fn handler(&self, method: &Method) -> Option<&SharedHandler> {
        self.handlers.get(method)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handled: Vec<&str> = self.handlers.keys().map(Method::as_str).collect();
        handled.sort_unstable();
        f.debug_struct("Route")
            .field("path", &self.template.as_str())
            .field("allowed_methods", &self.allowed_methods)
            .field("handlers", &handled)
            .field("middleware", &self.middleware.len())
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

/// Builder for [`Route`].
pub struct RouteBuilder {
    path: String,
    context: Map<String, Value>,
    middleware: Vec<SharedMiddleware>,
    cache_ttl: u32,
    allowed_methods: Vec<Method>,
    handlers: HashMap<Method, SharedHandler>,
}

impl RouteBuilder {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            context: Map::new(),
            middleware: Vec::new(),
            cache_ttl: 0,
            allowed_methods: Vec::new(),
            handlers: HashMap::new(),
        }
    }

    /// Initial context entry copied into every request's context.
    pub fn context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn middleware(mut self, middleware: SharedMiddleware) -> Self {
        self.middleware.push(middleware);
        self
    }

    pub fn cache_ttl(mut self, seconds: u32) -> Self {
        self.cache_ttl = seconds;
        self
    }

    /// Replace the allowed-method list. Duplicates are dropped, order is kept.
    pub fn allowed_methods<I>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        self.allowed_methods.clear();
        for method in methods {
            if !self.allowed_methods.contains(&method) {
                self.allowed_methods.push(method);
            }
        }
        self
    }

    /// Register the handler for one verb. Does not alter the allowed methods.
    pub fn handler(mut self, method: Method, handler: SharedHandler) -> Self {
        self.handlers.insert(method, handler);
        self
    }

    pub fn head(self, handler: SharedHandler) -> Self {
        self.handler(Method::HEAD, handler)
    }

    pub fn options(self, handler: SharedHandler) -> Self {
        self.handler(Method::OPTIONS, handler)
    }

    pub fn get(self, handler: SharedHandler) -> Self {
        self.handler(Method::GET, handler)
    }

    pub fn post(self, handler: SharedHandler) -> Self {
        self.handler(Method::POST, handler)
    }

    pub fn put(self, handler: SharedHandler) -> Self {
        self.handler(Method::PUT, handler)
    }

    pub fn patch(self, handler: SharedHandler) -> Self {
        self.handler(Method::PATCH, handler)
    }

    pub fn delete(self, handler: SharedHandler) -> Self {
        self.handler(Method::DELETE, handler)
    }

    pub fn build(self) -> Result<Route, RouteError> {
        let template = PathTemplate::compile(&self.path)?;
        Ok(self.with_template(template))
    }

    /// Finish with an already compiled template; the builder's path is ignored.
    pub(crate) fn with_template(self, template: PathTemplate) -> Route {
        Route {
            template,
            context: self.context,
            middleware: self.middleware,
            cache_ttl: self.cache_ttl,
            allowed_methods: self.allowed_methods,
            handlers: self.handlers,
        }
    }
}
