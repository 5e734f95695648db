//! Route registry and lookup.
//!
//! # Responsibilities
//! - Store routes in registration order, health check first
//! - Look up the first route whose template matches a path
//! - Return the matched route with its extracted parameters, or no match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) template scan (acceptable for typical route counts)
//! - First match wins: no specificity ranking, collisions are a config error
//! - Explicit `None` rather than silent default

use std::sync::Arc;

use crate::health::{health_route, HealthCheck};
use crate::routing::route::Route;

/// A route selected for a path, with its parameters.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct RouteRegistry {
    routes: Vec<Route>,
}

impl RouteRegistry {
    /// Build the registry; the health-check route takes the front slot.
    pub fn new(routes: Vec<Route>, health: Arc<dyn HealthCheck>) -> Self {
        let mut all = Vec::with_capacity(routes.len() + 1);
        all.push(health_route(health));
        all.extend(routes);
        Self { routes: all }
    }

    /// First route matching `path`.
    pub fn find(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.routes.iter().find_map(|route| {
            route
                .template()
                .matches(path)
                .map(|params| RouteMatch { route, params })
        })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Routes as registered by the caller, without the health check.
    pub fn user_routes(&self) -> &[Route] {
        &self.routes[1..]
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
