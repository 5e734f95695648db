//! Route middleware.
//!
//! # Data Flow
//! ```text
//! Matched route + fresh Context
//!     → chain.rs (run each middleware in registration order)
//!         → Flow::Continue       : next middleware sees the same Context
//!         → Flow::Respond(resp)  : chain stops, handler is skipped
//!     → handler (only if every middleware continued)
//! ```
//!
//! # Design Decisions
//! - Strictly sequential: never concurrent, one await at a time
//! - Short-circuit is an explicit variant, not a nullable return
//! - The first `Respond` ends the chain

pub mod chain;

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::HandlerError;
use crate::http::{Event, Response};
use crate::routing::Context;

pub use chain::{run_chain, ChainOutcome};

/// What a middleware tells the chain to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Continue,
    Respond(Response),
}

pub type MiddlewareResult = Result<Flow, HandlerError>;

pub trait Middleware: Send + Sync {
    fn call<'a>(&'a self, event: &'a Event, ctx: &'a mut Context) -> BoxFuture<'a, MiddlewareResult>;
}

impl<F> Middleware for F
where
    F: for<'a> Fn(&'a Event, &'a mut Context) -> BoxFuture<'a, MiddlewareResult> + Send + Sync,
{
    fn call<'a>(&'a self, event: &'a Event, ctx: &'a mut Context) -> BoxFuture<'a, MiddlewareResult> {
        self(event, ctx)
    }
}

pub type SharedMiddleware = Arc<dyn Middleware>;

/// Wrap a closure returning a boxed future as middleware.
pub fn middleware_fn<F>(f: F) -> SharedMiddleware
where
    F: for<'a> Fn(&'a Event, &'a mut Context) -> BoxFuture<'a, MiddlewareResult> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Middleware that writes a fixed context entry and continues.
pub fn set_context(key: impl Into<String>, value: impl Into<serde_json::Value>) -> SharedMiddleware {
    let key = key.into();
    let value = value.into();
    middleware_fn(move |_event, ctx| {
        ctx.insert(key.clone(), value.clone());
        Box::pin(async { Ok(Flow::Continue) })
    })
}

/// Middleware that always answers with the response produced by `f`.
pub fn respond<F, Fut>(f: F) -> SharedMiddleware
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    middleware_fn(move |_event, _ctx| {
        let fut = f();
        Box::pin(async move { Ok(Flow::Respond(fut.await)) })
    })
}
