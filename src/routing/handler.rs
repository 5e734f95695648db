//! Route handler abstraction.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::HandlerError;
use crate::http::{Event, Response};
use crate::routing::context::Context;

pub type HandlerResult = Result<Response, HandlerError>;

/// A function answering one HTTP verb of a route.
pub trait Handler: Send + Sync {
    fn call<'a>(&'a self, event: &'a Event, ctx: &'a mut Context) -> BoxFuture<'a, HandlerResult>;
}

impl<F> Handler for F
where
    F: for<'a> Fn(&'a Event, &'a mut Context) -> BoxFuture<'a, HandlerResult> + Send + Sync,
{
    fn call<'a>(&'a self, event: &'a Event, ctx: &'a mut Context) -> BoxFuture<'a, HandlerResult> {
        self(event, ctx)
    }
}

/// Shared handler pointer stored on routes.
pub type SharedHandler = Arc<dyn Handler>;

/// Wrap a closure returning a boxed future as a handler.
///
/// ```rust,ignore
/// let h = handler_fn(|_event, ctx| Box::pin(async move {
///     Ok(Response::ok(ctx.path_param("id").unwrap_or_default()))
/// }));
/// ```
pub fn handler_fn<F>(f: F) -> SharedHandler
where
    F: for<'a> Fn(&'a Event, &'a mut Context) -> BoxFuture<'a, HandlerResult> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Handler that ignores its inputs and resolves the given future factory.
///
/// Convenient for static responses and tests.
pub fn respond_with<F, Fut>(f: F) -> SharedHandler
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    handler_fn(move |_event, _ctx| Box::pin(f()))
}
