//! Demo routes served by the bundled binaries.
//!
//! Small on purpose: one route per dispatcher feature (parameters, cache
//! TTL, context written by middleware, middleware short-circuit).

use axum::http::Method;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{HandlerError, RouteError};
use crate::http::Response;
use crate::middleware::{middleware_fn, set_context, Flow};
use crate::routing::{handler_fn, Route};

/// Header the `/private` route expects.
pub const DEMO_KEY_HEADER: &str = "x-demo-key";

#[derive(Debug, Serialize)]
struct Item<'a> {
    id: &'a str,
    source: Option<&'a Value>,
}

pub fn routes() -> Result<Vec<Route>, RouteError> {
    Ok(vec![
        Route::builder("/echo")
            .allowed_methods([Method::GET, Method::POST])
            .get(handler_fn(|event, _ctx| {
                let body = json!({
                    "method": event.method().as_str(),
                    "path": event.path(),
                    "host": event.host(),
                    "name": event.inbound().query_or("name", "world"),
                    "headers": event.inbound().multi_value_header_map(),
                });
                Box::pin(async move { Ok(Response::ok(body)) })
            }))
            .post(handler_fn(|event, _ctx| {
                let payload = event.payload().cloned().unwrap_or_default();
                Box::pin(async move { Ok(Response::ok(payload)) })
            }))
            .build()?,
        Route::builder("/items/:id")
            .allowed_methods([Method::HEAD, Method::GET])
            .cache_ttl(60)
            .middleware(set_context("source", "demo"))
            .get(handler_fn(|_event, ctx| {
                let item = Item {
                    id: ctx.path_param("id").unwrap_or_default(),
                    source: ctx.get("source"),
                };
                let result = Response::json(&item, 200).map_err(HandlerError::from);
                Box::pin(async move { result })
            }))
            .head(handler_fn(|_event, _ctx| Box::pin(async { Ok(Response::new("", 204)) })))
            .build()?,
        Route::builder("/private")
            .allowed_methods([Method::GET])
            .middleware(middleware_fn(|event, _ctx| {
                let authorized = event.header(DEMO_KEY_HEADER).is_some();
                Box::pin(async move {
                    if authorized {
                        Ok(Flow::Continue)
                    } else {
                        Ok(Flow::Respond(Response::not_authorized(format!(
                            "Missing {} header",
                            DEMO_KEY_HEADER
                        ))))
                    }
                })
            }))
            .get(handler_fn(|_event, _ctx| {
                Box::pin(async { Ok(Response::ok(json!({ "secret": 42 }))) })
            }))
            .build()?,
    ])
}
