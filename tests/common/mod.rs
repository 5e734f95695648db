//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;

use axum::http::Method;
use serde_json::{json, Value};

use alb_router::http::{ErrorBody, Response};
use alb_router::middleware::{respond, set_context};
use alb_router::routing::{handler_fn, respond_with, Context, HandlerResult};
use alb_router::{InboundEvent, Route, Router};

pub const CORS_ALLOW_LIST: [&str; 4] = [
    "http://local.youareplayerone.com",
    "https://local.youareplayerone.com",
    "http://stage.youareplayerone.com",
    "https://stage.youareplayerone.com",
];

pub const AMP_SUFFIXES: [&str; 3] = ["ampproject.org", "amp.cloudflare.com", "bing-amp.com"];

pub const RESTRICTED_AMP_ORIGINS: [&str; 3] = [
    "https://stage.youareplayerone.com.amp.cloudflare.com",
    "https://stage.youareplayerone.com.bing-amp.com",
    "https://stage.youareplayerone.com.cdn.ampproject.org",
];

pub const FULL_CORS_METHODS: &str = "GET, POST, PATCH, PUT, DELETE, OPTIONS";
pub const AMP_CORS_METHODS: &str = "GET, POST, OPTIONS";

/// Event with single-valued headers, like an ALB without multi-value headers.
pub fn new_event(method: &str, path: &str) -> InboundEvent {
    let headers: HashMap<String, String> = [
        ("accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        ("accept-encoding", "gzip"),
        ("host", "membership.example.com"),
        ("x-forwarded-for", "192.0.2.1"),
        ("x-forwarded-port", "80"),
        ("x-forwarded-proto", "http"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let mut event = InboundEvent::new(method, path);
    event.headers = Some(headers);
    event.query_string_parameters = Some(HashMap::new());
    event.body = Some(String::new());
    event
}

/// Event with multi-valued headers and a non-allow-listed origin.
pub fn new_multi_value_event(method: &str, path: &str) -> InboundEvent {
    let headers: HashMap<String, Vec<String>> = [
        ("accept", "text/html,application/xhtml+xml"),
        ("content-type", "application/json; charset=utf-8"),
        ("host", "membership.example.com"),
        ("x-forwarded-for", "72.21.198.66"),
        ("x-forwarded-port", "443"),
        ("x-forwarded-proto", "https"),
        ("origin", "https://membership.example-test.io"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), vec![v.to_string()]))
    .collect();

    let mut event = InboundEvent::new(method, path);
    event.multi_value_headers = Some(headers);
    event.multi_value_query_string_parameters = Some(HashMap::new());
    event.body = Some(String::new());
    event
}

/// Replace the origin of a multi-valued event (`None` removes it).
pub fn with_origin(mut event: InboundEvent, origin: Option<&str>) -> InboundEvent {
    let headers = event.multi_value_headers.get_or_insert_with(HashMap::new);
    match origin {
        Some(origin) => {
            headers.insert("origin".to_string(), vec![origin.to_string()]);
        }
        None => {
            headers.remove("origin");
        }
    }
    event
}

fn allowed_methods() -> [Method; 6] {
    [
        Method::HEAD,
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
    ]
}

/// GET answers, in priority order: the custom context value, the value set
/// by middleware, the path parameters, or the method name.
fn test_get(_event: &alb_router::Event, ctx: &mut Context) -> HandlerResult {
    if let Some(value) = ctx.get("customContextTest") {
        return Ok(Response::ok(value.clone()));
    }
    if let Some(value) = ctx.get("middlewareTest") {
        return Ok(Response::ok(value.clone()));
    }
    if ctx.contains(alb_router::routing::PATH_PARAMS_KEY) {
        let params: Value = json!(ctx.path_params());
        return Ok(Response::ok(params.to_string()));
    }
    Ok(Response::ok("GET"))
}

/// Route answering every verb the way the fixture handler does.
fn test_route(path: &str) -> alb_router::routing::RouteBuilder {
    Route::builder(path)
        .allowed_methods(allowed_methods())
        .head(respond_with(|| async { Ok(Response::ok("HEAD")) }))
        .get(handler_fn(|event, ctx| {
            let result = test_get(event, ctx);
            Box::pin(async move { result })
        }))
        .post(respond_with(|| async { Ok(Response::ok("POST")) }))
        .put(respond_with(|| async { Ok(Response::ok("PUT")) }))
        .patch(respond_with(|| async { Ok(Response::ok("PATCH")) }))
        .delete(respond_with(|| async { Ok(Response::ok("DELETE")) }))
}

pub fn test_routes() -> Vec<Route> {
    vec![
        test_route("/tests").build().unwrap(),
        test_route("/tests/custom-context")
            .context("customContextTest", true)
            .build()
            .unwrap(),
        test_route("/tests/:param/subPath/:param2").build().unwrap(),
        test_route("/tests/middleware")
            .middleware(set_context("middlewareTest", true))
            .build()
            .unwrap(),
        test_route("/tests/middleware-response")
            .middleware(respond(|| async { Response::ok("response from middleware") }))
            .build()
            .unwrap(),
        test_route("/tests/cache-ttl").cache_ttl(300).build().unwrap(),
        test_route("/tests/cache-ttl-error")
            .cache_ttl(300)
            .middleware(respond(|| async {
                Response::internal_server_error(
                    "Middleware should throw error response with no cache-ttl",
                )
            }))
            .build()
            .unwrap(),
    ]
}

/// Router over the fixture routes with CORS configured.
pub fn test_router() -> Router {
    Router::builder()
        .routes(test_routes())
        .allow_list(CORS_ALLOW_LIST)
        .amp_suffixes(AMP_SUFFIXES)
        .build()
}

pub fn assert_response(response: &Response, status: u16, description: &str) {
    assert_eq!(response.status_code, status, "body: {}", response.body);
    assert_eq!(response.status_description, description);
    assert!(!response.is_base64_encoded);
}

/// Error shape: status, non-cacheable JSON, and the given detail.
pub fn assert_error(response: &Response, status: u16, description: &str, detail: &str) {
    assert_response(response, status, description);
    assert_eq!(response.header("Cache-Control"), Some("max-age=0"));
    assert_eq!(response.header("Content-Type"), Some("application/json; charset=utf-8"));
    let body: ErrorBody = response.json_body().expect("error body");
    assert_eq!(body.detail, detail);
}

/// CORS headers present with the given origin and method list.
pub fn assert_cors(response: &Response, origin: &str, methods: &str) {
    assert_eq!(response.header("Access-Control-Allow-Origin"), Some(origin));
    assert_eq!(response.header("Access-Control-Allow-Credentials"), Some("true"));
    assert_eq!(response.header("Access-Control-Allow-Methods"), Some(methods));
}

pub fn assert_no_cors(response: &Response) {
    assert!(response.header("Access-Control-Allow-Origin").is_none());
    assert!(response.header("Access-Control-Allow-Credentials").is_none());
    assert!(response.header("Access-Control-Allow-Methods").is_none());
}

pub fn healthy_body() -> Value {
    json!({ "healthy": true })
}
