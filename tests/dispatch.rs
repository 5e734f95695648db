//! End-to-end dispatcher behavior over the fixture routes.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::Method;
use serde_json::{json, Value};

use alb_router::http::ErrorBody;
use alb_router::middleware::{middleware_fn, Flow};
use alb_router::routing::{handler_fn, respond_with};
use alb_router::{HandlerError, InboundEvent, Response, Route, Router};

mod common;
use common::*;

const HEALTH_PATH: &str = "/healthcheck";

// ---- CORS ----

#[tokio::test]
async fn test_cors_headers_for_allow_listed_origins() {
    let router = test_router();
    for origin in CORS_ALLOW_LIST {
        let event = with_origin(new_multi_value_event("GET", HEALTH_PATH), Some(origin));
        let res = router.dispatch(event).await.unwrap();

        assert_response(&res, 200, "200 OK");
        assert_eq!(res.json_body::<Value>().unwrap(), healthy_body());
        assert_cors(&res, origin, FULL_CORS_METHODS);
    }
}

#[tokio::test]
async fn test_preflight_for_allow_listed_origins() {
    let router = test_router();
    for origin in CORS_ALLOW_LIST {
        let event = with_origin(new_multi_value_event("OPTIONS", HEALTH_PATH), Some(origin));
        let res = router.dispatch(event).await.unwrap();

        assert_response(&res, 200, "200 OK");
        assert_eq!(res.json_body::<Value>().unwrap(), json!(true));
        assert_cors(&res, origin, FULL_CORS_METHODS);
        // Preflight responses are not finalized
        assert!(res.header("Content-Type").is_none());
        assert!(res.header("Cache-Control").is_none());
    }
}

#[tokio::test]
async fn test_no_cors_for_unknown_origin() {
    let event = with_origin(
        new_multi_value_event("GET", HEALTH_PATH),
        Some("https://test.example-news.com"),
    );
    let res = test_router().dispatch(event).await.unwrap();

    assert_response(&res, 200, "200 OK");
    assert_eq!(res.json_body::<Value>().unwrap(), healthy_body());
    assert_no_cors(&res);
}

#[tokio::test]
async fn test_restricted_cors_for_amp_origins() {
    let router = test_router();
    for origin in RESTRICTED_AMP_ORIGINS {
        let event = with_origin(new_multi_value_event("GET", HEALTH_PATH), Some(origin));
        let res = router.dispatch(event).await.unwrap();

        assert_response(&res, 200, "200 OK");
        assert_cors(&res, origin, AMP_CORS_METHODS);
    }
}

#[tokio::test]
async fn test_amp_same_origin_header() {
    let mut event = with_origin(new_multi_value_event("GET", HEALTH_PATH), None);
    event
        .multi_value_headers
        .as_mut()
        .unwrap()
        .insert("amp-same-origin".to_string(), vec!["true".to_string()]);

    let res = test_router().dispatch(event).await.unwrap();
    assert_response(&res, 200, "200 OK");
    assert_cors(&res, "*", FULL_CORS_METHODS);
}

#[tokio::test]
async fn test_preflight_for_unknown_origin_has_no_cors() {
    let event = with_origin(
        new_multi_value_event("OPTIONS", "/no/such/route"),
        Some("https://stranger.example.org"),
    );
    let res = test_router().dispatch(event).await.unwrap();

    assert_response(&res, 200, "200 OK");
    assert_eq!(res.body, "true");
    assert_no_cors(&res);
}

#[tokio::test]
async fn test_options_without_cors_goes_through_routing() {
    let router = Router::new(test_routes());
    let res = router.dispatch(new_event("OPTIONS", "/tests")).await.unwrap();

    // No allow-list: OPTIONS is just another method, and /tests does not allow it
    assert_error(
        &res,
        405,
        "405 Method Not Allowed",
        "Method: OPTIONS is not allowed for path: /tests. Allowed methods: HEAD,GET,POST,PUT,PATCH,DELETE",
    );
}

// ---- Routes ----

#[tokio::test]
async fn test_404_when_path_is_not_matched() {
    let res = test_router()
        .dispatch(new_multi_value_event("GET", "/tests/some-random-path"))
        .await
        .unwrap();

    assert_error(
        &res,
        404,
        "404 Not Found",
        "No route found for path /tests/some-random-path",
    );
}

#[tokio::test]
async fn test_405_when_method_is_not_allowed() {
    let res = test_router()
        .dispatch(new_multi_value_event("TRACE", "/tests"))
        .await
        .unwrap();

    assert_error(
        &res,
        405,
        "405 Method Not Allowed",
        "Method: TRACE is not allowed for path: /tests. Allowed methods: OPTIONS,HEAD,GET,POST,PUT,PATCH,DELETE",
    );
}

#[tokio::test]
async fn test_each_verb_runs_its_handler() {
    let router = test_router();
    for method in ["HEAD", "GET", "POST", "PUT", "PATCH", "DELETE"] {
        let res = router.dispatch(new_event(method, "/tests")).await.unwrap();
        assert_response(&res, 200, "200 OK");
        assert_eq!(res.body, method);
        assert_eq!(res.header("Content-Type"), Some("application/json; charset=utf-8"));
    }
}

#[tokio::test]
async fn test_options_is_preflight_when_cors_enabled() {
    let res = test_router().dispatch(new_event("OPTIONS", "/tests")).await.unwrap();
    assert_response(&res, 200, "200 OK");
    assert_eq!(res.body, "true");
}

#[tokio::test]
async fn test_custom_context_reaches_handler() {
    let res = test_router()
        .dispatch(new_event("GET", "/tests/custom-context"))
        .await
        .unwrap();
    assert_response(&res, 200, "200 OK");
    assert_eq!(res.body, "true");
}

#[tokio::test]
async fn test_path_params_extracted() {
    let res = test_router()
        .dispatch(new_event("GET", "/tests/48213/subPath/77120"))
        .await
        .unwrap();

    assert_response(&res, 200, "200 OK");
    let body: Value = serde_json::from_str(&res.body).unwrap();
    assert_eq!(body, json!({"param": "48213", "param2": "77120"}));
}

#[tokio::test]
async fn test_trailing_slash_route_reachable() {
    let router = Router::new(vec![Route::builder("/reports/")
        .allowed_methods([Method::GET])
        .get(respond_with(|| async { Ok(Response::ok("reports")) }))
        .build()
        .unwrap()]);

    for path in ["/reports", "/reports/"] {
        let res = router.dispatch(new_event("GET", path)).await.unwrap();
        assert_response(&res, 200, "200 OK");
        assert_eq!(res.body, "reports");
    }
}

#[tokio::test]
async fn test_empty_segment_route_rejected() {
    let err = Route::builder("/reports//daily")
        .get(respond_with(|| async { Ok(Response::ok("daily")) }))
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("empty segment"), "{}", err);
}

#[tokio::test]
async fn test_query_params_visible_to_handler() {
    let router = Router::new(vec![Route::builder("/search")
        .allowed_methods([Method::GET])
        .get(handler_fn(|event, _ctx| {
            let q = event.query("q").unwrap_or("none").to_string();
            Box::pin(async move { Ok(Response::ok(q)) })
        }))
        .build()
        .unwrap()]);

    let mut event = new_multi_value_event("GET", "/search");
    event
        .multi_value_query_string_parameters
        .as_mut()
        .unwrap()
        .insert("q".to_string(), vec!["rust".to_string(), "go".to_string()]);

    let res = router.dispatch(event).await.unwrap();
    assert_eq!(res.body, "rust");
}

#[tokio::test]
async fn test_middleware_passes_context_to_handler() {
    let res = test_router()
        .dispatch(new_event("GET", "/tests/middleware"))
        .await
        .unwrap();
    assert_response(&res, 200, "200 OK");
    assert_eq!(res.body, "true");
}

#[tokio::test]
async fn test_middleware_can_respond() {
    let res = test_router()
        .dispatch(new_event("GET", "/tests/middleware-response"))
        .await
        .unwrap();
    assert_response(&res, 200, "200 OK");
    assert_eq!(res.body, "response from middleware");
}

#[tokio::test]
async fn test_cache_ttl_on_success() {
    let res = test_router()
        .dispatch(new_multi_value_event("GET", "/tests/cache-ttl"))
        .await
        .unwrap();
    assert_response(&res, 200, "200 OK");
    assert_eq!(res.body, "GET");
    assert_eq!(res.header("Cache-Control"), Some("max-age=300"));
}

#[tokio::test]
async fn test_cache_ttl_ignored_on_error() {
    let res = test_router()
        .dispatch(new_multi_value_event("GET", "/tests/cache-ttl-error"))
        .await
        .unwrap();
    assert_error(
        &res,
        500,
        "500 Internal Server Error",
        "Middleware should throw error response with no cache-ttl",
    );
}

#[tokio::test]
async fn test_health_check_only_allows_get() {
    let router = Router::new(test_routes());
    let res = router.dispatch(new_event("POST", HEALTH_PATH)).await.unwrap();
    assert_error(
        &res,
        405,
        "405 Method Not Allowed",
        "Method: POST is not allowed for path: /healthcheck. Allowed methods: GET",
    );
}

#[tokio::test]
async fn test_custom_health_check() {
    let healthy = Arc::new(AtomicBool::new(true));
    let flag = healthy.clone();
    let router = Router::builder()
        .routes(test_routes())
        .health_check(move || flag.load(Ordering::SeqCst))
        .build();

    let res = router.dispatch(new_event("GET", HEALTH_PATH)).await.unwrap();
    assert_eq!(res.status_code, 200);

    healthy.store(false, Ordering::SeqCst);
    let res = router.dispatch(new_event("GET", HEALTH_PATH)).await.unwrap();
    assert_eq!(res.status_code, 500);
    assert_eq!(res.header("Cache-Control"), Some("max-age=0"));
}

// ---- Middleware chain ----

#[tokio::test]
async fn test_chain_stops_at_first_response() {
    let later_ran = Arc::new(AtomicUsize::new(0));
    let handler_ran = Arc::new(AtomicUsize::new(0));
    let later = later_ran.clone();
    let handled = handler_ran.clone();

    let router = Router::new(vec![Route::builder("/guarded")
        .allowed_methods([Method::GET])
        .middleware(middleware_fn(|_event, _ctx| {
            Box::pin(async { Ok(Flow::Respond(Response::not_authorized("denied"))) })
        }))
        .middleware(middleware_fn(move |_event, _ctx| {
            later.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(Flow::Continue) })
        }))
        .get(handler_fn(move |_event, _ctx| {
            handled.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(Response::ok("reached")) })
        }))
        .build()
        .unwrap()]);

    let res = router.dispatch(new_event("GET", "/guarded")).await.unwrap();
    assert_error(&res, 403, "403 Forbidden", "denied");
    assert_eq!(later_ran.load(Ordering::SeqCst), 0);
    assert_eq!(handler_ran.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_context_is_fresh_per_request() {
    let router = Router::new(vec![Route::builder("/counter")
        .allowed_methods([Method::GET])
        .context("seen", json!({"count": 0}))
        .middleware(middleware_fn(|_event, ctx| {
            let next = ctx.get("seen").and_then(|v| v["count"].as_i64()).unwrap_or(0) + 1;
            ctx.insert("seen", json!({ "count": next }));
            Box::pin(async { Ok(Flow::Continue) })
        }))
        .get(handler_fn(|_event, ctx| {
            let seen = ctx.get("seen").cloned().unwrap_or_default();
            Box::pin(async move { Ok(Response::ok(seen)) })
        }))
        .build()
        .unwrap()]);

    for _ in 0..3 {
        let res = router.dispatch(new_event("GET", "/counter")).await.unwrap();
        assert_eq!(res.json_body::<Value>().unwrap(), json!({"count": 1}));
    }
}

#[tokio::test]
async fn test_middleware_error_propagates() {
    let router = Router::new(vec![Route::builder("/fails")
        .allowed_methods([Method::GET])
        .middleware(middleware_fn(|_event, _ctx| {
            Box::pin(async { Err(HandlerError::msg("lookup failed")) })
        }))
        .get(respond_with(|| async { Ok(Response::ok("unreachable")) }))
        .build()
        .unwrap()]);

    let err = router.dispatch(new_event("GET", "/fails")).await.unwrap_err();
    assert!(err.to_string().contains("lookup failed"));

    let res = router.handle(new_event("GET", "/fails")).await;
    assert_eq!(res.status_code, 500);
    let body: ErrorBody = res.json_body().unwrap();
    assert_eq!(body.detail, "Internal Server Error");
}

// ---- Finalizer ----

#[tokio::test]
async fn test_handler_headers_override_computed_ones() {
    let router = Router::builder()
        .route(
            Route::builder("/html")
                .allowed_methods([Method::GET])
                .cache_ttl(60)
                .get(respond_with(|| async {
                    Ok(Response::ok("<p>hi</p>")
                        .with_header("Content-Type", "text/html")
                        .with_header("Cache-Control", "no-store"))
                }))
                .build()
                .unwrap(),
        )
        .allow_list(CORS_ALLOW_LIST)
        .build();

    let event = with_origin(
        new_multi_value_event("GET", "/html"),
        Some(CORS_ALLOW_LIST[0]),
    );
    let res = router.dispatch(event).await.unwrap();
    assert_eq!(res.header("Content-Type"), Some("text/html"));
    assert_eq!(res.header("Cache-Control"), Some("no-store"));
    assert_cors(&res, CORS_ALLOW_LIST[0], FULL_CORS_METHODS);
}

#[tokio::test]
async fn test_invalid_response_replaced() {
    let router = Router::new(vec![Route::builder("/broken")
        .allowed_methods([Method::GET])
        .get(respond_with(|| async {
            let mut res = Response::ok("x");
            res.status_code = 42;
            Ok(res)
        }))
        .build()
        .unwrap()]);

    let res = router.dispatch(new_event("GET", "/broken")).await.unwrap();
    assert_error(
        &res,
        500,
        "500 Internal Server Error",
        "Server replied with an invalid response",
    );
}

#[tokio::test]
async fn test_errors_carry_unique_ids() {
    let router = test_router();
    let a: ErrorBody = router
        .dispatch(new_event("GET", "/missing"))
        .await
        .unwrap()
        .json_body()
        .unwrap();
    let b: ErrorBody = router
        .dispatch(new_event("GET", "/missing"))
        .await
        .unwrap()
        .json_body()
        .unwrap();
    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn test_event_from_alb_json() {
    let event: InboundEvent = serde_json::from_value(json!({
        "requestContext": {"elb": {"targetGroupArn": "arn:aws:elasticloadbalancing:region:123:targetgroup/tg/1"}},
        "httpMethod": "GET",
        "path": "/tests/cache-ttl",
        "queryStringParameters": {},
        "headers": {"host": "membership.example.com"},
        "body": "",
        "isBase64Encoded": false
    }))
    .unwrap();

    let res = test_router().dispatch(event).await.unwrap();
    let wire = serde_json::to_value(&res).unwrap();
    assert_eq!(wire["statusCode"], 200);
    assert_eq!(wire["statusDescription"], "200 OK");
    assert_eq!(wire["isBase64Encoded"], false);
    assert_eq!(wire["multiValueHeaders"]["Cache-Control"], json!(["max-age=300"]));
}
