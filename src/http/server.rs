//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app that feeds every request to the dispatcher
//! - Wire up middleware (request ID, tracing, timeout)
//! - Translate HTTP requests to events and responses back
//! - Swap in a rebuilt dispatcher when the config changes
//! - Serve until shutdown is signalled
//!
//! # Design Decisions
//! - The dispatcher sits behind `ArcSwap`: reloads never block requests
//! - In-flight requests finish on the dispatcher they started with
//! - Body size is capped before the event is built

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::any,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::Instrument;

use crate::config::RouterConfig;
use crate::dispatch::Router;
use crate::http::request::{request_id, to_inbound_event};
use crate::http::Response;

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ArcSwap<Router>>,
    pub max_body_bytes: usize,
}

/// HTTP host for a [`Router`].
pub struct HttpServer {
    app: axum::Router,
    router: Arc<ArcSwap<Router>>,
    config: RouterConfig,
}

impl HttpServer {
    /// Create a server for `router`. CORS settings in `config` replace the
    /// router's own.
    pub fn new(config: RouterConfig, router: Router) -> Self {
        let router = router.with_cors(
            config.cors.allow_list.clone(),
            config.cors.amp_suffixes.clone(),
        );
        let router = Arc::new(ArcSwap::from_pointee(router));

        let state = AppState {
            router: router.clone(),
            max_body_bytes: config.limits.max_body_bytes,
        };
        let app = Self::build_app(&config, state);

        Self { app, router, config }
    }

    /// Build the Axum app with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &RouterConfig, state: AppState) -> axum::Router {
        // Outermost first: the ID exists before tracing starts and the
        // timeout covers only the dispatch
        let layers = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        axum::Router::new()
            .route("/", any(dispatch_handler))
            .route("/{*path}", any(dispatch_handler))
            .with_state(state)
            .layer(layers)
    }

    /// The Axum app, for serving elsewhere or driving in-process.
    pub fn app(&self) -> axum::Router {
        self.app.clone()
    }

    /// Handle to the live dispatcher.
    pub fn router(&self) -> Arc<ArcSwap<Router>> {
        self.router.clone()
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires, applying config updates as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let reloader = tokio::spawn(apply_updates(self.router.clone(), config_updates));

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Rebuild and swap the dispatcher for every config update.
async fn apply_updates(
    router: Arc<ArcSwap<Router>>,
    mut updates: mpsc::UnboundedReceiver<RouterConfig>,
) {
    while let Some(config) = updates.recv().await {
        let next = router
            .load()
            .with_cors(config.cors.allow_list, config.cors.amp_suffixes);
        tracing::info!(
            cors_origins = next.cors().allow_list().len(),
            amp_suffixes = next.cors().amp_suffixes().len(),
            "Router reconfigured"
        );
        router.store(Arc::new(next));
    }
}

/// Turn the request into an event, dispatch it once, write the response back.
async fn dispatch_handler(State(state): State<AppState>, request: Request) -> axum::response::Response {
    let request_id = request_id(request.headers()).to_string();
    let (parts, body) = request.into_parts();

    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Rejecting request body");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let event = to_inbound_event(&parts, &body);
    let router = state.router.load_full();

    let span = tracing::info_span!(
        "dispatch",
        request_id = %request_id,
        method = %parts.method,
        path = %parts.uri.path()
    );
    let response = router.handle(event).instrument(span).await;

    into_http_response(response)
}

/// Write an ALB response as an HTTP response.
pub fn into_http_response(response: Response) -> axum::response::Response {
    let status = StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut out = axum::response::Response::new(Body::from(response.body));
    *out.status_mut() = status;

    let headers = out.headers_mut();
    for (name, values) in response.multi_value_headers.into_iter().flatten() {
        let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
            tracing::warn!(header = %name, "Dropping invalid response header name");
            continue;
        };
        for value in values {
            match HeaderValue::from_str(&value) {
                Ok(value) => {
                    headers.append(header_name.clone(), value);
                }
                Err(_) => tracing::warn!(header = %name, "Dropping invalid response header value"),
            }
        }
    }

    out
}
