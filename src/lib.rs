//! In-process ALB event dispatcher.
//!
//! Maps a load-balancer request event to a registered route, enforces the
//! route's allowed methods, runs its middleware, invokes the handler and
//! normalizes the response (content type, cache control, CORS).
//!
//! ```rust,ignore
//! let router = Router::builder()
//!     .route(
//!         Route::builder("/items/:id")
//!             .allowed_methods([Method::GET])
//!             .get(handler_fn(|_event, ctx| {
//!                 let id = ctx.path_param("id").unwrap_or_default().to_string();
//!                 Box::pin(async move { Ok(Response::ok(id)) })
//!             }))
//!             .build()?,
//!     )
//!     .allow_list(["https://app.example.com"])
//!     .build();
//!
//! let response = router.handle(event).await;
//! ```

pub mod config;
pub mod demo;
pub mod dispatch;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod middleware;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::RouterConfig;
pub use dispatch::{Router, RouterBuilder, RouterOptions};
pub use error::{DispatchError, HandlerError};
pub use health::{AlwaysHealthy, HealthCheck};
pub use http::{Event, HttpServer, InboundEvent, Response};
pub use lifecycle::Shutdown;
pub use middleware::{Flow, Middleware};
pub use routing::{Context, Handler, Route};
