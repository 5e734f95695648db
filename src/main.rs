//! ALB router host.
//!
//! Serves the demo routes over HTTP, translating each request into an ALB
//! event and back.
//!
//! ```text
//!     HTTP request
//!         → http::server (request ID, trace, timeout, body limit)
//!         → http::request (HTTP → InboundEvent)
//!         → dispatch::Router::handle
//!               preflight | route match → method check → middleware → handler
//!               → finalize → report
//!         → http::server (ALB response → HTTP)
//!     HTTP response
//!
//!     config file ──(notify)──▶ config::watcher ──(mpsc)──▶ router swap (arc-swap)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::sync::mpsc;

use alb_router::config::{load_config, ConfigWatcher, RouterConfig};
use alb_router::lifecycle::{self, Shutdown};
use alb_router::observability::logging;
use alb_router::{demo, HttpServer, Router};

#[derive(Parser)]
#[command(name = "alb-router")]
#[command(about = "HTTP host for the ALB event dispatcher", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload CORS settings when the config file changes.
    #[arg(short, long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    logging::init(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "alb-router starting");

    let (config_updates, _watcher) = match (&cli.config, cli.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let listener = lifecycle::start(&config).await?;

    let router = Router::new(demo::routes()?);
    let server = HttpServer::new(config, router);

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        lifecycle::shutdown_on_signal(&shutdown).await;
    });

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
