use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use alb_router::{demo, InboundEvent, Router};

#[derive(Parser)]
#[command(name = "event-cli")]
#[command(about = "Dispatch ALB events through the demo routes offline", long_about = None)]
struct Cli {
    /// Exact origins granted CORS (repeatable).
    #[arg(long = "allow-origin")]
    allow_list: Vec<String>,

    /// AMP origin suffixes (repeatable).
    #[arg(long = "amp-suffix")]
    amp_suffixes: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch one event read from a JSON file, or stdin when omitted
    Dispatch { file: Option<PathBuf> },
    /// List registered routes
    Routes,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let router = Router::builder()
        .routes(demo::routes()?)
        .allow_list(cli.allow_list)
        .amp_suffixes(cli.amp_suffixes)
        .build();

    match cli.command {
        Commands::Dispatch { file } => {
            let raw = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let event: InboundEvent = serde_json::from_str(&raw)?;
            let response = router.handle(event).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Routes => {
            for route in router.registry().routes() {
                let methods: Vec<&str> = route.allowed_methods().iter().map(|m| m.as_str()).collect();
                println!(
                    "{:<24} {:<28} ttl={}",
                    route.path(),
                    methods.join(","),
                    route.cache_ttl()
                );
            }
        }
    }

    Ok(())
}
