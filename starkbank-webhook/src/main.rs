//! Stark Bank webhook receiver.
//!
//! # Usage
//!
//! ```bash
//! # Run with default config (config.toml in current directory)
//! cargo run -p starkbank-webhook --release
//!
//! # Run with custom config path
//! starkbank-webhook --config /path/to/config.toml
//!
//! # Configure logging level
//! RUST_LOG=debug starkbank-webhook
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG` - Path to TOML configuration file (default: `config.toml`)
//! - `HOST` - Override bind address (default: `0.0.0.0`)
//! - `PORT` - Override port (default: `8080`)
//! - `RUST_LOG` - Log level filter (default: `info`)

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use clap::Parser;
use starkbank::WebhookParser;
use starkbank::user::set_default_user;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use starkbank_webhook::config::WebhookConfig;
use starkbank_webhook::webhook_router;

#[derive(Parser, Debug)]
#[command(name = "starkbank-webhook", version)]
#[command(about = "Receives and verifies Stark Bank webhooks")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "CONFIG", default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    // .env may define CONFIG, so load it before parsing arguments
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(args).await {
        tracing::error!("Webhook receiver failed: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = WebhookConfig::load_from(&args.config)?;
    tracing::info!(
        path = %args.config.display(),
        host = %config.host,
        port = config.port,
        environment = %config.environment,
        "Loaded configuration"
    );

    match config.user()? {
        Some(user) => {
            tracing::info!(access_id = %user.access_id(), "Signing public key requests");
            set_default_user(user);
        }
        None => {
            tracing::warn!("No credentials configured, public key will be fetched anonymously");
        }
    }

    let client = config.public_key_client()?;
    let state = Arc::new(WebhookParser::new(client));
    let app = Router::new()
        .merge(webhook_router(state))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Webhook receiver listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Webhook receiver shut down gracefully");
    Ok(())
}

/// Waits for Ctrl-C or SIGTERM (Unix) to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        let sigterm = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    tracing::error!("Failed to install SIGTERM handler: {e}");
                    std::future::pending::<()>().await;
                }
            }
        };
        tokio::select! {
            () = ctrl_c => tracing::info!("Received Ctrl-C, shutting down..."),
            () = sigterm => tracing::info!("Received SIGTERM, shutting down..."),
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await;
        tracing::info!("Received Ctrl-C, shutting down...");
    }
}
