//! Pokédex server entry point.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use server::AppState;
use server::handlers::http::routes::build_router;
use shared::config::{LiveConfig, load_config};

#[derive(Parser, Debug)]
#[command(name = "pokedex-server")]
#[command(version, about = "Pokédex catalog and trainer accounts over HTTP")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, short, default_value = "config.toml")]
    config: String,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "pokedex_server=info,server=info".into()),
    );
    if args.log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config,
        "Starting pokedex-server"
    );

    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;
    let addr = config.server.addr();

    let state = AppState::open(config).await?;
    let router = Arc::new(build_router());

    spawn_reload_on_sighup(args.config.clone(), state.config.clone());

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tokio::select! {
        result = server::serve(listener, state, router) => {
            result.context("Server loop failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server closed");
    Ok(())
}

/// Re-read the config file on SIGHUP. The signing secret, bind address and
/// database paths keep their startup values.
#[cfg(unix)]
fn spawn_reload_on_sighup(path: String, live: LiveConfig) {
    use tokio::signal::unix::{SignalKind, signal};

    tokio::spawn(async move {
        let mut hangups = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(e) => {
                error!("Cannot listen for SIGHUP: {}", e);
                return;
            }
        };

        while hangups.recv().await.is_some() {
            match load_config(&path) {
                Ok(new) => {
                    let mut merged = live.snapshot().await;
                    merged.catalog = new.catalog;
                    merged.paths.web_dir = new.paths.web_dir;
                    merged.auth.session_mode = new.auth.session_mode;
                    merged.auth.admin_username = new.auth.admin_username;
                    merged.auth.token_expiry_minutes = new.auth.token_expiry_minutes;
                    live.reload(merged).await;
                    info!("Configuration reloaded from {}", path);
                }
                Err(e) => error!("Config reload failed, keeping previous values: {}", e),
            }
        }
    });
}

#[cfg(not(unix))]
fn spawn_reload_on_sighup(_path: String, _live: LiveConfig) {}
