//! osagent HTTP server entry point.
//!
//! Parses flags, initialises tracing, loads configuration (file or
//! `OSAGENT_*` env vars), settles the process token and serves the API
//! until SIGINT/SIGTERM.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod api;
mod config;
mod token;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use osagent::OsAgent;
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::config::ServerConfig;
use crate::token::ProcessToken;

#[derive(Debug, Parser)]
#[command(
    name = "osagent-server",
    version,
    about = "Expose LVM snapshot, mount and database-service control over HTTP"
)]
struct Cli {
    /// YAML or JSON configuration file; without it, OSAGENT_* env vars are read.
    #[arg(short, long, env = "OSAGENT_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured listen address.
    #[arg(short, long)]
    listen: Option<String>,

    /// Log at info level for every crate.
    #[arg(short, long)]
    verbose: bool,

    /// Log at debug level, including every command line executed.
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn,osagent=info,osagent_server=info"
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the flags.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter())),
        )
        .init();

    let mut config = ServerConfig::load(cli.config.as_deref())?;
    if let Some(listen) = cli.listen {
        config.listen_addr = listen;
    }

    let token = match config.token() {
        Some(token) => ProcessToken::new(token),
        None => {
            let token = ProcessToken::generate()?;
            tracing::info!(token = token.as_str(), "generated process token");
            token
        }
    };

    tracing::info!(
        listen_addr = %config.listen_addr,
        snapshot_mount_point = %config.agent.snapshot_mount_point,
        snapshot_volumes_filter = %config.agent.snapshot_volumes_filter,
        "configuration loaded",
    );

    let state = Arc::new(AppState {
        agent: OsAgent::system(config.agent),
        token,
    });
    let router = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!("osagent-server ready on http://{}", config.listen_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("osagent-server shut down");
    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("received shutdown signal");
}
