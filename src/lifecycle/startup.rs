//! Startup orchestration.
//!
//! # Order
//! 1. Metrics exporter (when enabled)
//! 2. Bind the listener
//! 3. Config watcher (when started from a file)
//! 4. Signal forwarding, then serve until shutdown
//!
//! Any startup error is fatal; nothing serves traffic until every step passed.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::{ConfigWatcher, ShellConfig};
use crate::http::HttpServer;
use crate::lifecycle::signals::forward_signals;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("failed to watch config file: {0}")]
    Watch(#[from] notify::Error),

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Run the shell server until a shutdown signal arrives.
pub async fn run(config: ShellConfig, config_path: Option<PathBuf>) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    // Keep the watcher handle alive for the lifetime of the server.
    let (_watcher, config_updates) = match config_path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(&path);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    forward_signals(shutdown);

    HttpServer::new(config)
        .run(listener, config_updates, server_shutdown)
        .await
        .map_err(StartupError::Serve)
}
