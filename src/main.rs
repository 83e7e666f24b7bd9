//! Noticeboard event-announcement service.
//!
//! Main entry point: initializes tracing, loads configuration, constructs
//! the object store and notifier collaborators, and serves the HTTP API
//! until shutdown.

use std::sync::Arc;

use anyhow::{Context, Result};
use noticeboard_api::{start_server, AppState, Config};
use noticeboard_core::{HttpNotifier, HttpObjectStore};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("Starting noticeboard announcement service");

    let config = Config::load()?;
    let addr = config.parse_server_addr()?;
    info!(
        storage_url = %config.storage_url,
        bucket = %config.bucket,
        notifier_url = %config.notifier_url,
        topic = %config.topic,
        %addr,
        "Configuration loaded"
    );

    let store = HttpObjectStore::new(config.to_store_config())
        .context("Failed to build object store client")?;
    let notifier = HttpNotifier::new(config.to_notifier_config())
        .context("Failed to build notifier client")?;

    let state = AppState {
        store: Arc::new(store),
        notifier: Arc::new(notifier),
        keys: config.document_keys(),
    };

    start_server(state, addr).await.context("Server failed")?;

    info!("Noticeboard shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,noticeboard=debug,tower_http=debug"))
        .expect("Invalid RUST_LOG environment variable");

    let fmt_layer = fmt::layer().with_target(true).with_file(true).with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
