//! # homesyncd
//!
//! Composition root that wires all adapters together and runs the core.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Connect to the MQTT broker and subscribe to the configured filters
//! - Construct the coordinator, which owns the relay and sensor state
//! - Spawn the routing loop and the telemetry ticker
//! - Build the axum router and serve the viewer API
//! - Handle graceful shutdown (SIGTERM/SIGINT): stop the ticker and the HTTP
//!   server, drain queued messages, then disconnect from the broker
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer. No domain logic belongs here.

mod config;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use homesync_adapter_http_axum::state::AppState;
use homesync_adapter_mqtt::{MqttBus, MqttSession};
use homesync_adapter_storage_sqlite_sqlx::SqliteMessageStore;
use homesync_app::coordinator::Coordinator;
use homesync_app::services::telemetry_service::run_ticker;

use crate::config::Config;

/// How long the MQTT pump may take to flush the disconnect.
const DISCONNECT_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Database
    let db = homesync_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let store = SqliteMessageStore::new(db.pool().clone());

    // Message bus
    let MqttSession { bus, inbound, pump } =
        MqttBus::connect(&config.mqtt, config.topics.subscriptions.clone()).await?;

    // Core
    let coordinator = Arc::new(Coordinator::new(
        store.clone(),
        bus.clone(),
        config.topics.clone(),
        config.sensor.bounds(),
    ));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let ticker = {
        let sensor = Arc::clone(coordinator.sensor());
        let period = config.sensor.tick_interval();
        let shutdown = shutdown_rx.clone();
        tokio::spawn(async move { run_ticker(&sensor, period, shutdown).await })
    };
    let routing = {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move { coordinator.run(inbound, shutdown_rx).await })
    };

    // HTTP
    let state = AppState::new(store, bus.clone(), config.topics.clone());
    let app = homesync_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "homesyncd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Shutdown: stop producers, drain the inbound queue, then leave the bus.
    let _ = shutdown_tx.send(true);
    ticker.await?;
    let handled = routing.await?;
    tracing::info!(handled, "routing loop finished");

    if let Err(err) = bus.disconnect().await {
        tracing::warn!(error = %err, "failed to request MQTT disconnect");
    }
    let pump_abort = pump.abort_handle();
    if tokio::time::timeout(DISCONNECT_GRACE, pump).await.is_err() {
        tracing::warn!("MQTT pump did not stop in time");
        pump_abort.abort();
    }
    db.close().await;

    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!(signal = "SIGINT", "shutdown requested"),
        () = terminate => tracing::info!(signal = "SIGTERM", "shutdown requested"),
    }
}
