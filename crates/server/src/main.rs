mod actions;
mod bootstrap;
mod health;

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use concierge_core::config::{AppConfig, LoadOptions};
use tokio::sync::Notify;

fn init_logging(config: &AppConfig) {
    use concierge_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Logging has to be up before bootstrap emits anything.
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;
    let router = Router::new()
        .merge(actions::router(app.registry.clone()))
        .merge(health::router(app.store.store.clone()));

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        action_groups = app.registry.len(),
        "concierge-server listening"
    );

    let shutdown = Arc::new(Notify::new());
    let stop = shutdown.clone();
    let mut server = tokio::spawn(
        axum::serve(listener, router)
            .with_graceful_shutdown(async move { stop.notified().await })
            .into_future(),
    );

    tokio::select! {
        result = &mut server => result??,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!(
                event_name = "system.server.stopping",
                correlation_id = "shutdown",
                grace_secs = app.config.server.graceful_shutdown_secs,
                "concierge-server draining in-flight requests"
            );
            shutdown.notify_one();

            let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
            match tokio::time::timeout(grace, &mut server).await {
                Ok(result) => result??,
                Err(_) => {
                    tracing::warn!(
                        event_name = "system.server.shutdown_timeout",
                        correlation_id = "shutdown",
                        "grace period elapsed, aborting remaining connections"
                    );
                    server.abort();
                }
            }
        }
    }

    app.store.close().await;
    tracing::info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "concierge-server stopped"
    );

    Ok(())
}
