use std::sync::Arc;

use concierge_agent::ActionGroupRegistry;
use concierge_core::config::{AppConfig, ConfigError};
use concierge_db::{open_store, StoreError, StoreHandle};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub store: StoreHandle,
    pub registry: Arc<ActionGroupRegistry>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("record store unavailable: {0}")]
    Store(#[from] StoreError),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        backend = ?config.store.backend,
        "starting application bootstrap"
    );

    let store = open_store(&config).await?;
    let registry = ActionGroupRegistry::from_config(&config.action_groups, store.store.clone());

    info!(
        event_name = "system.bootstrap.registry_ready",
        correlation_id = "bootstrap",
        action_groups = registry.len(),
        "action groups registered"
    );

    Ok(Application { config, store, registry: Arc::new(registry) })
}
