use std::sync::Arc;
use std::time::Duration;

use concierge_core::config::{AppConfig, StoreBackend};
use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;

use crate::migrations;
use crate::repositories::{InMemoryRecordStore, RecordStore, SqlRecordStore, StoreError};

pub type DbPool = sqlx::SqlitePool;

pub async fn connect(database_url: &str) -> Result<DbPool, sqlx::Error> {
    connect_with_settings(database_url, 5, 30).await
}

pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(timeout_secs.max(1)))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA journal_mode = WAL").execute(&mut *conn).await?;
                sqlx::query("PRAGMA busy_timeout = 5000").execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
}

/// The record store selected by configuration, plus the pool backing it when
/// there is one.
#[derive(Clone)]
pub struct StoreHandle {
    pub store: Arc<dyn RecordStore>,
    pub pool: Option<DbPool>,
}

impl StoreHandle {
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

/// Opens the configured backend. SQLite stores are migrated before use.
pub async fn open_store(config: &AppConfig) -> Result<StoreHandle, StoreError> {
    match config.store.backend {
        StoreBackend::Memory => {
            info!(
                event_name = "system.store.opened",
                backend = "memory",
                table = %config.store.table,
                "record store opened"
            );
            Ok(StoreHandle { store: Arc::new(InMemoryRecordStore::default()), pool: None })
        }
        StoreBackend::Sqlite => {
            let pool = connect_with_settings(
                &config.database.url,
                config.database.max_connections,
                config.database.timeout_secs,
            )
            .await?;
            migrations::run_pending(&pool).await?;
            info!(
                event_name = "system.store.opened",
                backend = "sqlite",
                table = %config.store.table,
                "record store opened"
            );

            let store = SqlRecordStore::new(pool.clone(), config.store.table.clone());
            Ok(StoreHandle { store: Arc::new(store), pool: Some(pool) })
        }
    }
}
