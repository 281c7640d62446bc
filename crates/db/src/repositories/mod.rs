use async_trait::async_trait;
use thiserror::Error;

use concierge_core::{Record, RecordId};

pub mod memory;
pub mod record;

pub use memory::InMemoryRecordStore;
pub use record::SqlRecordStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Point operations against a single key-addressed table.
///
/// Each call is atomic for its one key; nothing spans calls.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, id: &RecordId) -> Result<Option<Record>, StoreError>;

    /// Full overwrite of whatever is stored under `record.id`.
    async fn put(&self, record: Record) -> Result<(), StoreError>;

    /// Returns `true` when the store confirms a record was removed.
    async fn delete(&self, id: &RecordId) -> Result<bool, StoreError>;

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
