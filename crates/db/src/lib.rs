pub mod connection;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, connect_with_settings, open_store, DbPool, StoreHandle};
pub use repositories::{InMemoryRecordStore, RecordStore, SqlRecordStore, StoreError};
