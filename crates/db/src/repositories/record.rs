use std::collections::BTreeMap;

use chrono::Utc;
use sqlx::Row;

use concierge_core::{AttributeValue, Record, RecordId};

use super::{RecordStore, StoreError};
use crate::DbPool;

/// SQLite-backed store. Every logical table shares the `record` relation and
/// is told apart by `record_table`.
pub struct SqlRecordStore {
    pool: DbPool,
    table: String,
}

impl SqlRecordStore {
    pub fn new(pool: DbPool, table: impl Into<String>) -> Self {
        Self { pool, table: table.into() }
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

fn row_to_record(id: &RecordId, row: &sqlx::sqlite::SqliteRow) -> Result<Record, StoreError> {
    let raw: String = row.try_get("attributes").map_err(|e| StoreError::Decode(e.to_string()))?;
    let attributes: BTreeMap<String, AttributeValue> = serde_json::from_str(&raw).map_err(|e| {
        StoreError::Decode(format!("attributes of record `{id}` are not a JSON object: {e}"))
    })?;

    Ok(Record { id: id.clone(), attributes })
}

#[async_trait::async_trait]
impl RecordStore for SqlRecordStore {
    async fn get(&self, id: &RecordId) -> Result<Option<Record>, StoreError> {
        let row = sqlx::query(
            "SELECT attributes FROM record WHERE record_table = ? AND record_key = ?",
        )
        .bind(&self.table)
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_record(id, r)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, record: Record) -> Result<(), StoreError> {
        let attributes = serde_json::to_string(&record.attributes)
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO record (record_table, record_key, attributes, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(record_table, record_key) DO UPDATE SET
                 attributes = excluded.attributes,
                 updated_at = excluded.updated_at",
        )
        .bind(&self.table)
        .bind(&record.id.0)
        .bind(&attributes)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM record WHERE record_table = ? AND record_key = ?")
            .bind(&self.table)
            .bind(&id.0)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
