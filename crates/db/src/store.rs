//! [`RecordStore`] backed by the `records` table.

use async_trait::async_trait;
use gemchain_core::error::CoreError;
use gemchain_core::store::{RecordStore, VersionedRecord, WriteOutcome};
use gemchain_core::types::Version;

use crate::repositories::RecordRepo;
use crate::DbPool;

#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: DbPool,
}

impl PgRecordStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn storage_error(key: &str, err: sqlx::Error) -> CoreError {
    tracing::error!(key, error = %err, "Record store query failed");
    CoreError::Storage(format!("Record store failure on {key}: {err}"))
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn get(&self, key: &str) -> Result<Option<VersionedRecord>, CoreError> {
        let record = RecordRepo::find_by_key(&self.pool, key)
            .await
            .map_err(|e| storage_error(key, e))?;
        Ok(record.map(|r| VersionedRecord {
            bytes: r.value,
            version: r.version,
        }))
    }

    async fn put_if_absent(&self, key: &str, bytes: Vec<u8>) -> Result<WriteOutcome, CoreError> {
        let inserted = RecordRepo::insert_if_absent(&self.pool, key, &bytes)
            .await
            .map_err(|e| storage_error(key, e))?;
        Ok(match inserted {
            Some(record) => WriteOutcome::Written(record.version),
            None => WriteOutcome::Conflict,
        })
    }

    async fn put_if_version(
        &self,
        key: &str,
        bytes: Vec<u8>,
        expected: Version,
    ) -> Result<WriteOutcome, CoreError> {
        let updated = RecordRepo::update_if_version(&self.pool, key, &bytes, expected)
            .await
            .map_err(|e| storage_error(key, e))?;
        Ok(match updated {
            Some(record) => WriteOutcome::Written(record.version),
            None => WriteOutcome::Conflict,
        })
    }
}
