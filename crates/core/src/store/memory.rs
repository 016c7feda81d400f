//! In-process record store.
//!
//! Used by tests and by the server when no database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{RecordStore, VersionedRecord, WriteOutcome};
use crate::error::CoreError;
use crate::types::Version;

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, VersionedRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<VersionedRecord>, CoreError> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn put_if_absent(&self, key: &str, bytes: Vec<u8>) -> Result<WriteOutcome, CoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(key) {
            return Ok(WriteOutcome::Conflict);
        }
        records.insert(key.to_string(), VersionedRecord { bytes, version: 1 });
        Ok(WriteOutcome::Written(1))
    }

    async fn put_if_version(
        &self,
        key: &str,
        bytes: Vec<u8>,
        expected: Version,
    ) -> Result<WriteOutcome, CoreError> {
        let mut records = self.records.write().await;
        match records.get_mut(key) {
            Some(record) if record.version == expected => {
                record.bytes = bytes;
                record.version += 1;
                Ok(WriteOutcome::Written(record.version))
            }
            _ => Ok(WriteOutcome::Conflict),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_if_absent_only_once() {
        let store = MemoryStore::new();
        assert_eq!(
            store.put_if_absent("k", b"a".to_vec()).await.unwrap(),
            WriteOutcome::Written(1)
        );
        assert_eq!(
            store.put_if_absent("k", b"b".to_vec()).await.unwrap(),
            WriteOutcome::Conflict
        );
        assert_eq!(store.get("k").await.unwrap().unwrap().bytes, b"a");
    }

    #[tokio::test]
    async fn put_if_version_requires_current_version() {
        let store = MemoryStore::new();
        store.put_if_absent("k", b"a".to_vec()).await.unwrap();

        assert_eq!(
            store.put_if_version("k", b"b".to_vec(), 1).await.unwrap(),
            WriteOutcome::Written(2)
        );
        // Stale version loses.
        assert_eq!(
            store.put_if_version("k", b"c".to_vec(), 1).await.unwrap(),
            WriteOutcome::Conflict
        );

        let record = store.get("k").await.unwrap().unwrap();
        assert_eq!(record.bytes, b"b");
        assert_eq!(record.version, 2);
    }

    #[tokio::test]
    async fn put_if_version_on_missing_key_conflicts() {
        let store = MemoryStore::new();
        assert_eq!(
            store.put_if_version("missing", b"x".to_vec(), 1).await.unwrap(),
            WriteOutcome::Conflict
        );
        assert!(store.is_empty().await);
    }
}
