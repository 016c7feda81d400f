//! Append-only index of every asset id ever created.
//!
//! The index lives under a single reserved key. Appends are optimistic:
//! read the record and its version, append, then write conditionally on the
//! version read, retrying on conflict.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::context::InvocationContext;
use crate::error::CoreError;
use crate::store::{RecordStore, VersionedRecord, WriteOutcome};

/// Reserved store key holding the registry record.
pub const REGISTRY_KEY: &str = "assetIDs";

/// Default bound on conditional-write attempts before giving up.
pub const DEFAULT_MAX_WRITE_ATTEMPTS: u32 = 8;

/// Stored shape of the registry: `{"assetids": [...]}`. Older records may
/// carry `null` for an empty list.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryRecord {
    #[serde(rename = "assetids", default, deserialize_with = "null_as_empty")]
    asset_ids: Vec<String>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(d)?.unwrap_or_default())
}

impl RegistryRecord {
    fn decode(record: &VersionedRecord) -> Result<Self, CoreError> {
        serde_json::from_slice(&record.bytes).map_err(|e| CoreError::MalformedRecord {
            key: REGISTRY_KEY.to_string(),
            reason: e.to_string(),
        })
    }

    fn encode(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec(self).map_err(|e| CoreError::MalformedRecord {
            key: REGISTRY_KEY.to_string(),
            reason: e.to_string(),
        })
    }
}

#[derive(Clone)]
pub struct AssetRegistry {
    store: Arc<dyn RecordStore>,
    max_attempts: u32,
}

impl AssetRegistry {
    pub fn new(store: Arc<dyn RecordStore>, max_attempts: u32) -> Self {
        Self {
            store,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Create the empty registry if it does not exist yet.
    ///
    /// An existing registry is left untouched, so running bring-up twice can
    /// never shrink the index. Returns the ids currently registered.
    pub async fn initialize(&self, ctx: &InvocationContext) -> Result<Vec<String>, CoreError> {
        let empty = RegistryRecord::default().encode()?;
        match self.store.put_if_absent(REGISTRY_KEY, empty).await? {
            WriteOutcome::Written(_) => {
                tracing::info!(parent: ctx.span(), "Asset registry initialized");
                Ok(Vec::new())
            }
            WriteOutcome::Conflict => {
                let ids = self.list(ctx).await?;
                tracing::info!(parent: ctx.span(), count = ids.len(), "Asset registry already present");
                Ok(ids)
            }
        }
    }

    /// Append `id` unless it is already registered.
    pub async fn append(&self, ctx: &InvocationContext, id: &str) -> Result<(), CoreError> {
        for attempt in 1..=self.max_attempts {
            let outcome = match self.store.get(REGISTRY_KEY).await? {
                Some(record) => {
                    let mut registry = RegistryRecord::decode(&record)?;
                    if registry.asset_ids.iter().any(|existing| existing == id) {
                        return Ok(());
                    }
                    registry.asset_ids.push(id.to_string());
                    self.store
                        .put_if_version(REGISTRY_KEY, registry.encode()?, record.version)
                        .await?
                }
                None => {
                    let registry = RegistryRecord {
                        asset_ids: vec![id.to_string()],
                    };
                    self.store
                        .put_if_absent(REGISTRY_KEY, registry.encode()?)
                        .await?
                }
            };

            if outcome.is_written() {
                tracing::debug!(parent: ctx.span(), asset_id = id, attempt, "Asset id registered");
                return Ok(());
            }
            tracing::debug!(parent: ctx.span(), asset_id = id, attempt, "Registry write conflict, retrying");
        }

        tracing::error!(parent: ctx.span(), asset_id = id, attempts = self.max_attempts, "Registry append gave up");
        Err(CoreError::Storage(format!(
            "Registry append for {id} conflicted {} times",
            self.max_attempts
        )))
    }

    /// Every registered id, in creation order.
    pub async fn list(&self, _ctx: &InvocationContext) -> Result<Vec<String>, CoreError> {
        let record = self
            .store
            .get(REGISTRY_KEY)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity: "AssetRegistry",
                id: REGISTRY_KEY.to_string(),
            })?;
        Ok(RegistryRecord::decode(&record)?.asset_ids)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::store::MemoryStore;

    fn registry() -> (Arc<MemoryStore>, AssetRegistry) {
        let store = Arc::new(MemoryStore::new());
        let registry = AssetRegistry::new(store.clone(), DEFAULT_MAX_WRITE_ATTEMPTS);
        (store, registry)
    }

    #[tokio::test]
    async fn initialize_creates_empty_registry() {
        let (_, registry) = registry();
        let ctx = InvocationContext::detached("init");
        assert!(registry.initialize(&ctx).await.unwrap().is_empty());
        assert!(registry.list(&ctx).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn initialize_twice_keeps_entries() {
        let (_, registry) = registry();
        let ctx = InvocationContext::detached("init");
        registry.initialize(&ctx).await.unwrap();
        registry.append(&ctx, "AB1234567").await.unwrap();

        let ids = registry.initialize(&ctx).await.unwrap();
        assert_eq!(ids, vec!["AB1234567".to_string()]);
    }

    #[tokio::test]
    async fn append_keeps_order_and_skips_repeats() {
        let (_, registry) = registry();
        let ctx = InvocationContext::detached("append");
        registry.initialize(&ctx).await.unwrap();
        for id in ["AB1234567", "CD7654321", "AB1234567", "EF0000001"] {
            registry.append(&ctx, id).await.unwrap();
        }
        assert_eq!(
            registry.list(&ctx).await.unwrap(),
            vec!["AB1234567", "CD7654321", "EF0000001"]
        );
    }

    #[tokio::test]
    async fn append_without_initialize_creates_record() {
        let (_, registry) = registry();
        let ctx = InvocationContext::detached("append");
        registry.append(&ctx, "AB1234567").await.unwrap();
        assert_eq!(registry.list(&ctx).await.unwrap(), vec!["AB1234567"]);
    }

    #[tokio::test]
    async fn list_before_initialize_is_not_found() {
        let (_, registry) = registry();
        let ctx = InvocationContext::detached("list");
        assert_matches!(
            registry.list(&ctx).await,
            Err(CoreError::NotFound { entity: "AssetRegistry", .. })
        );
    }

    #[tokio::test]
    async fn legacy_null_list_decodes_as_empty() {
        let (store, registry) = registry();
        let ctx = InvocationContext::detached("list");
        store
            .put_if_absent(REGISTRY_KEY, br#"{"assetids":null}"#.to_vec())
            .await
            .unwrap();
        assert!(registry.list(&ctx).await.unwrap().is_empty());
        registry.append(&ctx, "AB1234567").await.unwrap();
        assert_eq!(registry.list(&ctx).await.unwrap(), vec!["AB1234567"]);
    }

    #[tokio::test]
    async fn corrupt_registry_is_malformed() {
        let (store, registry) = registry();
        let ctx = InvocationContext::detached("list");
        store
            .put_if_absent(REGISTRY_KEY, b"[1,2".to_vec())
            .await
            .unwrap();
        assert_matches!(
            registry.list(&ctx).await,
            Err(CoreError::MalformedRecord { .. })
        );
    }

    #[tokio::test]
    async fn concurrent_appends_all_land() {
        let (_, registry) = registry();
        let ctx = InvocationContext::detached("append");
        registry.initialize(&ctx).await.unwrap();

        let registry = AssetRegistry::new(registry.store.clone(), 64);
        let mut handles = Vec::new();
        for n in 0..16 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                let ctx = InvocationContext::detached("append");
                registry.append(&ctx, &format!("AB{n:07}")).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let ids = registry.list(&ctx).await.unwrap();
        assert_eq!(ids.len(), 16);
    }
}
