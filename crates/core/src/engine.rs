//! Transition engine: creation, custody transfer, attribute updates and
//! scrapping.
//!
//! Every mutation is a read-modify-write of a single asset key. The planned
//! next state is computed by a pure function of the loaded record and the
//! caller; it is then written conditionally on the version that was read.
//! On a conflicting concurrent write the record is reloaded and every
//! precondition is evaluated again against the fresh state, so a losing
//! writer sees the winner's changes and is denied rather than overwriting
//! them. A denied or invalid request never writes.

use std::sync::Arc;

use crate::asset::{Asset, AssetField, UpdatePolicy};
use crate::context::InvocationContext;
use crate::error::{CoreError, Violation};
use crate::registry::{AssetRegistry, DEFAULT_MAX_WRITE_ATTEMPTS};
use crate::roles::{Caller, Role};
use crate::status::AssetStatus;
use crate::store::{RecordStore, WriteOutcome};
use crate::transfer::TransferEdge;
use crate::types::Version;
use crate::validation::{require_not_scrapped, validate_attribute, validate_identifier};

pub const OP_CREATE: &str = "create_diamond";
pub const OP_SCRAP: &str = "scrap_diamond";

/// Engine tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Conditional-write attempts per mutation before reporting a storage
    /// error (default: `8`).
    pub max_write_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_write_attempts: DEFAULT_MAX_WRITE_ATTEMPTS,
        }
    }
}

impl EngineConfig {
    /// Load from the environment.
    ///
    /// | Env Var              | Default |
    /// |----------------------|---------|
    /// | `MAX_WRITE_ATTEMPTS` | `8`     |
    pub fn from_env() -> Self {
        let max_write_attempts: u32 = std::env::var("MAX_WRITE_ATTEMPTS")
            .unwrap_or_else(|_| DEFAULT_MAX_WRITE_ATTEMPTS.to_string())
            .parse()
            .expect("MAX_WRITE_ATTEMPTS must be a valid u32");
        Self { max_write_attempts }
    }
}

#[derive(Clone)]
pub struct TransitionEngine {
    store: Arc<dyn RecordStore>,
    registry: AssetRegistry,
    config: EngineConfig,
}

impl TransitionEngine {
    pub fn new(store: Arc<dyn RecordStore>, config: EngineConfig) -> Self {
        let config = EngineConfig {
            max_write_attempts: config.max_write_attempts.max(1),
        };
        let registry = AssetRegistry::new(Arc::clone(&store), config.max_write_attempts);
        Self {
            store,
            registry,
            config,
        }
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    /// Mine a new asset owned by `caller`.
    pub async fn create(
        &self,
        ctx: &InvocationContext,
        caller: &Caller,
        id: &str,
    ) -> Result<Asset, CoreError> {
        validate_identifier(id)?;

        if self.store.get(id).await?.is_some() {
            return self.duplicate(ctx, id).await;
        }

        if caller.role != Role::Miner {
            tracing::info!(parent: ctx.span(), asset_id = id, caller = %caller.principal, role = %caller.role, "Create denied");
            return Err(CoreError::denied(
                OP_CREATE,
                vec![Violation::WrongCallerRole {
                    expected: Role::Miner,
                    actual: caller.role,
                }],
            ));
        }

        let asset = Asset::new(id, caller.principal.clone());

        // The lookup above is only a fast path; this conditional write is
        // what decides a creation race.
        if let WriteOutcome::Conflict = self.store.put_if_absent(id, asset.to_bytes()?).await? {
            return self.duplicate(ctx, id).await;
        }

        self.registry.append(ctx, id).await?;

        tracing::info!(parent: ctx.span(), asset_id = id, owner = %asset.owner, "Asset created");
        Ok(asset)
    }

    /// Report `id` as taken, first making sure it is registered.
    ///
    /// An earlier create may have written the record and then failed to
    /// register it; registering here lets a retried create complete it.
    async fn duplicate(&self, ctx: &InvocationContext, id: &str) -> Result<Asset, CoreError> {
        self.registry.append(ctx, id).await?;
        Err(CoreError::DuplicateAsset(id.to_string()))
    }

    /// Hand custody of `asset_id` from `caller` to `recipient` along `edge`.
    pub async fn transfer(
        &self,
        ctx: &InvocationContext,
        caller: &Caller,
        edge: &TransferEdge,
        asset_id: &str,
        recipient: &Caller,
    ) -> Result<Asset, CoreError> {
        self.mutate(ctx, edge.operation, asset_id, |asset| {
            edge.apply(asset, caller, recipient)
        })
        .await
    }

    /// Assign a descriptive attribute.
    pub async fn update_attribute(
        &self,
        ctx: &InvocationContext,
        caller: &Caller,
        field: AssetField,
        asset_id: &str,
        value: &str,
    ) -> Result<Asset, CoreError> {
        validate_attribute(field, value)?;
        self.mutate(ctx, field.operation(), asset_id, |asset| {
            plan_update(asset, caller, field, value)
        })
        .await
    }

    /// Set the terminal scrapped flag.
    pub async fn scrap(
        &self,
        ctx: &InvocationContext,
        caller: &Caller,
        asset_id: &str,
    ) -> Result<Asset, CoreError> {
        self.mutate(ctx, OP_SCRAP, asset_id, |asset| plan_scrap(asset, caller))
            .await
    }

    /// Load and decode the record stored under `asset_id`.
    pub async fn load(&self, asset_id: &str) -> Result<(Asset, Version), CoreError> {
        let record = self
            .store
            .get(asset_id)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity: "Asset",
                id: asset_id.to_string(),
            })?;

        let asset = Asset::from_bytes(asset_id, &record.bytes)?;
        if asset.id != asset_id {
            return Err(CoreError::MalformedRecord {
                key: asset_id.to_string(),
                reason: format!("record carries asset id {}", asset.id),
            });
        }
        Ok((asset, record.version))
    }

    async fn mutate<F>(
        &self,
        ctx: &InvocationContext,
        operation: &'static str,
        asset_id: &str,
        plan: F,
    ) -> Result<Asset, CoreError>
    where
        F: Fn(&Asset) -> Result<Asset, CoreError>,
    {
        for attempt in 1..=self.config.max_write_attempts {
            let (current, version) = self.load(asset_id).await?;

            let next = match plan(&current) {
                Ok(next) => next,
                Err(e) => {
                    tracing::info!(parent: ctx.span(), operation, asset_id, error = %e, "Operation rejected");
                    return Err(e);
                }
            };

            match self
                .store
                .put_if_version(asset_id, next.to_bytes()?, version)
                .await?
            {
                WriteOutcome::Written(new_version) => {
                    tracing::info!(
                        parent: ctx.span(),
                        operation,
                        asset_id,
                        owner = %next.owner,
                        status = %next.status,
                        version = new_version,
                        "Asset updated"
                    );
                    return Ok(next);
                }
                WriteOutcome::Conflict => {
                    tracing::debug!(parent: ctx.span(), operation, asset_id, attempt, "Write conflict, re-evaluating");
                }
            }
        }

        tracing::error!(parent: ctx.span(), operation, asset_id, "Conditional write attempts exhausted");
        Err(CoreError::Storage(format!(
            "{operation} on {asset_id} conflicted {} times",
            self.config.max_write_attempts
        )))
    }
}

/// Compute the asset after assigning `value` to `field`.
///
/// Status-scoped fields may only change while the asset is being
/// distributed; the weight may additionally be assigned only once.
pub fn plan_update(
    asset: &Asset,
    caller: &Caller,
    field: AssetField,
    value: &str,
) -> Result<Asset, CoreError> {
    let operation = field.operation();
    require_not_scrapped(asset, operation)?;

    let mut violations = Vec::new();
    if field.policy() == UpdatePolicy::StatusScoped && asset.status != AssetStatus::Distributing
    {
        violations.push(Violation::WrongStatus {
            expected: AssetStatus::Distributing,
            actual: asset.status,
        });
    }
    if asset.owner != caller.principal {
        violations.push(Violation::NotOwner);
    }
    if caller.role != Role::Distributor {
        violations.push(Violation::WrongCallerRole {
            expected: Role::Distributor,
            actual: caller.role,
        });
    }
    if field == AssetField::Weight && !asset.is_undefined(AssetField::Weight) {
        violations.push(Violation::WeightAlreadySet);
    }
    if !violations.is_empty() {
        return Err(CoreError::denied(operation, violations));
    }

    let mut next = asset.clone();
    next.set_attribute(field, value.to_string());
    Ok(next)
}

/// Compute the asset after scrapping.
pub fn plan_scrap(asset: &Asset, caller: &Caller) -> Result<Asset, CoreError> {
    require_not_scrapped(asset, OP_SCRAP)?;

    let mut violations = Vec::new();
    if asset.status != AssetStatus::BeingScrapped {
        violations.push(Violation::WrongStatus {
            expected: AssetStatus::BeingScrapped,
            actual: asset.status,
        });
    }
    if asset.owner != caller.principal {
        violations.push(Violation::NotOwner);
    }
    if caller.role != Role::ScrapMerchant {
        violations.push(Violation::WrongCallerRole {
            expected: Role::ScrapMerchant,
            actual: caller.role,
        });
    }
    if !violations.is_empty() {
        return Err(CoreError::denied(OP_SCRAP, violations));
    }

    let mut next = asset.clone();
    next.scrapped = true;
    Ok(next)
}
