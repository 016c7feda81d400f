//! Read-only views over assets, filtered by caller visibility.

use std::sync::Arc;

use crate::asset::Asset;
use crate::context::InvocationContext;
use crate::engine::TransitionEngine;
use crate::error::{CoreError, Violation};
use crate::roles::{Caller, Role};
use crate::validation::validate_identifier;

pub const OP_GET: &str = "get_diamond_details";

/// Whether `caller` may see `asset`: its owner, or any miner.
pub fn is_visible(asset: &Asset, caller: &Caller) -> bool {
    asset.owner == caller.principal || caller.role == Role::Miner
}

#[derive(Clone)]
pub struct QueryLayer {
    engine: Arc<TransitionEngine>,
}

impl QueryLayer {
    pub fn new(engine: Arc<TransitionEngine>) -> Self {
        Self { engine }
    }

    /// Fetch one asset the caller is allowed to see.
    pub async fn get_asset(
        &self,
        _ctx: &InvocationContext,
        caller: &Caller,
        asset_id: &str,
    ) -> Result<Asset, CoreError> {
        let (asset, _) = self.engine.load(asset_id).await?;
        if !is_visible(&asset, caller) {
            return Err(CoreError::denied(OP_GET, vec![Violation::NotViewable]));
        }
        Ok(asset)
    }

    /// Every registered asset the caller may see, in registry order.
    ///
    /// Invisible assets are left out without error. A registered id whose
    /// record is missing fails the whole listing.
    pub async fn list_assets(
        &self,
        ctx: &InvocationContext,
        caller: &Caller,
    ) -> Result<Vec<Asset>, CoreError> {
        let ids = self.engine.registry().list(ctx).await?;
        let mut visible = Vec::with_capacity(ids.len());
        for id in &ids {
            let (asset, _) = self.engine.load(id).await?;
            if is_visible(&asset, caller) {
                visible.push(asset);
            }
        }
        tracing::debug!(parent: ctx.span(), registered = ids.len(), visible = visible.len(), "Assets listed");
        Ok(visible)
    }

    /// `Ok(true)` when `asset_id` is well formed and not yet taken.
    pub async fn check_unique(
        &self,
        _ctx: &InvocationContext,
        asset_id: &str,
    ) -> Result<bool, CoreError> {
        validate_identifier(asset_id)?;
        match self.engine.load(asset_id).await {
            Ok(_) => Err(CoreError::DuplicateAsset(asset_id.to_string())),
            Err(CoreError::NotFound { .. }) => Ok(true),
            Err(e) => Err(e),
        }
    }
}
