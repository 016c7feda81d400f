//! Routes parsed commands to the engine or the query layer.

use std::sync::Arc;

use serde::Serialize;

use crate::asset::Asset;
use crate::command::Command;
use crate::context::InvocationContext;
use crate::engine::{EngineConfig, TransitionEngine};
use crate::error::CoreError;
use crate::query::QueryLayer;
use crate::roles::Caller;
use crate::store::RecordStore;

pub const PING_REPLY: &str = "Hello, world!";

/// Result payload of one command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Asset(Asset),
    Assets(Vec<Asset>),
    Unique(bool),
    Message(String),
}

#[derive(Clone)]
pub struct Dispatcher {
    engine: Arc<TransitionEngine>,
    queries: QueryLayer,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn RecordStore>, config: EngineConfig) -> Self {
        let engine = Arc::new(TransitionEngine::new(store, config));
        let queries = QueryLayer::new(Arc::clone(&engine));
        Self { engine, queries }
    }

    /// Bring-up: make sure the asset registry exists.
    pub async fn initialize(&self, ctx: &InvocationContext) -> Result<Vec<String>, CoreError> {
        self.engine.registry().initialize(ctx).await
    }

    /// Entry point for state-changing functions.
    pub async fn invoke(
        &self,
        ctx: &InvocationContext,
        caller: &Caller,
        function: &str,
        args: &[String],
    ) -> Result<Outcome, CoreError> {
        let command = Command::parse(function, args)?;
        if command.is_query() {
            return Err(CoreError::Validation(format!(
                "{function} is a query function and cannot be invoked"
            )));
        }
        self.execute(ctx, caller, command).await
    }

    /// Entry point for read-only functions.
    pub async fn query(
        &self,
        ctx: &InvocationContext,
        caller: &Caller,
        function: &str,
        args: &[String],
    ) -> Result<Outcome, CoreError> {
        let command = Command::parse(function, args)?;
        if !command.is_query() {
            return Err(CoreError::Validation(format!(
                "{function} changes state and must be invoked"
            )));
        }
        self.execute(ctx, caller, command).await
    }

    pub async fn execute(
        &self,
        ctx: &InvocationContext,
        caller: &Caller,
        command: Command,
    ) -> Result<Outcome, CoreError> {
        tracing::debug!(
            parent: ctx.span(),
            operation = command.operation(),
            caller = %caller.principal,
            role = %caller.role,
            "Executing command"
        );

        let outcome = match command {
            Command::Create { asset_id } => {
                Outcome::Asset(self.engine.create(ctx, caller, &asset_id).await?)
            }
            Command::Transfer {
                edge,
                asset_id,
                recipient,
            } => Outcome::Asset(
                self.engine
                    .transfer(ctx, caller, edge, &asset_id, &recipient)
                    .await?,
            ),
            Command::UpdateAttribute {
                field,
                asset_id,
                value,
            } => Outcome::Asset(
                self.engine
                    .update_attribute(ctx, caller, field, &asset_id, &value)
                    .await?,
            ),
            Command::Scrap { asset_id } => {
                Outcome::Asset(self.engine.scrap(ctx, caller, &asset_id).await?)
            }
            Command::GetAsset { asset_id } => {
                Outcome::Asset(self.queries.get_asset(ctx, caller, &asset_id).await?)
            }
            Command::ListAssets => Outcome::Assets(self.queries.list_assets(ctx, caller).await?),
            Command::CheckUnique { asset_id } => {
                Outcome::Unique(self.queries.check_unique(ctx, &asset_id).await?)
            }
            Command::Ping => Outcome::Message(PING_REPLY.to_string()),
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::roles::Role;
    use crate::store::MemoryStore;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(MemoryStore::new()), EngineConfig::default())
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn ping_answers() {
        let outcome = dispatcher()
            .query(
                &InvocationContext::detached("ping"),
                &Caller::new("anyone", Role::Customer),
                "ping",
                &[],
            )
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Message("Hello, world!".into()));
    }

    #[tokio::test]
    async fn entry_points_reject_the_other_kind() {
        let dispatcher = dispatcher();
        let ctx = InvocationContext::detached("split");
        let alice = Caller::new("alice", Role::Miner);

        assert_matches!(
            dispatcher.invoke(&ctx, &alice, "ping", &[]).await,
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            dispatcher
                .query(&ctx, &alice, "create_diamond", &args(&["AB1234567"]))
                .await,
            Err(CoreError::Validation(_))
        );
        // Nothing was created by the rejected query.
        assert!(dispatcher
            .query(&ctx, &alice, "check_unique_assetID", &args(&["AB1234567"]))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn invoke_then_query_round_trip() {
        let dispatcher = dispatcher();
        let ctx = InvocationContext::detached("flow");
        let alice = Caller::new("alice", Role::Miner);
        dispatcher.initialize(&ctx).await.unwrap();

        dispatcher
            .invoke(&ctx, &alice, "create_diamond", &args(&["AB1234567"]))
            .await
            .unwrap();
        dispatcher
            .invoke(
                &ctx,
                &alice,
                "miner_to_distributor",
                &args(&["bob", "AB1234567", "distributor"]),
            )
            .await
            .unwrap();

        let bob = Caller::new("bob", Role::Distributor);
        let outcome = dispatcher
            .invoke(&ctx, &bob, "update_location", &args(&["Antwerp", "AB1234567"]))
            .await
            .unwrap();
        assert_matches!(outcome, Outcome::Asset(asset) if asset.location == "Antwerp");

        let listed = dispatcher
            .query(&ctx, &bob, "get_diamonds", &[])
            .await
            .unwrap();
        assert_matches!(listed, Outcome::Assets(assets) if assets.len() == 1);

        let unique = dispatcher
            .query(&ctx, &bob, "check_unique_assetID", &args(&["CD7654321"]))
            .await
            .unwrap();
        assert_eq!(unique, Outcome::Unique(true));
    }

    #[test]
    fn outcomes_serialize_untagged() {
        assert_eq!(
            serde_json::to_value(Outcome::Unique(true)).unwrap(),
            serde_json::json!(true)
        );
        assert_eq!(
            serde_json::to_value(Outcome::Message(PING_REPLY.into())).unwrap(),
            serde_json::json!("Hello, world!")
        );
        let asset = serde_json::to_value(Outcome::Asset(Asset::new("AB1234567", "alice"))).unwrap();
        assert_eq!(asset["assetID"], "AB1234567");
        assert_eq!(asset["diamondat"], "UNDEFINED");
    }
}
