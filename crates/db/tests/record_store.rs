//! PostgreSQL record store behaviour.
//!
//! Run with a reachable PostgreSQL in `DATABASE_URL` and `--ignored`.

use std::sync::Arc;

use assert_matches::assert_matches;
use gemchain_core::context::InvocationContext;
use gemchain_core::engine::{EngineConfig, TransitionEngine};
use gemchain_core::error::CoreError;
use gemchain_core::roles::{Caller, Role};
use gemchain_core::store::{RecordStore, WriteOutcome};
use gemchain_core::transfer::EDGES;
use gemchain_db::repositories::RecordRepo;
use gemchain_db::PgRecordStore;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL DATABASE_URL"]
async fn test_health_check(pool: PgPool) {
    gemchain_db::health_check(&pool).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL DATABASE_URL"]
async fn test_insert_if_absent_once(pool: PgPool) {
    let store = PgRecordStore::new(pool.clone());

    assert_eq!(
        store.put_if_absent("k", b"a".to_vec()).await.unwrap(),
        WriteOutcome::Written(1)
    );
    assert_eq!(
        store.put_if_absent("k", b"b".to_vec()).await.unwrap(),
        WriteOutcome::Conflict
    );

    let record = store.get("k").await.unwrap().unwrap();
    assert_eq!(record.bytes, b"a");
    assert_eq!(record.version, 1);
    assert_eq!(RecordRepo::count(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL DATABASE_URL"]
async fn test_update_requires_current_version(pool: PgPool) {
    let store = PgRecordStore::new(pool);
    store.put_if_absent("k", b"a".to_vec()).await.unwrap();

    assert_eq!(
        store.put_if_version("k", b"b".to_vec(), 1).await.unwrap(),
        WriteOutcome::Written(2)
    );
    assert_eq!(
        store.put_if_version("k", b"c".to_vec(), 1).await.unwrap(),
        WriteOutcome::Conflict
    );
    assert_eq!(
        store.put_if_version("missing", b"x".to_vec(), 1).await.unwrap(),
        WriteOutcome::Conflict
    );

    let record = store.get("k").await.unwrap().unwrap();
    assert_eq!(record.bytes, b"b");
    assert_eq!(record.version, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL DATABASE_URL"]
async fn test_engine_over_postgres(pool: PgPool) {
    let engine = TransitionEngine::new(
        Arc::new(PgRecordStore::new(pool)),
        EngineConfig::default(),
    );
    let ctx = InvocationContext::detached("pg");
    engine.registry().initialize(&ctx).await.unwrap();

    let alice = Caller::new("alice", Role::Miner);
    let bob = Caller::new("bob", Role::Distributor);
    engine.create(&ctx, &alice, "AB1234567").await.unwrap();
    assert_matches!(
        engine.create(&ctx, &alice, "AB1234567").await,
        Err(CoreError::DuplicateAsset(_))
    );

    let asset = engine
        .transfer(&ctx, &alice, &EDGES[0], "AB1234567", &bob)
        .await
        .unwrap();
    assert_eq!(asset.owner, "bob");

    let (stored, version) = engine.load("AB1234567").await.unwrap();
    assert_eq!(stored, asset);
    assert_eq!(version, 2);
    assert_eq!(
        engine.registry().list(&ctx).await.unwrap(),
        vec!["AB1234567"]
    );
}
