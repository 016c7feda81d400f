use std::sync::Arc;

use gemchain_core::dispatch::Dispatcher;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Command dispatcher over the configured record store.
    pub dispatcher: Arc<Dispatcher>,
    /// Server configuration (JWT settings are read by the auth extractor).
    pub config: Arc<ServerConfig>,
    /// Database pool, when the PostgreSQL store is in use.
    pub pool: Option<gemchain_db::DbPool>,
}
