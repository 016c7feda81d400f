pub mod health;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /invoke        POST  state-changing functions
/// /query         POST  read-only functions
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/invoke", post(handlers::chaincode::invoke))
        .route("/query", post(handlers::chaincode::query))
}
