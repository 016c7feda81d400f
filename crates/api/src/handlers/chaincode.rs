//! Handlers for the invoke and query entry points.
//!
//! Both take `{"function": "...", "args": ["..."]}` and reply with the
//! command outcome in the `{ "data": ... }` envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use gemchain_core::context::InvocationContext;
use gemchain_core::dispatch::Outcome;
use serde::Deserialize;
use tower_http::request_id::RequestId;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthCaller;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body shared by both entry points.
#[derive(Debug, Deserialize)]
pub struct InvocationRequest {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Reuse the `x-request-id` assigned by the middleware stack when it is a
/// UUID, otherwise mint a fresh one.
fn invocation_context(
    request_id: Option<Extension<RequestId>>,
    function: &str,
) -> InvocationContext {
    let id = request_id
        .and_then(|Extension(id)| id.header_value().to_str().ok().map(str::to_owned))
        .and_then(|value| Uuid::parse_str(&value).ok())
        .unwrap_or_else(Uuid::new_v4);
    InvocationContext::new(id, function)
}

/// POST /api/v1/invoke
pub async fn invoke(
    State(state): State<AppState>,
    AuthCaller(caller): AuthCaller,
    request_id: Option<Extension<RequestId>>,
    payload: Result<Json<InvocationRequest>, JsonRejection>,
) -> AppResult<Json<DataResponse<Outcome>>> {
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let ctx = invocation_context(request_id, &input.function);
    let outcome = state
        .dispatcher
        .invoke(&ctx, &caller, &input.function, &input.args)
        .await
        .inspect_err(|e| log_failure(&ctx, &input.function, e))?;
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/query
pub async fn query(
    State(state): State<AppState>,
    AuthCaller(caller): AuthCaller,
    request_id: Option<Extension<RequestId>>,
    payload: Result<Json<InvocationRequest>, JsonRejection>,
) -> AppResult<Json<DataResponse<Outcome>>> {
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let ctx = invocation_context(request_id, &input.function);
    let outcome = state
        .dispatcher
        .query(&ctx, &caller, &input.function, &input.args)
        .await
        .inspect_err(|e| log_failure(&ctx, &input.function, e))?;
    Ok(Json(DataResponse { data: outcome }))
}

fn log_failure(ctx: &InvocationContext, function: &str, err: &gemchain_core::error::CoreError) {
    if err.is_expected() {
        tracing::info!(parent: ctx.span(), function, error = %err, "Invocation refused");
    } else {
        tracing::error!(parent: ctx.span(), function, error = %err, "Invocation failed");
    }
}
