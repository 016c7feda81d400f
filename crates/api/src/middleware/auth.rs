//! JWT-based caller extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use gemchain_core::error::CoreError;
use gemchain_core::roles::Caller;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Caller resolved from the `Authorization: Bearer <token>` header.
///
/// Rejects with an identity error (401) when the header is missing, the
/// token does not verify, or its role is not a supply-chain role. Handlers
/// taking this extractor never reach the core for an unresolved caller.
#[derive(Debug, Clone)]
pub struct AuthCaller(pub Caller);

impl FromRequestParts<AppState> for AuthCaller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Identity("Missing Authorization header".into()))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Identity(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| AppError::Core(CoreError::Identity("Invalid or expired token".into())))?;

        let caller = Caller::resolve(&claims.sub, &claims.role)?;
        Ok(AuthCaller(caller))
    }
}
