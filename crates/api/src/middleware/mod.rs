//! Request extractors.
//!
//! - [`auth::AuthCaller`] -- Resolves the calling principal and role from a JWT Bearer token.

pub mod auth;
