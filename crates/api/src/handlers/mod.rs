//! Request handlers.
//!
//! Handlers resolve the caller, hand the command to the core dispatcher and
//! map errors via [`AppError`](crate::error::AppError).

pub mod chaincode;
