//! Gemchain domain core.
//!
//! Custody rules for gemstone assets moving through the supply chain. Nothing
//! in this crate knows about HTTP or PostgreSQL; persistence goes through the
//! [`store::RecordStore`] seam and callers arrive as resolved
//! [`roles::Caller`] values.

pub mod asset;
pub mod command;
pub mod context;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod query;
pub mod registry;
pub mod roles;
pub mod status;
pub mod store;
pub mod transfer;
pub mod types;
pub mod validation;
