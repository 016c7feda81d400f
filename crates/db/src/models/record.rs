//! Row model for the `records` table.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Record {
    pub key: String,
    pub value: Vec<u8>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
