//! Repository for the `records` table.
//!
//! Both write paths are conditional: inserts skip existing keys and updates
//! only land on the expected version. A `None` result means the condition
//! did not hold.

use sqlx::PgPool;

use crate::models::record::Record;

/// Column list for `records` queries.
const COLUMNS: &str = "key, value, version, created_at, updated_at";

pub struct RecordRepo;

impl RecordRepo {
    /// Find a record by key.
    pub async fn find_by_key(pool: &PgPool, key: &str) -> Result<Option<Record>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM records WHERE key = $1");
        sqlx::query_as::<_, Record>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new record at version 1 unless the key is already taken.
    pub async fn insert_if_absent(
        pool: &PgPool,
        key: &str,
        value: &[u8],
    ) -> Result<Option<Record>, sqlx::Error> {
        let query = format!(
            "INSERT INTO records (key, value, version) VALUES ($1, $2, 1) \
             ON CONFLICT (key) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Record>(&query)
            .bind(key)
            .bind(value)
            .fetch_optional(pool)
            .await
    }

    /// Replace the value and bump the version, if the stored version still
    /// equals `expected`.
    pub async fn update_if_version(
        pool: &PgPool,
        key: &str,
        value: &[u8],
        expected: i64,
    ) -> Result<Option<Record>, sqlx::Error> {
        let query = format!(
            "UPDATE records SET value = $2, version = version + 1, updated_at = now() \
             WHERE key = $1 AND version = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Record>(&query)
            .bind(key)
            .bind(value)
            .bind(expected)
            .fetch_optional(pool)
            .await
    }

    /// Number of stored records.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM records")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
