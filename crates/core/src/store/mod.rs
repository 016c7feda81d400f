//! Record store seam.
//!
//! The store is a linearizable per-key map from string keys to opaque bytes.
//! Every key carries a [`Version`] so callers can close check-then-act races
//! with conditional writes instead of separate read and write calls. There
//! are no multi-key transactions.

pub mod memory;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::Version;

pub use memory::MemoryStore;

/// A value read from the store together with the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedRecord {
    pub bytes: Vec<u8>,
    pub version: Version,
}

/// Outcome of a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The write was applied; the key is now at this version.
    Written(Version),
    /// The precondition did not hold and nothing was written.
    Conflict,
}

impl WriteOutcome {
    pub fn is_written(self) -> bool {
        matches!(self, Self::Written(_))
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Point lookup. `Ok(None)` when the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<VersionedRecord>, CoreError>;

    /// Write `bytes` only if `key` does not exist yet.
    async fn put_if_absent(&self, key: &str, bytes: Vec<u8>) -> Result<WriteOutcome, CoreError>;

    /// Write `bytes` only if `key` is still at `expected`.
    async fn put_if_version(
        &self,
        key: &str,
        bytes: Vec<u8>,
        expected: Version,
    ) -> Result<WriteOutcome, CoreError>;
}
