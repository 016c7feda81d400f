//! Repository structs, one per table.

pub mod record_repo;

pub use record_repo::RecordRepo;
