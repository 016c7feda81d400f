/// Per-key write counter used for conditional (compare-and-swap) writes.
/// The first successful write of a key produces version 1.
pub type Version = i64;

/// A principal identifier as issued by the identity provider.
pub type PrincipalId = String;
