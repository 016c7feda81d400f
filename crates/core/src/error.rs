use std::fmt;

use crate::roles::Role;
use crate::status::AssetStatus;

/// A single precondition that an operation found unsatisfied.
///
/// Denials carry every failed conjunct so the caller can see exactly which
/// role, status, or ownership check was not met.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The asset is not in the status the operation starts from.
    WrongStatus {
        expected: AssetStatus,
        actual: AssetStatus,
    },
    /// The caller is not the current owner.
    NotOwner,
    /// The caller's role is not the one the operation requires.
    WrongCallerRole { expected: Role, actual: Role },
    /// The recipient's role is not the one the edge hands custody to.
    WrongRecipientRole { expected: Role, actual: Role },
    /// The asset has been scrapped and is immutable.
    Scrapped,
    /// The weight may only be assigned once.
    WeightAlreadySet,
    /// The caller is neither the owner nor an auditing miner.
    NotViewable,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongStatus { expected, actual } => {
                write!(f, "status is {actual}, expected {expected}")
            }
            Self::NotOwner => write!(f, "caller is not the current owner"),
            Self::WrongCallerRole { expected, actual } => {
                write!(f, "caller role is {actual}, expected {expected}")
            }
            Self::WrongRecipientRole { expected, actual } => {
                write!(f, "recipient role is {actual}, expected {expected}")
            }
            Self::Scrapped => write!(f, "asset has been scrapped"),
            Self::WeightAlreadySet => write!(f, "weight has already been assigned"),
            Self::NotViewable => write!(f, "caller is neither the owner nor a miner"),
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Asset already exists: {0}")]
    DuplicateAsset(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Malformed record at key {key}: {reason}")]
    MalformedRecord { key: String, reason: String },

    #[error("Permission denied for {operation}: {}", join_violations(.violations))]
    PermissionDenied {
        operation: &'static str,
        violations: Vec<Violation>,
    },

    #[error("Identity error: {0}")]
    Identity(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoreError {
    /// Build a denial for `operation` from a non-empty list of violations.
    pub fn denied(operation: &'static str, violations: Vec<Violation>) -> Self {
        Self::PermissionDenied {
            operation,
            violations,
        }
    }

    /// Whether this error is a routine outcome (denial or bad input) rather
    /// than a fault in the store.
    pub fn is_expected(&self) -> bool {
        !matches!(self, Self::Storage(_) | Self::MalformedRecord { .. })
    }
}
