//! Asset lifecycle status.
//!
//! Discriminants are the integers persisted in the `status` field of an
//! asset record and must not be renumbered.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AssetStatus {
    Mining = 0,
    Distributing = 1,
    InterDealing = 2,
    Buying = 3,
    Trading = 4,
    Cutting = 5,
    JewelMaking = 6,
    Purchasing = 7,
    BeingScrapped = 8,
}

impl AssetStatus {
    /// Every status in lifecycle order.
    pub const ALL: [AssetStatus; 9] = [
        Self::Mining,
        Self::Distributing,
        Self::InterDealing,
        Self::Buying,
        Self::Trading,
        Self::Cutting,
        Self::JewelMaking,
        Self::Purchasing,
        Self::BeingScrapped,
    ];

    /// The persisted integer code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// The status that directly follows this one, or `None` at the end of
    /// the path.
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.code() as usize + 1).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Mining => "mining",
            Self::Distributing => "distributing",
            Self::InterDealing => "inter_dealing",
            Self::Buying => "buying",
            Self::Trading => "trading",
            Self::Cutting => "cutting",
            Self::JewelMaking => "jewel_making",
            Self::Purchasing => "purchasing",
            Self::BeingScrapped => "being_scrapped",
        }
    }
}

impl TryFrom<u8> for AssetStatus {
    type Error = CoreError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL.get(code as usize).copied().ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid asset status {code}. Must be between 0 and {}",
                Self::ALL.len() - 1
            ))
        })
    }
}

impl From<AssetStatus> for u8 {
    fn from(status: AssetStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_persisted_values() {
        for (i, status) in AssetStatus::ALL.iter().enumerate() {
            assert_eq!(status.code() as usize, i);
        }
        assert_eq!(AssetStatus::BeingScrapped.code(), 8);
    }

    #[test]
    fn next_walks_the_path_and_stops() {
        assert_eq!(AssetStatus::Mining.next(), Some(AssetStatus::Distributing));
        assert_eq!(AssetStatus::Purchasing.next(), Some(AssetStatus::BeingScrapped));
        assert_eq!(AssetStatus::BeingScrapped.next(), None);
    }

    #[test]
    fn out_of_range_code_is_rejected() {
        assert!(AssetStatus::try_from(9).is_err());
        assert_eq!(AssetStatus::try_from(4).unwrap(), AssetStatus::Trading);
    }

    #[test]
    fn serializes_as_integer() {
        assert_eq!(serde_json::to_string(&AssetStatus::Cutting).unwrap(), "5");
        let parsed: AssetStatus = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, AssetStatus::InterDealing);
        assert!(serde_json::from_str::<AssetStatus>("12").is_err());
    }
}
