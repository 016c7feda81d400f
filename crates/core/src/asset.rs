//! The asset record and its descriptive attributes.
//!
//! Serialized field names are the legacy ledger names (`assetID`,
//! `diamondat`, `jewellerytype`, ...) so records written by earlier
//! deployments decode unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::AssetStatus;
use crate::types::PrincipalId;

/// Placeholder held by every descriptive attribute until it is assigned.
pub const UNDEFINED: &str = "UNDEFINED";

/// A gemstone tracked through the supply chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(rename = "assetID")]
    pub id: String,
    pub owner: PrincipalId,
    pub status: AssetStatus,
    pub scrapped: bool,
    pub clarity: String,
    #[serde(rename = "diamondat")]
    pub weight: String,
    pub cut: String,
    pub symmetry: String,
    pub polish: String,
    pub colour: String,
    pub location: String,
    pub date: String,
    pub timestamp: String,
    #[serde(rename = "jewellerytype")]
    pub jewellery_type: String,
}

impl Asset {
    /// A freshly mined asset: owned by `owner`, in [`AssetStatus::Mining`],
    /// every attribute [`UNDEFINED`].
    pub fn new(id: impl Into<String>, owner: impl Into<PrincipalId>) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            status: AssetStatus::Mining,
            scrapped: false,
            clarity: UNDEFINED.to_string(),
            weight: UNDEFINED.to_string(),
            cut: UNDEFINED.to_string(),
            symmetry: UNDEFINED.to_string(),
            polish: UNDEFINED.to_string(),
            colour: UNDEFINED.to_string(),
            location: UNDEFINED.to_string(),
            date: UNDEFINED.to_string(),
            timestamp: UNDEFINED.to_string(),
            jewellery_type: UNDEFINED.to_string(),
        }
    }

    pub fn attribute(&self, field: AssetField) -> &str {
        match field {
            AssetField::Clarity => &self.clarity,
            AssetField::Weight => &self.weight,
            AssetField::Cut => &self.cut,
            AssetField::Symmetry => &self.symmetry,
            AssetField::Polish => &self.polish,
            AssetField::Colour => &self.colour,
            AssetField::Location => &self.location,
            AssetField::Date => &self.date,
            AssetField::Timestamp => &self.timestamp,
            AssetField::JewelleryType => &self.jewellery_type,
        }
    }

    pub fn set_attribute(&mut self, field: AssetField, value: String) {
        let slot = match field {
            AssetField::Clarity => &mut self.clarity,
            AssetField::Weight => &mut self.weight,
            AssetField::Cut => &mut self.cut,
            AssetField::Symmetry => &mut self.symmetry,
            AssetField::Polish => &mut self.polish,
            AssetField::Colour => &mut self.colour,
            AssetField::Location => &mut self.location,
            AssetField::Date => &mut self.date,
            AssetField::Timestamp => &mut self.timestamp,
            AssetField::JewelleryType => &mut self.jewellery_type,
        };
        *slot = value;
    }

    /// Whether `field` still holds the [`UNDEFINED`] sentinel.
    pub fn is_undefined(&self, field: AssetField) -> bool {
        self.attribute(field) == UNDEFINED
    }

    /// Encode as the flat JSON record stored under the asset's id.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec(self).map_err(|e| CoreError::MalformedRecord {
            key: self.id.clone(),
            reason: e.to_string(),
        })
    }

    /// Decode a stored record read from `key`.
    pub fn from_bytes(key: &str, bytes: &[u8]) -> Result<Self, CoreError> {
        serde_json::from_slice(bytes).map_err(|e| CoreError::MalformedRecord {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Which gate governs updates to an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePolicy {
    /// Only while the asset is being distributed.
    StatusScoped,
    /// Whenever the caller owns the asset, regardless of status.
    OwnerScoped,
}

/// A descriptive attribute of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetField {
    Clarity,
    Weight,
    Cut,
    Symmetry,
    Polish,
    Colour,
    Location,
    Date,
    Timestamp,
    JewelleryType,
}

/// Attributes that must be assigned before an asset leaves distribution.
pub const CORE_ATTRIBUTES: &[AssetField] = &[
    AssetField::Clarity,
    AssetField::Weight,
    AssetField::Cut,
    AssetField::Colour,
    AssetField::Symmetry,
];

impl AssetField {
    pub const ALL: [AssetField; 10] = [
        Self::Clarity,
        Self::Weight,
        Self::Cut,
        Self::Symmetry,
        Self::Polish,
        Self::Colour,
        Self::Location,
        Self::Date,
        Self::Timestamp,
        Self::JewelleryType,
    ];

    pub fn policy(self) -> UpdatePolicy {
        match self {
            Self::Clarity | Self::Weight | Self::Cut => UpdatePolicy::StatusScoped,
            Self::Symmetry
            | Self::Polish
            | Self::Colour
            | Self::Location
            | Self::Date
            | Self::Timestamp
            | Self::JewelleryType => UpdatePolicy::OwnerScoped,
        }
    }

    /// Name of the update operation for this field on the command surface.
    pub fn operation(self) -> &'static str {
        match self {
            Self::Clarity => "update_clarity",
            Self::Weight => "update_diamondat",
            Self::Cut => "update_cut",
            Self::Symmetry => "update_symmetry",
            Self::Polish => "update_polish",
            Self::Colour => "update_colour",
            Self::Location => "update_location",
            Self::Date => "update_date",
            Self::Timestamp => "update_timestamp",
            Self::JewelleryType => "update_jewellery_type",
        }
    }

    /// Look up a field by its update operation name. `update_weight` is
    /// accepted as an alias of `update_diamondat`.
    pub fn from_operation(name: &str) -> Option<Self> {
        if name == "update_weight" {
            return Some(Self::Weight);
        }
        Self::ALL.into_iter().find(|f| f.operation() == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Clarity => "clarity",
            Self::Weight => "weight",
            Self::Cut => "cut",
            Self::Symmetry => "symmetry",
            Self::Polish => "polish",
            Self::Colour => "colour",
            Self::Location => "location",
            Self::Date => "date",
            Self::Timestamp => "timestamp",
            Self::JewelleryType => "jewellery_type",
        }
    }
}

impl fmt::Display for AssetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
