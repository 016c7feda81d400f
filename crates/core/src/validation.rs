//! Format and completeness checks on asset identifiers and records.

use std::sync::LazyLock;

use regex::Regex;

use crate::asset::{Asset, AssetField};
use crate::error::{CoreError, Violation};

/// Two ASCII letters followed by seven digits, nothing else.
const ASSET_ID_PATTERN: &str = r"^[A-Za-z]{2}[0-9]{7}$";

static ASSET_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ASSET_ID_PATTERN).expect("valid regex"));

/// Exact number of digits in a weight value.
pub const WEIGHT_DIGITS: usize = 15;

/// Validate the format of an asset identifier.
pub fn validate_identifier(id: &str) -> Result<(), CoreError> {
    if ASSET_ID_RE.is_match(id) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid asset id '{id}'. Must be two letters followed by seven digits"
        )))
    }
}

/// Fail if any of `fields` still holds the `UNDEFINED` sentinel.
pub fn require_defined(asset: &Asset, fields: &[AssetField]) -> Result<(), CoreError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|f| asset.is_undefined(**f))
        .map(|f| f.label())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Asset {} not fully defined. Missing: {}",
            asset.id,
            missing.join(", ")
        )))
    }
}

/// Fail with a denial if the asset has been scrapped.
pub fn require_not_scrapped(asset: &Asset, operation: &'static str) -> Result<(), CoreError> {
    if asset.scrapped {
        Err(CoreError::denied(operation, vec![Violation::Scrapped]))
    } else {
        Ok(())
    }
}

/// Validate a weight value: exactly [`WEIGHT_DIGITS`] ASCII digits.
pub fn validate_weight(value: &str) -> Result<(), CoreError> {
    if value.len() != WEIGHT_DIGITS || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::Validation(format!(
            "Invalid weight '{value}'. Must be exactly {WEIGHT_DIGITS} digits"
        )));
    }
    Ok(())
}

/// Validate a new attribute value before any gate is evaluated.
pub fn validate_attribute(field: AssetField, value: &str) -> Result<(), CoreError> {
    match field {
        AssetField::Weight => validate_weight(value),
        _ if value.trim().is_empty() => Err(CoreError::Validation(format!(
            "Value for {field} must not be empty"
        ))),
        _ => Ok(()),
    }
}
