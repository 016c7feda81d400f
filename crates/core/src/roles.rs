//! Supply-chain roles and the resolved caller of an invocation.
//!
//! Role names must match the `role` claim issued to principals by the
//! identity provider.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::PrincipalId;

pub const ROLE_MINER: &str = "miner";
pub const ROLE_DISTRIBUTOR: &str = "distributor";
pub const ROLE_DEALERSHIP: &str = "dealership";
pub const ROLE_BUYER: &str = "buyer";
pub const ROLE_TRADER: &str = "trader";
pub const ROLE_CUTTER: &str = "cutter";
pub const ROLE_JEWELLERY_MAKER: &str = "jewellery_maker";
pub const ROLE_CUSTOMER: &str = "customer";
pub const ROLE_SCRAP_MERCHANT: &str = "scrap_merchant";

/// All valid role names, in supply-chain order.
pub const VALID_ROLES: &[&str] = &[
    ROLE_MINER,
    ROLE_DISTRIBUTOR,
    ROLE_DEALERSHIP,
    ROLE_BUYER,
    ROLE_TRADER,
    ROLE_CUTTER,
    ROLE_JEWELLERY_MAKER,
    ROLE_CUSTOMER,
    ROLE_SCRAP_MERCHANT,
];

/// The fixed affiliation of a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Miner,
    Distributor,
    Dealership,
    Buyer,
    Trader,
    Cutter,
    JewelleryMaker,
    Customer,
    ScrapMerchant,
}

impl Role {
    /// Parse a role name as carried in identity claims.
    ///
    /// An unknown role means the identity cannot be resolved, so this fails
    /// with [`CoreError::Identity`].
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            ROLE_MINER => Ok(Self::Miner),
            ROLE_DISTRIBUTOR => Ok(Self::Distributor),
            ROLE_DEALERSHIP => Ok(Self::Dealership),
            ROLE_BUYER => Ok(Self::Buyer),
            ROLE_TRADER => Ok(Self::Trader),
            ROLE_CUTTER => Ok(Self::Cutter),
            ROLE_JEWELLERY_MAKER => Ok(Self::JewelleryMaker),
            ROLE_CUSTOMER => Ok(Self::Customer),
            ROLE_SCRAP_MERCHANT => Ok(Self::ScrapMerchant),
            _ => Err(CoreError::Identity(format!(
                "Unknown role '{s}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Miner => ROLE_MINER,
            Self::Distributor => ROLE_DISTRIBUTOR,
            Self::Dealership => ROLE_DEALERSHIP,
            Self::Buyer => ROLE_BUYER,
            Self::Trader => ROLE_TRADER,
            Self::Cutter => ROLE_CUTTER,
            Self::JewelleryMaker => ROLE_JEWELLERY_MAKER,
            Self::Customer => ROLE_CUSTOMER,
            Self::ScrapMerchant => ROLE_SCRAP_MERCHANT,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A principal together with its role: the caller of an invocation, or the
/// recipient of a custody transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub principal: PrincipalId,
    pub role: Role,
}

impl Caller {
    pub fn new(principal: impl Into<PrincipalId>, role: Role) -> Self {
        Self {
            principal: principal.into(),
            role,
        }
    }

    /// Resolve raw identity attributes into a caller.
    ///
    /// Fails with [`CoreError::Identity`] when the principal is empty or the
    /// role is not one of [`VALID_ROLES`].
    pub fn resolve(principal: &str, role: &str) -> Result<Self, CoreError> {
        if principal.trim().is_empty() {
            return Err(CoreError::Identity(
                "Principal identifier must not be empty".to_string(),
            ));
        }
        Ok(Self::new(principal, Role::parse(role)?))
    }
}
