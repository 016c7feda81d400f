//! Custody transfer edges.
//!
//! [`EDGES`] is the canonical supply-chain path. Each edge moves an asset one
//! status forward and hands it from a principal of one role to a principal of
//! the next; [`TransferEdge::apply`] is the single routine that interprets an
//! edge against an asset.

use crate::asset::{Asset, CORE_ATTRIBUTES};
use crate::error::{CoreError, Violation};
use crate::roles::{Caller, Role};
use crate::status::AssetStatus;
use crate::validation::{require_defined, require_not_scrapped};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferEdge {
    /// Operation name on the command surface.
    pub operation: &'static str,
    pub from_status: AssetStatus,
    pub from_role: Role,
    pub to_role: Role,
    pub to_status: AssetStatus,
    /// Whether the core attributes must be assigned before this edge.
    pub requires_defined: bool,
}

pub static EDGES: [TransferEdge; 8] = [
    TransferEdge {
        operation: "miner_to_distributor",
        from_status: AssetStatus::Mining,
        from_role: Role::Miner,
        to_role: Role::Distributor,
        to_status: AssetStatus::Distributing,
        requires_defined: false,
    },
    TransferEdge {
        operation: "distributor_to_dealership",
        from_status: AssetStatus::Distributing,
        from_role: Role::Distributor,
        to_role: Role::Dealership,
        to_status: AssetStatus::InterDealing,
        requires_defined: true,
    },
    TransferEdge {
        operation: "dealership_to_buyer",
        from_status: AssetStatus::InterDealing,
        from_role: Role::Dealership,
        to_role: Role::Buyer,
        to_status: AssetStatus::Buying,
        requires_defined: false,
    },
    TransferEdge {
        operation: "buyer_to_trader",
        from_status: AssetStatus::Buying,
        from_role: Role::Buyer,
        to_role: Role::Trader,
        to_status: AssetStatus::Trading,
        requires_defined: false,
    },
    TransferEdge {
        operation: "trader_to_cutter",
        from_status: AssetStatus::Trading,
        from_role: Role::Trader,
        to_role: Role::Cutter,
        to_status: AssetStatus::Cutting,
        requires_defined: false,
    },
    TransferEdge {
        operation: "cutter_to_jewellery_maker",
        from_status: AssetStatus::Cutting,
        from_role: Role::Cutter,
        to_role: Role::JewelleryMaker,
        to_status: AssetStatus::JewelMaking,
        requires_defined: false,
    },
    TransferEdge {
        operation: "jewellery_maker_to_customer",
        from_status: AssetStatus::JewelMaking,
        from_role: Role::JewelleryMaker,
        to_role: Role::Customer,
        to_status: AssetStatus::Purchasing,
        requires_defined: false,
    },
    TransferEdge {
        operation: "customer_to_scrap_merchant",
        from_status: AssetStatus::Purchasing,
        from_role: Role::Customer,
        to_role: Role::ScrapMerchant,
        to_status: AssetStatus::BeingScrapped,
        requires_defined: false,
    },
];

impl TransferEdge {
    /// Look up an edge by its operation name.
    pub fn by_operation(name: &str) -> Option<&'static TransferEdge> {
        EDGES.iter().find(|edge| edge.operation == name)
    }

    /// Compute the asset after handing it from `caller` to `recipient`.
    ///
    /// Checks run in order: scrapped flag, attribute completeness (for edges
    /// that require it), then every custody conjunct at once so a denial
    /// names all of them. The input asset is never modified.
    pub fn apply(
        &self,
        asset: &Asset,
        caller: &Caller,
        recipient: &Caller,
    ) -> Result<Asset, CoreError> {
        require_not_scrapped(asset, self.operation)?;

        if self.requires_defined {
            require_defined(asset, CORE_ATTRIBUTES)?;
        }

        let mut violations = Vec::new();
        if asset.status != self.from_status {
            violations.push(Violation::WrongStatus {
                expected: self.from_status,
                actual: asset.status,
            });
        }
        if asset.owner != caller.principal {
            violations.push(Violation::NotOwner);
        }
        if caller.role != self.from_role {
            violations.push(Violation::WrongCallerRole {
                expected: self.from_role,
                actual: caller.role,
            });
        }
        if recipient.role != self.to_role {
            violations.push(Violation::WrongRecipientRole {
                expected: self.to_role,
                actual: recipient.role,
            });
        }
        if !violations.is_empty() {
            return Err(CoreError::denied(self.operation, violations));
        }

        let mut next = asset.clone();
        next.owner = recipient.principal.clone();
        next.status = self.to_status;
        Ok(next)
    }
}
