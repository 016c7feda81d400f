//! Closed command surface.
//!
//! An invocation names a function and passes a flat list of string
//! arguments. [`Command::parse`] maps that pair onto a typed command,
//! checking arity and decoding role names up front so the engine only ever
//! sees well-shaped requests.

use crate::asset::AssetField;
use crate::engine::{OP_CREATE, OP_SCRAP};
use crate::error::CoreError;
use crate::query::OP_GET;
use crate::roles::Caller;
use crate::transfer::TransferEdge;

pub const OP_LIST: &str = "get_diamonds";
pub const OP_CHECK_UNIQUE: &str = "check_unique_assetID";
pub const OP_PING: &str = "ping";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create {
        asset_id: String,
    },
    Transfer {
        edge: &'static TransferEdge,
        asset_id: String,
        recipient: Caller,
    },
    UpdateAttribute {
        field: AssetField,
        asset_id: String,
        value: String,
    },
    Scrap {
        asset_id: String,
    },
    GetAsset {
        asset_id: String,
    },
    ListAssets,
    CheckUnique {
        asset_id: String,
    },
    Ping,
}

impl Command {
    /// Build a command from a function name and its arguments.
    ///
    /// | Function                 | Arguments                               |
    /// |--------------------------|-----------------------------------------|
    /// | `create_diamond`         | `[asset_id]`                            |
    /// | transfers                | `[recipient, asset_id, recipient_role]` |
    /// | `update_*`               | `[new_value, asset_id]`                 |
    /// | `scrap_diamond`          | `[asset_id]`                            |
    /// | `get_diamond_details`    | `[asset_id]`                            |
    /// | `check_unique_assetID`   | `[asset_id]`                            |
    /// | `get_diamonds`, `ping`   | `[]`                                    |
    pub fn parse(function: &str, args: &[String]) -> Result<Self, CoreError> {
        if let Some(edge) = TransferEdge::by_operation(function) {
            let [recipient, asset_id, recipient_role] = expect_args::<3>(function, args)?;
            return Ok(Self::Transfer {
                edge,
                asset_id: asset_id.clone(),
                recipient: Caller::resolve(recipient, recipient_role).map_err(|e| match e {
                    // Recipient problems are argument errors.
                    CoreError::Identity(msg) => {
                        CoreError::Validation(format!("Invalid recipient for {function}: {msg}"))
                    }
                    other => other,
                })?,
            });
        }

        if let Some(field) = AssetField::from_operation(function) {
            let [value, asset_id] = expect_args::<2>(function, args)?;
            return Ok(Self::UpdateAttribute {
                field,
                asset_id: asset_id.clone(),
                value: value.clone(),
            });
        }

        let command = match function {
            OP_CREATE => {
                let [asset_id] = expect_args::<1>(function, args)?;
                Self::Create {
                    asset_id: asset_id.clone(),
                }
            }
            OP_SCRAP => {
                let [asset_id] = expect_args::<1>(function, args)?;
                Self::Scrap {
                    asset_id: asset_id.clone(),
                }
            }
            OP_GET => {
                let [asset_id] = expect_args::<1>(function, args)?;
                Self::GetAsset {
                    asset_id: asset_id.clone(),
                }
            }
            OP_CHECK_UNIQUE => {
                let [asset_id] = expect_args::<1>(function, args)?;
                Self::CheckUnique {
                    asset_id: asset_id.clone(),
                }
            }
            OP_LIST => {
                expect_args::<0>(function, args)?;
                Self::ListAssets
            }
            OP_PING => {
                expect_args::<0>(function, args)?;
                Self::Ping
            }
            other => {
                return Err(CoreError::Validation(format!(
                    "Unknown function: {other}"
                )))
            }
        };
        Ok(command)
    }

    /// Read-only commands, served through the query entry point.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Self::GetAsset { .. } | Self::ListAssets | Self::CheckUnique { .. } | Self::Ping
        )
    }

    /// Function name this command was parsed from.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Create { .. } => OP_CREATE,
            Self::Transfer { edge, .. } => edge.operation,
            Self::UpdateAttribute { field, .. } => field.operation(),
            Self::Scrap { .. } => OP_SCRAP,
            Self::GetAsset { .. } => OP_GET,
            Self::ListAssets => OP_LIST,
            Self::CheckUnique { .. } => OP_CHECK_UNIQUE,
            Self::Ping => OP_PING,
        }
    }
}

fn expect_args<'a, const N: usize>(
    function: &str,
    args: &'a [String],
) -> Result<&'a [String; N], CoreError> {
    args.try_into().map_err(|_| {
        CoreError::Validation(format!(
            "Incorrect number of arguments for {function}. Expecting {N}, got {}",
            args.len()
        ))
    })
}
