//! CIP-68 protocol constants and redeemer shapes

use cardano_tx::PlutusData;

/// Metadata standard version recorded in the reference datum
pub const CIP68_VERSION: i64 = 1;

/// Reference tokens are unique per asset name
pub const REFERENCE_TOKEN_QUANTITY: i64 = 1;

/// Metadata key recording the author's payment key hash
pub const METADATA_AUTHOR_KEY: &str = "author";

/// Redeemer authorizing mints and reference-datum updates (`Constr 0 []`)
pub fn mint_redeemer() -> PlutusData {
    PlutusData::constr(0, vec![])
}

/// Redeemer authorizing burns (`Constr 1 []`), for both the minting policy
/// and the reference-token spend
pub fn burn_redeemer() -> PlutusData {
    PlutusData::constr(1, vec![])
}

/// Redeemer for spending the reference token on update (`Constr 0 []`)
pub fn update_redeemer() -> PlutusData {
    PlutusData::constr(0, vec![])
}
