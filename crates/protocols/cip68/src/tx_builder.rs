//! CIP-68 transaction blueprint builders
//!
//! Three operations: mint (create or extend an asset), burn (retire user
//! tokens, and the reference token when the full balance goes), and update
//! (replace the reference datum). All are pure: chain state arrives
//! pre-fetched in the request structs, and the result is an unsigned
//! [`TxPlan`] for the external signer.

use std::collections::BTreeMap;

use cardano_provider::WalletContext;
use cardano_tx::{asset_name_hex, cip68_100, cip68_222, unit, Asset, TxBuilder, TxPlan, Utxo};
use forge_core::{constants, Address, Error, ForgeConfig, ProtocolError};

use crate::constants::REFERENCE_TOKEN_QUANTITY;
use crate::state::ensure_author;
use crate::{burn_redeemer, mint_redeemer, update_redeemer};

/// Mint request: create a new asset pair, or extend the user-token supply of
/// an existing one
#[derive(Debug, Clone)]
pub struct MintRequest {
    pub asset_name: String,
    pub metadata: BTreeMap<String, String>,
    /// User tokens to mint (positive)
    pub quantity: i64,
    /// Recipient of the user tokens; the wallet's own address when `None`
    pub receiver: Option<Address>,
    pub wallet: WalletContext,
    /// Existing reference-token UTXO, when the asset was minted before
    pub reference_utxo: Option<Utxo>,
}

/// Burn request; `quantity` is negative
#[derive(Debug, Clone)]
pub struct BurnRequest {
    pub asset_name: String,
    pub quantity: i64,
    pub wallet: WalletContext,
    pub reference_utxo: Utxo,
    /// Caller's total user-token balance, pre-summed across their UTXOs
    pub held_quantity: i64,
}

/// Update request: replace the reference datum with new metadata
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    pub asset_name: String,
    pub metadata: BTreeMap<String, String>,
    pub wallet: WalletContext,
    pub reference_utxo: Utxo,
}

/// Build the mint blueprint.
///
/// With an existing reference token the caller must be the recorded author
/// and only user tokens are minted; otherwise both tokens of the pair are
/// minted in one transaction and the metadata datum goes inline on the
/// reference output.
pub fn build_mint_tx(config: &ForgeConfig, req: &MintRequest) -> Result<TxPlan, Error> {
    if req.quantity <= 0 {
        return Err(ProtocolError::InvalidAmount {
            message: format!("mint quantity must be positive, got {}", req.quantity),
        }
        .into());
    }

    let name_hex = asset_name_hex(&req.asset_name);
    let user_name = cip68_222(&name_hex);
    let ref_name = cip68_100(&name_hex);
    let user_unit = unit(&config.policy_id, &user_name);
    let ref_unit = unit(&config.policy_id, &ref_name);
    let receiver = req.receiver.as_ref().unwrap_or(&req.wallet.address);

    let builder = match &req.reference_utxo {
        Some(reference) => {
            ensure_author(reference_datum(reference)?, &req.asset_name, &req.wallet.key_hash)?;

            TxBuilder::new()
                .mint_plutus_script_v3()
                .mint(req.quantity, &config.policy_id, &user_name)
                .minting_script(&config.mint_script)
                .mint_redeemer_value(mint_redeemer())
                .tx_out(receiver, vec![Asset::new(user_unit.as_str(), req.quantity)])
        }
        None => {
            let datum = crate::ReferenceDatum::new(req.metadata.clone());

            TxBuilder::new()
                .mint_plutus_script_v3()
                .mint(req.quantity, &config.policy_id, &user_name)
                .minting_script(&config.mint_script)
                .mint_redeemer_value(mint_redeemer())
                .tx_out(receiver, vec![Asset::new(user_unit.as_str(), req.quantity)])
                .mint_plutus_script_v3()
                .mint(REFERENCE_TOKEN_QUANTITY, &config.policy_id, &ref_name)
                .minting_script(&config.mint_script)
                .mint_redeemer_value(mint_redeemer())
                .tx_out(
                    &config.store_address,
                    vec![Asset::new(ref_unit.as_str(), REFERENCE_TOKEN_QUANTITY)],
                )
                .tx_out_inline_datum_value(datum.to_plutus_data())
        }
    };

    finish_tx(builder, config, &req.wallet)
}

/// Build the burn blueprint.
///
/// Burning the full held balance also burns the paired reference token and
/// spends its UTXO under the validator; a partial burn only reduces the user
/// token and returns the remainder to the caller. The reference datum's
/// recorded metadata is left untouched on the partial path.
pub fn build_burn_tx(config: &ForgeConfig, req: &BurnRequest) -> Result<TxPlan, Error> {
    ensure_author(
        reference_datum(&req.reference_utxo)?,
        &req.asset_name,
        &req.wallet.key_hash,
    )?;

    if req.quantity >= 0 {
        return Err(ProtocolError::InvalidAmount {
            message: format!("burn quantity must be negative, got {}", req.quantity),
        }
        .into());
    }

    let name_hex = asset_name_hex(&req.asset_name);
    let user_name = cip68_222(&name_hex);
    let ref_name = cip68_100(&name_hex);
    let user_unit = unit(&config.policy_id, &user_name);

    if -req.quantity > req.held_quantity {
        return Err(ProtocolError::InsufficientTokens {
            unit: user_unit,
            required: -req.quantity,
            available: req.held_quantity,
        }
        .into());
    }

    let builder = if -req.quantity == req.held_quantity {
        TxBuilder::new()
            .mint_plutus_script_v3()
            .mint(req.quantity, &config.policy_id, &user_name)
            .mint_redeemer_value(burn_redeemer())
            .minting_script(&config.mint_script)
            .mint_plutus_script_v3()
            .mint(-REFERENCE_TOKEN_QUANTITY, &config.policy_id, &ref_name)
            .mint_redeemer_value(burn_redeemer())
            .minting_script(&config.mint_script)
            .spending_plutus_script_v3()
            .tx_in(
                &req.reference_utxo.input.tx_hash,
                req.reference_utxo.input.output_index,
            )
            .tx_in_inline_datum_present()
            .tx_in_redeemer_value(burn_redeemer())
            .tx_in_script(&config.spend_script)
    } else {
        TxBuilder::new()
            .mint_plutus_script_v3()
            .mint(req.quantity, &config.policy_id, &user_name)
            .mint_redeemer_value(burn_redeemer())
            .minting_script(&config.mint_script)
            .tx_out(
                &req.wallet.address,
                vec![Asset::new(user_unit.as_str(), req.held_quantity + req.quantity)],
            )
    };

    finish_tx(builder, config, &req.wallet)
}

/// Build the update blueprint: spend the reference UTXO under the validator
/// and re-emit it with the new metadata datum.
pub fn build_update_tx(config: &ForgeConfig, req: &UpdateRequest) -> Result<TxPlan, Error> {
    ensure_author(
        reference_datum(&req.reference_utxo)?,
        &req.asset_name,
        &req.wallet.key_hash,
    )?;

    let name_hex = asset_name_hex(&req.asset_name);
    let ref_unit = unit(&config.policy_id, &cip68_100(&name_hex));
    let datum = crate::ReferenceDatum::new(req.metadata.clone());

    let builder = TxBuilder::new()
        .spending_plutus_script_v3()
        .tx_in(
            &req.reference_utxo.input.tx_hash,
            req.reference_utxo.input.output_index,
        )
        .tx_in_inline_datum_present()
        .tx_in_redeemer_value(update_redeemer())
        .tx_in_script(&config.spend_script)
        .tx_out(
            &config.store_address,
            vec![Asset::new(ref_unit.as_str(), REFERENCE_TOKEN_QUANTITY)],
        )
        .tx_out_inline_datum_value(datum.to_plutus_data());

    finish_tx(builder, config, &req.wallet)
}

/// The shared operation tail: platform fee, funding selection, change,
/// signer, collateral, network, then validation.
fn finish_tx(
    builder: TxBuilder,
    config: &ForgeConfig,
    wallet: &WalletContext,
) -> Result<TxPlan, Error> {
    let plan = builder
        .tx_out(
            &config.platform_address,
            vec![Asset::new(constants::LOVELACE_UNIT, config.platform_fee)],
        )
        .select_utxos_from(&wallet.utxos)
        .change_address(&wallet.address)
        .required_signer_hash(wallet.key_hash.as_str())
        .tx_in_collateral(
            &wallet.collateral.input.tx_hash,
            wallet.collateral.input.output_index,
        )
        .set_network(config.network)
        .complete()?;
    Ok(plan)
}

fn reference_datum(reference: &Utxo) -> Result<&cardano_tx::PlutusData, Error> {
    reference.output.plutus_data.as_ref().ok_or_else(|| {
        ProtocolError::DatumParse {
            message: "reference UTXO carries no inline datum".to_string(),
        }
        .into()
    })
}
