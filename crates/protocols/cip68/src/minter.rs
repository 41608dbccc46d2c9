//! High-level CIP-68 operation orchestration
//!
//! [`Cip68Minter`] ties the provider, the wallet, and the pure blueprint
//! builders together: fetch chain state, apply the authorship guard, build,
//! and serialize. Each operation is a single ordered flow; nothing retries.

use std::collections::BTreeMap;

use cardano_provider::{ChainProvider, Wallet, WalletContext};
use cardano_tx::{asset_name_hex, cip68_100, cip68_222, unit, TxPlan};
use forge_core::{Address, Error, ForgeConfig, ProtocolError, TxId};

use crate::fetch;
use crate::tx_builder::{
    build_burn_tx, build_mint_tx, build_update_tx, BurnRequest, MintRequest, UpdateRequest,
};

/// Parameters of a mint operation
#[derive(Debug, Clone)]
pub struct MintAsset {
    pub asset_name: String,
    pub metadata: BTreeMap<String, String>,
    pub quantity: i64,
    pub receiver: Option<Address>,
}

/// CIP-68 operation driver over a provider and a wallet
#[derive(Debug, Clone)]
pub struct Cip68Minter<P, W> {
    config: ForgeConfig,
    provider: P,
    wallet: W,
}

impl<P: ChainProvider, W: Wallet> Cip68Minter<P, W> {
    pub fn new(config: ForgeConfig, provider: P, wallet: W) -> Self {
        Self {
            config,
            provider,
            wallet,
        }
    }

    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mint user tokens, creating the reference token on first mint.
    /// Returns the serialized unsigned transaction.
    pub async fn mint(&self, asset: MintAsset) -> Result<String, Error> {
        let wallet = WalletContext::for_tx(&self.wallet).await?;
        let ref_unit = self.ref_unit(&asset.asset_name);
        let reference =
            fetch::reference_utxo(&self.provider, &self.config.store_address, &ref_unit).await?;

        tracing::info!(
            asset = %asset.asset_name,
            quantity = asset.quantity,
            fresh = reference.is_none(),
            "Building mint transaction"
        );

        let plan = build_mint_tx(
            &self.config,
            &MintRequest {
                asset_name: asset.asset_name,
                metadata: asset.metadata,
                quantity: asset.quantity,
                receiver: asset.receiver,
                wallet,
                reference_utxo: reference,
            },
        )?;

        serialize(&plan)
    }

    /// Burn user tokens; a full burn retires the reference token too.
    /// Returns the serialized unsigned transaction.
    pub async fn burn(&self, asset_name: &str, quantity: i64) -> Result<String, Error> {
        let wallet = WalletContext::for_tx(&self.wallet).await?;
        let ref_unit = self.ref_unit(asset_name);
        let reference =
            fetch::reference_utxo(&self.provider, &self.config.store_address, &ref_unit)
                .await?
                .ok_or_else(|| ProtocolError::ReferenceNotFound {
                    asset: asset_name.to_string(),
                })?;

        let user_unit = self.user_unit(asset_name);
        let held = fetch::held_quantity(&self.provider, &wallet.address, &user_unit).await?;

        tracing::info!(
            asset = %asset_name,
            quantity,
            held,
            "Building burn transaction"
        );

        let plan = build_burn_tx(
            &self.config,
            &BurnRequest {
                asset_name: asset_name.to_string(),
                quantity,
                wallet,
                reference_utxo: reference,
                held_quantity: held,
            },
        )?;

        serialize(&plan)
    }

    /// Replace the reference datum with new metadata.
    /// Returns the serialized unsigned transaction.
    pub async fn update(
        &self,
        asset_name: &str,
        metadata: BTreeMap<String, String>,
    ) -> Result<String, Error> {
        let wallet = WalletContext::for_tx(&self.wallet).await?;
        let ref_unit = self.ref_unit(asset_name);
        let reference =
            fetch::reference_utxo(&self.provider, &self.config.store_address, &ref_unit)
                .await?
                .ok_or_else(|| ProtocolError::ReferenceNotFound {
                    asset: asset_name.to_string(),
                })?;

        tracing::info!(asset = %asset_name, "Building update transaction");

        let plan = build_update_tx(
            &self.config,
            &UpdateRequest {
                asset_name: asset_name.to_string(),
                metadata,
                wallet,
                reference_utxo: reference,
            },
        )?;

        serialize(&plan)
    }

    /// Sign, submit, and wait for on-chain confirmation.
    ///
    /// Strictly ordered; any step failing fails the operation.
    pub async fn submit_and_confirm(&self, unsigned_tx: &str) -> Result<TxId, Error> {
        let signed = self.wallet.sign_tx(unsigned_tx).await?;
        let tx_id = self.wallet.submit_tx(&signed).await?;
        self.provider.await_tx_confirmed(&tx_id).await?;
        Ok(tx_id)
    }

    fn ref_unit(&self, asset_name: &str) -> String {
        unit(&self.config.policy_id, &cip68_100(&asset_name_hex(asset_name)))
    }

    fn user_unit(&self, asset_name: &str) -> String {
        unit(&self.config.policy_id, &cip68_222(&asset_name_hex(asset_name)))
    }
}

fn serialize(plan: &TxPlan) -> Result<String, Error> {
    plan.to_json().map_err(|e| Error::Serialization(e.to_string()))
}
