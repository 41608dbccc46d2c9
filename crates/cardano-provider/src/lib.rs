//! cardano-provider: chain-indexing provider client for cip68-forge
//!
//! Exposes the [`ChainProvider`] trait consumed by the protocol crates and a
//! Blockfrost HTTP implementation. Fetching, submission, and confirmation
//! watching all go through the hosted provider; nothing here talks to a
//! local node.

pub mod models;
pub mod wallet;

use std::time::Duration;

use forge_core::{Address, ProviderConfig, ProviderError, TxId};

use cardano_tx::{PlutusData, Utxo};

use crate::models::{BlockfrostDatum, BlockfrostUtxo};

pub use wallet::{Wallet, WalletContext, WatchOnlyWallet};

/// Timeout applied to every provider request. Long enough for the hosted
/// API's slow tail, short enough to avoid perpetual spinners.
const PROVIDER_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Cadence for confirmation polling (roughly one slot-leader block)
const CONFIRM_POLL_INTERVAL: Duration = Duration::from_secs(20);

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Chain-indexing provider capabilities required by the protocol crates
#[allow(async_fn_in_trait)]
pub trait ChainProvider {
    /// Unspent outputs at an address, optionally filtered to those holding
    /// the given asset unit
    async fn address_utxos(&self, address: &Address, asset: Option<&str>) -> Result<Vec<Utxo>>;

    /// Submit a signed transaction (CBOR hex), returning its hash
    async fn submit_tx(&self, signed_tx: &str) -> Result<TxId>;

    /// Resolve once the transaction is observed on chain. No retry or
    /// timeout beyond the per-request HTTP timeout; a dropped connection
    /// fails the operation.
    async fn await_tx_confirmed(&self, tx_id: &TxId) -> Result<()>;
}

/// Blockfrost HTTP provider
#[derive(Debug, Clone)]
pub struct BlockfrostProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl BlockfrostProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("cip68-forge")
            .timeout(PROVIDER_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::ParseError(format!("HTTP client init: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// GET a JSON resource; `Ok(None)` on 404
    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .header("project_id", &self.config.project_id)
            .send()
            .await
            .map_err(|_| ProviderError::Unreachable { url: url.clone() })?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError { status, message });
        }

        let value = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        Ok(Some(value))
    }

    /// Resolve a datum hash to its detailed-schema JSON value
    async fn resolve_datum(&self, data_hash: &str) -> Result<Option<PlutusData>> {
        let datum: Option<BlockfrostDatum> =
            self.get_json(&format!("/scripts/datum/{data_hash}")).await?;

        match datum {
            Some(d) => serde_json::from_value(d.json_value)
                .map(Some)
                .map_err(|e| ProviderError::ParseError(format!("datum {data_hash}: {e}"))),
            None => Ok(None),
        }
    }
}

impl ChainProvider for BlockfrostProvider {
    async fn address_utxos(&self, address: &Address, asset: Option<&str>) -> Result<Vec<Utxo>> {
        let path = match asset {
            Some(unit) => format!("/addresses/{address}/utxos/{unit}"),
            None => format!("/addresses/{address}/utxos"),
        };

        // 404 means the address has never been used
        let raw: Vec<BlockfrostUtxo> = self.get_json(&path).await?.unwrap_or_default();

        tracing::debug!(address = %address, asset = ?asset, count = raw.len(), "Fetched UTXOs");

        let mut utxos = Vec::with_capacity(raw.len());
        for entry in raw {
            let plutus_data = match entry.data_hash.as_deref() {
                Some(hash) => self.resolve_datum(hash).await?,
                None => None,
            };
            utxos.push(entry.into_utxo(plutus_data));
        }
        Ok(utxos)
    }

    async fn submit_tx(&self, signed_tx: &str) -> Result<TxId> {
        let body = hex::decode(signed_tx)
            .map_err(|e| ProviderError::ParseError(format!("signed tx is not CBOR hex: {e}")))?;

        let url = self.url("/tx/submit");
        let response = self
            .client
            .post(&url)
            .header("project_id", &self.config.project_id)
            .header("Content-Type", "application/cbor")
            .body(body)
            .send()
            .await
            .map_err(|_| ProviderError::Unreachable { url: url.clone() })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError { status, message });
        }

        let tx_hash: String = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        tracing::info!(tx_hash = %tx_hash, "Submitted transaction");
        Ok(TxId::new(tx_hash))
    }

    async fn await_tx_confirmed(&self, tx_id: &TxId) -> Result<()> {
        loop {
            let found: Option<serde_json::Value> =
                self.get_json(&format!("/txs/{tx_id}")).await?;

            if found.is_some() {
                tracing::info!(tx_id = %tx_id, "Transaction confirmed");
                return Ok(());
            }

            tracing::debug!(tx_id = %tx_id, "Transaction not yet on chain");
            tokio::time::sleep(CONFIRM_POLL_INTERVAL).await;
        }
    }
}
