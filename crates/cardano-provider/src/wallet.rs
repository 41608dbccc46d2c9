//! External wallet abstraction
//!
//! The wallet supplies the change address, key material identity, spendable
//! UTXOs, collateral, and the signing/submission operations. Actual key
//! handling and witness construction stay outside this repository; the
//! [`WatchOnlyWallet`] here is a provider-backed implementation that can do
//! everything except sign.

use forge_core::{constants, Address, Error, KeyHash, TxError, TxId};

use cardano_tx::{payment_key_hash, Utxo};

use crate::ChainProvider;

/// Minimum value of a collateral UTXO (5 ADA)
const MIN_COLLATERAL_LOVELACE: i64 = 5 * constants::LOVELACE_PER_ADA;

/// Wallet capabilities required to drive an operation end to end
#[allow(async_fn_in_trait)]
pub trait Wallet {
    /// Address receiving change and, by default, minted user tokens
    fn change_address(&self) -> Address;

    /// Payment key hash of the change address
    fn payment_key_hash(&self) -> Result<KeyHash, Error> {
        let address = self.change_address();
        payment_key_hash(address.as_str())
            .map(KeyHash::new)
            .map_err(|_| {
                Error::Transaction(TxError::InvalidAddress {
                    address: address.to_string(),
                })
            })
    }

    /// Spendable UTXOs offered for funding selection
    async fn utxos(&self) -> Result<Vec<Utxo>, Error>;

    /// A pure-lovelace UTXO pledged as collateral
    async fn collateral(&self) -> Result<Utxo, Error>;

    /// Sign a serialized unsigned transaction
    async fn sign_tx(&self, unsigned_tx: &str) -> Result<String, Error>;

    /// Submit a signed transaction
    async fn submit_tx(&self, signed_tx: &str) -> Result<TxId, Error>;
}

/// Everything the transaction builders need from the wallet, gathered once
/// per operation
#[derive(Debug, Clone)]
pub struct WalletContext {
    pub utxos: Vec<Utxo>,
    pub address: Address,
    pub key_hash: KeyHash,
    pub collateral: Utxo,
}

impl WalletContext {
    pub async fn for_tx<W: Wallet>(wallet: &W) -> Result<Self, Error> {
        Ok(Self {
            utxos: wallet.utxos().await?,
            address: wallet.change_address(),
            key_hash: wallet.payment_key_hash()?,
            collateral: wallet.collateral().await?,
        })
    }
}

/// Provider-backed wallet without key material. Fetching goes through the
/// chain provider; `sign_tx` always fails.
#[derive(Debug, Clone)]
pub struct WatchOnlyWallet<P> {
    provider: P,
    address: Address,
}

impl<P: ChainProvider> WatchOnlyWallet<P> {
    pub fn new(provider: P, address: Address) -> Self {
        Self { provider, address }
    }
}

impl<P: ChainProvider> Wallet for WatchOnlyWallet<P> {
    fn change_address(&self) -> Address {
        self.address.clone()
    }

    async fn utxos(&self) -> Result<Vec<Utxo>, Error> {
        Ok(self.provider.address_utxos(&self.address, None).await?)
    }

    async fn collateral(&self) -> Result<Utxo, Error> {
        let utxos = self.utxos().await?;
        select_collateral(&utxos).ok_or_else(|| {
            Error::Transaction(TxError::BuildFailed {
                message: "no collateral-eligible UTXO in wallet".to_string(),
            })
        })
    }

    async fn sign_tx(&self, _unsigned_tx: &str) -> Result<String, Error> {
        Err(Error::Config(
            "watch-only wallet cannot sign transactions".to_string(),
        ))
    }

    async fn submit_tx(&self, signed_tx: &str) -> Result<TxId, Error> {
        Ok(self.provider.submit_tx(signed_tx).await?)
    }
}

/// Pick the smallest pure-lovelace UTXO holding at least the collateral
/// minimum
fn select_collateral(utxos: &[Utxo]) -> Option<Utxo> {
    utxos
        .iter()
        .filter(|u| {
            u.output.amount.len() == 1
                && u.output.amount[0].unit == constants::LOVELACE_UNIT
                && u.quantity_of(constants::LOVELACE_UNIT) >= MIN_COLLATERAL_LOVELACE
        })
        .min_by_key(|u| u.quantity_of(constants::LOVELACE_UNIT))
        .cloned()
}
