//! Reference token and balance discovery via the chain provider

use cardano_provider::ChainProvider;
use cardano_tx::Utxo;
use forge_core::{Address, Error};

/// Locate the reference-token UTXO for an asset unit at the custody address.
///
/// Returns the most recently produced match when several exist.
pub async fn reference_utxo<P: ChainProvider>(
    provider: &P,
    store_address: &Address,
    unit: &str,
) -> Result<Option<Utxo>, Error> {
    let mut utxos = provider.address_utxos(store_address, Some(unit)).await?;

    tracing::debug!(unit = %unit, found = utxos.len(), "Reference token lookup");

    Ok(utxos.pop())
}

/// All UTXOs at an address holding an asset unit
pub async fn asset_utxos<P: ChainProvider>(
    provider: &P,
    address: &Address,
    unit: &str,
) -> Result<Vec<Utxo>, Error> {
    Ok(provider.address_utxos(address, Some(unit)).await?)
}

/// Total quantity of an asset unit held across all UTXOs at an address
pub async fn held_quantity<P: ChainProvider>(
    provider: &P,
    address: &Address,
    unit: &str,
) -> Result<i64, Error> {
    let utxos = asset_utxos(provider, address, unit).await?;
    Ok(utxos.iter().map(|u| u.quantity_of(unit)).sum())
}
