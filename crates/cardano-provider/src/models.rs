//! Blockfrost wire types

use serde::Deserialize;

use cardano_tx::{Asset, PlutusData, TxInRef, Utxo, UtxoOutput};
use forge_core::Address;

/// One asset quantity in a UTXO response
#[derive(Debug, Clone, Deserialize)]
pub struct BlockfrostAmount {
    pub unit: String,
    pub quantity: String,
}

/// One entry of `/addresses/{address}/utxos[/{asset}]`
#[derive(Debug, Clone, Deserialize)]
pub struct BlockfrostUtxo {
    pub address: String,
    pub tx_hash: String,
    pub output_index: u32,
    pub amount: Vec<BlockfrostAmount>,
    #[serde(default)]
    pub data_hash: Option<String>,
    #[serde(default)]
    pub inline_datum: Option<String>,
    #[serde(default)]
    pub reference_script_hash: Option<String>,
}

impl BlockfrostUtxo {
    /// Convert into the domain UTXO, with the datum already resolved to
    /// detailed-schema JSON by the caller
    pub fn into_utxo(self, plutus_data: Option<PlutusData>) -> Utxo {
        Utxo {
            input: TxInRef::new(self.tx_hash, self.output_index),
            output: UtxoOutput {
                address: Address::new(self.address),
                amount: self
                    .amount
                    .into_iter()
                    .map(|a| Asset {
                        unit: a.unit,
                        quantity: a.quantity,
                    })
                    .collect(),
                plutus_data,
            },
        }
    }
}

/// Response of `/scripts/datum/{datum_hash}`
#[derive(Debug, Clone, Deserialize)]
pub struct BlockfrostDatum {
    pub json_value: serde_json::Value,
}
