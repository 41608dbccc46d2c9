//! Unsigned transaction blueprint structures
//!
//! A [`TxPlan`] is the JSON handed to the external wallet/SDK for balancing
//! and signing. It carries the declared mints, outputs, and script spends
//! verbatim; UTXO selection and fee calculation stay on the signer side.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use forge_core::{Address, Network};

use crate::plutus::PlutusData;

/// A quantity of one asset; `unit` is either a policy+name concatenation or
/// the literal `lovelace`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub unit: String,
    pub quantity: String,
}

impl Asset {
    pub fn new(unit: impl Into<String>, quantity: i64) -> Self {
        Self {
            unit: unit.into(),
            quantity: quantity.to_string(),
        }
    }

    pub fn quantity_i64(&self) -> i64 {
        self.quantity.parse().unwrap_or(0)
    }
}

/// Reference to a transaction output (outpoint)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxInRef {
    pub tx_hash: String,
    pub output_index: u32,
}

impl TxInRef {
    pub fn new(tx_hash: impl Into<String>, output_index: u32) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            output_index,
        }
    }
}

/// The output side of a queried UTXO
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtxoOutput {
    pub address: Address,
    pub amount: Vec<Asset>,
    /// Inline datum, resolved to detailed-schema JSON by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plutus_data: Option<PlutusData>,
}

/// A queried UTXO; never constructed by this crate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Utxo {
    pub input: TxInRef,
    pub output: UtxoOutput,
}

impl Utxo {
    /// Quantity of one asset held in this UTXO
    pub fn quantity_of(&self, unit: &str) -> i64 {
        self.output
            .amount
            .iter()
            .filter(|a| a.unit == unit)
            .map(Asset::quantity_i64)
            .sum()
    }
}

/// Plutus script language version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlutusVersion {
    V1,
    V2,
    V3,
}

/// One mint (or burn, for negative quantities) declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintItem {
    pub policy_id: String,
    /// Labeled asset name, hex
    pub asset_name: String,
    pub quantity: String,
    pub script_version: PlutusVersion,
    /// Compiled minting script, CBOR hex
    pub script: String,
    pub redeemer: PlutusData,
}

impl MintItem {
    pub fn quantity_i64(&self) -> i64 {
        self.quantity.parse().unwrap_or(0)
    }
}

/// A UTXO spent under a validator script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptInput {
    pub tx_hash: String,
    pub output_index: u32,
    pub script_version: PlutusVersion,
    /// Compiled spending script, CBOR hex
    pub script: String,
    pub redeemer: PlutusData,
    /// The spent output carries its datum inline
    pub inline_datum_present: bool,
}

/// A declared transaction output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOutput {
    pub address: Address,
    pub amount: Vec<Asset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_datum: Option<PlutusData>,
}

impl TxOutput {
    /// Quantity of one asset declared on this output
    pub fn quantity_of(&self, unit: &str) -> i64 {
        self.amount
            .iter()
            .filter(|a| a.unit == unit)
            .map(Asset::quantity_i64)
            .sum()
    }
}

/// Complete unsigned transaction blueprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxPlan {
    pub network: Network,
    /// Wallet UTXOs the signer may select funding inputs from
    pub inputs: Vec<Utxo>,
    pub mints: Vec<MintItem>,
    pub script_inputs: Vec<ScriptInput>,
    pub outputs: Vec<TxOutput>,
    pub change_address: Address,
    /// Payment key hashes that must witness the transaction
    pub required_signers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collateral: Option<TxInRef>,
}

impl TxPlan {
    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty JSON string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Net minted quantity per unit across all mint declarations
    pub fn minted_units(&self) -> BTreeMap<String, i64> {
        let mut totals = BTreeMap::new();
        for mint in &self.mints {
            let unit = format!("{}{}", mint.policy_id, mint.asset_name);
            *totals.entry(unit).or_insert(0) += mint.quantity_i64();
        }
        totals
    }

    /// Whether an outpoint is spent under a script by this plan
    pub fn spends(&self, outpoint: &TxInRef) -> bool {
        self.script_inputs
            .iter()
            .any(|s| s.tx_hash == outpoint.tx_hash && s.output_index == outpoint.output_index)
    }
}
