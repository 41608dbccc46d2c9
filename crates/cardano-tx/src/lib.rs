//! cardano-tx: Unsigned transaction blueprint building for Cardano
//!
//! Provides the [`TxPlan`] blueprint handed to an external signer/SDK for
//! balancing and signing, the fluent [`TxBuilder`] facade over it, Plutus
//! datum JSON (cardano detailed schema), and CIP-67 asset name labels.

pub mod address;
pub mod builder;
pub mod label;
pub mod plan;
pub mod plutus;

pub use address::{payment_key_hash, AddressError};
pub use builder::TxBuilder;
pub use label::{asset_name_hex, cip68_100, cip68_222, label_prefix, unit};
pub use plan::{
    Asset, MintItem, PlutusVersion, ScriptInput, TxInRef, TxOutput, TxPlan, Utxo, UtxoOutput,
};
pub use plutus::{MapEntry, PlutusData};
