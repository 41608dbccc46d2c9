//! CIP-68 dynamic asset (NFT/token) operations
//!
//! Each asset name lives under one minting policy as a pair: a reference
//! token (label 100) held at a custody address with the metadata datum
//! inline, and a user token (label 222) circulating freely. Mint, burn, and
//! update assemble unsigned transaction blueprints; signing, balancing, and
//! submission are the wallet's and provider's business.

pub mod constants;
pub mod fetch;
pub mod minter;
pub mod state;
pub mod tx_builder;

pub use constants::{burn_redeemer, mint_redeemer, update_redeemer};
pub use fetch::{asset_utxos, held_quantity, reference_utxo};
pub use minter::{Cip68Minter, MintAsset};
pub use state::{ensure_author, ReferenceDatum};
pub use tx_builder::{build_burn_tx, build_mint_tx, build_update_tx, BurnRequest, MintRequest, UpdateRequest};
