//! Core types, errors, and configuration shared across cip68-forge crates

pub mod config;
pub mod errors;
pub mod types;

pub use config::{ForgeConfig, ProviderConfig, WalletConfig};
pub use errors::{Error, ProtocolError, ProviderError, Result, TxError};
pub use types::*;
