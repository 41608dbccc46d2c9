//! Configuration types for cip68-forge
//!
//! All chain- and deployment-specific parameters are carried in an explicit
//! [`ForgeConfig`] handed to the builders at construction. Nothing reads the
//! environment implicitly; [`ForgeConfig::from_env`] is the one opt-in entry
//! point for env-driven setups.

use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::types::{constants, Address, Lovelace, Network};

/// Chain-indexing provider connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider base URL (e.g. "https://cardano-preview.blockfrost.io/api/v0")
    pub base_url: String,

    /// Project ID / API key for the hosted provider
    #[serde(default)]
    pub project_id: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cardano-preview.blockfrost.io/api/v0".to_string(),
            project_id: String::new(),
        }
    }
}

/// Wallet key material settings, consumed by the external signer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletConfig {
    /// BIP-39 mnemonic phrase
    pub mnemonic: String,

    /// Account derivation index
    #[serde(default)]
    pub account_index: u32,
}

/// Full application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgeConfig {
    /// Target network
    pub network: Network,

    /// Provider connection settings
    pub provider: ProviderConfig,

    /// Wallet settings
    pub wallet: WalletConfig,

    /// Minting policy ID (hash of the minting script)
    pub policy_id: String,

    /// Compiled minting script (Plutus V3 CBOR hex)
    pub mint_script: String,

    /// Compiled spending/validator script (Plutus V3 CBOR hex)
    pub spend_script: String,

    /// Custody address holding reference tokens
    pub store_address: Address,

    /// Platform fee recipient
    pub platform_address: Address,

    /// Platform fee charged on every operation (lovelace)
    #[serde(default = "default_platform_fee")]
    pub platform_fee: Lovelace,
}

fn default_platform_fee() -> Lovelace {
    constants::DEFAULT_PLATFORM_FEE
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            network: Network::Preview,
            provider: ProviderConfig::default(),
            wallet: WalletConfig::default(),
            policy_id: String::new(),
            mint_script: String::new(),
            spend_script: String::new(),
            store_address: Address::new(""),
            platform_address: Address::new(""),
            platform_fee: default_platform_fee(),
        }
    }
}

impl ForgeConfig {
    /// Load configuration from environment variables.
    ///
    /// Required: CARDANO_NETWORK, BLOCKFROST_PROJECT_ID, MINT_POLICY_ID,
    /// MINT_SCRIPT_CBOR, SPEND_SCRIPT_CBOR, STORE_ADDRESS, PLATFORM_ADDRESS.
    /// Optional: WALLET_MNEMONIC, WALLET_ACCOUNT_INDEX, PLATFORM_FEE_LOVELACE,
    /// BLOCKFROST_BASE_URL (defaults to the hosted endpoint for the network).
    pub fn from_env() -> Result<Self, Error> {
        let network_str = require_env("CARDANO_NETWORK")?;
        let network = Network::from_str_opt(&network_str)
            .ok_or_else(|| Error::Config(format!("Unknown network: {network_str}")))?;

        let base_url = std::env::var("BLOCKFROST_BASE_URL")
            .unwrap_or_else(|_| default_base_url(network).to_string());

        let account_index = match std::env::var("WALLET_ACCOUNT_INDEX") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| Error::Config(format!("Invalid WALLET_ACCOUNT_INDEX: {raw}")))?,
            Err(_) => 0,
        };

        let platform_fee = match std::env::var("PLATFORM_FEE_LOVELACE") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| Error::Config(format!("Invalid PLATFORM_FEE_LOVELACE: {raw}")))?,
            Err(_) => default_platform_fee(),
        };

        Ok(Self {
            network,
            provider: ProviderConfig {
                base_url,
                project_id: require_env("BLOCKFROST_PROJECT_ID")?,
            },
            wallet: WalletConfig {
                mnemonic: std::env::var("WALLET_MNEMONIC").unwrap_or_default(),
                account_index,
            },
            policy_id: require_env("MINT_POLICY_ID")?,
            mint_script: require_env("MINT_SCRIPT_CBOR")?,
            spend_script: require_env("SPEND_SCRIPT_CBOR")?,
            store_address: Address::new(require_env("STORE_ADDRESS")?),
            platform_address: Address::new(require_env("PLATFORM_ADDRESS")?),
            platform_fee,
        })
    }
}

fn require_env(key: &str) -> Result<String, Error> {
    std::env::var(key).map_err(|_| Error::Config(format!("Missing environment variable: {key}")))
}

fn default_base_url(network: Network) -> &'static str {
    match network {
        Network::Mainnet => "https://cardano-mainnet.blockfrost.io/api/v0",
        Network::Preprod => "https://cardano-preprod.blockfrost.io/api/v0",
        Network::Preview => "https://cardano-preview.blockfrost.io/api/v0",
    }
}
