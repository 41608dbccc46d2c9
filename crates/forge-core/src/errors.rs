//! Error types for cip68-forge

use thiserror::Error;

/// Top-level errors
#[derive(Debug, Error)]
pub enum Error {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TxError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Chain-indexing provider errors
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider unreachable at {url}")]
    Unreachable { url: String },

    #[error("Provider returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Not found: {resource}")]
    NotFound { resource: String },
}

/// Protocol-level errors (CIP-68 invariants)
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("No reference token found for asset {asset}")]
    ReferenceNotFound { asset: String },

    #[error("Wallet {key_hash} is not the recorded author of asset {asset}")]
    NotAssetAuthor { asset: String, key_hash: String },

    #[error("Insufficient tokens ({unit}): need {required}, have {available}")]
    InsufficientTokens {
        unit: String,
        required: i64,
        available: i64,
    },

    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("Failed to parse reference datum: {message}")]
    DatumParse { message: String },
}

/// Transaction building errors
#[derive(Debug, Error)]
pub enum TxError {
    #[error("Invalid address: {address}")]
    InvalidAddress { address: String },

    #[error("No UTXOs provided")]
    NoUtxos,

    #[error("Failed to build transaction: {message}")]
    BuildFailed { message: String },

    #[error("Failed to serialize transaction: {message}")]
    SerializationFailed { message: String },

    #[error("Transaction submission failed: {message}")]
    SubmissionFailed { message: String },
}

/// Result type alias for cip68-forge operations
pub type Result<T> = std::result::Result<T, Error>;
