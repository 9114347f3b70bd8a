//! Error types for the registration flow.
//!
//! - [`WalletError`] - Wallet provider failures (JS glue)
//! - [`SubmitError`] - Everything that can stop a submission
//! - [`ConfigError`] - Runtime configuration loading
//!
//! `WalletError` converts into `SubmitError` via `From`, so `?` works
//! across the wallet boundary.

use thiserror::Error;

use crate::types::TxHash;

// =============================================================================
// Wallet Errors
// =============================================================================

/// Errors reported by the wallet provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// No injected EIP-1193 provider.
    #[error("No Ethereum wallet found. Please install a browser wallet such as MetaMask or Coinbase Wallet.")]
    Unavailable,

    /// The provider rejected or failed the request. Message is the provider's own.
    #[error("{0}")]
    Provider(String),

    /// The provider answered with something we cannot interpret.
    #[error("Unexpected wallet response: {0}")]
    Malformed(String),
}

// =============================================================================
// Submission Errors
// =============================================================================

/// Errors that stop a submission and move it to the error state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// No account is connected.
    #[error("No wallet connected. Connect your wallet and try again.")]
    NoWallet,

    /// The physical address field was empty.
    #[error("Please enter your physical address.")]
    EmptyAddress,

    /// Wallet or provider failure, surfaced verbatim.
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// The transaction was mined but failed.
    #[error("Transaction {hash} was reverted")]
    Reverted { hash: TxHash },

    /// The transaction did not confirm in time.
    #[error("Transaction {hash} was not confirmed after {waited_ms} ms")]
    ConfirmationTimeout { hash: TxHash, waited_ms: u64 },

    /// Internal state machine misuse.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: &'static str, to: &'static str },
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading `config.json`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Network failure or non-2xx response.
    #[error("Failed to fetch config: {0}")]
    Fetch(String),

    /// Body is not valid JSON for the overrides.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Values parse but make no sense together.
    #[error("Invalid config: {0}")]
    Invalid(String),
}
