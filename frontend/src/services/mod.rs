//! Wallet and blockchain services.
//!
//! # Services
//!
//! - [`wallet`] - EIP-1193 wallet integration (MetaMask, Coinbase Wallet, etc.)
//! - [`clock`] - Timers for receipt polling
//! - [`confirmation`] - Timeout-bounded wait for a transaction receipt
//! - [`submitter`] - The approve-then-register submission flow
//! - [`host`] - Mini-app host readiness
//!
//! # JavaScript Bindings
//!
//! Browser access goes through JavaScript bindings located in `src/js/`:
//! - `wallet.js` - `window.ethereum` requests
//! - `host.js` - optional `frameSdk` readiness hook

pub mod clock;
pub mod confirmation;
pub mod host;
pub mod submitter;
pub mod wallet;

#[cfg(test)]
pub(crate) mod testing;

pub use clock::*;
pub use confirmation::*;
pub use host::*;
pub use submitter::*;
pub use wallet::*;
