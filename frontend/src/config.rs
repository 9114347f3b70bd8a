//! Application configuration.
//!
//! The network constants live in [`SubmitterConfig`], which is injected into
//! the submitter instead of being read from globals. Defaults target USDC on
//! Base; a deployment can override any field with a `config.json` served next
//! to the app:
//!
//! ```json
//! { "chainId": 84532, "networkName": "Base Sepolia", "confirmationTimeoutMs": 300000 }
//! ```

use std::time::Duration;

use gloo_net::http::Request;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::{Address, Selector};

/// Application name, shown in the page title.
pub const APP_NAME: &str = "Send a Dollar";

/// Where runtime overrides are fetched from.
pub const CONFIG_URL: &str = "/config.json";

/// Maximum logs to keep in memory.
pub const MAX_LOG_ENTRIES: usize = 100;

/// Contract that records physical addresses.
pub const DEFAULT_DESTINATION_CONTRACT: Address =
    Address::from_hex_const("0xcCC30130d9C33111692e25B896790DBF9f00B9FB");

/// USDC on Base.
pub const DEFAULT_TOKEN_CONTRACT: Address =
    Address::from_hex_const("0x833589fcd6edb6e08f4c7c32d4f71b54bda02913");

/// Base mainnet.
pub const DEFAULT_CHAIN_ID: u64 = 8453;

/// Fixed approval amount in token base units (1e18).
pub const DEFAULT_APPROVAL_AMOUNT: u128 = 1_000_000_000_000_000_000;

/// `approve(address,uint256)`
pub const APPROVE_SELECTOR: Selector = Selector::new([0x09, 0x5e, 0xa7, 0xb3]);

/// Registration entry point of the destination contract.
pub const REGISTER_SELECTOR: Selector = Selector::new([0x09, 0xfd, 0xb5, 0xe5]);

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Everything the submitter needs to know about the network.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitterConfig {
    /// Contract receiving the registration call (and the approval's spender).
    pub destination_contract: Address,
    /// ERC-20 token being approved.
    pub token_contract: Address,
    /// Token ticker for UI labels.
    pub token_symbol: String,
    pub chain_id: u64,
    /// Network name for UI labels.
    pub network_name: String,
    pub approval_amount: u128,
    pub approve_selector: Selector,
    pub register_selector: Selector,
    /// Delay between receipt polls.
    pub poll_interval: Duration,
    /// Give up waiting for a receipt after this long.
    pub confirmation_timeout: Duration,
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            destination_contract: DEFAULT_DESTINATION_CONTRACT,
            token_contract: DEFAULT_TOKEN_CONTRACT,
            token_symbol: "USDC".to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            network_name: "Base".to_string(),
            approval_amount: DEFAULT_APPROVAL_AMOUNT,
            approve_selector: APPROVE_SELECTOR,
            register_selector: REGISTER_SELECTOR,
            poll_interval: DEFAULT_POLL_INTERVAL,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
        }
    }
}

/// Partial configuration as found in `config.json`.
///
/// The approval amount is a decimal string because JSON numbers cannot
/// hold 18-decimal token amounts exactly.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigOverrides {
    pub destination_contract: Option<Address>,
    pub token_contract: Option<Address>,
    pub token_symbol: Option<String>,
    pub chain_id: Option<u64>,
    pub network_name: Option<String>,
    pub approval_amount: Option<String>,
    pub approve_selector: Option<Selector>,
    pub register_selector: Option<Selector>,
    pub poll_interval_ms: Option<u64>,
    pub confirmation_timeout_ms: Option<u64>,
}

impl SubmitterConfig {
    /// Parse overrides from JSON and apply them on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let overrides: ConfigOverrides = serde_json::from_str(json)?;
        Self::default().with_overrides(overrides)
    }

    /// Apply overrides and validate the result.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(address) = overrides.destination_contract {
            self.destination_contract = address;
        }
        if let Some(address) = overrides.token_contract {
            self.token_contract = address;
        }
        if let Some(symbol) = overrides.token_symbol {
            self.token_symbol = symbol;
        }
        if let Some(chain_id) = overrides.chain_id {
            self.chain_id = chain_id;
        }
        if let Some(name) = overrides.network_name {
            self.network_name = name;
        }
        if let Some(amount) = overrides.approval_amount {
            self.approval_amount = amount
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("approvalAmount {:?}: {}", amount, e)))?;
        }
        if let Some(selector) = overrides.approve_selector {
            self.approve_selector = selector;
        }
        if let Some(selector) = overrides.register_selector {
            self.register_selector = selector;
        }
        if let Some(ms) = overrides.poll_interval_ms {
            self.poll_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = overrides.confirmation_timeout_ms {
            self.confirmation_timeout = Duration::from_millis(ms);
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.chain_id == 0 {
            return Err(ConfigError::Invalid("chainId must be non-zero".into()));
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::Invalid("pollIntervalMs must be positive".into()));
        }
        if self.confirmation_timeout < self.poll_interval {
            return Err(ConfigError::Invalid(
                "confirmationTimeoutMs must be at least pollIntervalMs".into(),
            ));
        }
        Ok(())
    }
}

/// Fetch `config.json` and apply it on top of the defaults.
///
/// A 404 means "no overrides" and yields the defaults.
pub async fn fetch_config(url: &str) -> Result<SubmitterConfig, ConfigError> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| ConfigError::Fetch(e.to_string()))?;

    if response.status() == 404 {
        return Ok(SubmitterConfig::default());
    }
    if !response.ok() {
        return Err(ConfigError::Fetch(format!("HTTP {}", response.status())));
    }

    let body = response
        .text()
        .await
        .map_err(|e| ConfigError::Fetch(e.to_string()))?;
    SubmitterConfig::from_json(&body)
}

/// Load the runtime configuration, falling back to the defaults on any error.
pub async fn load_config() -> SubmitterConfig {
    match fetch_config(CONFIG_URL).await {
        Ok(config) => {
            log::info!(
                "⚙️  Config loaded: {} (chain {}), token {}",
                config.network_name,
                config.chain_id,
                config.token_contract
            );
            config
        }
        Err(e) => {
            log::warn!("⚠️  {} - using built-in defaults", e);
            SubmitterConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_base_deployment() {
        let config = SubmitterConfig::default();
        assert_eq!(config.chain_id, 8453);
        assert_eq!(
            config.destination_contract.to_string(),
            "0xccc30130d9c33111692e25b896790dbf9f00b9fb"
        );
        assert_eq!(
            config.token_contract.to_string(),
            "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913"
        );
        assert_eq!(config.approve_selector.to_string(), "0x095ea7b3");
        assert_eq!(config.register_selector.to_string(), "0x09fdb5e5");
        assert_eq!(config.approval_amount, 10u128.pow(18));
    }

    #[test]
    fn test_empty_overrides_keep_defaults() {
        let config = SubmitterConfig::from_json("{}").unwrap();
        assert_eq!(config, SubmitterConfig::default());
    }

    #[test]
    fn test_overrides_applied() {
        let json = r#"{
            "chainId": 84532,
            "networkName": "Base Sepolia",
            "tokenContract": "0x036CbD53842c5426634e7929541eC2318f3dCF7e",
            "approvalAmount": "1000000",
            "pollIntervalMs": 2000,
            "confirmationTimeoutMs": 60000
        }"#;

        let config = SubmitterConfig::from_json(json).unwrap();
        assert_eq!(config.chain_id, 84532);
        assert_eq!(config.network_name, "Base Sepolia");
        assert_eq!(
            config.token_contract.to_string(),
            "0x036cbd53842c5426634e7929541ec2318f3dcf7e"
        );
        assert_eq!(config.approval_amount, 1_000_000);
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.confirmation_timeout, Duration::from_secs(60));
        // Untouched fields keep their defaults
        assert_eq!(config.destination_contract, DEFAULT_DESTINATION_CONTRACT);
    }

    #[test]
    fn test_invalid_overrides_rejected() {
        assert!(matches!(
            SubmitterConfig::from_json(r#"{ "tokenContract": "0x1234" }"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SubmitterConfig::from_json(r#"{ "approvalAmount": "one" }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SubmitterConfig::from_json(r#"{ "pollIntervalMs": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SubmitterConfig::from_json(r#"{ "pollIntervalMs": 5000, "confirmationTimeoutMs": 1000 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SubmitterConfig::from_json(r#"{ "rpcUrl": "http://localhost" }"#),
            Err(ConfigError::Parse(_))
        ));
    }
}
