//! Wrapper for EIP-1193 browser wallets (MetaMask, Coinbase Wallet, Rabby, etc.)
//!
//! Signing, chain switching and RPC submission stay in the wallet; this
//! module only forwards requests to `src/js/wallet.js` and maps the answers.

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::error::WalletError;
use crate::types::{Address, TransactionRequest, TxHash};

/// What a receipt lookup says about a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiptStatus {
    /// No receipt yet.
    Pending,
    /// Mined with status `0x1`.
    Confirmed,
    /// Mined with status `0x0`.
    Reverted,
}

impl ReceiptStatus {
    /// Map the `status` field of an `eth_getTransactionReceipt` result.
    ///
    /// `None` stands for a `null` receipt.
    pub fn from_rpc(status: Option<&str>) -> Result<Self, WalletError> {
        match status {
            None => Ok(ReceiptStatus::Pending),
            Some("0x1") | Some("0x01") => Ok(ReceiptStatus::Confirmed),
            Some("0x0") | Some("0x00") => Ok(ReceiptStatus::Reverted),
            Some(other) => Err(WalletError::Malformed(format!("receipt status {}", other))),
        }
    }
}

/// The wallet capabilities the submitter relies on.
#[allow(async_fn_in_trait)]
pub trait WalletClient {
    /// Ask the user to connect and return the selected account.
    async fn connect(&self) -> Result<Address, WalletError>;

    /// Currently connected account, without prompting.
    async fn account(&self) -> Result<Option<Address>, WalletError>;

    /// Sign and broadcast, returning the transaction hash.
    async fn send_transaction(&self, request: &TransactionRequest) -> Result<TxHash, WalletError>;

    /// Look up the receipt of a broadcast transaction.
    async fn receipt_status(&self, hash: &TxHash) -> Result<ReceiptStatus, WalletError>;
}

/// The injected `window.ethereum` provider.
#[derive(Clone, Copy, Debug, Default)]
pub struct Eip1193Wallet;

impl Eip1193Wallet {
    /// Checks whether a provider is injected.
    pub fn is_available() -> bool {
        let window = gloo_utils::window();

        let has_provider = js_sys::Reflect::get(&window, &JsValue::from_str("ethereum"))
            .map(|v| !v.is_null() && !v.is_undefined())
            .unwrap_or(false);

        if !has_provider {
            log::warn!("⚠️  No Ethereum provider found");
        }

        has_provider
    }
}

impl WalletClient for Eip1193Wallet {
    async fn connect(&self) -> Result<Address, WalletError> {
        if !Self::is_available() {
            return Err(WalletError::Unavailable);
        }

        log::info!("🔌 Connecting to wallet...");

        let result = JsFuture::from(connect_wallet())
            .await
            .map_err(|e| WalletError::Provider(js_error_message(&e)))?;

        let address = parse_address(&result)?
            .ok_or_else(|| WalletError::Malformed("wallet returned no account".into()))?;

        log::info!("✅ Connected to wallet: {}", address);
        Ok(address)
    }

    async fn account(&self) -> Result<Option<Address>, WalletError> {
        if !Self::is_available() {
            return Ok(None);
        }

        let result = JsFuture::from(get_account())
            .await
            .map_err(|e| WalletError::Provider(js_error_message(&e)))?;

        parse_address(&result)
    }

    async fn send_transaction(&self, request: &TransactionRequest) -> Result<TxHash, WalletError> {
        if !Self::is_available() {
            return Err(WalletError::Unavailable);
        }

        let payload = serde_wasm_bindgen::to_value(request)
            .map_err(|e| WalletError::Malformed(format!("Failed to serialize request: {}", e)))?;

        let result = JsFuture::from(send_transaction_js(payload))
            .await
            .map_err(|e| WalletError::Provider(js_error_message(&e)))?;

        result
            .as_string()
            .map(TxHash::new)
            .ok_or_else(|| WalletError::Malformed("transaction hash is not a string".into()))
    }

    async fn receipt_status(&self, hash: &TxHash) -> Result<ReceiptStatus, WalletError> {
        if !Self::is_available() {
            return Err(WalletError::Unavailable);
        }

        let result = JsFuture::from(get_receipt_status(hash.as_str()))
            .await
            .map_err(|e| WalletError::Provider(js_error_message(&e)))?;

        ReceiptStatus::from_rpc(result.as_string().as_deref())
    }
}

/// `null`/`undefined` → `None`, a string → parsed address.
fn parse_address(value: &JsValue) -> Result<Option<Address>, WalletError> {
    if value.is_null() || value.is_undefined() {
        return Ok(None);
    }

    let raw = value
        .as_string()
        .ok_or_else(|| WalletError::Malformed("account is not a string".into()))?;
    raw.parse().map(Some).map_err(WalletError::Malformed)
}

/// Extract `error.message` from a rejected promise, falling back to the value itself.
pub(crate) fn js_error_message(e: &JsValue) -> String {
    js_sys::Reflect::get(e, &"message".into())
        .ok()
        .and_then(|v| v.as_string())
        .or_else(|| e.as_string())
        .unwrap_or_else(|| "Unknown JS error".to_string())
}

/// JavaScript functions from wallet.js
#[wasm_bindgen(module = "/src/js/wallet.js")]
extern "C" {
    #[wasm_bindgen(js_name = "connectWallet")]
    fn connect_wallet() -> js_sys::Promise;

    #[wasm_bindgen(js_name = "getAccount")]
    fn get_account() -> js_sys::Promise;

    #[wasm_bindgen(js_name = "sendTransaction")]
    fn send_transaction_js(request: JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_name = "getReceiptStatus")]
    fn get_receipt_status(hash: &str) -> js_sys::Promise;
}
