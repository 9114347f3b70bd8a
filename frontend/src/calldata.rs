//! Payload builders for the two contract calls.
//!
//! The approval is a standard ERC-20 `approve(spender, amount)` with both
//! arguments left-padded to 32-byte words. The registration payload is the
//! selector followed by the user's text exactly as typed: no ABI encoding,
//! no hex conversion.

use crate::config::SubmitterConfig;
use crate::types::{Address, CallData, Selector, TransactionRequest};

/// `selector ++ pad32(spender) ++ pad32(amount)`
pub fn approve_call_data(selector: Selector, spender: &Address, amount: u128) -> CallData {
    CallData::from_raw(format!(
        "0x{}{:0>64}{:064x}",
        selector.hex_digits(),
        spender.hex_digits(),
        amount
    ))
}

/// `selector ++ physical_address`, the text appended verbatim.
pub fn register_call_data(selector: Selector, physical_address: &str) -> CallData {
    CallData::from_raw(format!("0x{}{}", selector.hex_digits(), physical_address))
}

/// Approval of the destination contract on the token contract.
pub fn approval_request(config: &SubmitterConfig) -> TransactionRequest {
    TransactionRequest::new(
        config.token_contract,
        approve_call_data(
            config.approve_selector,
            &config.destination_contract,
            config.approval_amount,
        ),
        config.chain_id,
    )
}

/// Registration of `physical_address` on the destination contract.
pub fn registration_request(config: &SubmitterConfig, physical_address: &str) -> TransactionRequest {
    TransactionRequest::new(
        config.destination_contract,
        register_call_data(config.register_selector, physical_address),
        config.chain_id,
    )
}
