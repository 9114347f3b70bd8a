//! Common types used across the frontend application.
//!
//! This module centralizes type definitions to avoid duplication
//! and ensure consistency across components.
//!
//! # Categories
//!
//! - **Chain Types** - Addresses, selectors, hashes, call data
//! - **Transaction Types** - The immutable request handed to the wallet
//! - **Submission Types** - The status shown to the user
//! - **Log Types** - In-page activity log

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Chain Types
// =============================================================================

/// A 20-byte EVM account or contract address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    /// Wrap raw address bytes.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Parse a `0x`-prefixed address at compile time.
    ///
    /// A malformed literal fails the build.
    pub const fn from_hex_const(s: &str) -> Self {
        let raw = s.as_bytes();
        assert!(raw.len() == 42, "address literal must be 0x + 40 hex digits");
        assert!(raw[0] == b'0' && (raw[1] == b'x' || raw[1] == b'X'));

        let mut bytes = [0u8; 20];
        let mut i = 0;
        while i < 20 {
            let hi = hex_digit(raw[2 + i * 2]);
            let lo = hex_digit(raw[3 + i * 2]);
            bytes[i] = (hi << 4) | lo;
            i += 1;
        }
        Self(bytes)
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Lowercase hex digits without the `0x` prefix.
    pub fn hex_digits(&self) -> String {
        hex::encode(self.0)
    }

    /// Abbreviated form for the header badge, e.g. `0xccc3…b9fb`.
    pub fn short(&self) -> String {
        let digits = self.hex_digits();
        format!("0x{}…{}", &digits[..4], &digits[digits.len() - 4..])
    }
}

const fn hex_digit(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => panic!("invalid hex digit in address literal"),
    }
}

impl FromStr for Address {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| format!("Address must start with 0x: {}", s))?;

        if digits.len() != 40 {
            return Err(format!("Address must have 40 hex digits, got {}: {}", digits.len(), s));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| format!("Invalid address {}: {}", s, e))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.hex_digits())
    }
}

/// A 4-byte contract function selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Selector([u8; 4]);

impl Selector {
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Lowercase hex digits without the `0x` prefix.
    pub fn hex_digits(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Selector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 4];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| format!("Invalid selector {}: {}", s, e))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Selector {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.to_string()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.hex_digits())
    }
}

/// Transaction hash as returned by the wallet provider.
///
/// Kept verbatim; the provider is the authority on its format.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Call data as the `0x`-prefixed string handed to the wallet.
///
/// Not guaranteed to be valid hex: the registration payload carries the
/// user's text as-is. See [`CallData::is_well_formed`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallData(String);

impl CallData {
    /// Wrap a payload string without inspecting it.
    pub fn from_raw(data: impl Into<String>) -> Self {
        Self(data.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the payload is `0x` followed by an even number of hex digits.
    pub fn is_well_formed(&self) -> bool {
        match self.0.strip_prefix("0x") {
            Some(digits) => digits.len() % 2 == 0 && digits.bytes().all(|b| b.is_ascii_hexdigit()),
            None => false,
        }
    }
}

impl fmt::Display for CallData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Transaction Types
// =============================================================================

/// A contract call ready for the wallet.
///
/// Immutable once built; serialized as `{ to, data, chainId }` for the JS glue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    to: Address,
    data: CallData,
    chain_id: u64,
}

impl TransactionRequest {
    pub fn new(to: Address, data: CallData, chain_id: u64) -> Self {
        Self { to, data, chain_id }
    }

    pub fn to(&self) -> &Address {
        &self.to
    }

    pub fn data(&self) -> &CallData {
        &self.data
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

// =============================================================================
// Submission Types
// =============================================================================

/// Where a form submission currently stands.
///
/// Moves strictly forward through the variants in declaration order;
/// `Error` is reachable from anywhere. A terminal state may reset to
/// `Idle` to start a new lifecycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    /// Approval sent to the wallet, waiting for a hash.
    Approving,
    /// Approval hash known, waiting for the receipt.
    AwaitingApprovalConfirmation { hash: TxHash },
    /// Registration sent to the wallet, waiting for a hash.
    Registering,
    /// Registration accepted by the provider.
    Success { hash: TxHash },
    /// The flow stopped; `message` is shown to the user verbatim.
    Error { message: String },
}

impl SubmissionState {
    /// Short name for logs and transition errors.
    pub fn name(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Approving => "approving",
            SubmissionState::AwaitingApprovalConfirmation { .. } => "awaiting-approval-confirmation",
            SubmissionState::Registering => "registering",
            SubmissionState::Success { .. } => "success",
            SubmissionState::Error { .. } => "error",
        }
    }

    fn rank(&self) -> Option<u8> {
        match self {
            SubmissionState::Idle => Some(0),
            SubmissionState::Approving => Some(1),
            SubmissionState::AwaitingApprovalConfirmation { .. } => Some(2),
            SubmissionState::Registering => Some(3),
            SubmissionState::Success { .. } => Some(4),
            SubmissionState::Error { .. } => None,
        }
    }

    /// Whether a submission is in flight and the submit control must stay disabled.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            SubmissionState::Approving
                | SubmissionState::AwaitingApprovalConfirmation { .. }
                | SubmissionState::Registering
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionState::Success { .. } | SubmissionState::Error { .. })
    }

    /// Check the transition rules.
    pub fn can_advance_to(&self, next: &SubmissionState) -> bool {
        match next {
            SubmissionState::Error { .. } => true,
            SubmissionState::Idle => self.is_terminal() || *self == SubmissionState::Idle,
            _ => match (self.rank(), next.rank()) {
                (Some(from), Some(to)) => to > from,
                _ => false,
            },
        }
    }

    /// Hash to display, if this state carries one.
    pub fn hash(&self) -> Option<&TxHash> {
        match self {
            SubmissionState::AwaitingApprovalConfirmation { hash }
            | SubmissionState::Success { hash } => Some(hash),
            _ => None,
        }
    }

    /// Text of the submit button.
    pub fn button_label(&self, token_symbol: &str) -> String {
        match self {
            SubmissionState::Approving => format!("Approving {}...", token_symbol),
            SubmissionState::AwaitingApprovalConfirmation { .. } => "Confirming approval...".to_string(),
            SubmissionState::Registering => "Processing...".to_string(),
            _ => "Send $1 for Your QR".to_string(),
        }
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Log Types
// =============================================================================

/// Log severity level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LogLevel {
    /// Informational message
    Info,
    /// Success/completion message
    Success,
    /// Error message
    Error,
    /// Warning message
    Warning,
}

impl LogLevel {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            LogLevel::Info => "log-info",
            LogLevel::Success => "log-success",
            LogLevel::Error => "log-error",
            LogLevel::Warning => "log-warning",
        }
    }
}

/// A single entry of the in-page activity log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Severity level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Timestamp string (HH:MM:SS)
    pub timestamp: String,
    /// Position in the session log, assigned when the entry is appended
    #[serde(default)]
    pub seq: u64,
}

impl LogEntry {
    /// Build an entry stamped with the local time.
    pub fn now(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            seq: 0,
        }
    }

    /// Log level matching a submission state, if the state is worth recording.
    pub fn for_state(state: &SubmissionState, token_symbol: &str) -> Option<Self> {
        let (level, message) = match state {
            SubmissionState::Idle => return None,
            SubmissionState::Approving => {
                (LogLevel::Info, format!("🔐 Approving {} spend...", token_symbol))
            }
            SubmissionState::AwaitingApprovalConfirmation { hash } => {
                (LogLevel::Info, format!("⏳ Waiting for approval {} to confirm", hash))
            }
            SubmissionState::Registering => {
                (LogLevel::Info, "📤 Registering your address...".to_string())
            }
            SubmissionState::Success { hash } => {
                (LogLevel::Success, format!("✅ Registration submitted: {}", hash))
            }
            SubmissionState::Error { message } => (LogLevel::Error, format!("❌ {}", message)),
        };
        Some(Self::now(level, message))
    }
}
