//! Waiting for a transaction receipt.
//!
//! Polls the wallet's receipt lookup at a fixed interval and gives up after
//! a deadline, so a transaction that never lands cannot hold the flow open.

use std::time::Duration;

use super::clock::Clock;
use super::wallet::{ReceiptStatus, WalletClient};
use crate::config::SubmitterConfig;
use crate::error::SubmitError;
use crate::types::TxHash;

/// How often to poll and when to give up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl From<&SubmitterConfig> for ConfirmationPolicy {
    fn from(config: &SubmitterConfig) -> Self {
        Self {
            poll_interval: config.poll_interval,
            timeout: config.confirmation_timeout,
        }
    }
}

/// Resolve once `hash` is confirmed.
///
/// The receipt is checked at least once, even with a zero timeout. A reverted
/// receipt and an expired deadline are both errors; lookup failures are
/// returned as-is without retrying.
pub async fn wait_for_confirmation<W, C>(
    wallet: &W,
    clock: &C,
    hash: &TxHash,
    policy: ConfirmationPolicy,
) -> Result<(), SubmitError>
where
    W: WalletClient,
    C: Clock,
{
    let started = clock.now_ms();
    let timeout_ms = policy.timeout.as_millis() as u64;

    loop {
        match wallet.receipt_status(hash).await? {
            ReceiptStatus::Confirmed => {
                log::info!("✅ {} confirmed", hash);
                return Ok(());
            }
            ReceiptStatus::Reverted => {
                return Err(SubmitError::Reverted { hash: hash.clone() });
            }
            ReceiptStatus::Pending => {}
        }

        let waited_ms = clock.now_ms().saturating_sub(started);
        if waited_ms >= timeout_ms {
            return Err(SubmitError::ConfirmationTimeout {
                hash: hash.clone(),
                waited_ms,
            });
        }

        let remaining = Duration::from_millis(timeout_ms - waited_ms);
        clock.sleep(policy.poll_interval.min(remaining)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{hash, ScriptedWallet, VirtualClock};
    use futures::executor::block_on;

    fn policy(poll_ms: u64, timeout_ms: u64) -> ConfirmationPolicy {
        ConfirmationPolicy {
            poll_interval: Duration::from_millis(poll_ms),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    #[test]
    fn test_resolves_when_confirmed() {
        let wallet = ScriptedWallet::connected().with_receipts(&[
            ReceiptStatus::Pending,
            ReceiptStatus::Pending,
            ReceiptStatus::Confirmed,
        ]);
        let clock = VirtualClock::default();

        let result = block_on(wait_for_confirmation(&wallet, &clock, &hash(1), policy(1000, 10_000)));

        assert!(result.is_ok());
        assert_eq!(wallet.receipt_queries.borrow().len(), 3);
        assert_eq!(clock.sleeps.get(), 2);
        assert_eq!(clock.now_ms(), 2000);
    }

    #[test]
    fn test_reverted_is_an_error() {
        let wallet = ScriptedWallet::connected().with_receipts(&[ReceiptStatus::Reverted]);
        let clock = VirtualClock::default();

        let result = block_on(wait_for_confirmation(&wallet, &clock, &hash(7), policy(1000, 10_000)));

        assert_eq!(result, Err(SubmitError::Reverted { hash: hash(7) }));
    }

    #[test]
    fn test_times_out_at_deadline() {
        // Never confirms
        let wallet = ScriptedWallet::connected();
        let clock = VirtualClock::default();

        let result = block_on(wait_for_confirmation(&wallet, &clock, &hash(2), policy(1000, 3500)));

        assert_eq!(
            result,
            Err(SubmitError::ConfirmationTimeout {
                hash: hash(2),
                waited_ms: 3500,
            })
        );
        // Polls at 0, 1000, 2000, 3000 and a last one at the deadline
        assert_eq!(wallet.receipt_queries.borrow().len(), 5);
    }

    #[test]
    fn test_zero_timeout_checks_once() {
        let wallet = ScriptedWallet::connected().with_receipts(&[ReceiptStatus::Confirmed]);
        let clock = VirtualClock::default();

        let result = block_on(wait_for_confirmation(&wallet, &clock, &hash(3), policy(1000, 0)));

        assert!(result.is_ok());
        assert_eq!(clock.sleeps.get(), 0);
    }
}
