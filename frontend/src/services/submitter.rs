//! The approve-then-register submission flow.
//!
//! A submission is a two-step saga:
//!
//! ```text
//!   approve(destination, amount) ──▶ wait for receipt ──▶ register(address)
//!        token contract                                    destination contract
//! ```
//!
//! Every step is written to a [`SubmissionRecord`] as soon as its hash is
//! known, so a flow that fails halfway can be resumed with
//! [`TransactionSubmitter::resume`] without paying for a second approval.

use super::clock::Clock;
use super::confirmation::{wait_for_confirmation, ConfirmationPolicy};
use super::wallet::WalletClient;
use crate::calldata::{approval_request, registration_request};
use crate::config::SubmitterConfig;
use crate::error::SubmitError;
use crate::types::{SubmissionState, TxHash};

// =============================================================================
// Saga Journal
// =============================================================================

/// An approval sent to the network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApprovalStep {
    pub hash: TxHash,
    pub confirmed: bool,
}

/// How far a record has progressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SagaStage {
    /// Nothing sent yet.
    NotStarted,
    /// Approval broadcast but not seen confirmed.
    ApprovalPending,
    /// Approval confirmed, registration not sent.
    Approved,
    /// Registration accepted by the provider.
    Registered,
}

/// Journal of one form submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionRecord {
    physical_address: String,
    approval: Option<ApprovalStep>,
    registration: Option<TxHash>,
    failure: Option<String>,
}

impl SubmissionRecord {
    pub fn new(physical_address: impl Into<String>) -> Self {
        Self {
            physical_address: physical_address.into(),
            approval: None,
            registration: None,
            failure: None,
        }
    }

    pub fn physical_address(&self) -> &str {
        &self.physical_address
    }

    pub fn approval(&self) -> Option<&ApprovalStep> {
        self.approval.as_ref()
    }

    pub fn registration(&self) -> Option<&TxHash> {
        self.registration.as_ref()
    }

    /// Message of the last failure, cleared when a later attempt starts.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn stage(&self) -> SagaStage {
        match (&self.approval, &self.registration) {
            (_, Some(_)) => SagaStage::Registered,
            (None, None) => SagaStage::NotStarted,
            (Some(step), None) if step.confirmed => SagaStage::Approved,
            (Some(_), None) => SagaStage::ApprovalPending,
        }
    }

    /// Whether an approval is on-chain (or on its way) with no registration behind it.
    pub fn needs_recovery(&self) -> bool {
        matches!(self.stage(), SagaStage::ApprovalPending | SagaStage::Approved)
    }

    /// Point an unfinished saga at a new physical address.
    ///
    /// The allowance does not depend on the address, so the recorded
    /// approval carries over. Returns `None` when there is nothing to reuse.
    pub fn retarget(self, physical_address: impl Into<String>) -> Option<Self> {
        if !self.needs_recovery() {
            return None;
        }
        Some(Self {
            physical_address: physical_address.into(),
            failure: None,
            ..self
        })
    }
}

// =============================================================================
// Status Tracking
// =============================================================================

/// Enforces the transition rules and forwards every state to the observer.
struct StatusTracker<F> {
    current: SubmissionState,
    observer: F,
}

impl<F: FnMut(&SubmissionState)> StatusTracker<F> {
    fn new(observer: F) -> Self {
        Self {
            current: SubmissionState::Idle,
            observer,
        }
    }

    fn advance(&mut self, next: SubmissionState) -> Result<(), SubmitError> {
        if !self.current.can_advance_to(&next) {
            return Err(SubmitError::InvalidTransition {
                from: self.current.name(),
                to: next.name(),
            });
        }
        log::debug!("status {} -> {}", self.current, next);
        self.current = next;
        (self.observer)(&self.current);
        Ok(())
    }

    fn fail(&mut self, message: String) {
        self.current = SubmissionState::Error { message };
        (self.observer)(&self.current);
    }
}

// =============================================================================
// Submitter
// =============================================================================

/// Runs submissions against a wallet with an injected configuration.
pub struct TransactionSubmitter<W, C> {
    config: SubmitterConfig,
    wallet: W,
    clock: C,
}

impl<W: WalletClient, C: Clock> TransactionSubmitter<W, C> {
    pub fn new(config: SubmitterConfig, wallet: W, clock: C) -> Self {
        Self { config, wallet, clock }
    }

    pub fn config(&self) -> &SubmitterConfig {
        &self.config
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    /// Start a fresh submission for `physical_address`.
    ///
    /// `observer` sees every state change, ending in `Success` or `Error`.
    /// The returned record tells how far the saga got.
    pub async fn submit(
        &self,
        physical_address: &str,
        observer: impl FnMut(&SubmissionState),
    ) -> SubmissionRecord {
        let mut record = SubmissionRecord::new(physical_address);
        self.drive(&mut record, observer).await;
        record
    }

    /// Continue a previous submission from its last completed step.
    pub async fn resume(
        &self,
        mut record: SubmissionRecord,
        observer: impl FnMut(&SubmissionState),
    ) -> SubmissionRecord {
        log::info!("🔁 Resuming submission at stage {:?}", record.stage());
        self.drive(&mut record, observer).await;
        record
    }

    async fn drive(&self, record: &mut SubmissionRecord, observer: impl FnMut(&SubmissionState)) {
        let mut tracker = StatusTracker::new(observer);

        if let Err(err) = self.run_steps(record, &mut tracker).await {
            log::error!("❌ Submission failed: {}", err);
            let message = err.to_string();
            record.failure = Some(message.clone());
            tracker.fail(message);
        }
    }

    async fn run_steps<F: FnMut(&SubmissionState)>(
        &self,
        record: &mut SubmissionRecord,
        tracker: &mut StatusTracker<F>,
    ) -> Result<(), SubmitError> {
        if record.physical_address.is_empty() {
            return Err(SubmitError::EmptyAddress);
        }

        let account = self.wallet.account().await?.ok_or(SubmitError::NoWallet)?;
        record.failure = None;

        if let Some(hash) = &record.registration {
            return tracker.advance(SubmissionState::Success { hash: hash.clone() });
        }

        if record.approval.is_none() {
            tracker.advance(SubmissionState::Approving)?;
            log::info!(
                "🔐 {} approving {} on {}",
                account,
                self.config.destination_contract,
                self.config.token_contract
            );

            let hash = self.wallet.send_transaction(&approval_request(&self.config)).await?;
            log::info!("📨 Approval sent: {}", hash);
            record.approval = Some(ApprovalStep { hash, confirmed: false });
        }

        if let Some(step) = record.approval.as_mut().filter(|step| !step.confirmed) {
            tracker.advance(SubmissionState::AwaitingApprovalConfirmation {
                hash: step.hash.clone(),
            })?;

            let policy = ConfirmationPolicy::from(&self.config);
            match wait_for_confirmation(&self.wallet, &self.clock, &step.hash, policy).await {
                Ok(()) => step.confirmed = true,
                Err(err @ SubmitError::Reverted { .. }) => {
                    // A reverted approval grants nothing; the next attempt starts over.
                    record.approval = None;
                    return Err(err);
                }
                Err(err) => return Err(err),
            }
        }

        tracker.advance(SubmissionState::Registering)?;
        let request = registration_request(&self.config, &record.physical_address);
        if !request.data().is_well_formed() {
            log::warn!("⚠️  Registration call data is not hex; submitting as typed");
        }

        let hash = self.wallet.send_transaction(&request).await?;
        log::info!("📨 Registration sent: {}", hash);
        record.registration = Some(hash.clone());

        tracker.advance(SubmissionState::Success { hash })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WalletError;
    use crate::services::testing::{hash, ScriptedWallet, VirtualClock};
    use crate::services::wallet::ReceiptStatus;
    use futures::executor::block_on;
    use std::time::Duration;

    fn submitter(wallet: ScriptedWallet) -> TransactionSubmitter<ScriptedWallet, VirtualClock> {
        TransactionSubmitter::new(SubmitterConfig::default(), wallet, VirtualClock::default())
    }

    /// Submit and collect every observed state.
    fn submit(
        submitter: &TransactionSubmitter<ScriptedWallet, VirtualClock>,
        input: &str,
    ) -> (SubmissionRecord, Vec<SubmissionState>) {
        let mut states = Vec::new();
        let record = block_on(submitter.submit(input, |s| states.push(s.clone())));
        (record, states)
    }

    fn resume(
        submitter: &TransactionSubmitter<ScriptedWallet, VirtualClock>,
        record: SubmissionRecord,
    ) -> (SubmissionRecord, Vec<SubmissionState>) {
        let mut states = Vec::new();
        let record = block_on(submitter.resume(record, |s| states.push(s.clone())));
        (record, states)
    }

    #[test]
    fn test_main_street_scenario() {
        let wallet = ScriptedWallet::connected()
            .with_receipts(&[ReceiptStatus::Pending, ReceiptStatus::Confirmed]);
        let submitter = submitter(wallet);

        let (record, states) = submit(&submitter, "123 Main St");

        let sent = submitter.wallet().sent.borrow();
        assert_eq!(sent.len(), 2);

        let config = submitter.config();
        assert_eq!(sent[0].to(), &config.token_contract);
        assert!(sent[0].data().as_str().starts_with("0x095ea7b3"));
        assert_eq!(sent[1].to(), &config.destination_contract);
        assert_eq!(sent[1].data().as_str(), "0x09fdb5e5123 Main St");
        assert!(sent.iter().all(|r| r.chain_id() == 8453));

        assert_eq!(
            states,
            vec![
                SubmissionState::Approving,
                SubmissionState::AwaitingApprovalConfirmation { hash: hash(1) },
                SubmissionState::Registering,
                SubmissionState::Success { hash: hash(2) },
            ]
        );
        assert_eq!(record.stage(), SagaStage::Registered);
        assert_eq!(record.failure(), None);
    }

    #[test]
    fn test_waits_on_the_approval_hash() {
        let wallet = ScriptedWallet::connected().with_receipts(&[ReceiptStatus::Confirmed]);
        let submitter = submitter(wallet);

        submit(&submitter, "9 Elm Rd");

        assert_eq!(*submitter.wallet().receipt_queries.borrow(), vec![hash(1)]);
    }

    #[test]
    fn test_no_wallet_issues_nothing() {
        let submitter = submitter(ScriptedWallet::disconnected());

        let (record, states) = submit(&submitter, "123 Main St");

        assert_eq!(submitter.wallet().sent_count(), 0);
        assert_eq!(
            states,
            vec![SubmissionState::Error {
                message: SubmitError::NoWallet.to_string()
            }]
        );
        assert_eq!(record.stage(), SagaStage::NotStarted);
        assert!(!record.needs_recovery());
    }

    #[test]
    fn test_empty_address_rejected() {
        let submitter = submitter(ScriptedWallet::connected());

        let (record, states) = submit(&submitter, "");

        assert_eq!(submitter.wallet().sent_count(), 0);
        assert!(matches!(states.last(), Some(SubmissionState::Error { .. })));
        assert_eq!(record.failure(), Some(SubmitError::EmptyAddress.to_string().as_str()));
    }

    #[test]
    fn test_whitespace_is_kept_literally() {
        let wallet = ScriptedWallet::connected().with_receipts(&[ReceiptStatus::Confirmed]);
        let submitter = submitter(wallet);

        submit(&submitter, "  42 Harbour Way\n");

        let sent = submitter.wallet().sent.borrow();
        assert_eq!(sent[1].data().as_str(), "0x09fdb5e5  42 Harbour Way\n");
    }

    #[test]
    fn test_rejected_approval_stops_the_flow() {
        let wallet = ScriptedWallet::connected()
            .with_send_result(Err(WalletError::Provider("User rejected the request.".into())));
        let submitter = submitter(wallet);

        let (record, states) = submit(&submitter, "123 Main St");

        assert_eq!(submitter.wallet().sent_count(), 1);
        assert_eq!(
            states,
            vec![
                SubmissionState::Approving,
                SubmissionState::Error {
                    message: "User rejected the request.".into()
                },
            ]
        );
        assert_eq!(record.stage(), SagaStage::NotStarted);
    }

    #[test]
    fn test_timeout_keeps_pending_approval_for_resume() {
        // Never confirms during the first attempt
        let submitter = submitter(ScriptedWallet::connected());

        let (record, states) = submit(&submitter, "123 Main St");

        assert_eq!(submitter.wallet().sent_count(), 1);
        assert!(matches!(
            states.last(),
            Some(SubmissionState::Error { message }) if message.contains("not confirmed")
        ));
        assert_eq!(record.stage(), SagaStage::ApprovalPending);
        assert!(record.needs_recovery());
        assert_eq!(record.approval().map(|a| a.hash.clone()), Some(hash(1)));

        // Later the approval lands: resume waits on the same hash, no second approval
        let submitter = TransactionSubmitter::new(
            SubmitterConfig::default(),
            ScriptedWallet::connected().with_receipts(&[ReceiptStatus::Confirmed]),
            VirtualClock::default(),
        );
        let (record, states) = resume(&submitter, record);

        let sent = submitter.wallet().sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].data().as_str(), "0x09fdb5e5123 Main St");
        assert_eq!(*submitter.wallet().receipt_queries.borrow(), vec![hash(1)]);
        assert_eq!(
            states,
            vec![
                SubmissionState::AwaitingApprovalConfirmation { hash: hash(1) },
                SubmissionState::Registering,
                SubmissionState::Success { hash: hash(1) },
            ]
        );
        assert_eq!(record.stage(), SagaStage::Registered);
        assert_eq!(record.failure(), None);
    }

    #[test]
    fn test_failed_registration_resumes_without_reapproving() {
        let wallet = ScriptedWallet::connected()
            .with_send_result(Ok(hash(10)))
            .with_send_result(Err(WalletError::Provider("insufficient funds for gas".into())))
            .with_receipts(&[ReceiptStatus::Confirmed]);
        let submitter = submitter(wallet);

        let (record, states) = submit(&submitter, "123 Main St");

        assert_eq!(
            states.last(),
            Some(&SubmissionState::Error {
                message: "insufficient funds for gas".into()
            })
        );
        assert_eq!(record.stage(), SagaStage::Approved);
        assert_eq!(record.failure(), Some("insufficient funds for gas"));

        let (record, states) = resume(&submitter, record);

        let sent = submitter.wallet().sent.borrow();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[2].to(), &submitter.config().destination_contract);
        assert_eq!(states, vec![
            SubmissionState::Registering,
            SubmissionState::Success { hash: hash(3) },
        ]);
        assert_eq!(record.stage(), SagaStage::Registered);
    }

    #[test]
    fn test_retargeted_record_reuses_approval() {
        let wallet = ScriptedWallet::connected()
            .with_send_result(Ok(hash(10)))
            .with_send_result(Err(WalletError::Provider("rejected".into())))
            .with_receipts(&[ReceiptStatus::Confirmed]);
        let submitter = submitter(wallet);
        let (record, _) = submit(&submitter, "123 Main St");

        let record = record.retarget("77 Sunset Blvd").unwrap();
        assert_eq!(record.physical_address(), "77 Sunset Blvd");
        assert_eq!(record.stage(), SagaStage::Approved);
        assert_eq!(record.failure(), None);

        let (record, _) = resume(&submitter, record);

        let sent = submitter.wallet().sent.borrow();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[2].data().as_str(), "0x09fdb5e577 Sunset Blvd");
        assert_eq!(record.stage(), SagaStage::Registered);
    }

    #[test]
    fn test_retarget_needs_unfinished_saga() {
        assert_eq!(SubmissionRecord::new("123 Main St").retarget("elsewhere"), None);

        let wallet = ScriptedWallet::connected().with_receipts(&[ReceiptStatus::Confirmed]);
        let submitter = submitter(wallet);
        let (record, _) = submit(&submitter, "123 Main St");
        assert_eq!(record.retarget("elsewhere"), None);
    }

    #[test]
    fn test_reverted_approval_starts_over() {
        let wallet = ScriptedWallet::connected().with_receipts(&[ReceiptStatus::Reverted]);
        let submitter = submitter(wallet);

        let (record, states) = submit(&submitter, "123 Main St");

        assert!(matches!(
            states.last(),
            Some(SubmissionState::Error { message }) if message.contains("reverted")
        ));
        assert_eq!(record.stage(), SagaStage::NotStarted);
        assert_eq!(submitter.wallet().sent_count(), 1);
    }

    #[test]
    fn test_resume_of_registered_record_sends_nothing() {
        let wallet = ScriptedWallet::connected().with_receipts(&[ReceiptStatus::Confirmed]);
        let submitter = submitter(wallet);
        let (record, _) = submit(&submitter, "123 Main St");

        let (record, states) = resume(&submitter, record);

        assert_eq!(submitter.wallet().sent_count(), 2);
        assert_eq!(states, vec![SubmissionState::Success { hash: hash(2) }]);
        assert_eq!(record.stage(), SagaStage::Registered);
    }

    #[test]
    fn test_states_only_move_forward() {
        let wallet = ScriptedWallet::connected().with_receipts(&[
            ReceiptStatus::Pending,
            ReceiptStatus::Pending,
            ReceiptStatus::Confirmed,
        ]);
        let submitter = TransactionSubmitter::new(
            SubmitterConfig {
                poll_interval: Duration::from_millis(250),
                ..SubmitterConfig::default()
            },
            wallet,
            VirtualClock::default(),
        );

        let (_, states) = submit(&submitter, "1 Infinite Loop");

        let mut previous = SubmissionState::Idle;
        for state in states {
            assert!(previous.can_advance_to(&state), "{} -> {}", previous, state);
            previous = state;
        }
        assert!(matches!(previous, SubmissionState::Success { .. }));
    }
}
