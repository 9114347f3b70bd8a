//! In-memory wallet and virtual clock for driving the flow in native tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use super::clock::Clock;
use super::wallet::{ReceiptStatus, WalletClient};
use crate::error::WalletError;
use crate::types::{Address, TransactionRequest, TxHash};

pub(crate) const ACCOUNT: Address = Address::new([0xab; 20]);

/// Clock whose `sleep` advances time instantly.
#[derive(Default)]
pub(crate) struct VirtualClock {
    now: Cell<u64>,
    pub sleeps: Cell<usize>,
}

impl Clock for VirtualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    async fn sleep(&self, duration: Duration) {
        self.now.set(self.now.get() + duration.as_millis() as u64);
        self.sleeps.set(self.sleeps.get() + 1);
    }
}

/// Returns `Pending` on its first poll, like a provider round-trip.
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            return Poll::Ready(());
        }
        self.0 = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Wallet answering from scripted queues and recording every request.
///
/// Unscripted sends succeed with sequential hashes; unscripted receipt
/// lookups report `Pending`.
pub(crate) struct ScriptedWallet {
    pub account: Option<Address>,
    slow_account: bool,
    pub sent: RefCell<Vec<TransactionRequest>>,
    pub receipt_queries: RefCell<Vec<TxHash>>,
    send_results: RefCell<VecDeque<Result<TxHash, WalletError>>>,
    receipts: RefCell<VecDeque<ReceiptStatus>>,
}

impl ScriptedWallet {
    pub fn connected() -> Self {
        Self {
            account: Some(ACCOUNT),
            slow_account: false,
            sent: RefCell::default(),
            receipt_queries: RefCell::default(),
            send_results: RefCell::default(),
            receipts: RefCell::default(),
        }
    }

    pub fn disconnected() -> Self {
        Self {
            account: None,
            ..Self::connected()
        }
    }

    /// Make `account()` suspend once before answering.
    pub fn with_slow_account(mut self) -> Self {
        self.slow_account = true;
        self
    }

    pub fn with_send_result(self, result: Result<TxHash, WalletError>) -> Self {
        self.send_results.borrow_mut().push_back(result);
        self
    }

    pub fn with_receipts(self, statuses: &[ReceiptStatus]) -> Self {
        self.receipts.borrow_mut().extend(statuses.iter().copied());
        self
    }

    pub fn sent_count(&self) -> usize {
        self.sent.borrow().len()
    }
}

pub(crate) fn hash(n: u8) -> TxHash {
    TxHash::new(format!("0x{:064x}", n))
}

impl WalletClient for ScriptedWallet {
    async fn connect(&self) -> Result<Address, WalletError> {
        self.account.ok_or(WalletError::Unavailable)
    }

    async fn account(&self) -> Result<Option<Address>, WalletError> {
        if self.slow_account {
            YieldOnce(false).await;
        }
        Ok(self.account)
    }

    async fn send_transaction(&self, request: &TransactionRequest) -> Result<TxHash, WalletError> {
        self.sent.borrow_mut().push(request.clone());
        let n = self.sent.borrow().len() as u8;
        self.send_results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(hash(n)))
    }

    async fn receipt_status(&self, hash: &TxHash) -> Result<ReceiptStatus, WalletError> {
        self.receipt_queries.borrow_mut().push(hash.clone());
        Ok(self
            .receipts
            .borrow_mut()
            .pop_front()
            .unwrap_or(ReceiptStatus::Pending))
    }
}
