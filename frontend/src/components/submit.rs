//! Address form and the submission flow behind it.
//!
//! At most one flow runs at a time: the form is locked from the click until
//! the spawned task ends, including the wallet round-trip before the first
//! status change. Once the registration is accepted, its receipt is tracked
//! for the success message.

use leptos::*;

use super::activity::push_log;
use super::progress::StepProgress;
use super::status::{RegistrationConfirmation, StatusPanel};
use crate::config::SubmitterConfig;
use crate::services::{
    wait_for_confirmation, BrowserClock, ConfirmationPolicy, Eip1193Wallet, SagaStage,
    SubmissionRecord, TransactionSubmitter,
};
use crate::types::{Address, LogEntry, LogLevel, SubmissionState, TxHash};

/// Marks a flow as running from the moment it is requested.
#[derive(Clone, Copy)]
pub struct FlowGate {
    in_flight: RwSignal<bool>,
}

impl FlowGate {
    pub fn new() -> Self {
        Self {
            in_flight: create_rw_signal(false),
        }
    }

    /// Take the gate. Returns `false` if a flow already holds it.
    pub fn try_enter(&self) -> bool {
        if self.in_flight.get_untracked() {
            return false;
        }
        self.in_flight.set(true);
        true
    }

    pub fn leave(&self) {
        self.in_flight.set(false);
    }

    /// Whether the form must refuse input, tracked for reactive use.
    pub fn is_locked(&self, state: &SubmissionState) -> bool {
        self.in_flight.get() || state.is_busy()
    }
}

impl Default for FlowGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Signals written by a running flow.
#[derive(Clone, Copy)]
struct FlowSignals {
    gate: FlowGate,
    set_state: WriteSignal<SubmissionState>,
    set_record: WriteSignal<Option<SubmissionRecord>>,
    set_confirmation: WriteSignal<RegistrationConfirmation>,
    set_logs: WriteSignal<Vec<LogEntry>>,
}

#[derive(Debug, PartialEq)]
enum Job {
    Fresh(String),
    Resume(SubmissionRecord),
}

/// Decide what a form submission runs.
///
/// A saga stopped after its approval is continued for the new input, so the
/// user never pays for a second allowance.
fn plan_job(previous: Option<SubmissionRecord>, input: String) -> Job {
    match previous {
        Some(record) => match record.retarget(input.clone()) {
            Some(record) => Job::Resume(record),
            None => Job::Fresh(input),
        },
        None => Job::Fresh(input),
    }
}

fn form_address(ev: &ev::SubmitEvent) -> String {
    let form: web_sys::HtmlFormElement = event_target(ev);
    match web_sys::FormData::new_with_form(&form) {
        Ok(data) => data.get("address").as_string().unwrap_or_default(),
        Err(e) => {
            log::warn!("Could not read the address form: {:?}", e);
            String::new()
        }
    }
}

fn start_flow(config: SubmitterConfig, signals: FlowSignals, job: Job) {
    if !signals.gate.try_enter() {
        log::debug!("submission already in flight, ignoring request");
        return;
    }

    let symbol = config.token_symbol.clone();
    let policy = ConfirmationPolicy::from(&config);

    signals.set_state.set(SubmissionState::Idle);
    signals.set_confirmation.set(RegistrationConfirmation::Idle);

    spawn_local(async move {
        let submitter = TransactionSubmitter::new(config, Eip1193Wallet, BrowserClock);
        let observer = |state: &SubmissionState| {
            signals.set_state.set(state.clone());
            if let Some(entry) = LogEntry::for_state(state, &symbol) {
                push_log(signals.set_logs, entry);
            }
        };

        let record = match job {
            Job::Fresh(input) => submitter.submit(&input, observer).await,
            Job::Resume(record) => submitter.resume(record, observer).await,
        };

        let registration = record.registration().cloned();
        signals.set_record.set(Some(record));

        if let Some(hash) = registration {
            track_registration(hash, policy, signals).await;
        }
        signals.gate.leave();
    });
}

async fn track_registration(hash: TxHash, policy: ConfirmationPolicy, signals: FlowSignals) {
    signals.set_confirmation.set(RegistrationConfirmation::Confirming);

    match wait_for_confirmation(&Eip1193Wallet, &BrowserClock, &hash, policy).await {
        Ok(()) => {
            signals.set_confirmation.set(RegistrationConfirmation::Confirmed);
            push_log(
                signals.set_logs,
                LogEntry::now(LogLevel::Success, format!("🎉 Registration {} confirmed", hash)),
            );
        }
        Err(e) => {
            signals.set_confirmation.set(RegistrationConfirmation::Failed(e.to_string()));
            push_log(signals.set_logs, LogEntry::now(LogLevel::Warning, format!("⚠️  {}", e)));
        }
    }
}

#[component]
pub fn SubmitSection(
    config: SubmitterConfig,
    wallet_address: ReadSignal<Option<Address>>,
    set_logs: WriteSignal<Vec<LogEntry>>,
) -> impl IntoView {
    let (state, set_state) = create_signal(SubmissionState::Idle);
    let (record, set_record) = create_signal(None::<SubmissionRecord>);
    let (confirmation, set_confirmation) = create_signal(RegistrationConfirmation::Idle);
    let gate = FlowGate::new();
    let signals = FlowSignals {
        gate,
        set_state,
        set_record,
        set_confirmation,
        set_logs,
    };

    let symbol = config.token_symbol.clone();
    let button_symbol = symbol.clone();
    let config = store_value(config);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let input = form_address(&ev);
        start_flow(config.get_value(), signals, plan_job(record.get_untracked(), input));
    };

    let on_resume = Callback::new(move |_| {
        if let Some(saved) = record.get_untracked() {
            start_flow(config.get_value(), signals, Job::Resume(saved));
        }
    });

    let stage = Signal::derive(move || {
        record.with(|r| r.as_ref().map(|r| r.stage()).unwrap_or(SagaStage::NotStarted))
    });

    view! {
        <div class="card">
            <form class="submit-form" on:submit=on_submit>
                <textarea
                    name="address"
                    placeholder="Enter your physical address"
                    required=true
                    rows=3
                ></textarea>

                <button
                    type="submit"
                    class="btn btn-primary"
                    disabled=move || gate.is_locked(&state.get())
                >
                    {move || state.get().button_label(&button_symbol)}
                </button>
            </form>

            <Show when=move || wallet_address.get().is_none() fallback=|| ()>
                <p class="hint">"Connect your wallet to continue."</p>
            </Show>

            <StepProgress state=state stage=stage/>

            <StatusPanel
                state=state
                record=record
                confirmation=confirmation
                token_symbol=symbol
                on_resume=on_resume
            />
        </div>
    }
}
