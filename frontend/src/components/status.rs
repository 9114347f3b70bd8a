//! Status displays under the form.
//!
//! Shows the latest transaction hash, confirmation spinners, the success
//! and error messages, and the recovery action for a half-finished saga.

use leptos::*;

use crate::services::{SagaStage, SubmissionRecord};
use crate::types::{SubmissionState, TxHash};

/// Progress of the registration transaction after the provider accepted it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RegistrationConfirmation {
    #[default]
    Idle,
    Confirming,
    Confirmed,
    Failed(String),
}

/// Hash worth showing: the live one, else the newest from the record.
pub fn display_hash(state: &SubmissionState, record: Option<&SubmissionRecord>) -> Option<TxHash> {
    if let Some(hash) = state.hash() {
        return Some(hash.clone());
    }
    let record = record?;
    record
        .registration()
        .or_else(|| record.approval().map(|step| &step.hash))
        .cloned()
}

pub fn confirming_text(
    state: &SubmissionState,
    confirmation: &RegistrationConfirmation,
) -> Option<&'static str> {
    match (state, confirmation) {
        (SubmissionState::AwaitingApprovalConfirmation { .. }, _) => Some("Confirming approval..."),
        (SubmissionState::Success { .. }, RegistrationConfirmation::Confirming) => {
            Some("Confirming transaction...")
        }
        _ => None,
    }
}

pub fn success_text(state: &SubmissionState, confirmation: &RegistrationConfirmation) -> Option<String> {
    if !matches!(state, SubmissionState::Success { .. }) {
        return None;
    }
    Some(match confirmation {
        RegistrationConfirmation::Confirmed => {
            "Success! Your QR code will be delivered to your address.".to_string()
        }
        RegistrationConfirmation::Failed(message) => {
            format!("Registration sent, but its confirmation could not be checked: {}", message)
        }
        _ => "Registration submitted! Waiting for the network to confirm.".to_string(),
    })
}

/// Explanation for the recovery action, if the saga stopped halfway.
pub fn recovery_text(
    state: &SubmissionState,
    record: Option<&SubmissionRecord>,
    token_symbol: &str,
) -> Option<String> {
    if !matches!(state, SubmissionState::Error { .. }) {
        return None;
    }
    match record?.stage() {
        SagaStage::Approved => Some(format!(
            "Your {} approval is on-chain but your address is not registered yet.",
            token_symbol
        )),
        SagaStage::ApprovalPending => Some(format!(
            "Your {} approval was sent but not confirmed yet. You can keep waiting for it instead of approving again.",
            token_symbol
        )),
        SagaStage::NotStarted | SagaStage::Registered => None,
    }
}

#[component]
pub fn StatusPanel(
    state: ReadSignal<SubmissionState>,
    record: ReadSignal<Option<SubmissionRecord>>,
    confirmation: ReadSignal<RegistrationConfirmation>,
    token_symbol: String,
    /// Continue the recorded saga
    on_resume: Callback<()>,
) -> impl IntoView {
    let symbol = store_value(token_symbol);

    let hash = move || record.with(|r| display_hash(&state.get(), r.as_ref()));
    let confirming = move || confirmation.with(|c| confirming_text(&state.get(), c));
    let success = move || confirmation.with(|c| success_text(&state.get(), c));
    let recovery = move || {
        record.with(|r| symbol.with_value(|s| recovery_text(&state.get(), r.as_ref(), s)))
    };
    let error = move || match state.get() {
        SubmissionState::Error { message } => Some(message),
        _ => None,
    };

    view! {
        <div class="status">
            <Show when=move || state.get() == SubmissionState::Approving fallback=|| ()>
                <div class="status-box approving">
                    <div class="spinner"></div>
                    <span>{move || symbol.with_value(|s| format!("Approving {} transaction...", s))}</span>
                </div>
            </Show>

            {move || hash().map(|hash| view! {
                <div class="status-box hash">
                    <p class="status-label">"Transaction Hash:"</p>
                    <p class="status-hash">{hash.to_string()}</p>
                </div>
            })}

            {move || confirming().map(|text| view! {
                <div class="status-box confirming">
                    <div class="spinner"></div>
                    <span>{text}</span>
                </div>
            })}

            {move || success().map(|text| view! {
                <div class="status-box success">
                    <span>"✓ " {text}</span>
                </div>
            })}

            {move || error().map(|message| view! {
                <div class="status-box error">
                    <p class="status-label">"Error:"</p>
                    <p>{message}</p>
                </div>
            })}

            {move || recovery().map(|text| view! {
                <div class="status-box recovery">
                    <p>{text}</p>
                    <button class="btn btn-secondary" on:click=move |_| on_resume.call(())>
                        "Finish registration"
                    </button>
                </div>
            })}
        </div>
    }
}
