use leptos::*;

use crate::services::SagaStage;
use crate::types::SubmissionState;

/// One step of the submission as shown to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Approve,
    Confirm,
    Register,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Approve, Step::Confirm, Step::Register];

    pub fn label(&self) -> &'static str {
        match self {
            Step::Approve => "Approve",
            Step::Confirm => "Confirm",
            Step::Register => "Register",
        }
    }

    fn index(&self) -> u8 {
        match self {
            Step::Approve => 0,
            Step::Confirm => 1,
            Step::Register => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Active,
    Done,
    Failed,
}

impl StepStatus {
    pub fn css_class(&self) -> &'static str {
        match self {
            StepStatus::Pending => "step pending",
            StepStatus::Active => "step active",
            StepStatus::Done => "step done",
            StepStatus::Failed => "step failed",
        }
    }
}

/// Number of steps finished, from the live state and the last saved record.
fn completed_steps(state: &SubmissionState, stage: SagaStage) -> u8 {
    let from_state = match state {
        SubmissionState::AwaitingApprovalConfirmation { .. } => 1,
        SubmissionState::Registering => 2,
        SubmissionState::Success { .. } => 3,
        _ => 0,
    };
    let from_stage = match stage {
        SagaStage::NotStarted => 0,
        SagaStage::ApprovalPending => 1,
        SagaStage::Approved => 2,
        SagaStage::Registered => 3,
    };
    from_state.max(from_stage)
}

pub fn step_status(step: Step, state: &SubmissionState, stage: SagaStage) -> StepStatus {
    let completed = completed_steps(state, stage);
    if step.index() < completed {
        return StepStatus::Done;
    }
    if step.index() > completed {
        return StepStatus::Pending;
    }
    match state {
        SubmissionState::Error { .. } => StepStatus::Failed,
        s if s.is_busy() => StepStatus::Active,
        _ => StepStatus::Pending,
    }
}

#[component]
pub fn StepProgress(
    state: ReadSignal<SubmissionState>,
    #[prop(into)] stage: Signal<SagaStage>,
) -> impl IntoView {
    view! {
        <div class="progress-steps">
            {Step::ALL
                .into_iter()
                .map(|step| {
                    let class = move || step_status(step, &state.get(), stage.get()).css_class();
                    view! { <div class=class>{step.label()}</div> }
                })
                .collect_view()}
        </div>
    }
}
