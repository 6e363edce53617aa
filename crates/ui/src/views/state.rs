use codeblue_core::FetchOutcome;
use dioxus::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    NotSignedIn,
    Backend(String),
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            ViewError::NotSignedIn => "Please sign in to continue.".to_owned(),
            ViewError::Backend(detail) => format!("Could not load this section: {detail}"),
            ViewError::Unknown => "Something went wrong. Please try again.".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(err.clone()),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

/// Placeholder for a section that loaded nothing or failed.
#[component]
pub fn SectionNotice(outcome: FetchOutcome<()>, #[props(into)] empty_text: String) -> Element {
    match outcome {
        FetchOutcome::Loaded(()) => rsx! {},
        FetchOutcome::Empty => rsx! {
            p { class: "section-empty", "{empty_text}" }
        },
        FetchOutcome::Failed(detail) => rsx! {
            p { class: "section-error", "Could not load this section: {detail}" }
        },
    }
}

/// Drops the payload so a section's state can be passed as a prop.
#[must_use]
pub fn outcome_kind<T>(outcome: &FetchOutcome<T>) -> FetchOutcome<()> {
    match outcome {
        FetchOutcome::Loaded(_) => FetchOutcome::Loaded(()),
        FetchOutcome::Empty => FetchOutcome::Empty,
        FetchOutcome::Failed(detail) => FetchOutcome::Failed(detail.clone()),
    }
}
