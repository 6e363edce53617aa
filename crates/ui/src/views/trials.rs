use std::collections::HashSet;

use codeblue_core::model::{StatusFilter, Trial, TrialId};
use dioxus::prelude::*;
use dioxus_router::Link;
use services::CatalogError;

use crate::context::AppContext;
use crate::routes::{Route, use_current_user};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{STATUS_FILTER_OPTIONS, TrialCardVm, map_trial_cards};

#[derive(Clone, Debug, PartialEq)]
struct CatalogData {
    trials: Vec<Trial>,
    enrolled: HashSet<TrialId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Notice {
    Enrolled(String),
    Failed(String),
}

fn enroll_failure(err: &CatalogError) -> String {
    match err {
        CatalogError::Api(api) => api
            .detail()
            .map_or_else(|| api.to_string(), str::to_owned),
        other => other.to_string(),
    }
}

#[component]
pub fn TrialsView() -> Element {
    let ctx = use_context::<AppContext>();
    let current_user = use_current_user();
    let catalog = ctx.catalog();
    let mut query = use_signal(String::new);
    let mut status = use_signal(|| "All".to_owned());
    let mut notice = use_signal(|| None::<Notice>);

    let mut resource = use_resource(move || {
        let catalog = catalog.clone();
        let is_patient = current_user().is_some_and(|user| user.is_patient());
        async move {
            let trials = catalog
                .list_trials()
                .await
                .map_err(|err| ViewError::Backend(err.to_string()))?;
            let enrolled = if is_patient {
                catalog
                    .my_enrollments()
                    .await
                    .map(|items| {
                        items
                            .into_iter()
                            .filter(|e| e.is_active)
                            .map(|e| e.trial_id)
                            .collect()
                    })
                    .unwrap_or_default()
            } else {
                HashSet::new()
            };
            Ok::<_, ViewError>(CatalogData { trials, enrolled })
        }
    });

    let enroll = use_callback(move |card: TrialCardVm| {
        let catalog = ctx.catalog();
        spawn(async move {
            match catalog.enroll(&card.id).await {
                Ok(()) => {
                    notice.set(Some(Notice::Enrolled(card.title.clone())));
                    resource.restart();
                }
                Err(err) => notice.set(Some(Notice::Failed(enroll_failure(&err)))),
            }
        });
    });

    let can_enroll = current_user().is_some_and(|user| user.is_patient());
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page trials",
            h2 { "Clinical trials" }

            div { class: "trial-filters",
                input {
                    class: "trial-search",
                    r#type: "search",
                    placeholder: "Search by condition, location, sponsor…",
                    value: "{query}",
                    oninput: move |evt| query.set(evt.value()),
                }
                select {
                    class: "trial-status",
                    value: "{status}",
                    onchange: move |evt| status.set(evt.value()),
                    for choice in STATUS_FILTER_OPTIONS {
                        option { value: choice, "{choice}" }
                    }
                }
            }

            match notice() {
                Some(Notice::Enrolled(title)) => rsx! {
                    p { class: "notice notice--success", "Enrolled in {title}." }
                },
                Some(Notice::Failed(message)) => rsx! {
                    p { class: "section-error", "{message}" }
                },
                None => rsx! {},
            }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => {
                    let cards = map_trial_cards(
                        &data.trials,
                        &query(),
                        &StatusFilter::parse(&status()),
                        &data.enrolled,
                    );
                    rsx! {
                        if cards.is_empty() {
                            p { class: "section-empty", "No trials match your search." }
                        } else {
                            ul { class: "trial-list",
                                for card in cards {
                                    TrialCard {
                                        key: "{card.id}",
                                        card: card.clone(),
                                        can_enroll,
                                        on_enroll: enroll,
                                    }
                                }
                            }
                        }
                    }
                }
                ViewState::Error(err) => rsx! {
                    p { class: "section-error", "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn TrialCard(card: TrialCardVm, can_enroll: bool, on_enroll: EventHandler<TrialCardVm>) -> Element {
    let for_enroll = card.clone();
    rsx! {
        li { class: "trial-card",
            div { class: "trial-card-head",
                strong { "{card.title}" }
                span { class: card.status_class, "{card.status_label}" }
            }
            p { class: "muted", "{card.condition} · {card.location}" }
            if !card.sponsor.is_empty() {
                p { class: "muted", "Sponsor: {card.sponsor}" }
            }
            if let Some(phases) = card.phases.clone() {
                p { class: "muted", "{phases}" }
            }
            if let Some(participants) = card.participants.clone() {
                p { class: "muted", "{participants}" }
            }
            if !card.description.is_empty() {
                p { "{card.description}" }
            }
            div { class: "trial-card-actions",
                Link {
                    class: "button button--secondary",
                    to: Route::Timeline { trial_id: card.id.to_string() },
                    "View timeline"
                }
                if card.enrolled {
                    span { class: "notice notice--success", "Enrolled" }
                } else if can_enroll && card.can_enroll {
                    button {
                        class: "button",
                        onclick: move |_| on_enroll.call(for_enroll.clone()),
                        "Enroll"
                    }
                }
            }
        }
    }
}
