use codeblue_core::FetchOutcome;
use codeblue_core::model::EnrollmentId;
use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::{Route, use_current_user};
use crate::views::state::{SectionNotice, outcome_kind};
use crate::vm::{
    EnrollmentCardVm, OverviewVm, RecommendationVm, TrialCardVm, map_enrollment_cards,
    map_recommendations,
};

#[derive(Clone, Debug, PartialEq)]
struct DashboardData {
    greeting: String,
    overview: Option<OverviewVm>,
    enrollments: FetchOutcome<Vec<EnrollmentCardVm>>,
    recommendations: FetchOutcome<Vec<RecommendationVm>>,
    open_trials: FetchOutcome<Vec<TrialCardVm>>,
}

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let current_user = use_current_user();
    let dashboards = ctx.dashboards();
    let catalog = ctx.catalog();
    let mut recommendations_override = use_signal(|| None::<FetchOutcome<Vec<RecommendationVm>>>);
    let mut action_error = use_signal(|| None::<String>);

    let mut resource = use_resource(move || {
        let dashboards = dashboards.clone();
        let user = current_user();
        async move {
            let user = user?;
            let dashboard = dashboards.patient_dashboard(&user.main_id).await;
            let greeting = match dashboard.profile.as_loaded() {
                Some(profile) if !profile.first_name.is_empty() => {
                    format!("Welcome back, {}", profile.first_name)
                }
                _ => format!("Welcome back, {}", user.display_name()),
            };
            Some(DashboardData {
                greeting,
                overview: dashboard.progress_overview().as_ref().map(OverviewVm::from),
                enrollments: dashboard
                    .enrollments
                    .clone()
                    .map(|items| map_enrollment_cards(&items)),
                recommendations: dashboard
                    .recommendations
                    .clone()
                    .map(|items| map_recommendations(&items)),
                open_trials: dashboard.trials.clone().map(|trials| {
                    trials
                        .iter()
                        .filter(|trial| trial.status.is_open())
                        .take(3)
                        .map(|trial| TrialCardVm::from_trial(trial, false))
                        .collect()
                }),
            })
        }
    });

    let refresh_recommendations = {
        let dashboards = ctx.dashboards();
        move |_| {
            let dashboards = dashboards.clone();
            let Some(user) = current_user() else {
                return;
            };
            spawn(async move {
                let outcome = dashboards
                    .refresh_recommendations(&user.main_id)
                    .await
                    .map(|items| map_recommendations(&items));
                recommendations_override.set(Some(outcome));
            });
        }
    };

    let withdraw = use_callback(move |enrollment_id: EnrollmentId| {
        let catalog = catalog.clone();
        spawn(async move {
            match catalog.withdraw(&enrollment_id).await {
                Ok(()) => {
                    action_error.set(None);
                    resource.restart();
                }
                Err(err) => action_error.set(Some(err.to_string())),
            }
        });
    });

    let data = resource.read().clone();

    rsx! {
        div { class: "page dashboard",
            match data {
                None => rsx! {
                    p { "Loading..." }
                },
                Some(None) => rsx! {
                    p { "Please sign in to continue." }
                },
                Some(Some(data)) => {
                    let recommendations = recommendations_override()
                        .unwrap_or_else(|| data.recommendations.clone());
                    rsx! {
                        h2 { "{data.greeting}" }

                        if let Some(overview) = data.overview.clone() {
                            section { class: "card overview",
                                h3 { "Current trial" }
                                p { class: "overview-title", "{overview.trial_title}" }
                                p { "{overview.stage_label}" }
                                div { class: "progress-track",
                                    div {
                                        class: "progress-fill",
                                        style: "width: {overview.stage_percent}%;",
                                    }
                                }
                                span { class: overview.risk_class, "{overview.compliance_label}" }
                            }
                        }

                        if let Some(err) = action_error() {
                            p { class: "section-error", "{err}" }
                        }

                        section { class: "card",
                            h3 { "My trials" }
                            SectionNotice {
                                outcome: outcome_kind(&data.enrollments),
                                empty_text: "You are not enrolled in any trials yet.",
                            }
                            if let FetchOutcome::Loaded(cards) = data.enrollments.clone() {
                                ul { class: "enrollment-list",
                                    for card in cards {
                                        EnrollmentCard {
                                            key: "{card.enrollment_id}",
                                            card: card.clone(),
                                            on_withdraw: withdraw,
                                        }
                                    }
                                }
                            }
                        }

                        section { class: "card",
                            div { class: "card-header",
                                h3 { "Recommended for you" }
                                button { class: "link-button", onclick: refresh_recommendations, "Refresh" }
                            }
                            SectionNotice {
                                outcome: outcome_kind(&recommendations),
                                empty_text: "No matching trials right now.",
                            }
                            if let FetchOutcome::Loaded(items) = recommendations {
                                ul { class: "recommendation-list",
                                    for item in items {
                                        li { key: "{item.trial_id}",
                                            div { class: "recommendation-head",
                                                strong { "{item.title}" }
                                                span { class: "match-score", "{item.score_label}" }
                                            }
                                            p { class: "muted", "{item.subtitle}" }
                                            for reason in item.reasons.iter() {
                                                p { class: "match-reason", "{reason}" }
                                            }
                                        }
                                    }
                                }
                            }
                        }

                        section { class: "card",
                            div { class: "card-header",
                                h3 { "Open trials" }
                                Link { to: Route::Trials {}, "Browse all" }
                            }
                            SectionNotice {
                                outcome: outcome_kind(&data.open_trials),
                                empty_text: "No trials are recruiting at the moment.",
                            }
                            if let FetchOutcome::Loaded(trials) = data.open_trials.clone() {
                                ul {
                                    for trial in trials {
                                        li { key: "{trial.id}",
                                            strong { "{trial.title}" }
                                            span { class: trial.status_class, "{trial.status_label}" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn EnrollmentCard(card: EnrollmentCardVm, on_withdraw: EventHandler<EnrollmentId>) -> Element {
    let enrollment_id = card.enrollment_id.clone();
    rsx! {
        li { class: "enrollment-card",
            div { class: "enrollment-head",
                strong { "{card.trial_title}" }
                span { class: "status-pill", "{card.status}" }
            }
            div { class: "stage-dots",
                for dot in card.dots.iter() {
                    span {
                        key: "{dot.number}",
                        class: if dot.completed { "stage-dot stage-dot--done" } else { "stage-dot" },
                        title: "{dot.name}",
                    }
                }
            }
            p { "{card.stage_label}" }
            p {
                span { class: card.risk_class, "{card.compliance_label}" }
                " · Next visit: {card.next_visit}"
            }
            div { class: "enrollment-actions",
                Link {
                    class: "button",
                    to: Route::Timeline { trial_id: card.trial_id.to_string() },
                    "Open timeline"
                }
                if card.active {
                    button {
                        class: "link-button",
                        onclick: move |_| on_withdraw.call(enrollment_id.clone()),
                        "Withdraw"
                    }
                }
            }
        }
    }
}
