use codeblue_core::FetchOutcome;
use codeblue_core::model::{CrcAlert, RecentActivity};
use dioxus::prelude::*;

use crate::context::AppContext;
use crate::routes::use_current_user;
use crate::views::state::{SectionNotice, outcome_kind};
use crate::vm::{MetricTileVm, PatientRowVm, crc_metric_tiles, map_patient_rows, portfolio_tiles};

#[derive(Clone, Debug, PartialEq)]
struct OverviewData {
    tiles: Vec<MetricTileVm>,
    patients: Vec<PatientRowVm>,
    activity: Vec<(String, String)>,
    alerts: Vec<CrcAlert>,
}

#[derive(Clone, Debug, PartialEq)]
struct CoordinatorData {
    overview: FetchOutcome<OverviewData>,
    portfolio: FetchOutcome<(Vec<MetricTileVm>, Vec<CrcAlert>)>,
}

#[component]
pub fn CoordinatorView() -> Element {
    let ctx = use_context::<AppContext>();
    let current_user = use_current_user();
    let dashboards = ctx.dashboards();

    let mut resource = use_resource(move || {
        let dashboards = dashboards.clone();
        let user = current_user();
        async move {
            let user = user?;
            let dashboard = dashboards.coordinator_dashboard(&user.main_id).await;
            Some(CoordinatorData {
                overview: dashboard.overview.map(|data| OverviewData {
                    tiles: crc_metric_tiles(&data),
                    patients: map_patient_rows(&data.managed_patients),
                    activity: data.recent_activity.iter().map(activity_line).collect(),
                    alerts: data.alerts,
                }),
                portfolio: dashboard
                    .portfolio
                    .map(|snapshot| (portfolio_tiles(&snapshot.metrics), snapshot.alerts)),
            })
        }
    });

    let data = resource.read().clone();

    rsx! {
        div { class: "page coordinator",
            div { class: "card-header",
                h2 { "Coordinator dashboard" }
                button { class: "link-button", onclick: move |_| resource.restart(), "Refresh" }
            }
            match data {
                None => rsx! {
                    p { "Loading..." }
                },
                Some(None) => rsx! {
                    p { "Please sign in to continue." }
                },
                Some(Some(data)) => rsx! {
                    section { class: "card",
                        h3 { "Portfolio" }
                        SectionNotice {
                            outcome: outcome_kind(&data.portfolio),
                            empty_text: "No portfolio metrics yet.",
                        }
                        if let FetchOutcome::Loaded((tiles, alerts)) = data.portfolio.clone() {
                            MetricTiles { tiles }
                            AlertList { alerts }
                        }
                    }

                    section { class: "card",
                        h3 { "My patients" }
                        SectionNotice {
                            outcome: outcome_kind(&data.overview),
                            empty_text: "No patients are assigned to you yet.",
                        }
                        if let FetchOutcome::Loaded(overview) = data.overview.clone() {
                            MetricTiles { tiles: overview.tiles.clone() }
                            AlertList { alerts: overview.alerts.clone() }
                            table { class: "patient-table",
                                thead {
                                    tr {
                                        th { "Patient" }
                                        th { "Email" }
                                        th { "Enrollments" }
                                        th { "Lowest compliance" }
                                    }
                                }
                                tbody {
                                    for row in overview.patients.iter() {
                                        tr { key: "{row.email}",
                                            td { "{row.name}" }
                                            td { "{row.email}" }
                                            td { "{row.enrollments}" }
                                            td { span { class: row.risk_class, "{row.compliance_label}" } }
                                        }
                                    }
                                }
                            }
                            h4 { "Recent activity" }
                            if overview.activity.is_empty() {
                                p { class: "section-empty", "No recent activity." }
                            }
                            ul { class: "activity-list",
                                for (name, detail) in overview.activity.iter() {
                                    li {
                                        strong { "{name}" }
                                        " · {detail}"
                                    }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}

fn activity_line(item: &RecentActivity) -> (String, String) {
    (
        item.patient_name.clone(),
        format!(
            "{} · {} · {:.0}%",
            item.trial_title, item.status, item.compliance_rate
        ),
    )
}

#[component]
fn MetricTiles(tiles: Vec<MetricTileVm>) -> Element {
    rsx! {
        div { class: "metric-tiles",
            for tile in tiles {
                div { key: "{tile.label}", class: "metric-tile",
                    span { class: "metric-value", "{tile.value}" }
                    span { class: "metric-label", "{tile.label}" }
                }
            }
        }
    }
}

#[component]
fn AlertList(alerts: Vec<CrcAlert>) -> Element {
    rsx! {
        if !alerts.is_empty() {
            ul { class: "alert-list",
                for alert in alerts {
                    li {
                        class: match alert.priority.as_deref() {
                            Some("high") => "alert alert--high",
                            _ => "alert",
                        },
                        if let Some(title) = alert.title.clone() {
                            strong { "{title}: " }
                        }
                        "{alert.message}"
                    }
                }
            }
        }
    }
}
