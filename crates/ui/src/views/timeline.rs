use codeblue_core::model::TrialId;
use dioxus::prelude::*;
use dioxus_router::Link;
use services::{SaveReport, TrialTimeline};

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::{StageNodeVm, map_timeline};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimelineIntent {
    ToggleStage(usize),
    ToggleTask(usize, usize),
}

fn sync_note(report: Option<&SaveReport>) -> Option<&'static str> {
    match report? {
        SaveReport::Pushed { .. } => Some("Progress saved and shared with your care team."),
        SaveReport::NoSession | SaveReport::NotEnrolled => Some("Progress saved on this device."),
        SaveReport::RemoteFailed(_) => {
            Some("Progress saved on this device; it could not be shared right now.")
        }
        SaveReport::LocalFailed(_) => Some("Progress could not be saved."),
    }
}

#[component]
pub fn TimelineView(trial_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let timelines = ctx.timelines();
    let mut timeline = use_signal(|| None::<TrialTimeline>);
    let mut load_error = use_signal(|| None::<String>);
    let mut syncing = use_signal(|| false);
    let mut last_report = use_signal(|| None::<SaveReport>);

    let trial_for_load = trial_id.clone();
    use_future(move || {
        let timelines = timelines.clone();
        let trial_id = TrialId::new(trial_for_load.clone());
        async move {
            match timelines.open(trial_id).await {
                Ok(opened) => {
                    let mut status = opened.subscribe();
                    timeline.set(Some(opened));
                    while status.changed().await.is_ok() {
                        let current = status.borrow_and_update().clone();
                        syncing.set(current.syncing);
                        last_report.set(current.last_report);
                    }
                }
                Err(err) => load_error.set(Some(err.to_string())),
            }
        }
    });

    let apply = use_callback(move |intent: TimelineIntent| {
        let mut guard = timeline.write();
        let Some(open) = guard.as_mut() else {
            return;
        };
        let result = match intent {
            TimelineIntent::ToggleStage(stage) => open.toggle_expanded(stage),
            TimelineIntent::ToggleTask(stage, task) => open.toggle_task(stage, task),
        };
        if let Err(err) = result {
            load_error.set(Some(err.to_string()));
        }
    });

    let vm = timeline
        .read()
        .as_ref()
        .map(|open| map_timeline(open.tracker(), syncing()));
    let note = sync_note(last_report.read().as_ref());

    rsx! {
        div { class: "page timeline",
            div { class: "timeline-header",
                h2 { "Trial timeline" }
                Link { class: "link-button", to: Route::Trials {}, "Back to trials" }
            }
            p { class: "muted", "Trial {trial_id}" }

            if let Some(err) = load_error() {
                p { class: "section-error", "{err}" }
            }

            match vm {
                None => rsx! {
                    if load_error().is_none() {
                        p { "Loading..." }
                    }
                },
                Some(vm) if vm.stages.is_empty() => rsx! {
                    p { class: "section-empty", "This trial has not published its stages yet." }
                },
                Some(vm) => rsx! {
                    div { class: "timeline-summary",
                        div { class: "progress-track",
                            div { class: "progress-fill", style: "width: {vm.overall_percent}%;" }
                        }
                        span { class: "timeline-overall", "{vm.overall_label()}" }
                        span { class: "timeline-current", "{vm.current_stage_label()}" }
                        if vm.syncing {
                            span { class: "sync-indicator", "Syncing…" }
                        } else if let Some(note) = note {
                            span { class: "sync-note", "{note}" }
                        }
                    }
                    ol { class: "timeline-stages",
                        for node in vm.stages {
                            StageNode { key: "{node.index}", node: node.clone(), on_intent: apply }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn StageNode(node: StageNodeVm, on_intent: EventHandler<TimelineIntent>) -> Element {
    let stage = node.index;
    let aria_expanded = if node.expanded { "true" } else { "false" };
    rsx! {
        li { class: "timeline-stage",
            div { class: "timeline-rail",
                span { class: node.color.class(), style: "background: {node.color.hex()};" }
                if node.show_connector {
                    span { class: "timeline-connector" }
                }
            }
            div { class: "timeline-body",
                button {
                    class: "timeline-stage-header",
                    "aria-expanded": aria_expanded,
                    onclick: move |_| on_intent.call(TimelineIntent::ToggleStage(stage)),
                    span { class: "stage-label", "{node.label}" }
                    strong { class: "stage-title", "{node.title}" }
                    if !node.subtitle.is_empty() {
                        span { class: "stage-subtitle", "{node.subtitle}" }
                    }
                    if let Some(duration) = node.duration.clone() {
                        span { class: "stage-duration", "{duration}" }
                    }
                }
                div { class: "progress-track progress-track--stage",
                    div { class: "progress-fill", style: "{node.bar_style()}" }
                }
                span { class: "stage-percent", "{node.percent_label()}" }

                if node.expanded {
                    ul { class: "stage-checklist",
                        for task in node.tasks.iter() {
                            li { key: "{task.index}",
                                label { class: "stage-task",
                                    input {
                                        r#type: "checkbox",
                                        checked: task.completed,
                                        onchange: {
                                            let task_index = task.index;
                                            move |_| on_intent.call(TimelineIntent::ToggleTask(stage, task_index))
                                        },
                                    }
                                    span { class: if task.completed { "task-title task-title--done" } else { "task-title" },
                                        "{task.title}"
                                    }
                                }
                                if let Some(description) = task.description.clone() {
                                    p { class: "task-description", "{description}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
