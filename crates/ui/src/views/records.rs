use std::path::Path;

use codeblue_core::FetchOutcome;
use codeblue_core::model::{EmrUploadSummary, PatientProfile};
use dioxus::prelude::*;
use serde_json::Value;

use crate::context::AppContext;
use crate::routes::use_current_user;
use crate::views::state::{SectionNotice, outcome_kind};

#[derive(Clone, Debug, PartialEq)]
enum UploadState {
    Idle,
    Uploading,
    Done(EmrUploadSummary),
    Failed(String),
}

fn field_rows(profile: &PatientProfile) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    if let Some(age) = profile.age {
        rows.push(("Age".to_owned(), age.to_string()));
    }
    if let Some(blood) = &profile.blood_type {
        rows.push(("Blood type".to_owned(), blood.clone()));
    }
    if !profile.conditions.is_empty() {
        rows.push(("Conditions".to_owned(), profile.conditions.join(", ")));
    }
    if let Some(insurance) = &profile.insurance {
        rows.push(("Insurance".to_owned(), insurance.clone()));
    }
    rows.extend(
        profile
            .extra
            .iter()
            .map(|(key, value)| (key.clone(), value_text(value))),
    );
    rows
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

#[component]
pub fn RecordsView() -> Element {
    let ctx = use_context::<AppContext>();
    let current_user = use_current_user();
    let dashboards = ctx.dashboards();
    let emr = ctx.emr();
    let mut path = use_signal(String::new);
    let mut upload = use_signal(|| UploadState::Idle);

    let mut profile = use_resource(move || {
        let dashboards = dashboards.clone();
        let user = current_user();
        async move {
            let user = user?;
            Some(dashboards.profile(&user.main_id).await)
        }
    });

    let on_upload = move |evt: FormEvent| {
        evt.prevent_default();
        let Some(user) = current_user() else {
            upload.set(UploadState::Failed("Please sign in to continue.".to_owned()));
            return;
        };
        let file = path().trim().to_owned();
        if file.is_empty() {
            upload.set(UploadState::Failed("Choose a PDF file first.".to_owned()));
            return;
        }
        let emr = emr.clone();
        upload.set(UploadState::Uploading);
        spawn(async move {
            let file_name = Path::new(&file)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.clone());
            let bytes = match tokio::fs::read(&file).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    upload.set(UploadState::Failed(format!("Could not read {file_name}: {err}")));
                    return;
                }
            };
            match emr.upload(&user.main_id, &file_name, bytes).await {
                Ok(summary) => {
                    upload.set(UploadState::Done(summary));
                    profile.restart();
                }
                Err(err) => upload.set(UploadState::Failed(err.to_string())),
            }
        });
    };

    let profile_state = profile.read().clone();
    let upload_state = upload();
    let busy = upload_state == UploadState::Uploading;

    rsx! {
        div { class: "page records",
            h2 { "Medical records" }
            section { class: "card",
                h3 { "Profile" }
                match profile_state {
                    None => rsx! {
                        p { "Loading..." }
                    },
                    Some(None) => rsx! {
                        p { "Please sign in to continue." }
                    },
                    Some(Some(outcome)) => rsx! {
                        SectionNotice {
                            outcome: outcome_kind(&outcome),
                            empty_text: "No profile on file.",
                        }
                        if let FetchOutcome::Loaded(profile) = outcome {
                            p { class: "profile-name", "{profile.full_name()}" }
                            dl { class: "profile-fields",
                                for (label, value) in field_rows(&profile) {
                                    dt { "{label}" }
                                    dd { "{value}" }
                                }
                            }
                        }
                    },
                }
            }

            section { class: "card",
                h3 { "Upload EMR" }
                p { class: "muted", "Upload a PDF of your medical record to fill in your profile." }
                form { class: "upload-form", onsubmit: on_upload,
                    input {
                        r#type: "text",
                        placeholder: "/path/to/record.pdf",
                        value: "{path}",
                        oninput: move |evt| path.set(evt.value()),
                    }
                    button { r#type: "submit", disabled: busy,
                        if busy { "Uploading..." } else { "Upload" }
                    }
                }
                match upload_state {
                    UploadState::Idle | UploadState::Uploading => rsx! {},
                    UploadState::Done(summary) => rsx! {
                        div { class: "upload-result",
                            p { "{summary.summary}" }
                            if !summary.extracted_data.is_empty() {
                                dl {
                                    for (key, value) in summary.extracted_data.iter() {
                                        dt { "{key}" }
                                        dd { "{value_text(value)}" }
                                    }
                                }
                            }
                        }
                    },
                    UploadState::Failed(message) => rsx! {
                        p { class: "error", "{message}" }
                    },
                }
            }
        }
    }
}
