use codeblue_core::model::{
    CompletionMatrix, Enrollment, EnrollmentId, EnrollmentStatus, ExpandedSet, PatientProfile,
    ProgressSnapshot, Trial, TrialDetails, TrialId, TrialStatus, UserId, UserRole,
};
use storage::repository::ProgressRepository;

use super::test_harness::{FakeBackend, ViewKind, sample_stages, setup_view_harness, user};

fn trial(id: &str, title: &str, status: TrialStatus) -> Trial {
    Trial {
        id: TrialId::new(id),
        title: title.to_owned(),
        status,
        condition: "Hypertension".to_owned(),
        location: "Boston, MA".to_owned(),
        sponsor: "Heart Institute".to_owned(),
        description: String::new(),
        phases: None,
        distance: None,
        insurance: None,
        estimated_duration: None,
        max_participants: Some(100),
        current_participants: Some(40),
    }
}

fn active_enrollment() -> Enrollment {
    Enrollment {
        enrollment_id: EnrollmentId::new("enr-1"),
        patient_id: UserId::new("u-1"),
        trial_id: TrialId::new("t1"),
        status: EnrollmentStatus::Active,
        is_active: true,
        current_stage: 2,
        compliance_rate: 92.0,
        enrollment_date: None,
        last_updated: None,
        next_visit: None,
        trial_details: Some(TrialDetails {
            title: Some("CARDIO-PREVENT".to_owned()),
            ..TrialDetails::default()
        }),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn login_view_smoke_renders_form() {
    let mut harness = setup_view_harness(ViewKind::Login, FakeBackend::default(), None).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Code Blue"), "missing title in {html}");
    assert!(html.contains("Email"), "missing email field in {html}");
    assert!(!html.contains("Continue"), "unexpected resume link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn login_view_smoke_offers_resume_for_saved_session() {
    let mut harness = setup_view_harness(
        ViewKind::Login,
        FakeBackend::default(),
        Some(user(UserRole::Patient)),
    )
    .await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Signed in as Ada Lee"), "missing resume text in {html}");
    assert!(html.contains("Continue"), "missing resume link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_renders_sections_independently() {
    let backend = FakeBackend {
        profile: Some(PatientProfile {
            first_name: "Ada".to_owned(),
            ..PatientProfile::default()
        }),
        trials: vec![
            trial("t1", "CARDIO-PREVENT", TrialStatus::Recruiting),
            trial("t2", "ONCO-LEGACY", TrialStatus::Completed),
        ],
        enrollments: vec![active_enrollment()],
        recommendations_fail: true,
        ..FakeBackend::default()
    };
    let mut harness =
        setup_view_harness(ViewKind::Dashboard, backend, Some(user(UserRole::Patient))).await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Welcome back, Ada"), "missing greeting in {html}");
    assert!(html.contains("CARDIO-PREVENT"), "missing enrollment in {html}");
    assert!(html.contains("Withdraw"), "missing withdraw action in {html}");
    assert!(
        html.contains("Could not load this section"),
        "missing recommendations error in {html}"
    );
    assert!(!html.contains("ONCO-LEGACY"), "closed trial listed as open in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_asks_to_sign_in() {
    let mut harness = setup_view_harness(ViewKind::Dashboard, FakeBackend::default(), None).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Please sign in to continue."), "missing prompt in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn trials_view_smoke_lists_catalog() {
    let backend = FakeBackend {
        trials: vec![
            trial("t1", "CARDIO-PREVENT", TrialStatus::Recruiting),
            trial("t2", "ONCO-IMMUNE", TrialStatus::Active),
        ],
        ..FakeBackend::default()
    };
    let mut harness =
        setup_view_harness(ViewKind::Trials, backend, Some(user(UserRole::Patient))).await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Clinical trials"), "missing heading in {html}");
    assert!(html.contains("CARDIO-PREVENT"), "missing first trial in {html}");
    assert!(html.contains("ONCO-IMMUNE"), "missing second trial in {html}");
    assert!(html.contains("Enroll"), "missing enroll action in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn timeline_view_smoke_resumes_saved_progress() {
    let backend = FakeBackend {
        stages: sample_stages(),
        ..FakeBackend::default()
    };
    let mut harness = setup_view_harness(
        ViewKind::Timeline("t1".to_owned()),
        backend,
        Some(user(UserRole::Patient)),
    )
    .await;
    let saved = ProgressSnapshot::new(
        CompletionMatrix::from_rows(vec![vec![true, false], vec![false]]),
        &ExpandedSet::new(),
    );
    harness
        .storage
        .progress
        .save_progress(&TrialId::new("t1"), &saved)
        .await
        .expect("save progress");

    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Screening"), "missing first stage in {html}");
    assert!(html.contains("Treatment"), "missing second stage in {html}");
    assert!(html.contains("33% Complete"), "missing overall progress in {html}");
    assert!(html.contains("50% Complete"), "missing stage progress in {html}");
    assert!(html.contains("Stage 1 of 2"), "missing current stage in {html}");
    assert!(
        harness.backend.progress_pushes.lock().unwrap().is_empty(),
        "opening a timeline should not push progress"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn timeline_view_smoke_reports_missing_stages() {
    let mut harness = setup_view_harness(
        ViewKind::Timeline("t9".to_owned()),
        FakeBackend::default(),
        Some(user(UserRole::Patient)),
    )
    .await;
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("has not published its stages"),
        "missing empty notice in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn records_view_smoke_renders_profile() {
    let backend = FakeBackend {
        profile: Some(PatientProfile {
            first_name: "Ada".to_owned(),
            last_name: "Lee".to_owned(),
            blood_type: Some("O+".to_owned()),
            ..PatientProfile::default()
        }),
        ..FakeBackend::default()
    };
    let mut harness =
        setup_view_harness(ViewKind::Records, backend, Some(user(UserRole::Patient))).await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Ada Lee"), "missing name in {html}");
    assert!(html.contains("O+"), "missing blood type in {html}");
    assert!(html.contains("Upload"), "missing upload form in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn chat_view_smoke_renders_empty_conversation() {
    let mut harness =
        setup_view_harness(ViewKind::Chat, FakeBackend::default(), Some(user(UserRole::Doctor)))
            .await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Assistant"), "missing heading in {html}");
    assert!(html.contains("Ask about your trial"), "missing greeting in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn coordinator_view_smoke_renders_portfolio() {
    let mut harness = setup_view_harness(
        ViewKind::Coordinator,
        FakeBackend::default(),
        Some(user(UserRole::Crc)),
    )
    .await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Active trials"), "missing portfolio tile in {html}");
    assert!(html.contains("120"), "missing patient total in {html}");
    assert!(
        html.contains("No patients are assigned to you yet."),
        "missing empty overview in {html}"
    );
}
