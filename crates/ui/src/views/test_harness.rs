use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use codeblue_core::model::{
    CrcDashboard, CrcMetrics, EmrUploadSummary, Enrollment, EnrollmentId, NewEnrollment,
    PatientProfile, PortfolioMetrics, PortfolioSnapshot, ProgressAck, ProgressSnapshot, ThreadId,
    Trial, TrialId, TrialRecommendation, User, UserId, UserRole,
};
use codeblue_core::time::fixed_now;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use serde_json::{Value, json};
use services::api::{
    AgentApi, ApiError, AuthApi, Backend, DashboardApi, EnrollmentApi, PatientApi, TrialsApi,
};
use services::{AppServices, ClientConfig, Clock};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::routes::provide_current_user;
use crate::views::{
    ChatView, CoordinatorView, DashboardView, LoginView, RecordsView, TimelineView, TrialsView,
};

/// Backend double whose responses are set per test.
#[derive(Default)]
pub struct FakeBackend {
    pub profile: Option<PatientProfile>,
    pub trials: Vec<Trial>,
    pub recommendations: Vec<TrialRecommendation>,
    pub enrollments: Vec<Enrollment>,
    pub stages: Value,
    pub crc: Option<CrcDashboard>,
    pub recommendations_fail: bool,
    pub progress_pushes: Mutex<Vec<ProgressSnapshot>>,
}

#[async_trait]
impl AuthApi for FakeBackend {
    async fn fetch_user(&self, _email: &str, _password: &str) -> Result<User, ApiError> {
        Err(ApiError::NotFound)
    }
}

#[async_trait]
impl PatientApi for FakeBackend {
    async fn profile(&self, _patient_id: &UserId) -> Result<PatientProfile, ApiError> {
        self.profile.clone().ok_or(ApiError::NotFound)
    }

    async fn recommendations(
        &self,
        _patient_id: &UserId,
    ) -> Result<Vec<TrialRecommendation>, ApiError> {
        if self.recommendations_fail {
            return Err(ApiError::Decode("analytics offline".to_owned()));
        }
        Ok(self.recommendations.clone())
    }

    async fn upload_emr_pdf(
        &self,
        _patient_id: &UserId,
        _file_name: &str,
        _bytes: Vec<u8>,
    ) -> Result<EmrUploadSummary, ApiError> {
        Ok(EmrUploadSummary::default())
    }
}

#[async_trait]
impl TrialsApi for FakeBackend {
    async fn available_trials(&self) -> Result<Vec<Trial>, ApiError> {
        Ok(self.trials.clone())
    }

    async fn trial_stages(&self, _trial_id: &TrialId) -> Result<Value, ApiError> {
        Ok(self.stages.clone())
    }
}

#[async_trait]
impl EnrollmentApi for FakeBackend {
    async fn list_enrollments(&self, _patient_id: &UserId) -> Result<Vec<Enrollment>, ApiError> {
        Ok(self.enrollments.clone())
    }

    async fn enroll(&self, _request: &NewEnrollment) -> Result<(), ApiError> {
        Ok(())
    }

    async fn withdraw(&self, _enrollment_id: &EnrollmentId) -> Result<(), ApiError> {
        Ok(())
    }

    async fn update_progress(
        &self,
        enrollment_id: &EnrollmentId,
        snapshot: &ProgressSnapshot,
    ) -> Result<ProgressAck, ApiError> {
        self.progress_pushes.lock().unwrap().push(snapshot.clone());
        Ok(ProgressAck {
            enrollment_id: enrollment_id.clone(),
            current_stage: 1,
            completion_rate: snapshot.overall_rate(),
        })
    }
}

#[async_trait]
impl DashboardApi for FakeBackend {
    async fn crc_dashboard(&self, crc_id: &UserId) -> Result<CrcDashboard, ApiError> {
        Ok(self.crc.clone().unwrap_or_else(|| CrcDashboard {
            crc_id: crc_id.clone(),
            metrics: CrcMetrics::default(),
            managed_patients: Vec::new(),
            recent_activity: Vec::new(),
            alerts: Vec::new(),
        }))
    }

    async fn portfolio_metrics(&self) -> Result<PortfolioSnapshot, ApiError> {
        Ok(PortfolioSnapshot {
            metrics: PortfolioMetrics {
                active_trials: 4,
                total_patients: 120,
                compliance_rate: 88,
                enrollment_rate: 61,
                alerts_count: 0,
            },
            alerts: Vec::new(),
        })
    }
}

#[async_trait]
impl AgentApi for FakeBackend {
    async fn invoke(&self, _thread_id: &ThreadId, content: &str) -> Result<String, ApiError> {
        Ok(format!("You said: {content}"))
    }
}

pub fn sample_stages() -> Value {
    json!({
        "1": { "name": "Screening", "summary": "Eligibility review", "checklist": ["Consent form", "Blood work"] },
        "2": { "name": "Treatment", "summary": "Dosing visits", "checklist": ["Visit 1"] }
    })
}

pub fn user(role: UserRole) -> User {
    User {
        main_id: UserId::new("u-1"),
        email: "ada@example.org".to_owned(),
        first_name: "Ada".to_owned(),
        last_name: "Lee".to_owned(),
        user_type: role,
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Login,
    Dashboard,
    Trials,
    Timeline(String),
    Records,
    Chat,
    Coordinator,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<AppServices>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    let ctx = use_context_provider(|| build_app_context(&app));
    provide_current_user(&ctx);
    let view = props.view.clone();
    use_context_provider(move || view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    match use_context::<ViewKind>() {
        ViewKind::Login => rsx! { LoginView {} },
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::Trials => rsx! { TrialsView {} },
        ViewKind::Timeline(trial_id) => rsx! { TimelineView { trial_id } },
        ViewKind::Records => rsx! { RecordsView {} },
        ViewKind::Chat => rsx! { ChatView {} },
        ViewKind::Coordinator => rsx! { CoordinatorView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub backend: Arc<FakeBackend>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuilds and lets pending resources settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Builds the view over `backend`, signed in as `signed_in` when given.
pub async fn setup_view_harness(
    view: ViewKind,
    backend: FakeBackend,
    signed_in: Option<User>,
) -> ViewHarness {
    let backend = Arc::new(backend);
    let storage = Storage::in_memory();
    let seams = Backend {
        auth: backend.clone(),
        patients: backend.clone(),
        trials: backend.clone(),
        enrollments: backend.clone(),
        dashboards: backend.clone(),
        agent: backend.clone(),
    };
    let config = ClientConfig::new("http://localhost:8000").expect("valid base url");
    let app = Arc::new(AppServices::from_parts(
        &storage,
        &seams,
        config,
        Clock::fixed(fixed_now()),
    ));
    if let Some(user) = signed_in {
        app.session().login(user).await.expect("login");
    }

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness {
        dom,
        storage,
        backend,
    }
}
