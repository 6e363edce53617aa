use std::sync::Arc;

use codeblue_core::FetchOutcome;
use codeblue_core::model::{
    CrcDashboard, Enrollment, PatientProfile, PortfolioSnapshot, RiskLevel, Trial,
    TrialRecommendation, UserId,
};

use crate::api::{DashboardApi, EnrollmentApi, PatientApi, TrialsApi};

/// Everything the patient dashboard shows, each section loaded on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientDashboard {
    pub profile: FetchOutcome<PatientProfile>,
    pub trials: FetchOutcome<Vec<Trial>>,
    pub recommendations: FetchOutcome<Vec<TrialRecommendation>>,
    pub enrollments: FetchOutcome<Vec<Enrollment>>,
}

/// Summary of the patient's first active enrollment.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressOverview {
    pub trial_title: String,
    pub current_stage: u32,
    pub total_stages: usize,
    pub compliance_rate: f64,
    pub risk: RiskLevel,
}

impl PatientDashboard {
    #[must_use]
    pub fn progress_overview(&self) -> Option<ProgressOverview> {
        let enrollment = self
            .enrollments
            .as_loaded()?
            .iter()
            .find(|e| e.is_active)?;
        Some(ProgressOverview {
            trial_title: enrollment.trial_title().to_owned(),
            current_stage: enrollment.current_stage,
            total_stages: enrollment.total_stages(),
            compliance_rate: enrollment.compliance_rate,
            risk: enrollment.risk_level(),
        })
    }
}

/// What the coordinator dashboard shows.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorDashboard {
    pub overview: FetchOutcome<CrcDashboard>,
    pub portfolio: FetchOutcome<PortfolioSnapshot>,
}

/// Loads dashboard sections concurrently; a failing section never hides the
/// others and never turns into placeholder data.
#[derive(Clone)]
pub struct DashboardService {
    patients: Arc<dyn PatientApi>,
    trials: Arc<dyn TrialsApi>,
    enrollments: Arc<dyn EnrollmentApi>,
    dashboards: Arc<dyn DashboardApi>,
}

impl DashboardService {
    #[must_use]
    pub fn new(
        patients: Arc<dyn PatientApi>,
        trials: Arc<dyn TrialsApi>,
        enrollments: Arc<dyn EnrollmentApi>,
        dashboards: Arc<dyn DashboardApi>,
    ) -> Self {
        Self {
            patients,
            trials,
            enrollments,
            dashboards,
        }
    }

    pub async fn patient_dashboard(&self, patient_id: &UserId) -> PatientDashboard {
        let (profile, trials, recommendations, enrollments) = tokio::join!(
            self.patients.profile(patient_id),
            self.trials.available_trials(),
            self.patients.recommendations(patient_id),
            self.enrollments.list_enrollments(patient_id),
        );

        let dashboard = PatientDashboard {
            profile: FetchOutcome::from_result(profile),
            trials: FetchOutcome::from_list(trials),
            recommendations: FetchOutcome::from_list(recommendations),
            enrollments: FetchOutcome::from_list(enrollments),
        };
        log_failures(
            "patient",
            &[
                ("profile", dashboard.profile.is_failed()),
                ("trials", dashboard.trials.is_failed()),
                ("recommendations", dashboard.recommendations.is_failed()),
                ("enrollments", dashboard.enrollments.is_failed()),
            ],
        );
        dashboard
    }

    pub async fn coordinator_dashboard(&self, crc_id: &UserId) -> CoordinatorDashboard {
        let (overview, portfolio) = tokio::join!(
            self.dashboards.crc_dashboard(crc_id),
            self.dashboards.portfolio_metrics(),
        );
        let overview = match FetchOutcome::from_result(overview) {
            FetchOutcome::Loaded(data) if data.is_empty() => FetchOutcome::Empty,
            other => other,
        };
        let dashboard = CoordinatorDashboard {
            overview,
            portfolio: FetchOutcome::from_result(portfolio),
        };
        log_failures(
            "coordinator",
            &[
                ("overview", dashboard.overview.is_failed()),
                ("portfolio", dashboard.portfolio.is_failed()),
            ],
        );
        dashboard
    }

    pub async fn profile(&self, patient_id: &UserId) -> FetchOutcome<PatientProfile> {
        FetchOutcome::from_result(self.patients.profile(patient_id).await)
    }

    /// Reloads only the smart-matching panel.
    pub async fn refresh_recommendations(
        &self,
        patient_id: &UserId,
    ) -> FetchOutcome<Vec<TrialRecommendation>> {
        FetchOutcome::from_list(self.patients.recommendations(patient_id).await)
    }
}

fn log_failures(dashboard: &str, sections: &[(&str, bool)]) {
    for (section, failed) in sections {
        if *failed {
            tracing::warn!(dashboard, section, "dashboard section failed to load");
        }
    }
}
