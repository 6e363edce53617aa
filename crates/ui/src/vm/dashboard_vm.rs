use codeblue_core::model::{
    CrcDashboard, Enrollment, EnrollmentId, ManagedPatient, PortfolioMetrics, RiskLevel,
    TrialId, TrialRecommendation,
};
use services::ProgressOverview;

use crate::vm::time_fmt::format_backend_date;

#[must_use]
pub fn risk_class(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::Low => "risk risk--low",
        RiskLevel::Medium => "risk risk--medium",
        RiskLevel::High => "risk risk--high",
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageDotVm {
    pub number: usize,
    pub name: String,
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnrollmentCardVm {
    pub enrollment_id: EnrollmentId,
    pub trial_id: TrialId,
    pub trial_title: String,
    pub status: String,
    pub active: bool,
    pub stage_label: String,
    pub compliance_label: String,
    pub risk_label: &'static str,
    pub risk_class: &'static str,
    pub next_visit: String,
    pub dots: Vec<StageDotVm>,
}

impl From<&Enrollment> for EnrollmentCardVm {
    fn from(enrollment: &Enrollment) -> Self {
        let risk = enrollment.risk_level();
        Self {
            enrollment_id: enrollment.enrollment_id.clone(),
            trial_id: enrollment.trial_id.clone(),
            trial_title: enrollment.trial_title().to_owned(),
            status: enrollment.status.as_str().to_owned(),
            active: enrollment.is_active,
            stage_label: format!(
                "Stage {} of {}",
                enrollment.current_stage,
                enrollment.total_stages()
            ),
            compliance_label: format!("{:.0}% compliance", enrollment.compliance_rate),
            risk_label: risk.as_str(),
            risk_class: risk_class(risk),
            next_visit: format_backend_date(enrollment.next_visit.as_deref()),
            dots: enrollment
                .stage_markers()
                .into_iter()
                .map(|marker| StageDotVm {
                    number: marker.number,
                    name: marker.name,
                    completed: marker.completed,
                })
                .collect(),
        }
    }
}

#[must_use]
pub fn map_enrollment_cards(enrollments: &[Enrollment]) -> Vec<EnrollmentCardVm> {
    enrollments.iter().map(EnrollmentCardVm::from).collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecommendationVm {
    pub trial_id: TrialId,
    pub title: String,
    pub subtitle: String,
    pub score_label: String,
    pub reasons: Vec<String>,
}

#[must_use]
pub fn map_recommendations(items: &[TrialRecommendation]) -> Vec<RecommendationVm> {
    items
        .iter()
        .map(|item| RecommendationVm {
            trial_id: item.trial_id.clone(),
            title: item.title.clone(),
            subtitle: [item.condition.as_str(), item.location.as_str()]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" · "),
            score_label: format!("{}% match", item.match_score),
            reasons: item.match_reasons.clone(),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverviewVm {
    pub trial_title: String,
    pub stage_label: String,
    pub stage_percent: u8,
    pub compliance_label: String,
    pub risk_class: &'static str,
}

impl From<&ProgressOverview> for OverviewVm {
    fn from(overview: &ProgressOverview) -> Self {
        let total = overview.total_stages.max(1);
        let reached = (overview.current_stage as usize).min(total);
        Self {
            trial_title: overview.trial_title.clone(),
            stage_label: format!("Stage {reached} of {total}"),
            stage_percent: codeblue_core::model::percent(reached, total),
            compliance_label: format!("{:.0}% compliance", overview.compliance_rate),
            risk_class: risk_class(overview.risk),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricTileVm {
    pub label: &'static str,
    pub value: String,
}

#[must_use]
pub fn crc_metric_tiles(dashboard: &CrcDashboard) -> Vec<MetricTileVm> {
    let metrics = &dashboard.metrics;
    vec![
        MetricTileVm {
            label: "Patients",
            value: metrics.total_patients.to_string(),
        },
        MetricTileVm {
            label: "Active enrollments",
            value: metrics.active_enrollments.to_string(),
        },
        MetricTileVm {
            label: "Average compliance",
            value: format!("{:.1}%", metrics.average_compliance),
        },
        MetricTileVm {
            label: "High-risk patients",
            value: metrics.high_risk_patients.to_string(),
        },
    ]
}

#[must_use]
pub fn portfolio_tiles(metrics: &PortfolioMetrics) -> Vec<MetricTileVm> {
    vec![
        MetricTileVm {
            label: "Active trials",
            value: metrics.active_trials.to_string(),
        },
        MetricTileVm {
            label: "Total patients",
            value: metrics.total_patients.to_string(),
        },
        MetricTileVm {
            label: "Compliance rate",
            value: format!("{}%", metrics.compliance_rate),
        },
        MetricTileVm {
            label: "Enrollment rate",
            value: format!("{}%", metrics.enrollment_rate),
        },
    ]
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientRowVm {
    pub name: String,
    pub email: String,
    pub enrollments: usize,
    pub compliance_label: String,
    pub risk_class: &'static str,
}

/// Managed patients, lowest compliance first; patients without active
/// enrollments go last.
#[must_use]
pub fn map_patient_rows(patients: &[ManagedPatient]) -> Vec<PatientRowVm> {
    let mut ranked: Vec<(&ManagedPatient, Option<f64>)> = patients
        .iter()
        .map(|patient| (patient, patient.lowest_compliance()))
        .collect();
    ranked.sort_by(|(_, a), (_, b)| match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    ranked
        .into_iter()
        .map(|(patient, lowest)| PatientRowVm {
            name: patient.full_name(),
            email: patient.email.clone(),
            enrollments: patient.enrollments.len(),
            compliance_label: lowest.map_or_else(
                || "No active enrollment".to_owned(),
                |rate| format!("{rate:.0}%"),
            ),
            risk_class: lowest.map_or("risk", |rate| {
                risk_class(RiskLevel::from_compliance(rate))
            }),
        })
        .collect()
}
