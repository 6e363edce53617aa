use serde::{Deserialize, Serialize};

use crate::model::enrollment::Enrollment;
use crate::model::ids::UserId;

/// Headline numbers on the coordinator dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrcMetrics {
    #[serde(default)]
    pub total_patients: u32,
    #[serde(default)]
    pub active_enrollments: u32,
    #[serde(default)]
    pub average_compliance: f64,
    #[serde(default)]
    pub high_risk_patients: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedPatient {
    pub patient_id: UserId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub enrollments: Vec<Enrollment>,
    #[serde(default)]
    pub total_enrollments: u32,
}

impl ManagedPatient {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    /// Lowest compliance across active enrollments; drives risk sorting.
    #[must_use]
    pub fn lowest_compliance(&self) -> Option<f64> {
        self.enrollments
            .iter()
            .filter(|e| e.is_active)
            .map(|e| e.compliance_rate)
            .reduce(f64::min)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub patient_name: String,
    pub trial_title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub compliance_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrcAlert {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// `GET /crc/{crcId}/dashboard-data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrcDashboard {
    pub crc_id: UserId,
    pub metrics: CrcMetrics,
    #[serde(default)]
    pub managed_patients: Vec<ManagedPatient>,
    #[serde(default)]
    pub recent_activity: Vec<RecentActivity>,
    #[serde(default)]
    pub alerts: Vec<CrcAlert>,
}

impl CrcDashboard {
    /// True when the coordinator has nothing assigned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.managed_patients.is_empty() && self.recent_activity.is_empty()
    }
}

/// Portfolio-wide numbers from `GET /analytics/dashboard-metrics`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioMetrics {
    #[serde(default)]
    pub active_trials: u32,
    #[serde(default)]
    pub total_patients: u32,
    #[serde(default)]
    pub compliance_rate: u32,
    #[serde(default)]
    pub enrollment_rate: u32,
    #[serde(default)]
    pub alerts_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub metrics: PortfolioMetrics,
    #[serde(default)]
    pub alerts: Vec<CrcAlert>,
}
