use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::ids::{EnrollmentId, TrialId, UserId};
use crate::model::trial::TrialStatus;

/// Stage count assumed when the trial does not publish its stages.
pub const DEFAULT_STAGE_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EnrollmentStatus {
    Active,
    Completed,
    Paused,
    Withdrawn,
    Other(String),
}

impl EnrollmentStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            EnrollmentStatus::Active => "Active",
            EnrollmentStatus::Completed => "Completed",
            EnrollmentStatus::Paused => "Paused",
            EnrollmentStatus::Withdrawn => "Withdrawn",
            EnrollmentStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for EnrollmentStatus {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "active" => EnrollmentStatus::Active,
            "completed" => EnrollmentStatus::Completed,
            "paused" => EnrollmentStatus::Paused,
            "withdrawn" => EnrollmentStatus::Withdrawn,
            _ => EnrollmentStatus::Other(raw),
        }
    }
}

impl From<EnrollmentStatus> for String {
    fn from(status: EnrollmentStatus) -> Self {
        status.as_str().to_owned()
    }
}

/// Compliance bucket shown next to an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    #[must_use]
    pub fn from_compliance(rate: f64) -> Self {
        if rate > 80.0 {
            RiskLevel::Low
        } else if rate > 60.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// Trial fields embedded in an enrollment listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialDetails {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub status: Option<TrialStatus>,
    /// Raw stage map or array; interpreted by `adapter::adapt_stages`.
    #[serde(default)]
    pub stages: Option<Value>,
}

impl TrialDetails {
    /// Names of the published stages in order, skipping null entries.
    #[must_use]
    pub fn stage_names(&self) -> Vec<String> {
        match &self.stages {
            Some(stages) => crate::adapter::adapt_stages(stages, Default::default())
                .into_iter()
                .map(|stage| stage.title)
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Backend record linking a patient to a trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub enrollment_id: EnrollmentId,
    pub patient_id: UserId,
    pub trial_id: TrialId,
    pub status: EnrollmentStatus,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default = "default_stage")]
    pub current_stage: u32,
    #[serde(default)]
    pub compliance_rate: f64,
    #[serde(default)]
    pub enrollment_date: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub next_visit: Option<String>,
    #[serde(default)]
    pub trial_details: Option<TrialDetails>,
}

fn default_active() -> bool {
    true
}

fn default_stage() -> u32 {
    1
}

impl Enrollment {
    #[must_use]
    pub fn trial_title(&self) -> &str {
        self.trial_details
            .as_ref()
            .and_then(|details| details.title.as_deref())
            .unwrap_or("Unknown Trial")
    }

    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_compliance(self.compliance_rate)
    }

    /// One marker per published stage; stages before `current_stage` are done.
    #[must_use]
    pub fn stage_markers(&self) -> Vec<StageMarker> {
        let names = self
            .trial_details
            .as_ref()
            .map(TrialDetails::stage_names)
            .unwrap_or_default();
        let done_before = self.current_stage.saturating_sub(1) as usize;
        names
            .into_iter()
            .enumerate()
            .map(|(index, name)| StageMarker {
                number: index + 1,
                name: if name.trim().is_empty() {
                    format!("Stage {}", index + 1)
                } else {
                    name
                },
                completed: index < done_before,
            })
            .collect()
    }

    #[must_use]
    pub fn total_stages(&self) -> usize {
        let published = self
            .trial_details
            .as_ref()
            .map_or(0, |details| details.stage_names().len());
        if published == 0 {
            DEFAULT_STAGE_COUNT
        } else {
            published
        }
    }
}

/// Per-stage marker drawn on an enrollment card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageMarker {
    pub number: usize,
    pub name: String,
    pub completed: bool,
}

/// Body of `POST /enrollments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEnrollment {
    pub patient_id: UserId,
    pub trial_id: TrialId,
}

/// Response of `PUT /enrollments/{id}/progress`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressAck {
    pub enrollment_id: EnrollmentId,
    pub current_stage: u32,
    pub completion_rate: u8,
}
