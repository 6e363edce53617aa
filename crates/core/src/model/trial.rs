use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::ids::TrialId;

/// Recruitment status as published by the trial catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TrialStatus {
    Recruiting,
    Active,
    Enrolling,
    Completed,
    Paused,
    Other(String),
}

impl TrialStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            TrialStatus::Recruiting => "Recruiting",
            TrialStatus::Active => "Active",
            TrialStatus::Enrolling => "Enrolling",
            TrialStatus::Completed => "Completed",
            TrialStatus::Paused => "Paused",
            TrialStatus::Other(raw) => raw,
        }
    }

    /// Whether the trial still accepts new participants.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            TrialStatus::Recruiting | TrialStatus::Active | TrialStatus::Enrolling
        )
    }
}

impl From<String> for TrialStatus {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "recruiting" => TrialStatus::Recruiting,
            "active" => TrialStatus::Active,
            "enrolling" => TrialStatus::Enrolling,
            "completed" => TrialStatus::Completed,
            "paused" => TrialStatus::Paused,
            _ => TrialStatus::Other(raw),
        }
    }
}

impl From<TrialStatus> for String {
    fn from(status: TrialStatus) -> Self {
        status.as_str().to_owned()
    }
}

impl fmt::Display for TrialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog entry for a clinical trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trial {
    #[serde(alias = "trialId")]
    pub id: TrialId,
    pub title: String,
    pub status: TrialStatus,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub sponsor: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub phases: Option<String>,
    #[serde(default)]
    pub distance: Option<String>,
    #[serde(default)]
    pub insurance: Option<String>,
    #[serde(default)]
    pub estimated_duration: Option<String>,
    #[serde(default)]
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub current_participants: Option<u32>,
}

impl Trial {
    /// Case-insensitive match against title, condition, location, sponsor
    /// and description. An empty query matches everything.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        [
            &self.title,
            &self.condition,
            &self.location,
            &self.sponsor,
            &self.description,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
    }

    /// Enrollment fill as a whole percentage, when the catalog reports targets.
    #[must_use]
    pub fn enrollment_percent(&self) -> Option<u8> {
        let target = self.max_participants.filter(|t| *t > 0)?;
        let current = self.current_participants.unwrap_or(0);
        Some(crate::model::progress::percent(
            current as usize,
            target as usize,
        ))
    }
}

/// Status filter offered by the catalog screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TrialStatus),
}

impl StatusFilter {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("all") || raw.trim().is_empty() {
            StatusFilter::All
        } else {
            StatusFilter::Only(TrialStatus::from(raw.trim().to_owned()))
        }
    }

    #[must_use]
    pub fn accepts(&self, status: &TrialStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

/// A ranked trial suggestion from the smart-matching endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialRecommendation {
    pub trial_id: TrialId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub location: String,
    pub status: TrialStatus,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub match_score: u8,
    #[serde(default)]
    pub match_reasons: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial(title: &str, status: &str) -> Trial {
        Trial {
            id: TrialId::new("t1"),
            title: title.to_owned(),
            status: TrialStatus::from(status.to_owned()),
            condition: "Type 2 Diabetes".to_owned(),
            location: "Atlanta, GA".to_owned(),
            sponsor: "Emory Healthcare".to_owned(),
            description: "Glucose monitoring".to_owned(),
            phases: None,
            distance: None,
            insurance: None,
            estimated_duration: None,
            max_participants: Some(200),
            current_participants: Some(45),
        }
    }

    #[test]
    fn query_searches_every_text_field() {
        let t = trial("DIABETES-CARE-2025", "Recruiting");
        assert!(t.matches_query("atlanta"));
        assert!(t.matches_query("EMORY"));
        assert!(t.matches_query(""));
        assert!(!t.matches_query("oncology"));
    }

    #[test]
    fn status_round_trips_unknown_values() {
        let status = TrialStatus::from("On Hold".to_owned());
        assert_eq!(status, TrialStatus::Other("On Hold".to_owned()));
        assert_eq!(String::from(status), "On Hold");
    }

    #[test]
    fn status_filter_matches_exactly() {
        let filter = StatusFilter::parse("Recruiting");
        assert!(filter.accepts(&TrialStatus::Recruiting));
        assert!(!filter.accepts(&TrialStatus::Active));
        assert!(StatusFilter::parse("All").accepts(&TrialStatus::Completed));
    }

    #[test]
    fn enrollment_percent_needs_a_target() {
        let mut t = trial("x", "Active");
        assert_eq!(t.enrollment_percent(), Some(23));
        t.max_participants = Some(0);
        assert_eq!(t.enrollment_percent(), None);
    }
}
