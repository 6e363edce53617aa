use std::collections::HashSet;

use codeblue_core::model::{StatusFilter, Trial, TrialId, TrialStatus};

/// Choices offered by the status dropdown, in display order.
pub const STATUS_FILTER_OPTIONS: [&str; 5] = ["All", "Recruiting", "Active", "Enrolling", "Completed"];

#[must_use]
pub fn status_class(status: &TrialStatus) -> &'static str {
    match status {
        TrialStatus::Recruiting | TrialStatus::Enrolling => "status-pill status-pill--open",
        TrialStatus::Active => "status-pill status-pill--active",
        TrialStatus::Completed => "status-pill status-pill--closed",
        TrialStatus::Paused | TrialStatus::Other(_) => "status-pill",
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrialCardVm {
    pub id: TrialId,
    pub title: String,
    pub status_label: String,
    pub status_class: &'static str,
    pub condition: String,
    pub location: String,
    pub sponsor: String,
    pub description: String,
    pub phases: Option<String>,
    pub participants: Option<String>,
    pub enrolled: bool,
    pub can_enroll: bool,
}

impl TrialCardVm {
    #[must_use]
    pub fn from_trial(trial: &Trial, enrolled: bool) -> Self {
        let participants = match (trial.current_participants, trial.max_participants) {
            (Some(current), Some(max)) => Some(format!("{current}/{max} participants")),
            (None, Some(max)) => Some(format!("Up to {max} participants")),
            _ => None,
        };
        Self {
            id: trial.id.clone(),
            title: trial.title.clone(),
            status_label: trial.status.to_string(),
            status_class: status_class(&trial.status),
            condition: trial.condition.clone(),
            location: trial.location.clone(),
            sponsor: trial.sponsor.clone(),
            description: trial.description.clone(),
            phases: trial.phases.clone(),
            participants,
            enrolled,
            can_enroll: !enrolled && trial.status.is_open(),
        }
    }
}

/// Cards for the trials passing `query` and `status`; `enrolled` marks trials
/// the patient has already joined.
#[must_use]
pub fn map_trial_cards(
    trials: &[Trial],
    query: &str,
    status: &StatusFilter,
    enrolled: &HashSet<TrialId>,
) -> Vec<TrialCardVm> {
    services::filter_trials(trials, query, status)
        .into_iter()
        .map(|trial| TrialCardVm::from_trial(trial, enrolled.contains(&trial.id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial(id: &str, status: TrialStatus) -> Trial {
        Trial {
            id: TrialId::new(id),
            title: format!("Trial {id}"),
            status,
            condition: "Hypertension".to_owned(),
            location: "Boston, MA".to_owned(),
            sponsor: "Mass General".to_owned(),
            description: String::new(),
            phases: Some("Phase II".to_owned()),
            distance: None,
            insurance: None,
            estimated_duration: None,
            max_participants: Some(50),
            current_participants: Some(12),
        }
    }

    #[test]
    fn enrolled_and_closed_trials_cannot_be_joined() {
        let trials = vec![
            trial("t1", TrialStatus::Recruiting),
            trial("t2", TrialStatus::Recruiting),
            trial("t3", TrialStatus::Completed),
        ];
        let enrolled: HashSet<TrialId> = [TrialId::new("t2")].into_iter().collect();

        let cards = map_trial_cards(&trials, "", &StatusFilter::All, &enrolled);

        assert_eq!(cards.len(), 3);
        assert!(cards[0].can_enroll);
        assert!(cards[1].enrolled && !cards[1].can_enroll);
        assert!(!cards[2].can_enroll);
        assert_eq!(cards[0].participants.as_deref(), Some("12/50 participants"));
    }

    #[test]
    fn filter_options_parse_to_filters() {
        assert_eq!(StatusFilter::parse(STATUS_FILTER_OPTIONS[0]), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse(STATUS_FILTER_OPTIONS[1]),
            StatusFilter::Only(TrialStatus::Recruiting)
        );
    }
}
