use serde::{Deserialize, Serialize};

/// One checklist item inside a stage.
///
/// Completion is tracked by the `CompletionMatrix`, not on the task itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    pub description: Option<String>,
}

impl Task {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One phase of a trial's participation timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Zero-based position in the ordered timeline.
    pub position: usize,
    /// Display label such as "Step 2" or "Week 2".
    pub label: String,
    pub title: String,
    pub subtitle: String,
    /// Expected length as reported by the backend ("12 weeks").
    pub duration: Option<String>,
    pub tasks: Vec<Task>,
}

impl Stage {
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

/// Prefix used when labelling stages for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StageLabelStyle {
    #[default]
    Step,
    Week,
    Stage,
}

impl StageLabelStyle {
    /// Label for a zero-based stage position.
    #[must_use]
    pub fn label(self, position: usize) -> String {
        let prefix = match self {
            StageLabelStyle::Step => "Step",
            StageLabelStyle::Week => "Week",
            StageLabelStyle::Stage => "Stage",
        };
        format!("{prefix} {}", position + 1)
    }
}

/// Shape of a stage list: task count per stage, in order.
#[must_use]
pub fn stage_shape(stages: &[Stage]) -> Vec<usize> {
    stages.iter().map(Stage::task_count).collect()
}
