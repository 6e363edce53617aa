use codeblue_core::{CompletionTracker, StageState};

/// Node colour for each stage state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageColor {
    Pending,
    Partial,
    Done,
}

impl StageColor {
    #[must_use]
    pub fn from_state(state: StageState) -> Self {
        match state {
            StageState::NotStarted => StageColor::Pending,
            StageState::InProgress => StageColor::Partial,
            StageState::Complete => StageColor::Done,
        }
    }

    #[must_use]
    pub fn hex(self) -> &'static str {
        match self {
            StageColor::Pending => "#cbd5e1",
            StageColor::Partial => "#f59e0b",
            StageColor::Done => "#10b981",
        }
    }

    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            StageColor::Pending => "stage-node stage-node--pending",
            StageColor::Partial => "stage-node stage-node--partial",
            StageColor::Done => "stage-node stage-node--done",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskVm {
    pub index: usize,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageNodeVm {
    pub index: usize,
    pub label: String,
    pub title: String,
    pub subtitle: String,
    pub duration: Option<String>,
    pub percent: u8,
    pub color: StageColor,
    pub expanded: bool,
    /// Every node but the last draws a line to the next one.
    pub show_connector: bool,
    pub tasks: Vec<TaskVm>,
}

impl StageNodeVm {
    #[must_use]
    pub fn percent_label(&self) -> String {
        format!("{}% Complete", self.percent)
    }

    #[must_use]
    pub fn bar_style(&self) -> String {
        format!("width: {}%; background: {};", self.percent, self.color.hex())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineVm {
    pub stages: Vec<StageNodeVm>,
    pub overall_percent: u8,
    pub current_stage: usize,
    pub syncing: bool,
}

impl TimelineVm {
    #[must_use]
    pub fn overall_label(&self) -> String {
        format!("{}% Complete", self.overall_percent)
    }

    #[must_use]
    pub fn current_stage_label(&self) -> String {
        format!("Stage {} of {}", self.current_stage, self.stages.len())
    }
}

#[must_use]
pub fn map_timeline(tracker: &CompletionTracker, syncing: bool) -> TimelineVm {
    let stage_count = tracker.stages().len();
    let stages = tracker
        .stages()
        .iter()
        .enumerate()
        .map(|(index, stage)| StageNodeVm {
            index,
            label: stage.label.clone(),
            title: stage.title.clone(),
            subtitle: stage.subtitle.clone(),
            duration: stage.duration.clone(),
            percent: tracker.stage_completion_rate(index),
            color: StageColor::from_state(tracker.stage_state(index)),
            expanded: tracker.is_expanded(index),
            show_connector: index + 1 < stage_count,
            tasks: stage
                .tasks
                .iter()
                .enumerate()
                .map(|(task_index, task)| TaskVm {
                    index: task_index,
                    title: task.title.clone(),
                    description: task.description.clone(),
                    completed: tracker.is_completed(index, task_index),
                })
                .collect(),
        })
        .collect();

    TimelineVm {
        stages,
        overall_percent: tracker.overall_completion_rate(),
        current_stage: tracker.current_stage(),
        syncing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeblue_core::model::{Stage, Task};

    fn stage(position: usize, tasks: &[&str]) -> Stage {
        Stage {
            position,
            label: format!("Stage {}", position + 1),
            title: format!("Title {position}"),
            subtitle: String::new(),
            duration: None,
            tasks: tasks.iter().map(|t| Task::new(*t)).collect(),
        }
    }

    #[test]
    fn nodes_take_colour_and_connector_from_position() {
        let mut tracker =
            CompletionTracker::initialize(vec![stage(0, &["A", "B"]), stage(1, &["C"])], None);
        tracker.toggle_task(0, 0).unwrap();
        tracker.toggle_expanded(0).unwrap();

        let vm = map_timeline(&tracker, true);

        assert_eq!(vm.overall_percent, 50);
        assert_eq!(vm.overall_label(), "50% Complete");
        assert!(vm.syncing);
        assert_eq!(vm.stages[0].color, StageColor::Partial);
        assert_eq!(vm.stages[0].percent_label(), "50% Complete");
        assert!(vm.stages[0].expanded);
        assert!(vm.stages[0].show_connector);
        assert!(vm.stages[0].tasks[0].completed);
        assert_eq!(vm.stages[1].color, StageColor::Pending);
        assert!(!vm.stages[1].show_connector);
    }

    #[test]
    fn completed_stage_is_green() {
        let mut tracker = CompletionTracker::initialize(vec![stage(0, &["A"])], None);
        tracker.toggle_task(0, 0).unwrap();
        let vm = map_timeline(&tracker, false);
        assert_eq!(vm.stages[0].color, StageColor::Done);
        assert_eq!(vm.stages[0].bar_style(), "width: 100%; background: #10b981;");
        assert_eq!(vm.current_stage, 1);
        assert_eq!(vm.current_stage_label(), "Stage 1 of 1");
    }
}
