use std::fmt;

use thiserror::Error;

use crate::model::{
    CompletionMatrix, ExpandedSet, ProgressSnapshot, Stage, percent, stage_shape,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TrackerError {
    #[error("task {task} of stage {stage} is outside the timeline")]
    TaskOutOfBounds { stage: usize, task: usize },

    #[error("stage {stage} is outside the timeline")]
    StageOutOfBounds { stage: usize },
}

/// Completion bucket of a stage; the view maps each to a fixed colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    NotStarted,
    InProgress,
    Complete,
}

type ChangeCallback = Box<dyn Fn(&ProgressSnapshot) + Send + Sync>;

/// Task completion and expand state for one trial timeline.
///
/// The matrix always has exactly one row per stage and one cell per task.
/// Every mutation hands the resulting snapshot to the registered callback;
/// persisting it is the caller's business.
pub struct CompletionTracker {
    stages: Vec<Stage>,
    matrix: CompletionMatrix,
    expanded: ExpandedSet,
    on_change: Option<ChangeCallback>,
}

impl fmt::Debug for CompletionTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionTracker")
            .field("stages", &self.stages.len())
            .field("matrix", &self.matrix)
            .field("expanded", &self.expanded)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

impl CompletionTracker {
    /// Builds a tracker for `stages`, adopting `saved` progress when present.
    ///
    /// Saved progress recorded against a different stage layout is fitted to
    /// the current one: unknown cells start unchecked, extra ones are dropped,
    /// and expanded indices past the last stage are ignored.
    #[must_use]
    pub fn initialize(stages: Vec<Stage>, saved: Option<ProgressSnapshot>) -> Self {
        let shape = stage_shape(&stages);
        let (matrix, expanded) = match saved {
            Some(snapshot) => (
                snapshot.task_status.reshaped(&shape),
                ExpandedSet::bounded(&snapshot.expanded_items, stages.len()),
            ),
            None => (CompletionMatrix::all_false(&shape), ExpandedSet::new()),
        };
        Self {
            stages,
            matrix,
            expanded,
            on_change: None,
        }
    }

    /// Registers the callback invoked after every successful mutation.
    #[must_use]
    pub fn with_on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ProgressSnapshot) + Send + Sync + 'static,
    {
        self.on_change = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    #[must_use]
    pub fn matrix(&self) -> &CompletionMatrix {
        &self.matrix
    }

    #[must_use]
    pub fn is_expanded(&self, stage: usize) -> bool {
        self.expanded.contains(stage)
    }

    #[must_use]
    pub fn is_completed(&self, stage: usize, task: usize) -> bool {
        self.matrix.get(stage, task).unwrap_or(false)
    }

    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot::new(self.matrix.clone(), &self.expanded)
    }

    /// Flips one task and returns its new completion value.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::TaskOutOfBounds` when the indices do not name a
    /// task; the matrix is left untouched.
    pub fn toggle_task(&mut self, stage: usize, task: usize) -> Result<bool, TrackerError> {
        let done = self
            .matrix
            .toggle(stage, task)
            .ok_or(TrackerError::TaskOutOfBounds { stage, task })?;
        self.notify();
        Ok(done)
    }

    /// Opens or closes a stage panel and returns whether it is now open.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::StageOutOfBounds` for an unknown stage.
    pub fn toggle_expanded(&mut self, stage: usize) -> Result<bool, TrackerError> {
        if stage >= self.stages.len() {
            return Err(TrackerError::StageOutOfBounds { stage });
        }
        let open = self.expanded.toggle(stage);
        self.notify();
        Ok(open)
    }

    /// Percentage of finished tasks in one stage; 0 for an empty or unknown stage.
    #[must_use]
    pub fn stage_completion_rate(&self, stage: usize) -> u8 {
        percent(self.matrix.completed_in(stage), self.matrix.total_in(stage))
    }

    /// Percentage of finished tasks across the whole timeline.
    #[must_use]
    pub fn overall_completion_rate(&self) -> u8 {
        percent(self.matrix.completed(), self.matrix.total())
    }

    #[must_use]
    pub fn stage_state(&self, stage: usize) -> StageState {
        let total = self.matrix.total_in(stage);
        let done = self.matrix.completed_in(stage);
        if total > 0 && done == total {
            StageState::Complete
        } else if done > 0 {
            StageState::InProgress
        } else {
            StageState::NotStarted
        }
    }

    /// 1-based number of the first stage with open tasks, capped at the stage
    /// count (0 for a timeline without stages). Matches how the enrollment
    /// record derives `currentStage`.
    #[must_use]
    pub fn current_stage(&self) -> usize {
        let rows = self.matrix.rows();
        let finished = rows
            .iter()
            .take_while(|row| row.iter().all(|done| *done))
            .count();
        (finished + 1).min(rows.len())
    }

    fn notify(&self) {
        if let Some(callback) = &self.on_change {
            callback(&self.snapshot());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::model::{StageLabelStyle, Task};

    fn stage(position: usize, tasks: &[&str]) -> Stage {
        Stage {
            position,
            label: StageLabelStyle::Step.label(position),
            title: format!("Stage {position}"),
            subtitle: String::new(),
            duration: None,
            tasks: tasks.iter().map(|t| Task::new(*t)).collect(),
        }
    }

    fn two_stages() -> Vec<Stage> {
        vec![stage(0, &["A", "B"]), stage(1, &["C"])]
    }

    #[test]
    fn fresh_timeline_is_all_false() {
        let tracker = CompletionTracker::initialize(two_stages(), None);
        assert_eq!(tracker.matrix().rows(), &[vec![false, false], vec![false]]);
        assert!(tracker.snapshot().expanded_items.is_empty());
        assert_eq!(tracker.overall_completion_rate(), 0);
        assert_eq!(tracker.current_stage(), 1);
    }

    #[test]
    fn rates_for_a_and_c() {
        let mut tracker = CompletionTracker::initialize(two_stages(), None);
        tracker.toggle_task(0, 0).unwrap();
        tracker.toggle_task(1, 0).unwrap();
        assert_eq!(tracker.stage_completion_rate(0), 50);
        assert_eq!(tracker.stage_completion_rate(1), 100);
        assert_eq!(tracker.overall_completion_rate(), 67);
        assert_eq!(tracker.stage_state(0), StageState::InProgress);
        assert_eq!(tracker.stage_state(1), StageState::Complete);
    }

    #[test]
    fn double_toggle_restores_matrix() {
        let mut tracker = CompletionTracker::initialize(two_stages(), None);
        let before = tracker.matrix().clone();
        assert!(tracker.toggle_task(0, 1).unwrap());
        assert!(!tracker.toggle_task(0, 1).unwrap());
        assert_eq!(tracker.matrix(), &before);
    }

    #[test]
    fn out_of_bounds_toggle_is_rejected() {
        let mut tracker = CompletionTracker::initialize(two_stages(), None);
        assert_eq!(
            tracker.toggle_task(1, 1),
            Err(TrackerError::TaskOutOfBounds { stage: 1, task: 1 })
        );
        assert_eq!(
            tracker.toggle_expanded(2),
            Err(TrackerError::StageOutOfBounds { stage: 2 })
        );
        assert_eq!(tracker.matrix().total(), 3);
    }

    #[test]
    fn mismatched_saved_progress_is_fitted() {
        let saved = ProgressSnapshot {
            task_status: CompletionMatrix::from_rows(vec![vec![true, true, true]]),
            expanded_items: vec![0, 7],
        };
        let tracker = CompletionTracker::initialize(two_stages(), Some(saved));
        assert_eq!(tracker.matrix().rows(), &[vec![true, true], vec![false]]);
        assert!(tracker.is_expanded(0));
        assert_eq!(tracker.snapshot().expanded_items, vec![0]);
        assert_eq!(tracker.current_stage(), 2);
    }

    #[test]
    fn zero_task_timeline_reports_zero() {
        let tracker = CompletionTracker::initialize(vec![stage(0, &[])], None);
        assert_eq!(tracker.overall_completion_rate(), 0);
        assert_eq!(tracker.stage_completion_rate(0), 0);
        assert_eq!(tracker.stage_state(0), StageState::NotStarted);
        assert_eq!(tracker.stage_completion_rate(5), 0);
    }

    #[test]
    fn every_mutation_reaches_the_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut tracker = CompletionTracker::initialize(two_stages(), None)
            .with_on_change(move |snapshot| sink.lock().unwrap().push(snapshot.clone()));

        tracker.toggle_task(0, 0).unwrap();
        tracker.toggle_expanded(1).unwrap();
        let _ = tracker.toggle_task(9, 9);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].task_status.get(0, 0), Some(true));
        assert_eq!(seen[1].expanded_items, vec![1]);
    }

    #[test]
    fn completed_timeline_caps_current_stage() {
        let mut tracker = CompletionTracker::initialize(two_stages(), None);
        tracker.toggle_task(0, 0).unwrap();
        tracker.toggle_task(0, 1).unwrap();
        tracker.toggle_task(1, 0).unwrap();
        assert_eq!(tracker.current_stage(), 2);
        assert_eq!(tracker.overall_completion_rate(), 100);
    }

    #[test]
    fn empty_timeline_has_no_current_stage() {
        let tracker = CompletionTracker::initialize(Vec::new(), None);
        assert_eq!(tracker.current_stage(), 0);
        assert_eq!(tracker.overall_completion_rate(), 0);
    }
}
