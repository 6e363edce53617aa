use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Rounds `completed / total` to a whole percentage, half-up.
///
/// Returns 0 when `total` is 0.
#[must_use]
pub fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    let rounded = (completed * 200 + total) / (total * 2);
    u8::try_from(rounded).unwrap_or(100)
}

/// Task completion flags, one row per stage and one cell per task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionMatrix(Vec<Vec<bool>>);

impl CompletionMatrix {
    /// All-false matrix with `shape[i]` cells in row `i`.
    #[must_use]
    pub fn all_false(shape: &[usize]) -> Self {
        Self(shape.iter().map(|&len| vec![false; len]).collect())
    }

    #[must_use]
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Self {
        Self(rows)
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<bool>] {
        &self.0
    }

    #[must_use]
    pub fn shape(&self) -> Vec<usize> {
        self.0.iter().map(Vec::len).collect()
    }

    /// Returns a copy fitted to `shape`: missing cells become `false`,
    /// surplus rows and cells are dropped.
    #[must_use]
    pub fn reshaped(&self, shape: &[usize]) -> Self {
        let rows = shape
            .iter()
            .enumerate()
            .map(|(stage, &len)| {
                let saved = self.0.get(stage).map(Vec::as_slice).unwrap_or_default();
                (0..len)
                    .map(|task| saved.get(task).copied().unwrap_or(false))
                    .collect()
            })
            .collect();
        Self(rows)
    }

    #[must_use]
    pub fn get(&self, stage: usize, task: usize) -> Option<bool> {
        self.0.get(stage).and_then(|row| row.get(task)).copied()
    }

    /// Flips one cell and returns its new value, or `None` when out of bounds.
    pub fn toggle(&mut self, stage: usize, task: usize) -> Option<bool> {
        let cell = self.0.get_mut(stage)?.get_mut(task)?;
        *cell = !*cell;
        Some(*cell)
    }

    #[must_use]
    pub fn completed_in(&self, stage: usize) -> usize {
        self.0
            .get(stage)
            .map_or(0, |row| row.iter().filter(|done| **done).count())
    }

    #[must_use]
    pub fn total_in(&self, stage: usize) -> usize {
        self.0.get(stage).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        (0..self.0.len()).map(|stage| self.completed_in(stage)).sum()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.0.len()
    }
}

/// Stage indices whose task panels are open in the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedSet(BTreeSet<usize>);

impl ExpandedSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, stage: usize) -> bool {
        self.0.contains(&stage)
    }

    /// Opens a closed stage or closes an open one. Returns whether it is now open.
    pub fn toggle(&mut self, stage: usize) -> bool {
        if self.0.remove(&stage) {
            false
        } else {
            self.0.insert(stage);
            true
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<usize> {
        self.0.iter().copied().collect()
    }

    /// Keeps only indices below `stage_count`.
    #[must_use]
    pub fn bounded(items: &[usize], stage_count: usize) -> Self {
        Self(items.iter().copied().filter(|&i| i < stage_count).collect())
    }
}

/// The unit persisted on the device and mirrored to the enrollment record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub task_status: CompletionMatrix,
    #[serde(default)]
    pub expanded_items: Vec<usize>,
}

impl ProgressSnapshot {
    #[must_use]
    pub fn new(task_status: CompletionMatrix, expanded: &ExpandedSet) -> Self {
        Self {
            task_status,
            expanded_items: expanded.to_vec(),
        }
    }

    #[must_use]
    pub fn overall_rate(&self) -> u8 {
        percent(self.task_status.completed(), self.task_status.total())
    }
}
