use std::sync::Arc;
use std::time::Duration;

use codeblue_core::adapter::adapt_stages;
use codeblue_core::model::{ProgressSnapshot, Stage, StageLabelStyle, TrialId};
use codeblue_core::{CompletionTracker, StageState, TrackerError};
use tokio::sync::watch;

use crate::api::TrialsApi;
use crate::error::TimelineError;
use crate::progress::{ProgressBridge, SaveReport, SyncStatus, SyncWriter};

/// Opens trial timelines wired to local storage and the enrollment record.
#[derive(Clone)]
pub struct TimelineService {
    trials: Arc<dyn TrialsApi>,
    bridge: ProgressBridge,
    label_style: StageLabelStyle,
    debounce: Option<Duration>,
}

impl TimelineService {
    #[must_use]
    pub fn new(
        trials: Arc<dyn TrialsApi>,
        bridge: ProgressBridge,
        debounce: Option<Duration>,
    ) -> Self {
        Self {
            trials,
            bridge,
            label_style: StageLabelStyle::default(),
            debounce,
        }
    }

    #[must_use]
    pub fn with_label_style(mut self, style: StageLabelStyle) -> Self {
        self.label_style = style;
        self
    }

    #[must_use]
    pub fn bridge(&self) -> &ProgressBridge {
        &self.bridge
    }

    /// Fetches the trial's stages and resumes any progress saved on the device.
    ///
    /// Must be called from within a tokio runtime; the returned timeline owns
    /// the trial's sync writer.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::Api` if the stages cannot be fetched.
    pub async fn open(&self, trial_id: TrialId) -> Result<TrialTimeline, TimelineError> {
        let raw = self.trials.trial_stages(&trial_id).await?;
        let stages = adapt_stages(&raw, self.label_style);
        let saved = self.bridge.load(&trial_id).await;
        tracing::debug!(
            trial = %trial_id,
            stages = stages.len(),
            resumed = saved.is_some(),
            "timeline opened"
        );

        let writer = self.bridge.writer(trial_id.clone(), self.debounce);
        let sink = writer.clone();
        let tracker = CompletionTracker::initialize(stages, saved)
            .with_on_change(move |snapshot: &ProgressSnapshot| {
                sink.submit(snapshot.clone());
            });

        Ok(TrialTimeline {
            trial_id,
            tracker,
            writer,
        })
    }
}

/// One open timeline: the tracker plus the writer its changes flow into.
pub struct TrialTimeline {
    trial_id: TrialId,
    tracker: CompletionTracker,
    writer: SyncWriter,
}

impl TrialTimeline {
    #[must_use]
    pub fn trial_id(&self) -> &TrialId {
        &self.trial_id
    }

    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        self.tracker.stages()
    }

    #[must_use]
    pub fn tracker(&self) -> &CompletionTracker {
        &self.tracker
    }

    /// # Errors
    ///
    /// Returns `TrackerError::TaskOutOfBounds` for indices outside the timeline.
    pub fn toggle_task(&mut self, stage: usize, task: usize) -> Result<bool, TrackerError> {
        self.tracker.toggle_task(stage, task)
    }

    /// # Errors
    ///
    /// Returns `TrackerError::StageOutOfBounds` for an unknown stage.
    pub fn toggle_expanded(&mut self, stage: usize) -> Result<bool, TrackerError> {
        self.tracker.toggle_expanded(stage)
    }

    #[must_use]
    pub fn stage_state(&self, stage: usize) -> StageState {
        self.tracker.stage_state(stage)
    }

    #[must_use]
    pub fn sync_status(&self) -> SyncStatus {
        self.writer.status()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.writer.subscribe()
    }

    /// Waits for pending saves; see [`SyncWriter::flush`].
    pub async fn flush(&self) -> Option<SaveReport> {
        self.writer.flush().await
    }
}
