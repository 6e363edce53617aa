use std::sync::Arc;
use std::time::Duration;

use codeblue_core::model::{EnrollmentId, ProgressSnapshot, TrialId};
use storage::repository::ProgressRepository;

use super::writer::SyncWriter;
use crate::api::EnrollmentApi;
use crate::session::SessionContext;

/// What happened to one saved snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveReport {
    /// Stored locally and mirrored onto the enrollment record.
    Pushed {
        enrollment_id: EnrollmentId,
        completion_rate: u8,
    },
    /// Stored locally; nobody is signed in.
    NoSession,
    /// Stored locally; the user has no active enrollment for the trial.
    NotEnrolled,
    /// Stored locally; the enrollment lookup or the update failed.
    RemoteFailed(String),
    /// Nothing was stored and no remote call was made.
    LocalFailed(String),
}

impl SaveReport {
    #[must_use]
    pub fn stored_locally(&self) -> bool {
        !matches!(self, SaveReport::LocalFailed(_))
    }
}

/// Stores timeline progress on the device and mirrors it to the backend.
///
/// Failures never reach the caller as errors: they are logged and described
/// by the returned [`SaveReport`].
#[derive(Clone)]
pub struct ProgressBridge {
    progress: Arc<dyn ProgressRepository>,
    enrollments: Arc<dyn EnrollmentApi>,
    session: Arc<SessionContext>,
}

impl ProgressBridge {
    #[must_use]
    pub fn new(
        progress: Arc<dyn ProgressRepository>,
        enrollments: Arc<dyn EnrollmentApi>,
        session: Arc<SessionContext>,
    ) -> Self {
        Self {
            progress,
            enrollments,
            session,
        }
    }

    /// Saved snapshot for the trial; unreadable records are treated as absent.
    pub async fn load(&self, trial_id: &TrialId) -> Option<ProgressSnapshot> {
        match self.progress.load_progress(trial_id).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(trial = %trial_id, error = %err, "ignoring unreadable saved progress");
                None
            }
        }
    }

    /// Writes the snapshot locally, then pushes it to the user's active
    /// enrollment for the trial when there is one.
    pub async fn save(&self, trial_id: &TrialId, snapshot: &ProgressSnapshot) -> SaveReport {
        if let Err(err) = self.progress.save_progress(trial_id, snapshot).await {
            tracing::warn!(trial = %trial_id, error = %err, "failed to store progress locally");
            return SaveReport::LocalFailed(err.to_string());
        }

        let Some(user) = self.session.current_user() else {
            return SaveReport::NoSession;
        };

        let enrollments = match self.enrollments.list_enrollments(&user.main_id).await {
            Ok(enrollments) => enrollments,
            Err(err) => {
                tracing::warn!(trial = %trial_id, error = %err, "enrollment lookup failed");
                return SaveReport::RemoteFailed(err.to_string());
            }
        };

        let Some(enrollment) = enrollments
            .into_iter()
            .find(|e| e.is_active && e.trial_id == *trial_id)
        else {
            tracing::debug!(trial = %trial_id, "no active enrollment, progress kept on device");
            return SaveReport::NotEnrolled;
        };

        match self
            .enrollments
            .update_progress(&enrollment.enrollment_id, snapshot)
            .await
        {
            Ok(ack) => {
                tracing::debug!(
                    enrollment = %ack.enrollment_id,
                    stage = ack.current_stage,
                    rate = ack.completion_rate,
                    "progress mirrored"
                );
                SaveReport::Pushed {
                    enrollment_id: enrollment.enrollment_id,
                    completion_rate: ack.completion_rate,
                }
            }
            Err(err) => {
                tracing::warn!(
                    enrollment = %enrollment.enrollment_id,
                    error = %err,
                    "failed to mirror progress"
                );
                SaveReport::RemoteFailed(err.to_string())
            }
        }
    }

    /// Starts the single-flight writer for one trial.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn writer(&self, trial_id: TrialId, debounce: Option<Duration>) -> SyncWriter {
        SyncWriter::spawn(self.clone(), trial_id, debounce)
    }
}
