use std::sync::Arc;
use std::time::Duration;

use codeblue_core::model::{ProgressSnapshot, TrialId};
use tokio::sync::watch;
use tokio::time::sleep;

use super::bridge::{ProgressBridge, SaveReport};

/// Observable state of a trial's writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStatus {
    /// A save is in progress.
    pub syncing: bool,
    /// Newest submission that has been fully handled.
    pub handled_generation: u64,
    pub last_report: Option<SaveReport>,
}

#[derive(Debug, Clone, Default)]
struct Pending {
    generation: u64,
    snapshot: Option<ProgressSnapshot>,
}

struct Inner {
    trial_id: TrialId,
    pending: watch::Sender<Pending>,
    status: watch::Receiver<SyncStatus>,
}

/// Per-trial single-flight writer.
///
/// Submissions replace each other in a one-slot channel, so a burst of
/// toggles collapses into the newest snapshot. One background task saves
/// snapshots strictly in order, which keeps an older write from landing after
/// a newer one. When the last clone is dropped the task saves whatever is
/// still pending and exits.
#[derive(Clone)]
pub struct SyncWriter {
    inner: Arc<Inner>,
}

impl SyncWriter {
    pub(crate) fn spawn(
        bridge: ProgressBridge,
        trial_id: TrialId,
        debounce: Option<Duration>,
    ) -> Self {
        let (pending_tx, pending_rx) = watch::channel(Pending::default());
        let (status_tx, status_rx) = watch::channel(SyncStatus::default());
        tokio::spawn(run(
            bridge,
            trial_id.clone(),
            pending_rx,
            status_tx,
            debounce,
        ));
        Self {
            inner: Arc::new(Inner {
                trial_id,
                pending: pending_tx,
                status: status_rx,
            }),
        }
    }

    #[must_use]
    pub fn trial_id(&self) -> &TrialId {
        &self.inner.trial_id
    }

    /// Queues `snapshot`, superseding any snapshot not yet picked up.
    /// Returns the submission's generation.
    pub fn submit(&self, snapshot: ProgressSnapshot) -> u64 {
        let mut generation = 0;
        self.inner.pending.send_modify(|pending| {
            pending.generation += 1;
            pending.snapshot = Some(snapshot);
            generation = pending.generation;
        });
        generation
    }

    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.inner.status.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.inner.status.clone()
    }

    /// Waits until every snapshot submitted so far has been handled and
    /// returns the report of the newest save.
    pub async fn flush(&self) -> Option<SaveReport> {
        let target = self.inner.pending.borrow().generation;
        let mut status = self.inner.status.clone();
        match status.wait_for(|s| s.handled_generation >= target).await {
            Ok(status) => status.last_report.clone(),
            Err(_) => {
                tracing::warn!(trial = %self.inner.trial_id, "sync writer stopped before flushing");
                None
            }
        }
    }
}

async fn run(
    bridge: ProgressBridge,
    trial_id: TrialId,
    mut pending: watch::Receiver<Pending>,
    status: watch::Sender<SyncStatus>,
    debounce: Option<Duration>,
) {
    while pending.changed().await.is_ok() {
        if let Some(window) = debounce {
            settle(&mut pending, window).await;
        }

        let Pending {
            generation,
            snapshot,
        } = pending.borrow_and_update().clone();
        let Some(snapshot) = snapshot else {
            continue;
        };

        status.send_modify(|s| s.syncing = true);
        let report = bridge.save(&trial_id, &snapshot).await;
        status.send_modify(|s| {
            s.syncing = false;
            s.handled_generation = generation;
            s.last_report = Some(report);
        });
    }

    tracing::debug!(trial = %trial_id, "sync writer stopped");
}

/// Waits until no new submission arrives for `window`, or the sender goes away.
async fn settle(pending: &mut watch::Receiver<Pending>, window: Duration) {
    loop {
        tokio::select! {
            () = sleep(window) => return,
            changed = pending.changed() => {
                if changed.is_err() {
                    return;
                }
            }
        }
    }
}
