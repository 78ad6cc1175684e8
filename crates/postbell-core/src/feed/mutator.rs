use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::backend::NotificationBackend;
use crate::store::NotificationStore;

/// Outcome of a settled mark-all-as-read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkReadReport {
    pub attempted: usize,
    pub failed: usize,
}

impl BulkReadReport {
    pub fn succeeded(&self) -> usize {
        self.attempted - self.failed
    }
}

/// Applies `read = true` transitions.
///
/// Every operation runs as a detached task. The returned handle exists so
/// callers *may* observe settlement; the feed view drops it. Failures are
/// logged and never retried or rolled back: the next snapshot from the live
/// subscription is the source of truth either way.
#[derive(Clone)]
pub struct ReadStateMutator {
    backend: Arc<dyn NotificationBackend>,
    state: watch::Receiver<NotificationStore>,
}

impl ReadStateMutator {
    pub fn new(
        backend: Arc<dyn NotificationBackend>,
        state: watch::Receiver<NotificationStore>,
    ) -> Self {
        Self { backend, state }
    }

    /// Mark a single notification as read.
    pub fn mark_as_read(&self, notification_id: &str) -> JoinHandle<()> {
        let backend = self.backend.clone();
        let notification_id = notification_id.to_string();
        tokio::spawn(async move {
            match backend.mark_read(&notification_id).await {
                Ok(()) => {
                    tracing::debug!(notification_id = %notification_id, "Marked notification as read")
                }
                Err(e) => tracing::error!(
                    notification_id = %notification_id,
                    error = %e,
                    "Error marking notification as read"
                ),
            }
        })
    }

    /// Mark every notification that is unread in the latest snapshot.
    ///
    /// Writes are issued concurrently and all of them settle before the task
    /// completes. A partial failure leaves the succeeded writes in place.
    pub fn mark_all_as_read(&self) -> JoinHandle<BulkReadReport> {
        let backend = self.backend.clone();
        let unread_ids = self.state.borrow().unread_ids();
        tokio::spawn(async move { write_all(backend.as_ref(), &unread_ids).await })
    }
}

async fn write_all(backend: &dyn NotificationBackend, ids: &[String]) -> BulkReadReport {
    let results = futures::future::join_all(ids.iter().map(|id| backend.mark_read(id))).await;

    let failures: Vec<String> = results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .map(|e| e.to_string())
        .collect();
    let report = BulkReadReport {
        attempted: ids.len(),
        failed: failures.len(),
    };

    if failures.is_empty() {
        tracing::debug!(count = report.attempted, "Marked all notifications as read");
    } else {
        tracing::error!(
            attempted = report.attempted,
            failed = report.failed,
            errors = ?failures,
            "Error marking all notifications as read"
        );
    }
    report
}
