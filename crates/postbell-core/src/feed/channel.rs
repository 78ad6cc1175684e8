use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use super::mutator::{BulkReadReport, ReadStateMutator};
use crate::backend::{NotificationBackend, Snapshot, SubscriptionGuard};
use crate::models::{Identity, Notification};
use crate::store::NotificationStore;

/// The live notification feed of whoever is currently signed in.
///
/// At most one live query is open at a time. Identity transitions are
/// serialized, and the previous query is always released before the next
/// one is opened. Each snapshot replaces the store wholesale; the store
/// lives in a `watch` channel so views re-render from the latest value
/// only. Dropping the feed releases any open query.
pub struct NotificationFeed {
    backend: Arc<dyn NotificationBackend>,
    state: Arc<watch::Sender<NotificationStore>>,
    /// Bumped on every transition; snapshots tagged with an older epoch are discarded.
    epoch: Arc<AtomicU64>,
    slot: Mutex<Slot>,
    mutator: ReadStateMutator,
}

#[derive(Default)]
struct Slot {
    user_id: Option<String>,
    active: Option<ActiveSubscription>,
}

/// Pump task plus the guard of the query it drains. Dropping it stops the
/// pump and runs the unsubscribe hook.
struct ActiveSubscription {
    pump: JoinHandle<()>,
    _guard: SubscriptionGuard,
}

impl ActiveSubscription {
    /// False once the backend has ended the stream.
    fn is_live(&self) -> bool {
        !self.pump.is_finished()
    }
}

impl Drop for ActiveSubscription {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

impl NotificationFeed {
    pub fn new(backend: Arc<dyn NotificationBackend>) -> Self {
        let (state, state_rx) = watch::channel(NotificationStore::new());
        let mutator = ReadStateMutator::new(backend.clone(), state_rx);
        Self {
            backend,
            state: Arc::new(state),
            epoch: Arc::new(AtomicU64::new(0)),
            slot: Mutex::new(Slot::default()),
            mutator,
        }
    }

    /// Apply an identity transition.
    ///
    /// - signed out: release the query, clear the store
    /// - new identity: release the old query, clear, open a query for the new one
    /// - same identity with a live query: nothing to do
    /// - same identity whose last subscribe failed, or whose query the
    ///   backend ended: try again, keeping the last known notifications
    ///
    /// Subscribe failures are logged and leave the store as it is.
    pub async fn set_identity(&self, identity: Option<&Identity>) {
        let next = identity.map(|i| i.uid.clone());
        let mut slot = self.slot.lock().await;

        let live = slot.active.as_ref().is_some_and(ActiveSubscription::is_live);
        if slot.user_id == next && (next.is_none() || live) {
            return;
        }
        let identity_changed = slot.user_id != next;

        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = slot.active.take() {
            drop(previous);
            tracing::debug!(user_id = ?slot.user_id, "Released notification subscription");
        }
        slot.user_id = next.clone();

        if identity_changed {
            self.state.send_replace(NotificationStore::for_user(next.clone()));
        }

        let Some(user_id) = next else {
            tracing::info!("Signed out, notification feed cleared");
            return;
        };

        match self.backend.subscribe(&user_id).await {
            Ok(subscription) => {
                let (snapshots, guard) = subscription.into_parts();
                let pump = tokio::spawn(pump_snapshots(
                    snapshots,
                    user_id.clone(),
                    epoch,
                    self.epoch.clone(),
                    self.state.clone(),
                ));
                slot.active = Some(ActiveSubscription {
                    pump,
                    _guard: guard,
                });
                tracing::info!(user_id = %user_id, "Subscribed to notifications");
            }
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Error subscribing to notifications");
            }
        }
    }

    /// Whether a live query is currently open and still delivering.
    pub async fn is_subscribed(&self) -> bool {
        self.slot
            .lock()
            .await
            .active
            .as_ref()
            .is_some_and(ActiveSubscription::is_live)
    }

    // ===== Derived state =====

    pub fn store(&self) -> NotificationStore {
        self.state.borrow().clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.state.borrow().notifications().to_vec()
    }

    pub fn unread_count(&self) -> usize {
        self.state.borrow().unread_count()
    }

    /// Receiver that is notified whenever the store changes.
    pub fn watch(&self) -> watch::Receiver<NotificationStore> {
        self.state.subscribe()
    }

    // ===== Read-state mutations =====

    pub fn mark_as_read(&self, notification_id: &str) -> JoinHandle<()> {
        self.mutator.mark_as_read(notification_id)
    }

    pub fn mark_all_as_read(&self) -> JoinHandle<BulkReadReport> {
        self.mutator.mark_all_as_read()
    }
}

async fn pump_snapshots(
    mut snapshots: BoxStream<'static, Snapshot>,
    user_id: String,
    epoch: u64,
    current_epoch: Arc<AtomicU64>,
    state: Arc<watch::Sender<NotificationStore>>,
) {
    while let Some(snapshot) = snapshots.next().await {
        let count = snapshot.len();
        let applied = state.send_if_modified(|store| {
            if current_epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            store.replace(snapshot);
            true
        });
        if !applied {
            tracing::debug!(user_id = %user_id, "Discarded snapshot from a released subscription");
            return;
        }
        tracing::debug!(
            user_id = %user_id,
            count,
            unread = state.borrow().unread_count(),
            "Applied notification snapshot"
        );
    }
    tracing::info!(user_id = %user_id, "Notification subscription ended by backend");
}
