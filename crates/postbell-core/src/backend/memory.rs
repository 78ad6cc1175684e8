use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::watch;

use super::{
    BackendError, BackendFuture, NotificationBackend, Snapshot, Subscription, SubscriptionGuard,
};
use crate::models::{NewNotification, Notification};

/// In-process notification collection with live queries.
///
/// Documents keep insertion order. Every write pushes a fresh snapshot to the
/// listeners whose filter it touches; each listener is a single-slot mailbox,
/// so a slow consumer only ever sees the latest snapshot.
///
/// Faults can be injected to exercise the failure paths of the feed.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<Collection>>,
}

#[derive(Default)]
struct Collection {
    documents: Vec<Notification>,
    listeners: HashMap<u64, Listener>,
    next_listener_id: u64,
    latency: Duration,
    offline: bool,
    denied_users: HashSet<String>,
    failing_ids: HashSet<String>,
}

struct Listener {
    user_id: String,
    tx: watch::Sender<Snapshot>,
}

impl Collection {
    fn snapshot_for(&self, user_id: &str) -> Snapshot {
        self.documents
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    fn broadcast(&self, user_id: &str) {
        let snapshot = self.snapshot_for(user_id);
        for listener in self.listeners.values().filter(|l| l.user_id == user_id) {
            listener.tx.send_replace(snapshot.clone());
        }
    }

    fn check_online(&self) -> Result<(), BackendError> {
        if self.offline {
            return Err(BackendError::Unavailable("backend is offline".to_string()));
        }
        Ok(())
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay applied before every call completes.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.inner.lock().latency = latency;
        self
    }

    /// Insert a document verbatim (id, read flag and timestamp included).
    pub fn insert(&self, notification: Notification) {
        let mut collection = self.inner.lock();
        let user_id = notification.user_id.clone();
        collection.documents.push(notification);
        collection.broadcast(&user_id);
    }

    pub fn get(&self, id: &str) -> Option<Notification> {
        self.inner.lock().documents.iter().find(|n| n.id == id).cloned()
    }

    pub fn documents(&self) -> Vec<Notification> {
        self.inner.lock().documents.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock().listeners.len()
    }

    // ===== Fault injection =====

    pub fn set_offline(&self, offline: bool) {
        self.inner.lock().offline = offline;
    }

    pub fn deny_user(&self, user_id: &str) {
        self.inner.lock().denied_users.insert(user_id.to_string());
    }

    pub fn fail_writes_for(&self, notification_id: &str) {
        self.inner
            .lock()
            .failing_ids
            .insert(notification_id.to_string());
    }

    /// End every live query of `user_id` from the backend side. Returns how
    /// many were closed.
    pub fn close_live_queries(&self, user_id: &str) -> usize {
        let mut collection = self.inner.lock();
        let before = collection.listeners.len();
        collection.listeners.retain(|_, l| l.user_id != user_id);
        let closed = before - collection.listeners.len();
        tracing::debug!(user_id, closed, "Closed live queries from the backend");
        closed
    }

    pub fn clear_faults(&self) {
        let mut collection = self.inner.lock();
        collection.offline = false;
        collection.denied_users.clear();
        collection.failing_ids.clear();
    }

    async fn simulate_latency(&self) {
        let latency = self.inner.lock().latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    fn open_listener(&self, user_id: &str) -> Result<Subscription, BackendError> {
        let mut collection = self.inner.lock();
        collection.check_online()?;
        if collection.denied_users.contains(user_id) {
            return Err(BackendError::PermissionDenied(format!(
                "notifications of {}",
                user_id
            )));
        }

        let (tx, rx) = watch::channel(Snapshot::new());
        // Publishing after the receiver exists marks the initial snapshot as unseen.
        tx.send_replace(collection.snapshot_for(user_id));

        let listener_id = collection.next_listener_id;
        collection.next_listener_id += 1;
        collection.listeners.insert(
            listener_id,
            Listener {
                user_id: user_id.to_string(),
                tx,
            },
        );
        tracing::debug!(user_id, listener_id, "Opened live query");

        let snapshots = futures::stream::unfold(rx, |mut rx| async move {
            rx.changed().await.ok()?;
            let snapshot = rx.borrow_and_update().clone();
            Some((snapshot, rx))
        })
        .boxed();

        let collection_ref: Weak<Mutex<Collection>> = Arc::downgrade(&self.inner);
        let guard = SubscriptionGuard::new(move || {
            if let Some(collection) = collection_ref.upgrade() {
                collection.lock().listeners.remove(&listener_id);
                tracing::debug!(listener_id, "Closed live query");
            }
        });

        Ok(Subscription::new(snapshots, guard))
    }

    fn apply_read(&self, notification_id: &str) -> Result<(), BackendError> {
        let mut collection = self.inner.lock();
        collection.check_online()?;
        if collection.failing_ids.contains(notification_id) {
            return Err(BackendError::Unavailable(format!(
                "write to {} rejected",
                notification_id
            )));
        }

        let doc = collection
            .documents
            .iter_mut()
            .find(|n| n.id == notification_id)
            .ok_or_else(|| BackendError::NotFound(notification_id.to_string()))?;

        if doc.read {
            return Ok(());
        }
        doc.read = true;
        let user_id = doc.user_id.clone();
        collection.broadcast(&user_id);
        Ok(())
    }

    fn apply_create(&self, notification: NewNotification) -> Result<String, BackendError> {
        let mut collection = self.inner.lock();
        collection.check_online()?;

        let id = uuid::Uuid::new_v4().to_string();
        let user_id = notification.user_id.clone();
        collection
            .documents
            .push(notification.into_notification(id.clone(), Utc::now()));
        collection.broadcast(&user_id);
        Ok(id)
    }
}

impl NotificationBackend for MemoryBackend {
    fn subscribe<'a>(&'a self, user_id: &'a str) -> BackendFuture<'a, Subscription> {
        Box::pin(async move {
            self.simulate_latency().await;
            self.open_listener(user_id)
        })
    }

    fn mark_read<'a>(&'a self, notification_id: &'a str) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            self.simulate_latency().await;
            self.apply_read(notification_id)
        })
    }

    fn create(&self, notification: NewNotification) -> BackendFuture<'_, String> {
        Box::pin(async move {
            self.simulate_latency().await;
            self.apply_create(notification)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationType;
    use crate::store::notification_store::tests::notification;

    fn comment_for(user_id: &str) -> NewNotification {
        NewNotification {
            user_id: user_id.to_string(),
            post_id: "p1".to_string(),
            post_title: "Hello".to_string(),
            commenter_name: "Grace".to_string(),
            commenter_id: "u2".to_string(),
            kind: NotificationType::Comment,
        }
    }

    #[tokio::test]
    async fn test_subscribe_delivers_filtered_initial_snapshot() {
        let backend = MemoryBackend::new();
        backend.insert(notification("n1", "u1", false));
        backend.insert(notification("n2", "u2", false));
        backend.insert(notification("n3", "u1", true));

        let (mut snapshots, _guard) = backend.subscribe("u1").await.unwrap().into_parts();
        let first = snapshots.next().await.unwrap();
        let ids: Vec<_> = first.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n1", "n3"]);
        assert!(first.iter().all(|n| n.user_id == "u1"));
    }

    #[tokio::test]
    async fn test_writes_push_new_snapshots() {
        let backend = MemoryBackend::new();
        backend.insert(notification("n1", "u1", false));
        let (mut snapshots, _guard) = backend.subscribe("u1").await.unwrap().into_parts();
        snapshots.next().await.unwrap();

        backend.mark_read("n1").await.unwrap();
        let next = snapshots.next().await.unwrap();
        assert!(next[0].read);

        let id = backend.create(comment_for("u1")).await.unwrap();
        let next = snapshots.next().await.unwrap();
        assert_eq!(next.len(), 2);
        assert_eq!(next[1].id, id);
        assert!(!next[1].read);
    }

    #[tokio::test]
    async fn test_mark_read_is_idempotent() {
        let backend = MemoryBackend::new();
        backend.insert(notification("n2", "u1", true));
        backend.mark_read("n2").await.unwrap();
        backend.mark_read("n2").await.unwrap();
        assert!(backend.get("n2").unwrap().read);
    }

    #[tokio::test]
    async fn test_mark_read_unknown_id() {
        let backend = MemoryBackend::new();
        let err = backend.mark_read("missing").await.unwrap_err();
        assert_eq!(err, BackendError::NotFound("missing".to_string()));
    }

    #[tokio::test]
    async fn test_dropping_guard_closes_listener_and_stream() {
        let backend = MemoryBackend::new();
        let (mut snapshots, guard) = backend.subscribe("u1").await.unwrap().into_parts();
        snapshots.next().await.unwrap();
        assert_eq!(backend.listener_count(), 1);

        drop(guard);
        assert_eq!(backend.listener_count(), 0);
        assert!(snapshots.next().await.is_none());
    }

    #[tokio::test]
    async fn test_backend_closing_query_ends_stream() {
        let backend = MemoryBackend::new();
        let (mut u1, _u1_guard) = backend.subscribe("u1").await.unwrap().into_parts();
        let (_u2, _u2_guard) = backend.subscribe("u2").await.unwrap().into_parts();
        u1.next().await.unwrap();

        assert_eq!(backend.close_live_queries("u1"), 1);
        assert!(u1.next().await.is_none());
        assert_eq!(backend.listener_count(), 1);
    }

    #[tokio::test]
    async fn test_injected_faults() {
        let backend = MemoryBackend::new();
        backend.insert(notification("n1", "u1", false));

        backend.deny_user("u1");
        assert!(matches!(
            backend.subscribe("u1").await,
            Err(BackendError::PermissionDenied(_))
        ));

        backend.fail_writes_for("n1");
        assert!(backend.mark_read("n1").await.is_err());
        assert!(!backend.get("n1").unwrap().read);

        backend.clear_faults();
        backend.set_offline(true);
        assert!(matches!(
            backend.create(comment_for("u1")).await,
            Err(BackendError::Unavailable(_))
        ));

        backend.clear_faults();
        backend.mark_read("n1").await.unwrap();
        assert!(backend.get("n1").unwrap().read);
    }
}
