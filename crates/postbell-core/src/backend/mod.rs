//! Document-store seam for the notification collection.
//!
//! The hosted database is an external collaborator; everything the feed
//! needs from it goes through [`NotificationBackend`]:
//! - a live query over `notifications` filtered by `userId`
//! - a point write of `read: true`
//! - document creation (used by the comment flow)

pub mod memory;

use futures::future::BoxFuture;
use futures::stream::BoxStream;

use crate::models::{NewNotification, Notification};

pub use memory::MemoryBackend;

/// A complete result set for one query at one point in time.
pub type Snapshot = Vec<Notification>;

pub type BackendFuture<'a, T> = BoxFuture<'a, Result<T, BackendError>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Document not found: {0}")]
    NotFound(String),
}

pub trait NotificationBackend: Send + Sync {
    /// Open a live query for every notification whose `userId` equals
    /// `user_id`. The returned stream yields a full snapshot on every change
    /// that touches the result set, starting with the current one.
    fn subscribe<'a>(&'a self, user_id: &'a str) -> BackendFuture<'a, Subscription>;

    /// Set `read: true` on a single notification.
    fn mark_read<'a>(&'a self, notification_id: &'a str) -> BackendFuture<'a, ()>;

    /// Create a notification document, returning its assigned id.
    fn create(&self, notification: NewNotification) -> BackendFuture<'_, String>;
}

/// Releases a live query. The unsubscribe hook runs exactly once: on an
/// explicit [`SubscriptionGuard::unsubscribe`] or when the guard is dropped.
pub struct SubscriptionGuard {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl SubscriptionGuard {
    pub fn new(unsubscribe: impl FnOnce() + Send + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for SubscriptionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionGuard")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

/// An open live query: the snapshot stream plus the guard that closes it.
pub struct Subscription {
    snapshots: BoxStream<'static, Snapshot>,
    guard: SubscriptionGuard,
}

impl Subscription {
    pub fn new(snapshots: BoxStream<'static, Snapshot>, guard: SubscriptionGuard) -> Self {
        Self { snapshots, guard }
    }

    pub fn into_parts(self) -> (BoxStream<'static, Snapshot>, SubscriptionGuard) {
        (self.snapshots, self.guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_guard_unsubscribes_once_on_drop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let guard = SubscriptionGuard::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        drop(guard);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_explicit_unsubscribe_does_not_repeat_on_drop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let guard = SubscriptionGuard::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        guard.unsubscribe();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
