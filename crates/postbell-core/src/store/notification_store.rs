use crate::models::Notification;

/// Sub-store for the notification feed of one user.
///
/// Holds exactly the last snapshot delivered by the live subscription, in
/// arrival order. The unread count is always derived from the list and
/// never stored next to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationStore {
    user_id: Option<String>,
    notifications: Vec<Notification>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store owned by `user_id` (or signed out when `None`).
    pub fn for_user(user_id: Option<String>) -> Self {
        Self {
            user_id,
            notifications: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.user_id = None;
        self.notifications.clear();
    }

    // ===== Getters =====

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| n.is_unread()).count()
    }

    pub fn unread_ids(&self) -> Vec<String> {
        self.notifications
            .iter()
            .filter(|n| n.is_unread())
            .map(|n| n.id.clone())
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id == id)
    }

    /// The first `window` notifications, the part the dropdown renders.
    pub fn visible(&self, window: usize) -> &[Notification] {
        let end = window.min(self.notifications.len());
        &self.notifications[..end]
    }

    // ===== Mutations =====

    /// Replace the whole list with a freshly delivered snapshot.
    ///
    /// Entries addressed to someone other than the owner are dropped. Returns
    /// how many were dropped.
    pub fn replace(&mut self, snapshot: Vec<Notification>) -> usize {
        let before = snapshot.len();
        self.notifications = match self.user_id.as_deref() {
            Some(owner) => snapshot.into_iter().filter(|n| n.user_id == owner).collect(),
            None => Vec::new(),
        };
        let dropped = before - self.notifications.len();
        if dropped > 0 {
            tracing::warn!(
                user_id = ?self.user_id,
                dropped,
                "Dropped notifications addressed to another user"
            );
        }
        dropped
    }
}
