use std::sync::Arc;

use postbell_core::feed::BulkReadReport;
use postbell_core::{FeedConfig, Identity, NotificationFeed, NotificationStore};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::demo::DemoHarness;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Home,
    Post { post_id: String, title: String },
}

/// State of the notification chrome.
///
/// Identity and configuration are handed in; the feed follows identity
/// changes through `identity_tx`. Read-state writes are fire-and-forget:
/// the handles returned here are only for callers that want to observe
/// settlement, the key handlers drop them.
pub struct App {
    pub view: View,
    pub running: bool,
    pub dropdown_open: bool,
    /// Index into the visible window of the dropdown.
    pub selected: usize,
    pub config: FeedConfig,
    feed: Arc<NotificationFeed>,
    feed_rx: watch::Receiver<NotificationStore>,
    identity_tx: watch::Sender<Option<Identity>>,
    demo: DemoHarness,
}

impl App {
    pub fn new(
        feed: Arc<NotificationFeed>,
        identity_tx: watch::Sender<Option<Identity>>,
        config: FeedConfig,
        demo: DemoHarness,
    ) -> Self {
        let feed_rx = feed.watch();
        Self {
            view: View::Home,
            running: true,
            dropdown_open: false,
            selected: 0,
            config,
            feed,
            feed_rx,
            identity_tx,
            demo,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    // ===== Derived state =====

    pub fn store(&self) -> watch::Ref<'_, NotificationStore> {
        self.feed_rx.borrow()
    }

    pub fn unread_count(&self) -> usize {
        self.store().unread_count()
    }

    pub fn feed_watch(&self) -> watch::Receiver<NotificationStore> {
        self.feed.watch()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.identity_tx.borrow().clone()
    }

    fn visible_len(&self) -> usize {
        self.store().visible(self.config.visible_window).len()
    }

    // ===== Dropdown =====

    pub fn toggle_dropdown(&mut self) {
        self.dropdown_open = !self.dropdown_open;
        self.selected = 0;
    }

    pub fn close_dropdown(&mut self) {
        self.dropdown_open = false;
    }

    pub fn select_next(&mut self) {
        let len = self.visible_len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the selection inside the visible window after a new snapshot.
    pub fn clamp_selection(&mut self) {
        let len = self.visible_len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// Mark the selected notification read, open its post and close the
    /// dropdown, in that order. The write is not awaited.
    pub fn open_selected(&mut self) -> Option<JoinHandle<()>> {
        if !self.dropdown_open {
            return None;
        }
        let target = self
            .store()
            .visible(self.config.visible_window)
            .get(self.selected)
            .cloned()?;

        let pending = self.feed.mark_as_read(&target.id);
        self.view = View::Post {
            post_id: target.post_id,
            title: target.post_title,
        };
        self.close_dropdown();
        Some(pending)
    }

    /// Only available while something is unread.
    pub fn mark_all_read(&mut self) -> Option<JoinHandle<BulkReadReport>> {
        if !self.dropdown_open || self.unread_count() == 0 {
            return None;
        }
        Some(self.feed.mark_all_as_read())
    }

    pub fn go_home(&mut self) {
        self.view = View::Home;
    }

    // ===== Identity =====

    pub fn toggle_sign_in(&mut self) {
        let next = match self.identity() {
            Some(_) => None,
            None => self.demo.accounts().first().cloned(),
        };
        self.set_identity(next);
    }

    /// Sign in as the next demo account.
    pub fn switch_account(&mut self) {
        let current = self.identity();
        let next = self.demo.next_account(current.as_ref().map(|i| i.uid.as_str()));
        self.set_identity(next);
    }

    fn set_identity(&mut self, identity: Option<Identity>) {
        tracing::info!(user_id = ?identity.as_ref().map(|i| &i.uid), "Switching identity");
        self.identity_tx.send_replace(identity);
        self.dropdown_open = false;
        self.selected = 0;
        self.view = View::Home;
    }

    /// Have another demo account comment on one of the signed-in user's posts.
    pub fn simulate_comment(&mut self) -> Option<JoinHandle<()>> {
        let recipient = self.identity()?;
        self.demo.simulate_comment(&recipient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;
    use chrono::Utc;
    use postbell_core::models::{Notification, NotificationType};
    use postbell_core::{follow_identity, MemoryBackend, NotificationBackend};
    use std::time::Duration;

    fn notification(id: &str, user_id: &str, read: bool) -> Notification {
        Notification {
            id: id.to_string(),
            user_id: user_id.to_string(),
            post_id: format!("post-{}", id),
            post_title: format!("Post {}", id),
            commenter_name: "Grace".to_string(),
            commenter_id: "u2".to_string(),
            kind: NotificationType::Comment,
            read,
            timestamp: Utc::now(),
        }
    }

    async fn wait_until(app: &App, predicate: impl FnMut(&NotificationStore) -> bool) {
        let mut rx = app.feed_watch();
        tokio::time::timeout(Duration::from_secs(2), async move {
            rx.wait_for(predicate).await.map(|_| ())
        })
        .await
        .expect("timed out waiting for feed")
        .expect("feed closed");
    }

    fn app_with(backend: &MemoryBackend, user: Option<&str>) -> App {
        let backend: Arc<dyn NotificationBackend> = Arc::new(backend.clone());
        let feed = Arc::new(NotificationFeed::new(backend.clone()));
        let harness = DemoHarness::new(backend);
        let identity = user.and_then(|uid| harness.account(uid));
        let (identity_tx, identity_rx) = watch::channel(identity);
        tokio::spawn(follow_identity(feed.clone(), identity_rx));
        App::new(feed, identity_tx, FeedConfig::default(), harness)
    }

    #[tokio::test]
    async fn test_open_selected_marks_read_navigates_and_closes() {
        let backend = MemoryBackend::new();
        backend.insert(notification("n1", "u1", false));
        backend.insert(notification("n2", "u1", true));
        let mut app = app_with(&backend, Some("u1"));
        wait_until(&app, |s| s.len() == 2).await;
        assert_eq!(app.unread_count(), 1);

        app.toggle_dropdown();
        let pending = app.open_selected().expect("a notification is selected");

        assert_eq!(
            app.view,
            View::Post {
                post_id: "post-n1".to_string(),
                title: "Post n1".to_string()
            }
        );
        assert!(!app.dropdown_open);

        pending.await.unwrap();
        wait_until(&app, |s| s.unread_count() == 0).await;
        assert!(backend.get("n1").unwrap().read);
    }

    #[tokio::test]
    async fn test_open_selected_needs_open_dropdown_and_items() {
        let backend = MemoryBackend::new();
        let mut app = app_with(&backend, Some("u1"));
        assert!(app.open_selected().is_none());

        app.toggle_dropdown();
        assert!(app.open_selected().is_none());
        assert_eq!(app.view, View::Home);
    }

    #[tokio::test]
    async fn test_mark_all_read_only_when_unread() {
        let backend = MemoryBackend::new();
        backend.insert(notification("n1", "u1", false));
        backend.insert(notification("n2", "u1", false));
        let mut app = app_with(&backend, Some("u1"));
        wait_until(&app, |s| s.len() == 2).await;

        app.toggle_dropdown();
        let report = app.mark_all_read().unwrap().await.unwrap();
        assert_eq!(report.attempted, 2);
        wait_until(&app, |s| s.unread_count() == 0).await;

        assert!(app.mark_all_read().is_none());
    }

    #[tokio::test]
    async fn test_selection_stays_in_visible_window() {
        let backend = MemoryBackend::new();
        for i in 0..7 {
            backend.insert(notification(&format!("n{}", i), "u1", false));
        }
        let mut app = app_with(&backend, Some("u1"));
        wait_until(&app, |s| s.len() == 7).await;

        app.toggle_dropdown();
        for _ in 0..10 {
            app.select_next();
        }
        assert_eq!(app.selected, 4);
        app.select_prev();
        assert_eq!(app.selected, 3);
    }

    #[tokio::test]
    async fn test_sign_out_clears_feed() {
        let backend = MemoryBackend::new();
        demo::seed(&backend);
        let mut app = app_with(&backend, Some("u1"));
        wait_until(&app, |s| !s.is_empty()).await;

        app.toggle_sign_in();
        assert!(app.identity().is_none());
        wait_until(&app, |s| s.user_id().is_none()).await;
        assert_eq!(app.unread_count(), 0);
        assert!(app.store().is_empty());

        app.toggle_sign_in();
        wait_until(&app, |s| s.user_id() == Some("u1") && !s.is_empty()).await;
    }

    #[tokio::test]
    async fn test_switch_account_and_simulated_comment() {
        let backend = MemoryBackend::new();
        demo::seed(&backend);
        let mut app = app_with(&backend, Some("u1"));

        app.switch_account();
        assert_eq!(app.identity().map(|i| i.uid), Some("u2".to_string()));
        wait_until(&app, |s| s.user_id() == Some("u2") && !s.is_empty()).await;
        let before = app.store().len();

        app.simulate_comment().unwrap().await.unwrap();
        wait_until(&app, |s| s.len() == before + 1).await;
        assert!(app.store().notifications().iter().all(|n| n.user_id == "u2"));
    }
}
