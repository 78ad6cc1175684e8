use std::sync::Arc;

use tokio::sync::watch;

use super::NotificationFeed;
use crate::models::Identity;

/// Keep `feed` subscribed for whoever `identity_rx` says is signed in.
///
/// Applies the current identity immediately, then every change. When the
/// identity provider goes away the feed is signed out so no query outlives it.
pub async fn follow_identity(
    feed: Arc<NotificationFeed>,
    mut identity_rx: watch::Receiver<Option<Identity>>,
) {
    loop {
        let identity = identity_rx.borrow_and_update().clone();
        tracing::debug!(user_id = ?identity.as_ref().map(|i| &i.uid), "Identity changed");
        feed.set_identity(identity.as_ref()).await;

        if identity_rx.changed().await.is_err() {
            break;
        }
    }
    feed.set_identity(None).await;
}
