//! The comment-submission side of the notification feed.
//!
//! Commenting on someone else's post creates a notification for its author.
//! The commenter's own view merges a synthetic copy of the comment right
//! away instead of waiting for the backend round trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::{BackendError, NotificationBackend};
use crate::models::{Identity, NewNotification, NotificationType};

/// The parts of a post the comment flow needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRef {
    pub id: String,
    pub title: String,
    pub author_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub content: String,
    pub author: String,
    pub author_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Notification for the author of `post`, or `None` when the commenter is
/// the author.
pub fn comment_notification(post: &PostRef, commenter: &Identity) -> Option<NewNotification> {
    if post.author_id == commenter.uid {
        return None;
    }
    Some(NewNotification {
        user_id: post.author_id.clone(),
        post_id: post.id.clone(),
        post_title: post.title.clone(),
        commenter_name: commenter.label().to_string(),
        commenter_id: commenter.uid.clone(),
        kind: NotificationType::Comment,
    })
}

/// Create the notification for a new comment. Returns the id of the created
/// notification, or `None` for a self-comment.
pub async fn notify_post_author(
    backend: &dyn NotificationBackend,
    post: &PostRef,
    commenter: &Identity,
) -> Result<Option<String>, BackendError> {
    let Some(notification) = comment_notification(post, commenter) else {
        tracing::debug!(post_id = %post.id, "Skipping notification for self-comment");
        return Ok(None);
    };
    let id = backend.create(notification).await?;
    tracing::debug!(post_id = %post.id, notification_id = %id, "Notified post author");
    Ok(Some(id))
}

/// Comments of one post, newest first.
#[derive(Debug, Clone, Default)]
pub struct CommentThread {
    comments: Vec<Comment>,
}

impl CommentThread {
    pub fn new(comments: Vec<Comment>) -> Self {
        Self { comments }
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Prepend a local copy of a just-submitted comment. The id is derived
    /// from the local clock and only has to be unique within this thread.
    pub fn merge_local(&mut self, post_id: &str, content: &str, author: &Identity) -> &Comment {
        let now = Utc::now();
        let mut id = now.timestamp_millis().to_string();
        while self.comments.iter().any(|c| c.id == id) {
            id.push('+');
        }
        self.comments.insert(
            0,
            Comment {
                id,
                post_id: post_id.to_string(),
                content: content.trim().to_string(),
                author: author.label().to_string(),
                author_id: author.uid.clone(),
                timestamp: now,
            },
        );
        &self.comments[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    fn post() -> PostRef {
        PostRef {
            id: "p1".to_string(),
            title: "Hello world".to_string(),
            author_id: "u1".to_string(),
        }
    }

    #[test]
    fn test_self_comment_creates_nothing() {
        let author = Identity::new("u1").with_display_name("Ada");
        assert!(comment_notification(&post(), &author).is_none());
    }

    #[test]
    fn test_comment_notification_fields() {
        let commenter = Identity::new("u2").with_email("grace@example.com");
        let n = comment_notification(&post(), &commenter).unwrap();
        assert_eq!(n.user_id, "u1");
        assert_eq!(n.post_id, "p1");
        assert_eq!(n.post_title, "Hello world");
        assert_eq!(n.commenter_name, "grace@example.com");
        assert_eq!(n.commenter_id, "u2");
        assert_eq!(n.kind, NotificationType::Comment);
    }

    #[tokio::test]
    async fn test_notify_post_author() {
        let backend = MemoryBackend::new();
        let commenter = Identity::new("u2").with_display_name("Grace");

        let id = notify_post_author(&backend, &post(), &commenter)
            .await
            .unwrap()
            .unwrap();
        let stored = backend.get(&id).unwrap();
        assert_eq!(stored.user_id, "u1");
        assert!(!stored.read);

        let author = Identity::new("u1");
        assert_eq!(notify_post_author(&backend, &post(), &author).await, Ok(None));
        assert_eq!(backend.documents().len(), 1);
    }

    #[test]
    fn test_merge_local_prepends() {
        let mut thread = CommentThread::default();
        let author = Identity::new("u2").with_display_name("Grace");
        thread.merge_local("p1", "  first  ", &author);
        thread.merge_local("p1", "second", &author);

        assert_eq!(thread.len(), 2);
        assert_eq!(thread.comments()[0].content, "second");
        assert_eq!(thread.comments()[1].content, "first");
        assert_eq!(thread.comments()[0].author, "Grace");
        assert_ne!(thread.comments()[0].id, thread.comments()[1].id);
    }
}
