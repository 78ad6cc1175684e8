use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What triggered a notification. Values this client does not know about
/// deserialize to `Other` instead of failing the whole snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Comment,
    #[serde(other)]
    Other,
}

/// A notification document as stored in the `notifications` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    /// Recipient. A user only ever observes notifications addressed to them.
    pub user_id: String,
    pub post_id: String,
    /// Title at comment time; later edits to the post are not reflected.
    pub post_title: String,
    pub commenter_name: String,
    pub commenter_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    #[serde(default)]
    pub read: bool,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn is_unread(&self) -> bool {
        !self.read
    }

    /// One-line summary used by the feed view.
    pub fn summary(&self) -> String {
        match self.kind {
            NotificationType::Comment => {
                format!("{} commented on your post", self.commenter_name)
            }
            NotificationType::Other => format!("{} interacted with your post", self.commenter_name),
        }
    }
}

/// Payload for creating a notification. The backend assigns `id`,
/// `timestamp` and the initial `read = false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub user_id: String,
    pub post_id: String,
    pub post_title: String,
    pub commenter_name: String,
    pub commenter_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
}

impl NewNotification {
    pub fn into_notification(self, id: String, timestamp: DateTime<Utc>) -> Notification {
        Notification {
            id,
            user_id: self.user_id,
            post_id: self.post_id,
            post_title: self.post_title,
            commenter_name: self.commenter_name,
            commenter_id: self.commenter_id,
            kind: self.kind,
            read: false,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document() {
        let json = r#"{
            "id": "n1",
            "userId": "u1",
            "postId": "p1",
            "postTitle": "Hello",
            "commenterName": "Grace",
            "commenterId": "u2",
            "type": "comment",
            "read": false,
            "timestamp": "2024-05-01T10:00:00Z"
        }"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.user_id, "u1");
        assert_eq!(n.kind, NotificationType::Comment);
        assert!(n.is_unread());
        assert_eq!(n.summary(), "Grace commented on your post");
    }

    #[test]
    fn test_unknown_type_and_missing_read() {
        let json = r#"{
            "id": "n9",
            "userId": "u1",
            "postId": "p1",
            "postTitle": "Hello",
            "commenterName": "Grace",
            "commenterId": "u2",
            "type": "like",
            "timestamp": "2024-05-01T10:00:00Z"
        }"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.kind, NotificationType::Other);
        assert!(!n.read);
    }

    #[test]
    fn test_new_notification_starts_unread() {
        let new = NewNotification {
            user_id: "u1".to_string(),
            post_id: "p1".to_string(),
            post_title: "Hello".to_string(),
            commenter_name: "Grace".to_string(),
            commenter_id: "u2".to_string(),
            kind: NotificationType::Comment,
        };
        let n = new.into_notification("n1".to_string(), Utc::now());
        assert_eq!(n.id, "n1");
        assert!(!n.read);
    }
}
