pub mod identity;
pub mod notification;

pub use identity::Identity;
pub use notification::{NewNotification, Notification, NotificationType};
