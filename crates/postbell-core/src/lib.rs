pub mod backend;
pub mod comments;
pub mod config;
pub mod feed;
pub mod models;
pub mod store;
pub mod tracing_setup;

pub use backend::{BackendError, MemoryBackend, NotificationBackend};
pub use config::FeedConfig;
pub use feed::{follow_identity, NotificationFeed};
pub use models::{Identity, Notification};
pub use store::NotificationStore;
