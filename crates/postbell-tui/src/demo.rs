//! Demo accounts, posts and seed notifications for running the bell
//! against the in-process backend.

use std::sync::Arc;

use chrono::{Duration, Utc};
use postbell_core::comments::{notify_post_author, PostRef};
use postbell_core::models::{Notification, NotificationType};
use postbell_core::{Identity, MemoryBackend, NotificationBackend};
use tokio::task::JoinHandle;

pub fn accounts() -> Vec<Identity> {
    vec![
        Identity::new("u1")
            .with_display_name("Ada")
            .with_email("ada@example.com"),
        Identity::new("u2")
            .with_display_name("Grace")
            .with_email("grace@example.com"),
        Identity::new("u3").with_email("edsger@example.com"),
    ]
}

pub fn posts() -> Vec<PostRef> {
    [
        ("p1", "Notes on the Analytical Engine", "u1"),
        ("p2", "Debugging the Mark II", "u2"),
        ("p3", "Go To Statement Considered Harmful", "u3"),
        ("p4", "Bernoulli numbers, step by step", "u1"),
        ("p5", "Compilers for everyone", "u2"),
    ]
    .into_iter()
    .map(|(id, title, author_id)| PostRef {
        id: id.to_string(),
        title: title.to_string(),
        author_id: author_id.to_string(),
    })
    .collect()
}

/// Fill `backend` with a few notifications per account, more than one
/// dropdown window for the first account.
pub fn seed(backend: &MemoryBackend) {
    let accounts = accounts();
    let posts = posts();
    let now = Utc::now();

    // (post index, commenter index, hours ago, read)
    let seeds = [
        (0, 1, 1, false),
        (3, 2, 3, false),
        (0, 2, 7, true),
        (3, 1, 20, false),
        (0, 1, 30, true),
        (3, 2, 50, true),
        (1, 0, 2, false),
        (4, 2, 26, true),
        (2, 0, 5, false),
    ];

    for (n, (post_index, commenter_index, hours_ago, read)) in seeds.into_iter().enumerate() {
        let post: &PostRef = &posts[post_index];
        let commenter: &Identity = &accounts[commenter_index];
        backend.insert(Notification {
            id: format!("seed-{}", n + 1),
            user_id: post.author_id.clone(),
            post_id: post.id.clone(),
            post_title: post.title.clone(),
            commenter_name: commenter.label().to_string(),
            commenter_id: commenter.uid.clone(),
            kind: NotificationType::Comment,
            read,
            timestamp: now - Duration::hours(hours_ago),
        });
    }
}

/// Account switching and simulated comments for the demo binary.
pub struct DemoHarness {
    backend: Arc<dyn NotificationBackend>,
    accounts: Vec<Identity>,
    posts: Vec<PostRef>,
    comments_sent: usize,
}

impl DemoHarness {
    pub fn new(backend: Arc<dyn NotificationBackend>) -> Self {
        Self {
            backend,
            accounts: accounts(),
            posts: posts(),
            comments_sent: 0,
        }
    }

    pub fn accounts(&self) -> &[Identity] {
        &self.accounts
    }

    pub fn account(&self, uid: &str) -> Option<Identity> {
        self.accounts.iter().find(|a| a.uid == uid).cloned()
    }

    /// The account after `current`, wrapping around; the first one when
    /// nobody is signed in.
    pub fn next_account(&self, current: Option<&str>) -> Option<Identity> {
        let next = match current.and_then(|uid| self.accounts.iter().position(|a| a.uid == uid)) {
            Some(index) => (index + 1) % self.accounts.len(),
            None => 0,
        };
        self.accounts.get(next).cloned()
    }

    /// Spawn a comment by some other account on one of `recipient`'s posts.
    /// `None` when `recipient` has no posts.
    pub fn simulate_comment(&mut self, recipient: &Identity) -> Option<JoinHandle<()>> {
        let own_posts: Vec<&PostRef> = self
            .posts
            .iter()
            .filter(|p| p.author_id == recipient.uid)
            .collect();
        let others: Vec<&Identity> = self
            .accounts
            .iter()
            .filter(|a| a.uid != recipient.uid)
            .collect();
        if own_posts.is_empty() || others.is_empty() {
            return None;
        }

        let post = own_posts[self.comments_sent % own_posts.len()].clone();
        let commenter = others[self.comments_sent % others.len()].clone();
        self.comments_sent += 1;

        let backend = self.backend.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = notify_post_author(backend.as_ref(), &post, &commenter).await {
                tracing::error!(post_id = %post.id, error = %e, "Error creating comment notification");
            }
        }))
    }
}
