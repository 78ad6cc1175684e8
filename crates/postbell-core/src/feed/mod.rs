//! Live notification feed for the signed-in user.
//!
//! - `channel`: the live subscription and its single-slot store
//! - `mutator`: read-state writes, run as detached tasks
//! - `identity`: drives the channel from identity-provider changes

pub mod channel;
pub mod identity;
pub mod mutator;

pub use channel::NotificationFeed;
pub use identity::follow_identity;
pub use mutator::{BulkReadReport, ReadStateMutator};
