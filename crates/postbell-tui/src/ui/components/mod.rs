pub mod bell;

pub use bell::{bell_spans, bell_width};
