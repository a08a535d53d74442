//! Topic-based event bus for fight events.
//!
//! Every event a fight emits is published to the topic of its family, and
//! consumers subscribe only to the topics they need.

mod bus;

pub use bus::{Event, EventBus, Topic};
