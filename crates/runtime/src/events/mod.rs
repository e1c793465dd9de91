//! Topic-based event bus for match events.
//!
//! Engine events are published to the topic they concern, and consumers can
//! subscribe only to the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::MatchEvent;
