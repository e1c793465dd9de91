//! Match orchestration on top of the deterministic combat engine.
//!
//! This crate owns everything around a single match that the engine itself
//! stays out of: the match clock and its outcome, event fan-out, and playback
//! of scripted scenarios. Consumers build a [`MatchSession`] (or a
//! [`ScenarioRunner`] around one), subscribe to [`Topic`]s on its
//! [`EventBus`], and drive it with `advance`.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the session, its clock and outcome rules
//! - [`events`] provides the topic-based event bus
//! - [`scenario`] replays timed intents against a session
//! - [`error`] defines the runtime error surface
pub mod error;
pub mod events;
pub mod scenario;
pub mod session;

pub use error::{Result, RuntimeError};
pub use events::{Event, EventBus, MatchEvent, Topic};
pub use scenario::ScenarioRunner;
pub use session::{MatchClock, MatchOutcome, MatchSession};
