//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::time::Duration;

use arena_core::Event as EngineEvent;
use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, IntoEnumIterator};
use tokio::sync::broadcast;

use super::types::MatchEvent;

/// Topics for event routing
#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, EnumIter, EnumCount,
)]
pub enum Topic {
    /// Hits, parries, projectiles, casts and movement
    Combat,
    /// Tile state and takeover claims
    Grid,
    /// Health, mana, ultimate charge, deaths and respawns
    Resources,
    /// Session lifecycle
    Match,
}

impl Topic {
    /// Topic an engine event is published on.
    pub fn of(event: &EngineEvent) -> Self {
        use EngineEvent::*;
        match event {
            HealthChanged { .. }
            | ManaChanged { .. }
            | UltimateChanged { .. }
            | UltimateReady { .. }
            | Died { .. }
            | Respawned { .. } => Self::Resources,
            TileChanged { .. } | TakeoverStarted { .. } | TakeoverEnded { .. } | TakeoverCancelled => {
                Self::Grid
            }
            Stepped { .. }
            | Teleported { .. }
            | SkillCast { .. }
            | ProjectileLaunched { .. }
            | ProjectileDeflected { .. }
            | ProjectileRemoved { .. }
            | HitLanded { .. }
            | HitParried { .. }
            | ParryStarted { .. }
            | ParryEnded { .. }
            | Overload { .. } => Self::Combat,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Event wrapper that carries the match time and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Event emitted by the combat engine at match time `at`.
    Engine { at: Duration, event: EngineEvent },
    Match(MatchEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Engine { event, .. } => Topic::of(event),
            Event::Match(_) => Topic::Match,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Clones share the same channels.
#[derive(Clone)]
pub struct EventBus {
    channels: [broadcast::Sender<Event>; Topic::COUNT],
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: std::array::from_fn(|_| broadcast::channel(capacity).0),
        }
    }

    /// Publish an event to its corresponding topic
    ///
    /// Never blocks. Without subscribers the event is dropped.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels[topic.index()].send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels[topic.index()].subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    /// Subscribe to every topic.
    pub fn subscribe_all(&self) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.subscribe_multiple(&Topic::iter().collect::<Vec<_>>())
    }

    /// Number of live receivers on a topic.
    pub fn receiver_count(&self, topic: Topic) -> usize {
        self.channels[topic.index()].receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
