//! Match session: engine, clock, outcome and event publication.

use std::time::Duration;

use arena_content::Intent;
use arena_core::{CharacterDef, CombatEngine, CombatantId, MatchRules};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RuntimeError};
use crate::events::{Event, EventBus, MatchEvent};

/// How a match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// The loser's health reached zero.
    Knockout { winner: CombatantId },
    /// The clock ran out with unequal health.
    TimeUp { winner: CombatantId },
    /// The clock ran out with equal health, or both fell on the same tick.
    Draw,
}

impl MatchOutcome {
    pub fn winner(&self) -> Option<CombatantId> {
        match self {
            Self::Knockout { winner } | Self::TimeUp { winner } => Some(*winner),
            Self::Draw => None,
        }
    }
}

// ============================================================================
// Clock
// ============================================================================

/// Counts match time down from a fixed length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchClock {
    length: Duration,
    elapsed: Duration,
}

impl MatchClock {
    pub const DEFAULT_LENGTH: Duration = Duration::from_secs(60);

    pub fn new(length: Duration) -> Self {
        Self {
            length,
            elapsed: Duration::ZERO,
        }
    }

    /// Moves the clock forward and returns the time actually consumed,
    /// which is short of `dt` when the clock runs out.
    pub fn advance(&mut self, dt: Duration) -> Duration {
        let step = dt.min(self.remaining());
        self.elapsed += step;
        step
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn remaining(&self) -> Duration {
        self.length.saturating_sub(self.elapsed)
    }

    pub fn length(&self) -> Duration {
        self.length
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.length
    }
}

impl Default for MatchClock {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LENGTH)
    }
}

// ============================================================================
// Session
// ============================================================================

/// One match between two characters.
///
/// Every engine event is published on the session's [`EventBus`] stamped
/// with the match time. Once an outcome is decided the session is frozen:
/// further advances do nothing and intents are refused.
pub struct MatchSession {
    engine: CombatEngine,
    clock: MatchClock,
    bus: EventBus,
    outcome: Option<MatchOutcome>,
}

impl MatchSession {
    pub fn new(
        rules: MatchRules,
        p1: &CharacterDef,
        p2: &CharacterDef,
        length: Duration,
    ) -> Result<Self> {
        Self::with_bus(rules, p1, p2, length, EventBus::new())
    }

    /// Builds a session publishing on an existing bus.
    pub fn with_bus(
        rules: MatchRules,
        p1: &CharacterDef,
        p2: &CharacterDef,
        length: Duration,
        bus: EventBus,
    ) -> Result<Self> {
        let engine = CombatEngine::new(rules, p1, p2)?;
        tracing::info!(p1 = %p1.name, p2 = %p2.name, length = ?length, "match started");
        bus.publish(Event::Match(MatchEvent::Started {
            p1: p1.name.clone(),
            p2: p2.name.clone(),
            length,
        }));

        let mut session = Self {
            engine,
            clock: MatchClock::new(length),
            bus,
            outcome: None,
        };
        session.publish_engine_events();
        session.settle();
        Ok(session)
    }

    /// Advances the match by `dt` and returns the outcome once decided.
    pub fn advance(&mut self, dt: Duration) -> Option<MatchOutcome> {
        if self.outcome.is_some() {
            tracing::trace!("advance ignored, match is over");
            return self.outcome;
        }

        let step = self.clock.advance(dt);
        self.engine.advance(step);
        self.publish_engine_events();
        self.settle();
        self.outcome
    }

    /// Forwards an intent to the engine.
    ///
    /// Events caused by the intent are published immediately.
    pub fn apply(&mut self, combatant: CombatantId, intent: Intent) -> Result<()> {
        if self.outcome.is_some() {
            return Err(RuntimeError::MatchOver);
        }

        let engine = &mut self.engine;
        let result = match intent {
            Intent::Hold(direction) => {
                engine.set_move_intent(combatant, direction);
                Ok(())
            }
            Intent::Step(direction) => engine.request_step(combatant, direction),
            Intent::BasicAttack => engine.fire_basic_attack(combatant),
            Intent::Cast { slot, aim } => engine.cast_skill(combatant, slot, aim),
            Intent::Parry => engine.try_parry(combatant),
            Intent::Respawn => engine.respawn(combatant),
        };
        self.publish_engine_events();

        result.map_err(|source| {
            self.bus.publish(Event::Match(MatchEvent::IntentRejected {
                combatant,
                reason: source.to_string(),
            }));
            RuntimeError::command(combatant, source)
        })
    }

    pub fn engine(&self) -> &CombatEngine {
        &self.engine
    }

    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    fn publish_engine_events(&mut self) {
        let at = self.clock.elapsed();
        for event in self.engine.drain_events() {
            tracing::debug!(at = ?at, ?event, "engine event");
            self.bus.publish(Event::Engine { at, event });
        }
    }

    /// Decides the outcome if the match has ended.
    fn settle(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        let Some(outcome) = self.decide() else {
            return;
        };

        let at = self.clock.elapsed();
        tracing::info!(?outcome, at = ?at, "match ended");
        self.outcome = Some(outcome);
        self.bus
            .publish(Event::Match(MatchEvent::Ended { outcome, at }));
    }

    fn decide(&self) -> Option<MatchOutcome> {
        let p1_alive = self.engine.is_alive(CombatantId::P1);
        let p2_alive = self.engine.is_alive(CombatantId::P2);
        match (p1_alive, p2_alive) {
            (true, false) => {
                return Some(MatchOutcome::Knockout {
                    winner: CombatantId::P1,
                });
            }
            (false, true) => {
                return Some(MatchOutcome::Knockout {
                    winner: CombatantId::P2,
                });
            }
            (false, false) => return Some(MatchOutcome::Draw),
            (true, true) => {}
        }

        if !self.clock.is_expired() {
            return None;
        }
        let p1 = self.engine.health(CombatantId::P1);
        let p2 = self.engine.health(CombatantId::P2);
        Some(match p1.cmp(&p2) {
            std::cmp::Ordering::Greater => MatchOutcome::TimeUp {
                winner: CombatantId::P1,
            },
            std::cmp::Ordering::Less => MatchOutcome::TimeUp {
                winner: CombatantId::P2,
            },
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_consumes_only_what_remains() {
        let mut clock = MatchClock::new(Duration::from_millis(100));
        assert_eq!(clock.advance(Duration::from_millis(60)), Duration::from_millis(60));
        assert_eq!(clock.advance(Duration::from_millis(60)), Duration::from_millis(40));
        assert!(clock.is_expired());
        assert_eq!(clock.advance(Duration::from_millis(60)), Duration::ZERO);
        assert_eq!(clock.remaining(), Duration::ZERO);
    }

    #[test]
    fn outcome_winner() {
        assert_eq!(
            MatchOutcome::Knockout {
                winner: CombatantId::P2
            }
            .winner(),
            Some(CombatantId::P2)
        );
        assert_eq!(MatchOutcome::Draw.winner(), None);
    }

    #[test]
    fn zero_length_match_ends_as_draw_immediately() {
        let session = MatchSession::new(
            MatchRules::default(),
            &CharacterDef::prodigy(),
            &CharacterDef::arcanist(),
            Duration::ZERO,
        )
        .unwrap();
        assert_eq!(session.outcome(), Some(MatchOutcome::Draw));
    }
}
