//! Event log and end-of-match summary.
use std::fmt;
use std::time::Duration;

use arena_core::{CombatantId, Event as EngineEvent, HitSource};
use arena_runtime::{Event, EventBus, MatchEvent, MatchOutcome, ScenarioRunner};
use tokio::sync::broadcast::{Receiver, error::RecvError};
use tokio::task::JoinHandle;

/// Spawns one logging task per topic. Each task ends when the bus is
/// dropped and yields the number of events it logged.
pub fn spawn_event_log(bus: &EventBus) -> Vec<JoinHandle<usize>> {
    bus.subscribe_all()
        .into_values()
        .map(|rx| tokio::spawn(log_events(rx)))
        .collect()
}

async fn log_events(mut rx: Receiver<Event>) -> usize {
    let mut logged = 0;
    loop {
        match rx.recv().await {
            Ok(event) => {
                logged += 1;
                tracing::info!(topic = ?event.topic(), "{}", describe(&event));
            }
            Err(RecvError::Closed) => return logged,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Event log lagged, skipped {} events", skipped);
            }
        }
    }
}

/// One-line description of a published event.
pub fn describe(event: &Event) -> String {
    match event {
        Event::Engine { at, event } => format!("[{}] {}", clock(*at), describe_engine(event)),
        Event::Match(MatchEvent::Started { p1, p2, length }) => {
            format!("match started: {} vs {} ({})", p1, p2, clock(*length))
        }
        Event::Match(MatchEvent::IntentRejected { combatant, reason }) => {
            format!("{} intent rejected: {}", combatant, reason)
        }
        Event::Match(MatchEvent::Ended { outcome, at }) => {
            format!("[{}] match ended: {}", clock(*at), outcome_text(outcome))
        }
    }
}

fn describe_engine(event: &EngineEvent) -> String {
    match event {
        EngineEvent::HitLanded {
            attacker,
            target,
            damage,
            source,
        } => format!(
            "{} hits {} for {} ({})",
            attacker,
            target,
            damage,
            source_text(source)
        ),
        EngineEvent::HitParried { defender, source } => {
            format!("{} parries {}", defender, source_text(source))
        }
        EngineEvent::HealthChanged {
            combatant,
            current,
            max,
        } => format!("{} health {}/{}", combatant, current, max),
        EngineEvent::ManaChanged {
            combatant,
            current,
            max,
        } => format!("{} mana {:.1}/{:.1}", combatant, current, max),
        EngineEvent::Stepped { combatant, from, to } => {
            format!("{} steps {} -> {}", combatant, from, to)
        }
        EngineEvent::Teleported { combatant, from, to } => {
            format!("{} moves {} -> {}", combatant, from, to)
        }
        EngineEvent::SkillCast { combatant, skill } => format!("{} casts {}", combatant, skill),
        EngineEvent::ProjectileDeflected {
            projectile,
            owner,
            damage,
            speed,
            count,
        } => format!(
            "{} deflected to {} (x{}, {} dmg, {:.1} cells/s)",
            projectile, owner, count, damage, speed
        ),
        EngineEvent::Died { combatant } => format!("{} is down", combatant),
        other => format!("{:?}", other),
    }
}

fn source_text(source: &HitSource) -> String {
    match source {
        HitSource::Projectile(id) => id.to_string(),
        HitSource::Area => "area".to_string(),
        HitSource::Dash => "dash".to_string(),
    }
}

fn outcome_text(outcome: &MatchOutcome) -> String {
    match outcome {
        MatchOutcome::Knockout { winner } => format!("{} wins by knockout", winner),
        MatchOutcome::TimeUp { winner } => format!("{} wins on time", winner),
        MatchOutcome::Draw => "draw".to_string(),
    }
}

fn clock(at: Duration) -> String {
    format!("{:>6.2}s", at.as_secs_f32())
}

/// Final state of a played scenario.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub scenario: String,
    pub outcome: MatchOutcome,
    pub elapsed: Duration,
    pub health: [u32; 2],
    pub rejected: usize,
}

impl Summary {
    pub fn new(scenario: &str, outcome: MatchOutcome, runner: &ScenarioRunner) -> Self {
        let session = runner.session();
        let engine = session.engine();
        Self {
            scenario: scenario.to_string(),
            outcome,
            elapsed: session.clock().elapsed(),
            health: [
                engine.health(CombatantId::P1),
                engine.health(CombatantId::P2),
            ],
            rejected: runner.rejected(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "scenario  {}", self.scenario)?;
        writeln!(f, "result    {}", outcome_text(&self.outcome))?;
        writeln!(f, "time      {:.2}s", self.elapsed.as_secs_f32())?;
        writeln!(f, "health    P1 {}  P2 {}", self.health[0], self.health[1])?;
        write!(f, "rejected  {}", self.rejected)
    }
}
