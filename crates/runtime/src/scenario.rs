//! Scripted scenario playback.
//!
//! A [`ScenarioRunner`] steps a [`MatchSession`] at a fixed rate and issues
//! each scripted intent on the first tick at or after its time. Rejected
//! intents are logged and counted; they never stop the run.

use std::collections::VecDeque;
use std::time::Duration;

use arena_content::{Roster, Scenario, ScriptedIntent};
use arena_core::MatchRules;

use crate::error::{Result, RuntimeError};
use crate::events::EventBus;
use crate::session::{MatchOutcome, MatchSession};

pub struct ScenarioRunner {
    session: MatchSession,
    script: VecDeque<ScriptedIntent>,
    step: Duration,
    rejected: usize,
}

impl ScenarioRunner {
    /// Fixed simulation step.
    pub const DEFAULT_STEP: Duration = Duration::from_millis(10);
    const MIN_STEP: Duration = Duration::from_millis(1);

    /// Builds a session for `scenario` from roster picks and wraps it.
    pub fn new(scenario: &Scenario, roster: &Roster, rules: MatchRules) -> Result<Self> {
        Self::with_bus(scenario, roster, rules, EventBus::new())
    }

    pub fn with_bus(
        scenario: &Scenario,
        roster: &Roster,
        rules: MatchRules,
        bus: EventBus,
    ) -> Result<Self> {
        let pick = |name: &str| {
            roster.get(name).ok_or_else(|| RuntimeError::UnknownCharacter {
                name: name.to_string(),
            })
        };
        let session = MatchSession::with_bus(
            rules,
            pick(&scenario.p1)?,
            pick(&scenario.p2)?,
            scenario.length,
            bus,
        )?;
        tracing::info!(
            scenario = %scenario.name,
            intents = scenario.script.len(),
            "scenario loaded"
        );

        let mut script = scenario.script.clone();
        script.sort_by_key(|entry| entry.at);
        Ok(Self::from_session(session, script))
    }

    /// Plays `script` (ordered by time) against an existing session.
    pub fn from_session(session: MatchSession, script: Vec<ScriptedIntent>) -> Self {
        Self {
            session,
            script: script.into(),
            step: Self::DEFAULT_STEP,
            rejected: 0,
        }
    }

    /// Sets the simulation step. Steps under a millisecond are raised to one.
    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step.max(Self::MIN_STEP);
        self
    }

    /// Issues every intent that is due, then advances one step.
    pub fn tick(&mut self) -> Option<MatchOutcome> {
        self.issue_due();
        self.session.advance(self.step)
    }

    /// Runs until the match is decided.
    pub fn run_to_end(&mut self) -> MatchOutcome {
        loop {
            if let Some(outcome) = self.tick() {
                return outcome;
            }
        }
    }

    /// Like [`ScenarioRunner::run_to_end`], but one step per wall-clock step.
    pub async fn run_paced(&mut self) -> MatchOutcome {
        let mut interval = tokio::time::interval(self.step);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Burst);
        loop {
            interval.tick().await;
            if let Some(outcome) = self.tick() {
                return outcome;
            }
        }
    }

    pub fn session(&self) -> &MatchSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut MatchSession {
        &mut self.session
    }

    pub fn into_session(self) -> MatchSession {
        self.session
    }

    /// Number of scripted intents the engine turned down so far.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Number of scripted intents not yet issued.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    fn issue_due(&mut self) {
        let now = self.session.clock().elapsed();
        while self.script.front().is_some_and(|entry| entry.at <= now) {
            let Some(entry) = self.script.pop_front() else {
                break;
            };
            if self.session.is_over() {
                continue;
            }
            match self.session.apply(entry.combatant, entry.intent) {
                Ok(()) => {
                    tracing::debug!(combatant = %entry.combatant, intent = ?entry.intent, "intent applied");
                }
                Err(err) => {
                    self.rejected += 1;
                    tracing::warn!(
                        combatant = %entry.combatant,
                        intent = ?entry.intent,
                        error = %err,
                        "intent rejected"
                    );
                }
            }
        }
    }
}
