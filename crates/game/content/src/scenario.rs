//! Scripted scenarios: two roster picks and a timed list of intents.

use std::time::Duration;

use arena_core::{CardinalDirection, CombatantId, Position, SlotRef};

/// A scripted match.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scenario {
    pub name: String,
    /// Roster name of the left combatant.
    pub p1: String,
    /// Roster name of the right combatant.
    pub p2: String,
    /// Match clock length.
    #[cfg_attr(
        feature = "serde",
        serde(with = "arena_core::config::seconds", default = "Scenario::default_length")
    )]
    pub length: Duration,
    #[cfg_attr(feature = "serde", serde(default))]
    pub script: Vec<ScriptedIntent>,
}

impl Scenario {
    pub const DEFAULT_LENGTH: Duration = Duration::from_secs(60);

    pub fn new(name: impl Into<String>, p1: impl Into<String>, p2: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            p1: p1.into(),
            p2: p2.into(),
            length: Self::DEFAULT_LENGTH,
            script: Vec::new(),
        }
    }

    pub fn with_length(mut self, length: Duration) -> Self {
        self.length = length;
        self
    }

    /// Appends an intent. The script is kept ordered by time.
    pub fn then(mut self, at: Duration, combatant: CombatantId, intent: Intent) -> Self {
        self.script.push(ScriptedIntent {
            at,
            combatant,
            intent,
        });
        self.sort_script();
        self
    }

    /// Orders the script by time, keeping file order among equal times.
    pub fn sort_script(&mut self) {
        self.script.sort_by_key(|entry| entry.at);
    }

    /// Time of the last scripted intent.
    pub fn script_end(&self) -> Duration {
        self.script.last().map_or(Duration::ZERO, |entry| entry.at)
    }

    fn default_length() -> Duration {
        Self::DEFAULT_LENGTH
    }
}

/// One intent issued at a match time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScriptedIntent {
    #[cfg_attr(feature = "serde", serde(with = "arena_core::config::seconds"))]
    pub at: Duration,
    pub combatant: CombatantId,
    pub intent: Intent,
}

/// A player input, mirroring the engine's command surface.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Intent {
    /// Hold a direction (or release with `None`).
    Hold(Option<CardinalDirection>),
    /// One step, independent of the held direction.
    Step(CardinalDirection),
    BasicAttack,
    Cast {
        slot: SlotRef,
        #[cfg_attr(feature = "serde", serde(default))]
        aim: Option<Position>,
    },
    Parry,
    Respawn,
}
