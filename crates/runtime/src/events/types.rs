//! Session lifecycle events.

use std::time::Duration;

use arena_core::CombatantId;
use serde::{Deserialize, Serialize};

use crate::session::MatchOutcome;

/// Lifecycle of one match, published on [`super::Topic::Match`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    Started {
        p1: String,
        p2: String,
        length: Duration,
    },
    /// An intent was turned down by the engine. State did not change.
    IntentRejected {
        combatant: CombatantId,
        reason: String,
    },
    Ended {
        outcome: MatchOutcome,
        at: Duration,
    },
}
