//! Deferred skill continuations.
//!
//! Delayed effects (a bolt's fire delay, a pulse impact, the two halves of a
//! dash) are queued here with an absolute due time and drained by the engine
//! once the match clock reaches it. Entries due on the same tick run in the
//! order they were queued.

use std::time::Duration;

use crate::skills::Element;
use crate::state::{CombatantId, Position};

/// Work left for a skill after its cast.
#[derive(Clone, Debug, PartialEq)]
pub enum Continuation {
    /// Launch a bolt from the caster's cell at fire time.
    Fire {
        caster: CombatantId,
        damage: u32,
        speed: f32,
        element: Option<Element>,
    },
    /// Land a pulse on `cells`, computing damage from `origin`.
    PulseImpact {
        caster: CombatantId,
        origin: Position,
        cells: Vec<Position>,
        damage: u32,
    },
    /// Arrive next to the aim column and strike it.
    DashStrike {
        caster: CombatantId,
        origin: Position,
        aim: Position,
        damage: u32,
        half_height: u32,
        /// Time from the strike until the caster is back on `origin`.
        return_after: Duration,
    },
    /// Put the caster back where the dash started.
    DashReturn {
        caster: CombatantId,
        origin: Position,
    },
}

impl Continuation {
    pub fn caster(&self) -> CombatantId {
        match self {
            Self::Fire { caster, .. }
            | Self::PulseImpact { caster, .. }
            | Self::DashStrike { caster, .. }
            | Self::DashReturn { caster, .. } => *caster,
        }
    }
}

#[derive(Clone, Debug)]
struct Entry {
    due: Duration,
    seq: u64,
    action: Continuation,
}

#[derive(Clone, Debug, Default)]
pub struct Schedule {
    pending: Vec<Entry>,
    next_seq: u64,
}

impl Schedule {
    pub fn push(&mut self, due: Duration, action: Continuation) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Entry { due, seq, action });
    }

    /// Removes and returns every continuation due by `now`, earliest first.
    pub fn pop_due(&mut self, now: Duration) -> Vec<Continuation> {
        let (mut due, rest): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|entry| entry.due <= now);
        self.pending = rest;

        due.sort_by_key(|entry| (entry.due, entry.seq));
        due.into_iter().map(|entry| entry.action).collect()
    }

    /// Drops everything queued for `caster`. Returns how many were dropped.
    pub fn cancel_for(&mut self, caster: CombatantId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|entry| entry.action.caster() != caster);
        before - self.pending.len()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
