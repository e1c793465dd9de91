//! Tick-driven combat engine.
//!
//! [`CombatEngine`] owns the grid, both combatants, every projectile, the
//! continuation schedule and the takeover arbiter. Callers feed it decoded
//! intents and time deltas, read state through its queries, and drain the
//! events it buffered.
//!
//! One call to [`CombatEngine::advance`] runs these phases in order:
//!
//! 1. match clock
//! 2. grid repair timers
//! 3. movement (steps commit)
//! 4. scheduled skill continuations, then takeover expiry
//! 5. projectile travel and hit resolution
//! 6. parry windows
//! 7. cooldowns, cast locks and passives
//! 8. mana regeneration
mod commands;
mod resolve;
mod schedule;
mod territory;

#[cfg(test)]
mod tests;

use std::time::Duration;

pub use schedule::{Continuation, Schedule};

use strum::IntoEnumIterator;

use crate::combat::{ParryPhase, Projectile};
use crate::config::MatchRules;
use crate::error::{CommandError, SetupError};
use crate::event::Event;
use crate::grid::{TileGrid, TileState};
use crate::movement::{MovementPhase, StepContext, StepOutcome};
use crate::skills::{CharacterDef, Claim, TakeoverArbiter};
use crate::state::{CardinalDirection, Combatant, CombatantId, LaneDirection, Position, Side};
use crate::stats::Mana;

pub struct CombatEngine {
    rules: MatchRules,
    grid: TileGrid,
    combatants: [Combatant; 2],
    projectiles: Vec<Projectile>,
    schedule: Schedule,
    arbiter: TakeoverArbiter,
    elapsed: Duration,
    next_projectile: u32,
    events: Vec<Event>,
}

impl CombatEngine {
    /// Builds an engine for a match between `p1` (left) and `p2` (right).
    pub fn new(rules: MatchRules, p1: &CharacterDef, p2: &CharacterDef) -> Result<Self, SetupError> {
        let (width, height) = (rules.grid.width, rules.grid.height);
        if width < 2 || height < 1 {
            return Err(SetupError::GridTooSmall { width, height });
        }
        p1.validate()?;
        p2.validate()?;

        let grid = TileGrid::new(&rules.grid);
        let spawn_p1 = rules
            .spawn
            .p1
            .unwrap_or_else(|| default_spawn(CombatantId::P1, width, height));
        let spawn_p2 = rules
            .spawn
            .p2
            .unwrap_or_else(|| default_spawn(CombatantId::P2, width, height));
        check_spawn(&grid, CombatantId::P1, spawn_p1)?;
        check_spawn(&grid, CombatantId::P2, spawn_p2)?;
        if spawn_p1 == spawn_p2 {
            return Err(SetupError::SpawnCollision { position: spawn_p1 });
        }

        tracing::debug!(
            width,
            height,
            p1 = %p1.name,
            p2 = %p2.name,
            "combat engine created"
        );

        Ok(Self {
            combatants: [
                Combatant::new(CombatantId::P1, p1, spawn_p1, &rules),
                Combatant::new(CombatantId::P2, p2, spawn_p2, &rules),
            ],
            arbiter: TakeoverArbiter::new(rules.takeover.mutual_cancel_window),
            grid,
            projectiles: Vec::new(),
            schedule: Schedule::default(),
            elapsed: Duration::ZERO,
            next_projectile: 0,
            events: Vec::new(),
            rules,
        })
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advances the simulation by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed += dt;

        self.grid.advance(dt, &mut self.events);
        self.advance_movement(dt);
        self.run_continuations();
        self.expire_claims();
        self.advance_projectiles(dt);

        for c in &mut self.combatants {
            c.parry.advance(dt, &mut c.ledger, &mut self.events);
        }
        for c in &mut self.combatants {
            c.advance_timers(dt);
        }
        for c in &mut self.combatants {
            c.ledger.regen(dt, &mut self.events);
        }
    }

    fn advance_movement(&mut self, dt: Duration) {
        for id in CombatantId::iter() {
            let (me, other) = pair_mut(&mut self.combatants, id);
            let ctx = StepContext {
                position: me.position,
                can_move: me.can_act(),
                speed: me.speed_multiplier(),
            };
            let grid = &self.grid;
            let side = me.side();
            let blocker = other.is_alive().then_some(other.position);

            match me
                .movement
                .advance(dt, ctx, |to| check_destination(grid, id, side, blocker, to))
            {
                StepOutcome::Nothing => {}
                StepOutcome::Committed { from, to } => {
                    me.position = to;
                    tracing::trace!(combatant = %id, %from, %to, "step committed");
                    self.events.push(Event::Stepped {
                        combatant: id,
                        from,
                        to,
                    });
                }
                StepOutcome::Aborted { from, to } => {
                    tracing::debug!(combatant = %id, %from, %to, "step aborted, destination closed");
                }
            }
        }
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Takes every event buffered since the last drain, in emission order.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[Event] {
        &self.events
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn combatant(&self, id: CombatantId) -> &Combatant {
        &self.combatants[id.index()]
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn health(&self, id: CombatantId) -> u32 {
        self.combatant(id).ledger.health()
    }

    pub fn max_health(&self, id: CombatantId) -> u32 {
        self.combatant(id).ledger.max_health()
    }

    pub fn mana(&self, id: CombatantId) -> Mana {
        self.combatant(id).ledger.mana()
    }

    pub fn max_mana(&self, id: CombatantId) -> Mana {
        self.combatant(id).ledger.max_mana()
    }

    pub fn ultimate_meter(&self, id: CombatantId) -> f32 {
        self.combatant(id).ledger.ultimate().charge()
    }

    pub fn is_alive(&self, id: CombatantId) -> bool {
        self.combatant(id).is_alive()
    }

    pub fn position(&self, id: CombatantId) -> Position {
        self.combatant(id).position
    }

    pub fn facing(&self, id: CombatantId) -> LaneDirection {
        self.combatant(id).facing()
    }

    /// Last direction the combatant pressed or stepped toward.
    pub fn heading(&self, id: CombatantId) -> CardinalDirection {
        self.combatant(id).movement.facing()
    }

    pub fn movement_phase(&self, id: CombatantId) -> MovementPhase {
        self.combatant(id).movement.phase()
    }

    pub fn parry_phase(&self, id: CombatantId) -> ParryPhase {
        self.combatant(id).parry.phase()
    }

    pub fn tile(&self, cell: Position) -> Option<TileState> {
        self.grid.tile(cell)
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn active_claim(&self, side: Side) -> Option<&Claim> {
        self.arbiter.active(side)
    }

    pub fn pending_continuations(&self) -> usize {
        self.schedule.len()
    }

    /// Living combatant standing on `cell`, if any.
    pub fn occupant(&self, cell: Position) -> Option<CombatantId> {
        occupant(&self.combatants, cell)
    }
}

// ============================================================================
// Helpers shared by the engine submodules
// ============================================================================

/// Splits the pair into `(first, other)`.
fn pair_mut(
    combatants: &mut [Combatant; 2],
    first: CombatantId,
) -> (&mut Combatant, &mut Combatant) {
    let [p1, p2] = combatants;
    match first {
        CombatantId::P1 => (p1, p2),
        CombatantId::P2 => (p2, p1),
    }
}

fn occupant(combatants: &[Combatant; 2], cell: Position) -> Option<CombatantId> {
    combatants
        .iter()
        .find(|c| c.is_alive() && c.position == cell)
        .map(|c| c.id)
}

/// Legality of a step destination for `combatant`.
fn check_destination(
    grid: &TileGrid,
    combatant: CombatantId,
    side: Side,
    blocker: Option<Position>,
    to: Position,
) -> Result<(), CommandError> {
    if !grid.is_valid_cell(to) {
        return Err(CommandError::OutOfBounds { destination: to });
    }
    if !grid.is_walkable_for_side(to, side) {
        return Err(CommandError::NotWalkable {
            combatant,
            destination: to,
        });
    }
    if blocker == Some(to) {
        return Err(CommandError::Occupied { destination: to });
    }
    Ok(())
}

/// Moves a combatant without a step. Any step in progress is dropped.
fn teleport(combatant: &mut Combatant, to: Position, events: &mut Vec<Event>) {
    combatant.movement.interrupt();
    if combatant.position == to {
        return;
    }
    let from = combatant.position;
    combatant.position = to;
    tracing::debug!(combatant = %combatant.id, %from, %to, "teleported");
    events.push(Event::Teleported {
        combatant: combatant.id,
        from,
        to,
    });
}

/// Column 1 (or `width - 2`) on the centre row; the outer columns on narrow grids.
fn default_spawn(id: CombatantId, width: u32, height: u32) -> Position {
    let inset = if width >= 4 { 1 } else { 0 };
    let x = match id.home_side() {
        Side::Left => inset,
        Side::Right => width as i32 - 1 - inset,
    };
    Position::new(x, (height / 2) as i32)
}

fn check_spawn(grid: &TileGrid, combatant: CombatantId, position: Position) -> Result<(), SetupError> {
    if !grid.is_valid_cell(position) {
        return Err(SetupError::SpawnOutOfBounds {
            combatant,
            position,
        });
    }
    if !grid.is_walkable_for_side(position, combatant.home_side()) {
        return Err(SetupError::SpawnNotWalkable {
            combatant,
            position,
        });
    }
    Ok(())
}
