//! Discrete cell-stepping with press-then-hold repeat.
//!
//! ```text
//! Idle --step accepted--> Stepping --step_duration elapsed--> Idle
//! ```
//!
//! The controller does not own the combatant's position. It reports a
//! committed step and the engine moves the combatant. Destination legality is
//! supplied by the caller as a validation closure, checked when the step
//! starts and again when it commits.

use std::time::Duration;

use crate::config::MovementRules;
use crate::error::CommandError;
use crate::state::{CardinalDirection, CombatantId, Position};
use crate::timer::{Timer, scaled};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementPhase {
    Idle,
    Stepping { from: Position, to: Position },
}

/// Per-tick inputs from the engine.
#[derive(Clone, Copy, Debug)]
pub struct StepContext {
    pub position: Position,
    /// False while dead or cast-locked. A step already in progress still completes.
    pub can_move: bool,
    /// External speed multiplier (passives), floored by the rules.
    pub speed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Nothing,
    Committed { from: Position, to: Position },
    /// The destination became illegal while stepping; the combatant stays put.
    Aborted { from: Position, to: Position },
}

#[derive(Clone, Debug)]
pub struct MovementController {
    combatant: CombatantId,
    rules: MovementRules,
    phase: MovementPhase,
    step_timer: Timer,
    facing: CardinalDirection,
    intent: Option<CardinalDirection>,
    held: Option<CardinalDirection>,
    repeat: Timer,
}

impl MovementController {
    pub fn new(combatant: CombatantId, rules: &MovementRules, facing: CardinalDirection) -> Self {
        Self {
            combatant,
            rules: rules.clone(),
            phase: MovementPhase::Idle,
            step_timer: Timer::expired(),
            facing,
            intent: None,
            held: None,
            repeat: Timer::expired(),
        }
    }

    pub fn phase(&self) -> MovementPhase {
        self.phase
    }

    pub fn is_stepping(&self) -> bool {
        matches!(self.phase, MovementPhase::Stepping { .. })
    }

    /// Last direction the combatant pressed or stepped toward.
    pub fn facing(&self) -> CardinalDirection {
        self.facing
    }

    pub fn intent(&self) -> Option<CardinalDirection> {
        self.intent
    }

    /// Records the currently held direction; `None` releases it.
    pub fn set_intent(&mut self, direction: Option<CardinalDirection>) {
        self.intent = direction;
    }

    /// Starts a single step immediately, outside the hold-repeat cycle.
    pub fn request_step<F>(
        &mut self,
        direction: CardinalDirection,
        ctx: StepContext,
        validate: F,
    ) -> Result<(), CommandError>
    where
        F: FnMut(Position) -> Result<(), CommandError>,
    {
        if self.is_stepping() {
            return Err(CommandError::AlreadyStepping {
                combatant: self.combatant,
            });
        }
        self.facing = direction;
        self.start_step(direction, ctx, validate)
    }

    /// Advances an in-progress step, then handles the held direction.
    ///
    /// A step that commits this tick does not chain into a new one until the
    /// next tick.
    pub fn advance<F>(&mut self, dt: Duration, ctx: StepContext, mut validate: F) -> StepOutcome
    where
        F: FnMut(Position) -> Result<(), CommandError>,
    {
        self.repeat.tick(dt);
        if ctx.can_move {
            if let Some(direction) = self.intent {
                self.facing = direction;
            }
        }

        if let MovementPhase::Stepping { from, to } = self.phase {
            if !self.step_timer.tick(dt) {
                return StepOutcome::Nothing;
            }
            self.phase = MovementPhase::Idle;
            return if validate(to).is_ok() {
                StepOutcome::Committed { from, to }
            } else {
                StepOutcome::Aborted { from, to }
            };
        }

        if !ctx.can_move {
            return StepOutcome::Nothing;
        }

        let Some(direction) = self.intent else {
            self.held = None;
            return StepOutcome::Nothing;
        };

        let (speed, floor) = (ctx.speed, self.rules.min_speed_multiplier);
        if self.held != Some(direction) {
            self.held = Some(direction);
            let _ = self.start_step(direction, ctx, &mut validate);
            self.repeat.reset(scaled(self.rules.initial_repeat_delay, speed, floor));
        } else if self.repeat.is_expired() {
            let _ = self.start_step(direction, ctx, &mut validate);
            self.repeat.reset(scaled(self.rules.repeat_rate, speed, floor));
        }
        StepOutcome::Nothing
    }

    fn start_step<F>(
        &mut self,
        direction: CardinalDirection,
        ctx: StepContext,
        mut validate: F,
    ) -> Result<(), CommandError>
    where
        F: FnMut(Position) -> Result<(), CommandError>,
    {
        let to = ctx.position.step(direction);
        validate(to)?;

        self.phase = MovementPhase::Stepping {
            from: ctx.position,
            to,
        };
        self.step_timer.reset(scaled(
            self.rules.step_duration,
            ctx.speed,
            self.rules.min_speed_multiplier,
        ));
        Ok(())
    }

    /// Cancels any step in progress. Used by teleports and death.
    pub fn interrupt(&mut self) {
        self.phase = MovementPhase::Idle;
        self.step_timer = Timer::expired();
        self.held = None;
    }
}
