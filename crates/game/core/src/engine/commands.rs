//! Intent entry points.
//!
//! Every command validates first and mutates nothing when it fails. The
//! returned [`CommandError`] is informational; a rejected intent never
//! disturbs the simulation.

use super::{CombatEngine, Continuation, check_destination, occupant, pair_mut, teleport};
use crate::combat::ProjectileSpec;
use crate::error::{ActionKind, CommandError, SlotRef};
use crate::event::Event;
use crate::movement::StepContext;
use crate::skills::{SkillDef, SkillEffect};
use crate::state::{CardinalDirection, CombatantId, Position};
use crate::stats::Mana;
use crate::timer::Timer;

impl CombatEngine {
    /// Records the held movement direction. `None` releases it.
    pub fn set_move_intent(&mut self, id: CombatantId, direction: Option<CardinalDirection>) {
        self.combatants[id.index()].movement.set_intent(direction);
    }

    /// Starts a single step right away.
    pub fn request_step(
        &mut self,
        id: CombatantId,
        direction: CardinalDirection,
    ) -> Result<(), CommandError> {
        let (me, other) = pair_mut(&mut self.combatants, id);
        if !me.is_alive() {
            return Err(CommandError::Dead { combatant: id });
        }
        if me.is_cast_locked() {
            return Err(CommandError::MovementDisabled { combatant: id });
        }

        let ctx = StepContext {
            position: me.position,
            can_move: true,
            speed: me.speed_multiplier(),
        };
        let grid = &self.grid;
        let side = me.side();
        let blocker = other.is_alive().then_some(other.position);
        me.movement
            .request_step(direction, ctx, |to| check_destination(grid, id, side, blocker, to))
    }

    /// Fires the basic attack along the combatant's lane.
    pub fn fire_basic_attack(&mut self, id: CombatantId) -> Result<(), CommandError> {
        let c = &mut self.combatants[id.index()];
        if !c.is_alive() {
            return Err(CommandError::Dead { combatant: id });
        }
        if c.is_cast_locked() {
            return Err(CommandError::CastLocked { combatant: id });
        }
        if !c.basic_cooldown.is_expired() {
            return Err(CommandError::OnCooldown {
                combatant: id,
                action: ActionKind::BasicAttack,
            });
        }

        c.basic_cooldown.reset(c.basic_attack.cooldown);
        let spec = ProjectileSpec {
            owner: id,
            origin: c.position,
            direction: c.facing(),
            speed: c.basic_attack.speed,
            damage: c.basic_attack.damage,
            element: None,
        };
        self.launch(spec);
        Ok(())
    }

    /// Casts a skill slot or the ultimate.
    ///
    /// `target` is the aimed cell; when it is absent or off the grid the
    /// caster's own cell is used.
    pub fn cast_skill(
        &mut self,
        id: CombatantId,
        slot: SlotRef,
        target: Option<Position>,
    ) -> Result<(), CommandError> {
        let def = self.validate_cast(id, slot)?;

        let now = self.elapsed;
        let c = &mut self.combatants[id.index()];
        let cost = Mana::from_points(def.mana_cost);
        if !c.ledger.try_use_mana(cost, &mut self.events) {
            // Checked by validate_cast; unreachable unless the ledger disagrees.
            return Err(CommandError::InsufficientMana {
                combatant: id,
                required: def.mana_cost,
            });
        }
        if slot == SlotRef::Ultimate && !c.ledger.try_consume_ultimate(&mut self.events) {
            c.ledger.restore_mana(cost, &mut self.events);
            return Err(CommandError::UltimateNotReady { combatant: id });
        }

        let slot_state = match slot {
            SlotRef::Skill(index) => c.skills.get_mut(index as usize),
            SlotRef::Ultimate => c.ultimate.as_mut(),
        };
        if let Some(slot_state) = slot_state {
            slot_state.cooldown.reset(def.cooldown);
        }

        let aim = target
            .filter(|cell| self.grid.is_valid_cell(*cell))
            .unwrap_or(c.position);
        let mut lock = def.cast_lock;

        tracing::debug!(combatant = %id, skill = %def.name, %aim, "skill cast");
        self.events.push(Event::SkillCast {
            combatant: id,
            skill: def.name.clone(),
        });

        match def.effect {
            SkillEffect::Bolt {
                damage,
                speed,
                fire_delay,
                element,
            } => {
                let fire = Continuation::Fire {
                    caster: id,
                    damage,
                    speed,
                    element,
                };
                if fire_delay.is_zero() {
                    self.run_continuation(fire);
                } else {
                    self.schedule.push(now + fire_delay, fire);
                }
            }
            SkillEffect::Pulse {
                damage,
                impact_delay,
                reach,
            } => {
                let origin = c.position;
                let forward = c.facing();
                let cells = (0..reach.max(1) as i32)
                    .map(|offset| aim.along_lane(forward, offset))
                    .filter(|cell| self.grid.is_valid_cell(*cell))
                    .collect();
                self.schedule.push(
                    now + impact_delay,
                    Continuation::PulseImpact {
                        caster: id,
                        origin,
                        cells,
                        damage,
                    },
                );
            }
            SkillEffect::Dash {
                damage,
                half_height,
                dash_time,
                return_delay,
                return_time,
            } => {
                // The caster stays locked until it is back on its origin.
                lock = lock.max(dash_time + return_delay + return_time);
                c.movement.interrupt();
                self.schedule.push(
                    now + dash_time,
                    Continuation::DashStrike {
                        caster: id,
                        origin: c.position,
                        aim,
                        damage,
                        half_height,
                        return_after: return_delay + return_time,
                    },
                );
            }
            SkillEffect::Takeover { lifetime } => {
                self.claim_territory(id, lifetime);
            }
        }

        self.combatants[id.index()].cast_lock.reset(lock);
        Ok(())
    }

    /// Checks every precondition of a cast and returns the slot's definition.
    fn validate_cast(&self, id: CombatantId, slot: SlotRef) -> Result<SkillDef, CommandError> {
        let c = self.combatant(id);
        if !c.is_alive() {
            return Err(CommandError::Dead { combatant: id });
        }
        if c.is_cast_locked() {
            return Err(CommandError::CastLocked { combatant: id });
        }

        let (slot_state, action) = match slot {
            SlotRef::Skill(index) => (c.skills.get(index as usize), ActionKind::Skill),
            SlotRef::Ultimate => (c.ultimate.as_ref(), ActionKind::Ultimate),
        };
        let slot_state = slot_state.ok_or(CommandError::EmptySlot {
            combatant: id,
            slot,
        })?;
        if !slot_state.is_ready() {
            return Err(CommandError::OnCooldown {
                combatant: id,
                action,
            });
        }
        if c.ledger.mana() < Mana::from_points(slot_state.def.mana_cost) {
            return Err(CommandError::InsufficientMana {
                combatant: id,
                required: slot_state.def.mana_cost,
            });
        }
        if slot == SlotRef::Ultimate && !c.ledger.ultimate().is_ready() {
            return Err(CommandError::UltimateNotReady { combatant: id });
        }
        Ok(slot_state.def.clone())
    }

    /// Opens a parry window, prepaying its cost.
    pub fn try_parry(&mut self, id: CombatantId) -> Result<(), CommandError> {
        let c = &mut self.combatants[id.index()];
        if !c.is_alive() {
            return Err(CommandError::Dead { combatant: id });
        }
        if c.parry.try_start(&mut c.ledger, &mut self.events) {
            tracing::debug!(combatant = %id, "parry window opened");
            Ok(())
        } else {
            Err(CommandError::ParryUnavailable { combatant: id })
        }
    }

    /// Restores full health and mana, clears death and returns the combatant
    /// to its spawn cell. Only a dead combatant can respawn.
    pub fn respawn(&mut self, id: CombatantId) -> Result<(), CommandError> {
        if self.combatants[id.index()].is_alive() {
            return Err(CommandError::Alive { combatant: id });
        }
        self.schedule.cancel_for(id);
        let blocked = occupant(&self.combatants, self.combatants[id.index()].spawn)
            .is_some_and(|other| other != id);

        let c = &mut self.combatants[id.index()];
        c.ledger.reset_to_max(&mut self.events);
        c.clear_transient();
        c.basic_cooldown = Timer::expired();
        if !blocked {
            let spawn = c.spawn;
            teleport(c, spawn, &mut self.events);
        }

        tracing::debug!(combatant = %id, position = %c.position, "respawned");
        self.events.push(Event::Respawned {
            combatant: id,
            position: c.position,
        });
        Ok(())
    }
}
