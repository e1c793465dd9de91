//! Hit resolution for projectiles, pulses and dashes.
//!
//! A projectile is checked for hits each time it enters a new cell, never
//! while it glides inside one. A hit on a combatant with an open parry
//! window deflects the projectile instead of damaging anyone. Area and dash
//! hits are cancelled per target by an open window, which counts as a
//! manual parry success.

use std::time::Duration;

use super::{CombatEngine, Continuation, occupant, pair_mut, teleport};
use crate::combat::{DamageContext, Projectile, ProjectileSpec, calculate_damage};
use crate::event::{Event, HitSource, ProjectileId};
use crate::skills::{Element, push_back_cell};
use crate::state::{Combatant, CombatantId, Position, Side};
use crate::stats::DamageReceipt;

impl CombatEngine {
    // ========================================================================
    // Projectiles
    // ========================================================================

    pub(super) fn launch(&mut self, spec: ProjectileSpec) -> ProjectileId {
        let id = ProjectileId(self.next_projectile);
        self.next_projectile += 1;

        let projectile = Projectile::launch(id, spec, self.grid.width());
        tracing::debug!(
            projectile = %id,
            owner = %spec.owner,
            cell = %spec.origin,
            speed = spec.speed,
            damage = spec.damage,
            "projectile launched"
        );
        self.events.push(Event::ProjectileLaunched {
            projectile: id,
            owner: spec.owner,
            cell: spec.origin,
            direction: spec.direction,
        });
        self.projectiles.push(projectile);
        id
    }

    pub(super) fn advance_projectiles(&mut self, dt: Duration) {
        let events = &mut self.events;
        self.projectiles.retain_mut(|p| {
            if p.tick_expiry(dt) {
                events.push(Event::ProjectileRemoved { projectile: p.id() });
                false
            } else {
                true
            }
        });

        let secs = dt.as_secs_f32();
        for index in 0..self.projectiles.len() {
            if !self.projectiles[index].is_in_flight() {
                continue;
            }
            let mut budget = self.projectiles[index].speed() * secs;
            loop {
                let p = &mut self.projectiles[index];
                let to_boundary = p.distance_to_boundary();
                if budget <= to_boundary {
                    p.glide(budget);
                    break;
                }
                budget -= to_boundary;

                let cell = p.cross_boundary();
                if !self.grid.is_valid_cell(cell) {
                    tracing::trace!(projectile = %p.id(), %cell, "projectile left the grid");
                    p.begin_out_of_bounds(self.rules.projectile.out_of_bounds_grace);
                    break;
                }
                if self.resolve_projectile_cell(index) {
                    break;
                }
            }
        }
    }

    /// Hit check for a projectile that just entered a cell.
    ///
    /// Returns `true` when the projectile stops travelling for this tick,
    /// either because it hit or because it was deflected.
    fn resolve_projectile_cell(&mut self, index: usize) -> bool {
        let p = &mut self.projectiles[index];
        let cell = p.cell();
        let target = p.owner().opponent();
        let (defender, attacker) = pair_mut(&mut self.combatants, target);
        if !defender.is_alive() || defender.position != cell {
            return false;
        }

        if let Some(boost) =
            defender
                .parry
                .register_deflection(&self.rules.deflect, &mut defender.ledger, &mut self.events)
        {
            p.deflect(
                defender.id,
                defender.position,
                boost,
                &self.rules.deflect,
                self.grid.width(),
            );
            tracing::debug!(
                projectile = %p.id(),
                defender = %defender.id,
                damage = p.damage(),
                speed = p.speed(),
                count = boost.count,
                "projectile deflected"
            );
            self.events.push(Event::HitParried {
                defender: defender.id,
                source: HitSource::Projectile(p.id()),
            });
            self.events.push(Event::ProjectileDeflected {
                projectile: p.id(),
                owner: p.owner(),
                damage: p.damage(),
                speed: p.speed(),
                count: boost.count,
            });
            return true;
        }

        let ctx = DamageContext {
            attacker_side: p.side(),
            attacker_pos: cell,
            defender_pos: defender.position,
            base_damage: p.damage(),
        };
        let damage = calculate_damage(&self.grid, &ctx, &self.rules.damage);
        let receipt = land_hit(
            attacker,
            defender,
            damage,
            HitSource::Projectile(p.id()),
            p.element(),
            &mut self.events,
        );
        p.begin_fade(self.rules.projectile.hit_fade);

        if receipt.died {
            self.schedule.cancel_for(target);
        }
        true
    }

    // ========================================================================
    // Continuations
    // ========================================================================

    pub(super) fn run_continuations(&mut self) {
        for action in self.schedule.pop_due(self.elapsed) {
            self.run_continuation(action);
        }
    }

    /// Runs one continuation. Continuations of a dead caster find no target.
    pub(super) fn run_continuation(&mut self, action: Continuation) {
        if !self.combatants[action.caster().index()].is_alive() {
            tracing::trace!(caster = %action.caster(), "continuation skipped, caster is dead");
            return;
        }

        match action {
            Continuation::Fire {
                caster,
                damage,
                speed,
                element,
            } => {
                let c = &self.combatants[caster.index()];
                let spec = ProjectileSpec {
                    owner: caster,
                    origin: c.position,
                    direction: c.facing(),
                    speed,
                    damage,
                    element,
                };
                self.launch(spec);
            }
            Continuation::PulseImpact {
                caster,
                origin,
                cells,
                damage,
            } => self.pulse_impact(caster, origin, &cells, damage),
            Continuation::DashStrike {
                caster,
                origin,
                aim,
                damage,
                half_height,
                return_after,
            } => {
                self.dash_strike(caster, aim, damage, half_height);
                self.schedule.push(
                    self.elapsed + return_after,
                    Continuation::DashReturn { caster, origin },
                );
            }
            Continuation::DashReturn { caster, origin } => self.dash_return(caster, origin),
        }
    }

    /// Lands a pulse. Cells holding the opponent take damage and crack, all
    /// others break, including the one under the caster.
    fn pulse_impact(&mut self, caster: CombatantId, origin: Position, cells: &[Position], base: u32) {
        let side = self.combatants[caster.index()].side();
        for &cell in cells {
            match occupant(&self.combatants, cell).filter(|id| *id != caster) {
                None => {
                    self.grid.break_tile(cell, &mut self.events);
                }
                Some(target) => {
                    let ctx = DamageContext {
                        attacker_side: side,
                        attacker_pos: origin,
                        defender_pos: cell,
                        base_damage: base,
                    };
                    if !self.strike(target, &ctx, HitSource::Area) {
                        continue;
                    }
                    self.grid.crack(cell, &mut self.events);
                }
            }
        }
    }

    /// Moves the caster next to the aim column and strikes the column.
    fn dash_strike(&mut self, caster: CombatantId, aim: Position, base: u32, half_height: u32) {
        let landing = self.dash_landing(caster, aim);
        teleport(
            &mut self.combatants[caster.index()],
            landing,
            &mut self.events,
        );

        let side = Side::of_column(landing.x, self.grid.width());
        let half = half_height as i32;
        for dy in -half..=half {
            let cell = Position::new(aim.x, aim.y + dy);
            if !self.grid.is_valid_cell(cell) {
                continue;
            }
            let Some(target) = occupant(&self.combatants, cell).filter(|id| *id != caster) else {
                continue;
            };
            let ctx = DamageContext {
                attacker_side: side,
                attacker_pos: landing,
                defender_pos: cell,
                base_damage: base,
            };
            self.strike(target, &ctx, HitSource::Dash);
        }
    }

    /// Last cell on the aim row, walking from the caster toward the cell in
    /// front of the aim column, that is on the grid, not broken and free.
    fn dash_landing(&self, caster: CombatantId, aim: Position) -> Position {
        let c = &self.combatants[caster.index()];
        let step = c.facing().sign();
        let last = aim.x - step;
        let blocker = {
            let other = self.combatant(caster.opponent());
            other.is_alive().then_some(other.position)
        };

        let mut landing = c.position;
        let mut x = c.position.x + step;
        while (step > 0 && x <= last) || (step < 0 && x >= last) {
            let cell = Position::new(x, aim.y);
            let open = self
                .grid
                .tile(cell)
                .is_some_and(|tile| !tile.is_broken())
                && blocker != Some(cell);
            if !open {
                break;
            }
            landing = cell;
            x += step;
        }
        landing
    }

    fn dash_return(&mut self, caster: CombatantId, origin: Position) {
        let side = self.combatants[caster.index()].side();
        let taken = occupant(&self.combatants, origin).is_some_and(|id| id != caster);
        let destination = if taken {
            push_back_cell(&self.grid, origin, side)
                .filter(|cell| occupant(&self.combatants, *cell).is_none())
        } else {
            Some(origin)
        };
        if let Some(destination) = destination {
            teleport(
                &mut self.combatants[caster.index()],
                destination,
                &mut self.events,
            );
        }
    }

    /// Applies a non-projectile hit on `target` from its opponent.
    ///
    /// Returns `false` when an open parry window cancelled it.
    fn strike(
        &mut self,
        target: CombatantId,
        ctx: &DamageContext,
        source: HitSource,
    ) -> bool {
        let (defender, attacker) = pair_mut(&mut self.combatants, target);
        if defender
            .parry
            .manual_success(&mut defender.ledger, &mut self.events)
        {
            tracing::debug!(defender = %target, ?source, "hit parried");
            self.events.push(Event::HitParried {
                defender: target,
                source,
            });
            return false;
        }

        let damage = calculate_damage(&self.grid, ctx, &self.rules.damage);
        let receipt = land_hit(attacker, defender, damage, source, None, &mut self.events);
        if receipt.died {
            self.schedule.cancel_for(target);
        }
        true
    }
}

/// Applies damage and notifies the attacker's passives.
///
/// The attacker's elemental hits stack on the defender only when one of the
/// attacker's passives applies elements.
fn land_hit(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    damage: u32,
    source: HitSource,
    element: Option<Element>,
    events: &mut Vec<Event>,
) -> DamageReceipt {
    let receipt = defender
        .ledger
        .take_damage(damage, Some(&mut attacker.ledger), events);
    tracing::debug!(
        attacker = %attacker.id,
        target = %defender.id,
        damage,
        health = defender.ledger.health(),
        ?source,
        "hit landed"
    );
    events.push(Event::HitLanded {
        attacker: attacker.id,
        target: defender.id,
        damage,
        source,
    });

    if attacker.is_alive() {
        attacker.notify_hit_landed();
    }
    if receipt.died {
        defender.clear_transient();
        return receipt;
    }

    if let Some(element) = element.filter(|_| attacker.applies_elements()) {
        if let Some(fired) = defender.elements.add(element) {
            tracing::debug!(target = %defender.id, element = %fired, reaction = fired.reaction(), "overload");
            events.push(Event::Overload {
                target: defender.id,
                element: fired,
            });
        }
    }
    receipt
}
