//! Per-combatant resource economy: health, mana, ultimate charge and death.
//!
//! Health and mana are only ever mutated through these methods. Every method
//! is a no-op once the combatant is dead, until [`ResourceLedger::reset_to_max`].

use std::time::Duration;

use super::mana::Mana;
use super::ultimate::{ChargeOutcome, UltimateMeter};
use crate::config::UltimateRules;
use crate::event::Event;
use crate::state::CombatantId;

/// Starting values for a ledger.
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerSpec {
    pub max_health: u32,
    pub max_mana: f32,
    /// Mana points regenerated per second while alive.
    pub mana_regen: f32,
}

/// Outcome of [`ResourceLedger::take_damage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DamageReceipt {
    /// Health actually removed.
    pub health_lost: u32,
    /// True only for the hit that killed the combatant.
    pub died: bool,
}

#[derive(Clone, Debug)]
pub struct ResourceLedger {
    combatant: CombatantId,
    health: u32,
    max_health: u32,
    mana: Mana,
    max_mana: Mana,
    regen_milli_per_sec: f32,
    /// Sub-thousandth regen carried between ticks.
    regen_carry: f32,
    dead: bool,
    ultimate: UltimateMeter,
    dealt_ratio: f32,
    taken_ratio: f32,
}

impl ResourceLedger {
    /// Creates a ledger at full health and mana.
    pub fn new(combatant: CombatantId, spec: &LedgerSpec, ultimate: &UltimateRules) -> Self {
        let max_mana = Mana::from_points(spec.max_mana);
        Self {
            combatant,
            health: spec.max_health,
            max_health: spec.max_health,
            mana: max_mana,
            max_mana,
            regen_milli_per_sec: spec.mana_regen.max(0.0) * 1000.0,
            regen_carry: 0.0,
            dead: false,
            ultimate: UltimateMeter::from_rules(ultimate),
            dealt_ratio: ultimate.dealt_ratio,
            taken_ratio: ultimate.taken_ratio,
        }
    }

    // ===== queries =====

    pub fn combatant(&self) -> CombatantId {
        self.combatant
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn mana(&self) -> Mana {
        self.mana
    }

    pub fn max_mana(&self) -> Mana {
        self.max_mana
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    pub fn ultimate(&self) -> &UltimateMeter {
        &self.ultimate
    }

    // ===== mana =====

    /// Spends `amount` if the full amount is available. No partial spend.
    pub fn try_use_mana(&mut self, amount: Mana, events: &mut Vec<Event>) -> bool {
        if self.dead || self.mana < amount {
            return false;
        }
        self.set_mana(self.mana - amount, events);
        true
    }

    /// Adds mana, clamped to the maximum.
    pub fn restore_mana(&mut self, amount: Mana, events: &mut Vec<Event>) {
        if self.dead {
            return;
        }
        let next = (self.mana + amount).min(self.max_mana);
        self.set_mana(next, events);
    }

    /// Continuous regeneration for one tick.
    pub fn regen(&mut self, dt: Duration, events: &mut Vec<Event>) {
        if self.dead || self.mana >= self.max_mana {
            self.regen_carry = 0.0;
            return;
        }

        let gained = self.regen_milli_per_sec * dt.as_secs_f32() + self.regen_carry;
        let whole = gained.floor();
        self.regen_carry = gained - whole;

        if whole >= 1.0 {
            let next = (self.mana + Mana::from_milli(whole as u32)).min(self.max_mana);
            self.set_mana(next, events);
        }
    }

    fn set_mana(&mut self, next: Mana, events: &mut Vec<Event>) {
        if next == self.mana {
            return;
        }
        self.mana = next;
        events.push(Event::ManaChanged {
            combatant: self.combatant,
            current: next.points(),
            max: self.max_mana.points(),
        });
    }

    // ===== health =====

    /// Applies a hit.
    ///
    /// Health clamps at zero. The victim's ultimate gains `taken_ratio × amount`
    /// and a living `attacker` gains `dealt_ratio × amount`. Death is reported
    /// once; later hits on a dead ledger do nothing.
    pub fn take_damage(
        &mut self,
        amount: u32,
        attacker: Option<&mut ResourceLedger>,
        events: &mut Vec<Event>,
    ) -> DamageReceipt {
        if self.dead {
            return DamageReceipt::default();
        }

        let before = self.health;
        self.health = self.health.saturating_sub(amount);
        let health_lost = before - self.health;
        if health_lost > 0 {
            events.push(Event::HealthChanged {
                combatant: self.combatant,
                current: self.health,
                max: self.max_health,
            });
        }

        self.add_ultimate(amount as f32 * self.taken_ratio, events);
        if let Some(attacker) = attacker.filter(|a| a.combatant != self.combatant && !a.dead) {
            let gain = amount as f32 * attacker.dealt_ratio;
            attacker.add_ultimate(gain, events);
        }

        let died = self.health == 0;
        if died {
            self.dead = true;
            self.regen_carry = 0.0;
            tracing::debug!(combatant = %self.combatant, "combatant died");
            events.push(Event::Died {
                combatant: self.combatant,
            });
        }

        DamageReceipt { health_lost, died }
    }

    /// Restores health and mana to max and clears death.
    pub fn reset_to_max(&mut self, events: &mut Vec<Event>) {
        self.dead = false;
        self.regen_carry = 0.0;
        if self.health != self.max_health {
            self.health = self.max_health;
            events.push(Event::HealthChanged {
                combatant: self.combatant,
                current: self.health,
                max: self.max_health,
            });
        }
        self.set_mana(self.max_mana, events);
    }

    // ===== ultimate =====

    fn add_ultimate(&mut self, amount: f32, events: &mut Vec<Event>) {
        let outcome = self.ultimate.add(amount);
        if outcome == ChargeOutcome::Unchanged {
            return;
        }
        events.push(Event::UltimateChanged {
            combatant: self.combatant,
            charge: self.ultimate.charge(),
        });
        if outcome == ChargeOutcome::BecameReady {
            events.push(Event::UltimateReady {
                combatant: self.combatant,
            });
        }
    }

    /// Spends a full ultimate meter.
    pub fn try_consume_ultimate(&mut self, events: &mut Vec<Event>) -> bool {
        if self.dead || !self.ultimate.try_consume() {
            return false;
        }
        events.push(Event::UltimateChanged {
            combatant: self.combatant,
            charge: 0.0,
        });
        true
    }
}
