//! Parry window state machine.
//!
//! ```text
//! Ready --try_start (prepay)--> Active --window elapsed--> Cooldown --> Ready
//! ```
//!
//! Opening a window prepays `max(miss_cost, success_cost)`. The first success
//! inside a window refunds `prepaid - success_cost`; later successes in the
//! same window refund nothing. A window that ends without a success keeps the
//! whole prepayment.

use std::time::Duration;

use crate::config::{DeflectTuning, ParryRules};
use crate::event::Event;
use crate::stats::{Mana, ResourceLedger};
use crate::timer::Timer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParryPhase {
    Ready,
    Active,
    Cooldown,
}

/// Multipliers handed to the resolver for one deflection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeflectBoost {
    pub damage_multiplier: f32,
    pub speed_multiplier: f32,
    /// 1-based count of deflections in the current window.
    pub count: u32,
}

#[derive(Clone, Debug)]
pub struct ParryWindow {
    phase: ParryPhase,
    timer: Timer,
    window: Duration,
    cooldown: Duration,
    prepaid: Mana,
    success_cost: Mana,
    had_success: bool,
    refunded: bool,
    deflections: u32,
}

impl ParryWindow {
    pub fn new(rules: &ParryRules) -> Self {
        Self {
            phase: ParryPhase::Ready,
            timer: Timer::expired(),
            window: rules.window,
            cooldown: rules.cooldown,
            prepaid: Mana::from_points(rules.prepay()),
            success_cost: Mana::from_points(rules.success_cost),
            had_success: false,
            refunded: false,
            deflections: 0,
        }
    }

    pub fn phase(&self) -> ParryPhase {
        self.phase
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == ParryPhase::Active
    }

    pub fn deflections(&self) -> u32 {
        self.deflections
    }

    /// Opens a window if ready and the prepayment can be paid.
    ///
    /// Returns `false` without touching any state otherwise.
    pub fn try_start(&mut self, ledger: &mut ResourceLedger, events: &mut Vec<Event>) -> bool {
        if self.phase != ParryPhase::Ready || ledger.is_dead() {
            return false;
        }
        if !ledger.try_use_mana(self.prepaid, events) {
            return false;
        }

        self.phase = ParryPhase::Active;
        self.timer.reset(self.window);
        self.had_success = false;
        self.refunded = false;
        self.deflections = 0;
        events.push(Event::ParryStarted {
            combatant: ledger.combatant(),
        });
        true
    }

    /// Counts a projectile deflection and returns the boost to apply.
    ///
    /// `None` when the window is not active.
    pub fn register_deflection(
        &mut self,
        tuning: &DeflectTuning,
        ledger: &mut ResourceLedger,
        events: &mut Vec<Event>,
    ) -> Option<DeflectBoost> {
        if !self.is_active() {
            return None;
        }
        self.deflections += 1;
        self.mark_success(ledger, events);

        Some(DeflectBoost {
            damage_multiplier: tuning.damage_multiplier,
            speed_multiplier: tuning.speed_multiplier(self.deflections),
            count: self.deflections,
        })
    }

    /// Success without a projectile, used by melee and area hits.
    pub fn manual_success(&mut self, ledger: &mut ResourceLedger, events: &mut Vec<Event>) -> bool {
        if !self.is_active() {
            return false;
        }
        self.mark_success(ledger, events);
        true
    }

    fn mark_success(&mut self, ledger: &mut ResourceLedger, events: &mut Vec<Event>) {
        self.had_success = true;
        self.refund_once(ledger, events);
    }

    fn refund_once(&mut self, ledger: &mut ResourceLedger, events: &mut Vec<Event>) {
        if self.refunded || !self.had_success {
            return;
        }
        self.refunded = true;
        let refund = self.prepaid.saturating_sub(self.success_cost);
        if refund > Mana::ZERO {
            ledger.restore_mana(refund, events);
        }
    }

    /// Advances the window and cooldown timers.
    pub fn advance(&mut self, dt: Duration, ledger: &mut ResourceLedger, events: &mut Vec<Event>) {
        match self.phase {
            ParryPhase::Ready => {}
            ParryPhase::Active => {
                if self.timer.tick(dt) {
                    self.refund_once(ledger, events);
                    self.phase = ParryPhase::Cooldown;
                    self.timer.reset(self.cooldown);
                    events.push(Event::ParryEnded {
                        combatant: ledger.combatant(),
                        deflections: self.deflections,
                    });
                }
            }
            ParryPhase::Cooldown => {
                if self.timer.tick(dt) {
                    self.phase = ParryPhase::Ready;
                }
            }
        }
    }

    /// Drops any window in progress without refunding. Used on death.
    pub fn interrupt(&mut self) {
        self.phase = ParryPhase::Ready;
        self.timer = Timer::expired();
        self.had_success = false;
        self.refunded = false;
        self.deflections = 0;
    }
}
