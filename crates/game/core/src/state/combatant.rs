//! Per-combatant aggregate owned by the engine.

use std::time::Duration;

use arrayvec::ArrayVec;

use super::{CardinalDirection, CombatantId, LaneDirection, Position, Side};
use crate::combat::ParryWindow;
use crate::config::MatchRules;
use crate::movement::MovementController;
use crate::skills::{BasicAttackDef, CharacterDef, ElementalStack, PassiveState, SkillDef};
use crate::stats::{LedgerSpec, ResourceLedger};
use crate::timer::Timer;

/// A skill definition paired with its cooldown.
#[derive(Clone, Debug)]
pub struct SkillSlot {
    pub def: SkillDef,
    pub cooldown: Timer,
}

impl SkillSlot {
    fn new(def: SkillDef) -> Self {
        Self {
            def,
            cooldown: Timer::expired(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown.is_expired()
    }
}

/// Everything the engine tracks for one combatant.
///
/// Health and mana live in the [`ResourceLedger`]; nothing else writes them.
#[derive(Clone, Debug)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub position: Position,
    pub spawn: Position,
    pub ledger: ResourceLedger,
    pub movement: MovementController,
    pub parry: ParryWindow,
    pub passives: ArrayVec<PassiveState, { MatchRules::MAX_PASSIVES }>,
    pub elements: ElementalStack,
    pub basic_attack: BasicAttackDef,
    pub basic_cooldown: Timer,
    pub skills: Vec<SkillSlot>,
    pub ultimate: Option<SkillSlot>,
    pub cast_lock: Timer,
}

impl Combatant {
    /// Builds a combatant from a validated definition.
    pub fn new(id: CombatantId, def: &CharacterDef, spawn: Position, rules: &MatchRules) -> Self {
        let spec = LedgerSpec {
            max_health: def.max_health,
            max_mana: def.max_mana,
            mana_regen: def.mana_regen,
        };
        let heading = match id.home_side() {
            Side::Left => CardinalDirection::East,
            Side::Right => CardinalDirection::West,
        };

        Self {
            id,
            name: def.name.clone(),
            position: spawn,
            spawn,
            ledger: ResourceLedger::new(id, &spec, &rules.ultimate),
            movement: MovementController::new(id, &rules.movement, heading),
            parry: ParryWindow::new(&rules.parry),
            passives: def
                .passives
                .iter()
                .take(MatchRules::MAX_PASSIVES)
                .cloned()
                .map(PassiveState::equip)
                .collect(),
            elements: ElementalStack::default(),
            basic_attack: def.basic_attack.clone(),
            basic_cooldown: Timer::expired(),
            skills: def.skills.iter().cloned().map(SkillSlot::new).collect(),
            ultimate: def.ultimate.clone().map(SkillSlot::new),
            cast_lock: Timer::expired(),
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.ledger.is_alive()
    }

    #[inline]
    pub fn is_cast_locked(&self) -> bool {
        !self.cast_lock.is_expired()
    }

    /// Alive and not cast-locked.
    pub fn can_act(&self) -> bool {
        self.is_alive() && !self.is_cast_locked()
    }

    /// Territory the combatant fights for. Never changes during a match.
    pub fn side(&self) -> Side {
        self.id.home_side()
    }

    /// Lane direction of the combatant's attacks: toward the opponent's half.
    pub fn facing(&self) -> LaneDirection {
        self.side().forward()
    }

    /// Product of every passive speed bonus.
    pub fn speed_multiplier(&self) -> f32 {
        self.passives.iter().map(PassiveState::speed_multiplier).product()
    }

    pub fn applies_elements(&self) -> bool {
        self.passives.iter().any(PassiveState::applies_elements)
    }

    pub fn notify_hit_landed(&mut self) {
        for passive in &mut self.passives {
            passive.on_hit_landed();
        }
    }

    /// Ticks cooldowns, the cast lock and passive timers.
    pub fn advance_timers(&mut self, dt: Duration) {
        self.basic_cooldown.tick(dt);
        self.cast_lock.tick(dt);
        for slot in self.skills.iter_mut().chain(self.ultimate.as_mut()) {
            slot.cooldown.tick(dt);
        }
        for passive in &mut self.passives {
            passive.advance(dt);
        }
    }

    /// Clears transient combat state. Used on death and respawn.
    pub fn clear_transient(&mut self) {
        self.movement.interrupt();
        self.movement.set_intent(None);
        self.parry.interrupt();
        self.cast_lock = Timer::expired();
        self.elements.clear();
        for passive in &mut self.passives {
            passive.reset();
        }
    }
}
