//! Passive abilities and elemental stacks.
//!
//! Passives are hit observers: they are attached to a combatant when it is
//! built and the resolver calls [`PassiveState::on_hit_landed`] on the
//! attacker's passives after every hit that dealt damage.

use std::time::Duration;

use arrayvec::ArrayVec;
use strum::Display;

use crate::config::MatchRules;
use crate::timer::Timer;

/// Element carried by some skills, stacked onto targets by [`PassiveKind::Overload`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    Fire,
    Ice,
}

impl Element {
    /// Name of the reaction three stacks of this element trigger.
    pub const fn reaction(self) -> &'static str {
        match self {
            Self::Fire => "ignite",
            Self::Ice => "coldsnap",
        }
    }
}

/// Passive definitions as they appear in character data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PassiveKind {
    /// Landing a hit boosts movement speed for a while. Refreshes, never stacks.
    QuickSync {
        speed_multiplier: f32,
        #[cfg_attr(feature = "serde", serde(with = "crate::config::seconds"))]
        duration: Duration,
    },
    /// Elemental hits leave stacks on the target.
    Overload,
}

impl PassiveKind {
    pub const DEFAULT_QUICK_SYNC_MULTIPLIER: f32 = 1.25;
    pub const DEFAULT_QUICK_SYNC_DURATION: Duration = Duration::from_secs(1);

    pub fn quick_sync() -> Self {
        Self::QuickSync {
            speed_multiplier: Self::DEFAULT_QUICK_SYNC_MULTIPLIER,
            duration: Self::DEFAULT_QUICK_SYNC_DURATION,
        }
    }
}

/// Runtime state of one equipped passive.
#[derive(Clone, Debug)]
pub struct PassiveState {
    kind: PassiveKind,
    boost: Option<Timer>,
}

impl PassiveState {
    pub fn equip(kind: PassiveKind) -> Self {
        Self { kind, boost: None }
    }

    pub fn kind(&self) -> &PassiveKind {
        &self.kind
    }

    /// Reacts to the holder landing a hit.
    pub fn on_hit_landed(&mut self) {
        if let PassiveKind::QuickSync { duration, .. } = self.kind {
            match self.boost.as_mut() {
                Some(timer) => timer.reset(duration),
                None => self.boost = Some(Timer::new(duration)),
            }
        }
    }

    pub fn advance(&mut self, dt: Duration) {
        if let Some(timer) = self.boost.as_mut() {
            if timer.tick(dt) {
                self.boost = None;
            }
        }
    }

    /// Movement speed multiplier currently granted by this passive.
    pub fn speed_multiplier(&self) -> f32 {
        match (&self.kind, &self.boost) {
            (PassiveKind::QuickSync { speed_multiplier, .. }, Some(_)) => *speed_multiplier,
            _ => 1.0,
        }
    }

    /// Whether the holder's elemental hits stack on targets.
    pub fn applies_elements(&self) -> bool {
        matches!(self.kind, PassiveKind::Overload)
    }

    pub fn reset(&mut self) {
        self.boost = None;
    }
}

/// Elemental stacks carried by a combatant.
#[derive(Clone, Debug, Default)]
pub struct ElementalStack {
    slots: ArrayVec<Element, { MatchRules::ELEMENT_STACK_CAPACITY }>,
}

impl ElementalStack {
    /// Stacks needed to trigger a reaction.
    pub const TRIGGER_COUNT: usize = 3;

    pub fn count(&self, element: Element) -> usize {
        self.slots.iter().filter(|e| **e == element).count()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Adds a stack. Returns the element whose reaction fired, after which
    /// every stack is cleared. A full stack ignores new elements.
    pub fn add(&mut self, element: Element) -> Option<Element> {
        if self.slots.try_push(element).is_err() {
            return None;
        }

        let triggered = [Element::Fire, Element::Ice]
            .into_iter()
            .find(|e| self.count(*e) >= Self::TRIGGER_COUNT);
        if triggered.is_some() {
            self.clear();
        }
        triggered
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_fire_ignites_and_resets() {
        let mut stack = ElementalStack::default();
        assert_eq!(stack.add(Element::Fire), None);
        assert_eq!(stack.add(Element::Ice), None);
        assert_eq!(stack.add(Element::Fire), None);
        assert_eq!(stack.add(Element::Fire), Some(Element::Fire));
        assert!(stack.is_empty());
    }

    #[test]
    fn quick_sync_refreshes_without_stacking() {
        let mut passive = PassiveState::equip(PassiveKind::quick_sync());
        assert_eq!(passive.speed_multiplier(), 1.0);

        passive.on_hit_landed();
        passive.advance(Duration::from_millis(800));
        passive.on_hit_landed();
        assert_eq!(passive.speed_multiplier(), 1.25);

        passive.advance(Duration::from_millis(800));
        assert_eq!(passive.speed_multiplier(), 1.25);
        passive.advance(Duration::from_millis(200));
        assert_eq!(passive.speed_multiplier(), 1.0);
    }

    #[test]
    fn overload_marks_element_application() {
        assert!(PassiveState::equip(PassiveKind::Overload).applies_elements());
        assert!(!PassiveState::equip(PassiveKind::quick_sync()).applies_elements());
    }
}
