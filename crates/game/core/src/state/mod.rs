//! Identities, coordinates and the per-combatant aggregate.
//!
//! The engine owns one [`Combatant`] per [`CombatantId`]. Callers read them
//! through the engine's queries and mutate them only through its intents.
mod combatant;
mod common;

pub use combatant::{Combatant, SkillSlot};
pub use common::{CardinalDirection, CombatantId, LaneDirection, Position, Side};
