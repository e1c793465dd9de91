//! Outbound notifications emitted while the engine runs.
//!
//! Events are informational: the engine never reads them back, and dropping
//! them does not change the simulation. They are buffered in emission order
//! and handed out by [`crate::CombatEngine::drain_events`].
use crate::grid::TileState;
use crate::skills::Element;
use crate::state::{CombatantId, LaneDirection, Position, Side};

/// Identifier assigned to every spawned projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectileId(pub u32);

impl std::fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "proj#{}", self.0)
    }
}

/// What produced a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitSource {
    Projectile(ProjectileId),
    Area,
    Dash,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    // ===== resources =====
    HealthChanged {
        combatant: CombatantId,
        current: u32,
        max: u32,
    },
    ManaChanged {
        combatant: CombatantId,
        current: f32,
        max: f32,
    },
    UltimateChanged {
        combatant: CombatantId,
        charge: f32,
    },
    UltimateReady {
        combatant: CombatantId,
    },
    Died {
        combatant: CombatantId,
    },
    Respawned {
        combatant: CombatantId,
        position: Position,
    },

    // ===== grid =====
    TileChanged {
        cell: Position,
        state: TileState,
    },
    TakeoverStarted {
        claimant: Side,
        cells: Vec<Position>,
    },
    TakeoverEnded {
        claimant: Side,
    },
    TakeoverCancelled,

    // ===== movement =====
    Stepped {
        combatant: CombatantId,
        from: Position,
        to: Position,
    },
    Teleported {
        combatant: CombatantId,
        from: Position,
        to: Position,
    },

    // ===== combat =====
    SkillCast {
        combatant: CombatantId,
        skill: String,
    },
    ProjectileLaunched {
        projectile: ProjectileId,
        owner: CombatantId,
        cell: Position,
        direction: LaneDirection,
    },
    ProjectileDeflected {
        projectile: ProjectileId,
        owner: CombatantId,
        damage: u32,
        speed: f32,
        count: u32,
    },
    ProjectileRemoved {
        projectile: ProjectileId,
    },
    HitLanded {
        attacker: CombatantId,
        target: CombatantId,
        damage: u32,
        source: HitSource,
    },
    HitParried {
        defender: CombatantId,
        source: HitSource,
    },
    ParryStarted {
        combatant: CombatantId,
    },
    ParryEnded {
        combatant: CombatantId,
        deflections: u32,
    },
    Overload {
        target: CombatantId,
        element: Element,
    },
}

impl Event {
    /// Combatant the event is primarily about, if any.
    pub fn subject(&self) -> Option<CombatantId> {
        match self {
            Self::HealthChanged { combatant, .. }
            | Self::ManaChanged { combatant, .. }
            | Self::UltimateChanged { combatant, .. }
            | Self::UltimateReady { combatant }
            | Self::Died { combatant }
            | Self::Respawned { combatant, .. }
            | Self::Stepped { combatant, .. }
            | Self::Teleported { combatant, .. }
            | Self::SkillCast { combatant, .. }
            | Self::ParryStarted { combatant }
            | Self::ParryEnded { combatant, .. } => Some(*combatant),
            Self::ProjectileLaunched { owner, .. } | Self::ProjectileDeflected { owner, .. } => {
                Some(*owner)
            }
            Self::HitLanded { target, .. } | Self::Overload { target, .. } => Some(*target),
            Self::HitParried { defender, .. } => Some(*defender),
            Self::TileChanged { .. }
            | Self::TakeoverStarted { .. }
            | Self::TakeoverEnded { .. }
            | Self::TakeoverCancelled
            | Self::ProjectileRemoved { .. } => None,
        }
    }
}
