//! Common error infrastructure for arena-core.
//!
//! Rejected intents never abort the simulation: the engine reports them as a
//! typed [`CommandError`] and leaves state untouched. [`GameError`] gives every
//! error type a severity so callers can decide what to log and what to ignore.
//!
//! # Design Principles
//!
//! - **Type Safety**: each failure reason has its own variant
//! - **No partial mutation**: a returned error means nothing changed
//! - **Severity Classification**: errors are categorized for handling strategies

use crate::state::{CombatantId, Position};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: temporary conditions that may succeed a few ticks later
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
/// - **Fatal**: unrecoverable errors indicating corrupted match state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Examples: skill on cooldown, not enough mana, still stepping
    Recoverable,

    /// Examples: empty skill slot, destination outside the grid
    Validation,

    /// Examples: combatant table out of sync with the grid
    Internal,

    /// Examples: rules that cannot describe a playable grid
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all arena-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Why an intent was rejected. State is unchanged whenever this is returned.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandError {
    #[error("{combatant} is dead")]
    Dead { combatant: CombatantId },

    #[error("{combatant} is still alive")]
    Alive { combatant: CombatantId },

    #[error("{combatant} is locked by a cast")]
    CastLocked { combatant: CombatantId },

    #[error("{combatant} cannot move right now")]
    MovementDisabled { combatant: CombatantId },

    #[error("{combatant} is already stepping")]
    AlreadyStepping { combatant: CombatantId },

    #[error("destination {destination} is outside the grid")]
    OutOfBounds { destination: Position },

    #[error("destination {destination} is not walkable for {combatant}")]
    NotWalkable {
        combatant: CombatantId,
        destination: Position,
    },

    #[error("destination {destination} is occupied")]
    Occupied { destination: Position },

    #[error("{combatant} needs {required} mana")]
    InsufficientMana { combatant: CombatantId, required: f32 },

    #[error("{combatant} ultimate meter is not full")]
    UltimateNotReady { combatant: CombatantId },

    #[error("{combatant} has no skill in slot {slot:?}")]
    EmptySlot { combatant: CombatantId, slot: SlotRef },

    #[error("{combatant} {action} is on cooldown")]
    OnCooldown {
        combatant: CombatantId,
        action: ActionKind,
    },

    #[error("{combatant} parry window is not ready")]
    ParryUnavailable { combatant: CombatantId },
}

/// Intent family, used to name what a cooldown blocked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    BasicAttack,
    Skill,
    Ultimate,
}

/// Skill slot addressed by `cast_skill`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlotRef {
    /// Regular slot, 0-based.
    Skill(u8),
    Ultimate,
}

impl GameError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::OutOfBounds { .. } | Self::EmptySlot { .. } => ErrorSeverity::Validation,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Dead { .. } => "COMMAND_DEAD",
            Self::Alive { .. } => "COMMAND_ALIVE",
            Self::CastLocked { .. } => "COMMAND_CAST_LOCKED",
            Self::MovementDisabled { .. } => "COMMAND_MOVEMENT_DISABLED",
            Self::AlreadyStepping { .. } => "COMMAND_ALREADY_STEPPING",
            Self::OutOfBounds { .. } => "COMMAND_OUT_OF_BOUNDS",
            Self::NotWalkable { .. } => "COMMAND_NOT_WALKABLE",
            Self::Occupied { .. } => "COMMAND_OCCUPIED",
            Self::InsufficientMana { .. } => "COMMAND_INSUFFICIENT_MANA",
            Self::UltimateNotReady { .. } => "COMMAND_ULTIMATE_NOT_READY",
            Self::EmptySlot { .. } => "COMMAND_EMPTY_SLOT",
            Self::OnCooldown { .. } => "COMMAND_ON_COOLDOWN",
            Self::ParryUnavailable { .. } => "COMMAND_PARRY_UNAVAILABLE",
        }
    }
}

/// Errors raised while assembling an engine from rules and character data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("grid must be at least 2x1, got {width}x{height}")]
    GridTooSmall { width: u32, height: u32 },

    #[error("spawn cell {position} for {combatant} is outside the grid")]
    SpawnOutOfBounds {
        combatant: CombatantId,
        position: Position,
    },

    #[error("spawn cell {position} for {combatant} is not walkable for its side")]
    SpawnNotWalkable {
        combatant: CombatantId,
        position: Position,
    },

    #[error("both combatants spawn on {position}")]
    SpawnCollision { position: Position },

    #[error("character '{name}' has {count} skills, at most {max} allowed")]
    TooManySkills {
        name: String,
        count: usize,
        max: usize,
    },

    #[error("character '{name}' has {count} passives, at most {max} allowed")]
    TooManyPassives {
        name: String,
        count: usize,
        max: usize,
    },
}

impl GameError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::GridTooSmall { .. } => "SETUP_GRID_TOO_SMALL",
            Self::SpawnOutOfBounds { .. } => "SETUP_SPAWN_OUT_OF_BOUNDS",
            Self::SpawnNotWalkable { .. } => "SETUP_SPAWN_NOT_WALKABLE",
            Self::SpawnCollision { .. } => "SETUP_SPAWN_COLLISION",
            Self::TooManySkills { .. } => "SETUP_TOO_MANY_SKILLS",
            Self::TooManyPassives { .. } => "SETUP_TOO_MANY_PASSIVES",
        }
    }
}
