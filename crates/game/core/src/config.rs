//! Match rules: compile-time limits plus runtime-tunable defaults.
//!
//! Every tunable has a `DEFAULT_*` constant and the rule records implement
//! [`Default`], so a rules file only needs to list the values it overrides.
use std::time::Duration;

use crate::state::Position;

/// Complete set of tunables for one match.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MatchRules {
    pub grid: GridRules,
    pub movement: MovementRules,
    pub damage: DamageTuning,
    pub parry: ParryRules,
    pub deflect: DeflectTuning,
    pub ultimate: UltimateRules,
    pub projectile: ProjectileRules,
    pub takeover: TakeoverRules,
    pub spawn: SpawnRules,
}

impl MatchRules {
    // ===== compile-time constants =====
    /// Number of regular skill slots per combatant.
    pub const SKILL_SLOTS: usize = 3;
    /// Maximum number of passives equipped on one combatant.
    pub const MAX_PASSIVES: usize = 4;
    /// Elemental stacks a combatant can carry at once.
    pub const ELEMENT_STACK_CAPACITY: usize = 5;

    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Grid
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridRules {
    pub width: u32,
    pub height: u32,
    /// Time a cracked tile takes to revert to its original owner.
    #[cfg_attr(feature = "serde", serde(with = "seconds"))]
    pub crack_repair: Duration,
    /// Time a broken tile takes to revert to its original owner.
    #[cfg_attr(feature = "serde", serde(with = "seconds"))]
    pub break_repair: Duration,
}

impl GridRules {
    pub const DEFAULT_WIDTH: u32 = 8;
    pub const DEFAULT_HEIGHT: u32 = 4;
    pub const DEFAULT_CRACK_REPAIR: Duration = Duration::from_millis(1500);
    pub const DEFAULT_BREAK_REPAIR: Duration = Duration::from_secs(2);
}

impl Default for GridRules {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            crack_repair: Self::DEFAULT_CRACK_REPAIR,
            break_repair: Self::DEFAULT_BREAK_REPAIR,
        }
    }
}

// ============================================================================
// Movement
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementRules {
    #[cfg_attr(feature = "serde", serde(with = "seconds"))]
    pub step_duration: Duration,
    /// Delay between the first step of a held direction and the first repeat.
    #[cfg_attr(feature = "serde", serde(with = "seconds"))]
    pub initial_repeat_delay: Duration,
    #[cfg_attr(feature = "serde", serde(with = "seconds"))]
    pub repeat_rate: Duration,
    /// Lower bound applied to external speed multipliers.
    pub min_speed_multiplier: f32,
}

impl MovementRules {
    pub const DEFAULT_STEP_DURATION: Duration = Duration::from_millis(200);
    pub const DEFAULT_INITIAL_REPEAT_DELAY: Duration = Duration::from_millis(250);
    pub const DEFAULT_REPEAT_RATE: Duration = Duration::from_millis(120);
    pub const DEFAULT_MIN_SPEED_MULTIPLIER: f32 = 0.25;
}

impl Default for MovementRules {
    fn default() -> Self {
        Self {
            step_duration: Self::DEFAULT_STEP_DURATION,
            initial_repeat_delay: Self::DEFAULT_INITIAL_REPEAT_DELAY,
            repeat_rate: Self::DEFAULT_REPEAT_RATE,
            min_speed_multiplier: Self::DEFAULT_MIN_SPEED_MULTIPLIER,
        }
    }
}

// ============================================================================
// Damage
// ============================================================================

/// Multipliers used by [`crate::combat::calculate_damage`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DamageTuning {
    /// Applied when the defender stands on any cracked tile.
    pub defender_cracked_multiplier: f32,
    /// Applied when the attacker stands on any cracked tile.
    pub attacker_cracked_multiplier: f32,
    /// Multiplier reached at the full grid width of horizontal distance.
    pub max_distance_multiplier: f32,
    pub row_falloff_per_row: f32,
    pub row_falloff_floor: f32,
}

impl DamageTuning {
    pub const DEFAULT_DEFENDER_CRACKED: f32 = 1.25;
    pub const DEFAULT_ATTACKER_CRACKED: f32 = 0.85;
    pub const DEFAULT_MAX_DISTANCE: f32 = 1.30;
    pub const DEFAULT_ROW_FALLOFF: f32 = 0.05;
    pub const DEFAULT_ROW_FLOOR: f32 = 0.85;
}

impl Default for DamageTuning {
    fn default() -> Self {
        Self {
            defender_cracked_multiplier: Self::DEFAULT_DEFENDER_CRACKED,
            attacker_cracked_multiplier: Self::DEFAULT_ATTACKER_CRACKED,
            max_distance_multiplier: Self::DEFAULT_MAX_DISTANCE,
            row_falloff_per_row: Self::DEFAULT_ROW_FALLOFF,
            row_falloff_floor: Self::DEFAULT_ROW_FLOOR,
        }
    }
}

// ============================================================================
// Parry & deflection
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParryRules {
    #[cfg_attr(feature = "serde", serde(with = "seconds"))]
    pub window: Duration,
    #[cfg_attr(feature = "serde", serde(with = "seconds"))]
    pub cooldown: Duration,
    /// Net mana cost of a window that deflects nothing.
    pub miss_cost: f32,
    /// Net mana cost of a window with at least one success.
    pub success_cost: f32,
}

impl ParryRules {
    pub const DEFAULT_WINDOW: Duration = Duration::from_millis(250);
    pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(300);
    pub const DEFAULT_MISS_COST: f32 = 2.0;
    pub const DEFAULT_SUCCESS_COST: f32 = 1.0;

    /// Amount reserved when the window opens.
    pub fn prepay(&self) -> f32 {
        self.miss_cost.max(self.success_cost)
    }
}

impl Default for ParryRules {
    fn default() -> Self {
        Self {
            window: Self::DEFAULT_WINDOW,
            cooldown: Self::DEFAULT_COOLDOWN,
            miss_cost: Self::DEFAULT_MISS_COST,
            success_cost: Self::DEFAULT_SUCCESS_COST,
        }
    }
}

/// How a deflection rewrites a projectile.
///
/// Repeated deflections compound, so both damage and speed carry an upper
/// bound. `None` disables the bound.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeflectTuning {
    pub damage_multiplier: f32,
    /// Speed multiplier for the first deflection inside one parry window.
    pub first_speed_multiplier: f32,
    /// Added to the speed multiplier for every further deflection in the same window.
    pub speed_step: f32,
    pub max_damage: Option<u32>,
    /// Cap on speed, expressed as a factor of the projectile's launch speed.
    pub max_speed_factor: Option<f32>,
}

impl DeflectTuning {
    pub const DEFAULT_DAMAGE_MULTIPLIER: f32 = 2.0;
    pub const DEFAULT_FIRST_SPEED: f32 = 1.5;
    pub const DEFAULT_SPEED_STEP: f32 = 0.2;
    pub const DEFAULT_MAX_DAMAGE: u32 = 400;
    pub const DEFAULT_MAX_SPEED_FACTOR: f32 = 6.0;

    /// Speed multiplier for the `count`-th deflection (1-based) in one window.
    pub fn speed_multiplier(&self, count: u32) -> f32 {
        self.first_speed_multiplier + count.saturating_sub(1) as f32 * self.speed_step
    }

    /// Unbounded variant, useful for replaying escalating rallies.
    pub fn uncapped() -> Self {
        Self {
            max_damage: None,
            max_speed_factor: None,
            ..Self::default()
        }
    }
}

impl Default for DeflectTuning {
    fn default() -> Self {
        Self {
            damage_multiplier: Self::DEFAULT_DAMAGE_MULTIPLIER,
            first_speed_multiplier: Self::DEFAULT_FIRST_SPEED,
            speed_step: Self::DEFAULT_SPEED_STEP,
            max_damage: Some(Self::DEFAULT_MAX_DAMAGE),
            max_speed_factor: Some(Self::DEFAULT_MAX_SPEED_FACTOR),
        }
    }
}

// ============================================================================
// Ultimate meter
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UltimateRules {
    pub max_charge: f32,
    /// Fraction of dealt damage credited to the attacker.
    pub dealt_ratio: f32,
    /// Fraction of taken damage credited to the victim.
    pub taken_ratio: f32,
}

impl UltimateRules {
    pub const DEFAULT_MAX_CHARGE: f32 = 100.0;
    pub const DEFAULT_DEALT_RATIO: f32 = 0.3;
    pub const DEFAULT_TAKEN_RATIO: f32 = 0.7;
}

impl Default for UltimateRules {
    fn default() -> Self {
        Self {
            max_charge: Self::DEFAULT_MAX_CHARGE,
            dealt_ratio: Self::DEFAULT_DEALT_RATIO,
            taken_ratio: Self::DEFAULT_TAKEN_RATIO,
        }
    }
}

// ============================================================================
// Projectiles
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProjectileRules {
    /// Delay before an out-of-bounds projectile is removed.
    #[cfg_attr(feature = "serde", serde(with = "seconds"))]
    pub out_of_bounds_grace: Duration,
    /// Delay between a single-target hit and removal.
    #[cfg_attr(feature = "serde", serde(with = "seconds"))]
    pub hit_fade: Duration,
}

impl ProjectileRules {
    pub const DEFAULT_OUT_OF_BOUNDS_GRACE: Duration = Duration::from_millis(1500);
    pub const DEFAULT_HIT_FADE: Duration = Duration::from_millis(100);
}

impl Default for ProjectileRules {
    fn default() -> Self {
        Self {
            out_of_bounds_grace: Self::DEFAULT_OUT_OF_BOUNDS_GRACE,
            hit_fade: Self::DEFAULT_HIT_FADE,
        }
    }
}

// ============================================================================
// Takeover
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TakeoverRules {
    /// A claim opposed by an older claim than this triggers a mutual cancel.
    #[cfg_attr(feature = "serde", serde(with = "seconds"))]
    pub mutual_cancel_window: Duration,
    /// Rows claimed around the centre row.
    pub claimed_rows: u32,
}

impl TakeoverRules {
    pub const DEFAULT_MUTUAL_CANCEL_WINDOW: Duration = Duration::from_millis(80);
    pub const DEFAULT_CLAIMED_ROWS: u32 = 3;
}

impl Default for TakeoverRules {
    fn default() -> Self {
        Self {
            mutual_cancel_window: Self::DEFAULT_MUTUAL_CANCEL_WINDOW,
            claimed_rows: Self::DEFAULT_CLAIMED_ROWS,
        }
    }
}

// ============================================================================
// Spawn
// ============================================================================

/// Spawn cells. `None` picks column 1 / `width - 2` on the centre row.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpawnRules {
    pub p1: Option<Position>,
    pub p2: Option<Position>,
}

/// Serde adapter storing a [`Duration`] as decimal seconds.
#[cfg(feature = "serde")]
pub mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(value).map_err(serde::de::Error::custom)
    }
}
