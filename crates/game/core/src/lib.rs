//! Deterministic grid combat rules for two-player lane matches.
//!
//! `arena-core` owns the authoritative simulation: tile ownership and
//! repair, discrete movement, projectile and skill hit resolution, parry and
//! deflection, positional damage and the per-combatant resource economy. It
//! performs no I/O and never reads a clock; time enters only through
//! [`engine::CombatEngine::advance`], so identical inputs always produce
//! identical runs.
pub mod combat;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod grid;
pub mod movement;
pub mod skills;
pub mod state;
pub mod stats;
pub mod timer;

pub use combat::{
    DamageContext, DeflectBoost, ParryPhase, ParryWindow, Projectile, ProjectileSpec,
    ProjectileState, calculate_damage, compute_damage,
};
pub use config::{
    DamageTuning, DeflectTuning, GridRules, MatchRules, MovementRules, ParryRules,
    ProjectileRules, SpawnRules, TakeoverRules, UltimateRules,
};
pub use engine::{CombatEngine, Continuation, Schedule};
pub use error::{ActionKind, CommandError, ErrorSeverity, GameError, SetupError, SlotRef};
pub use event::{Event, HitSource, ProjectileId};
pub use grid::{TakeoverMark, TileGrid, TileState};
pub use movement::{MovementController, MovementPhase, StepContext, StepOutcome};
pub use skills::{
    BasicAttackDef, CharacterDef, Claim, ClaimId, ClaimOutcome, Element, ElementalStack,
    PassiveKind, PassiveState, SkillDef, SkillEffect, TakeoverArbiter,
};
pub use state::{CardinalDirection, Combatant, CombatantId, LaneDirection, Position, Side};
pub use stats::{DamageReceipt, LedgerSpec, Mana, ResourceLedger, UltimateMeter};
pub use timer::Timer;
