//! Combat building blocks used by the resolver.
//!
//! This module provides:
//! - Positional damage calculation
//! - The parry window state machine
//! - Lane projectiles and their deflection rules
mod damage;
mod parry;
mod projectile;

pub use damage::{DamageContext, calculate_damage, compute_damage};
pub use parry::{DeflectBoost, ParryPhase, ParryWindow};
pub use projectile::{Projectile, ProjectileSpec, ProjectileState};
