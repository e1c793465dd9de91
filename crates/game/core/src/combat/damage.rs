//! Positional damage model.

use crate::config::DamageTuning;
use crate::grid::{TileGrid, TileState};
use crate::state::{Position, Side};

/// Inputs describing one hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageContext {
    /// Side credited with the hit. Does not affect the amount.
    pub attacker_side: Side,
    pub attacker_pos: Position,
    pub defender_pos: Position,
    pub base_damage: u32,
}

/// Calculate the damage a hit deals, reading tile states from the grid.
///
/// # Formula
///
/// ```text
/// dx = |attacker.x - defender.x|
/// dy = |attacker.y - defender.y|
///
/// damage = base
///        × attacker_cracked   (0.85 when the attacker stands on a cracked tile)
///        × defender_cracked   (1.25 when the defender stands on a cracked tile)
///        × lerp(1.0, 1.30, clamp01(dx / (width - 1)))   (skipped when width == 1)
///        × clamp(1 - 0.05 × dy, 0.85, 1.0)
///
/// final = max(1, round_half_even(damage))
/// ```
///
/// Positions outside the grid read as intact tiles.
pub fn calculate_damage(grid: &TileGrid, ctx: &DamageContext, tuning: &DamageTuning) -> u32 {
    compute_damage(
        ctx.base_damage,
        grid.tile(ctx.attacker_pos),
        grid.tile(ctx.defender_pos),
        ctx.attacker_pos,
        ctx.defender_pos,
        grid.width(),
        tuning,
    )
}

/// Grid-free form of [`calculate_damage`].
pub fn compute_damage(
    base_damage: u32,
    attacker_tile: Option<TileState>,
    defender_tile: Option<TileState>,
    attacker_pos: Position,
    defender_pos: Position,
    grid_width: u32,
    tuning: &DamageTuning,
) -> u32 {
    let mut damage = base_damage as f32;

    if defender_tile.is_some_and(TileState::is_cracked) {
        damage *= tuning.defender_cracked_multiplier;
    }
    if attacker_tile.is_some_and(TileState::is_cracked) {
        damage *= tuning.attacker_cracked_multiplier;
    }

    let dx = attacker_pos.x.abs_diff(defender_pos.x);
    if grid_width > 1 {
        let t = (dx as f32 / (grid_width - 1) as f32).clamp(0.0, 1.0);
        damage *= lerp(1.0, tuning.max_distance_multiplier, t);
    }

    let dy = attacker_pos.y.abs_diff(defender_pos.y);
    let falloff = (1.0 - tuning.row_falloff_per_row * dy as f32).clamp(tuning.row_falloff_floor, 1.0);
    damage *= falloff;

    let rounded = damage.round_ties_even();
    if rounded.is_finite() && rounded >= 1.0 {
        // `as` saturates at u32::MAX.
        rounded as u32
    } else {
        1
    }
}

#[inline]
fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
