//! Lane projectiles.
//!
//! A projectile travels along a single row. Its lane coordinate is measured
//! in cells, with cell `x` spanning `[x - 0.5, x + 0.5]`. The resolver moves
//! it one cell boundary at a time so a fast projectile never skips a cell.

use std::time::Duration;

use crate::config::DeflectTuning;
use crate::combat::parry::DeflectBoost;
use crate::event::ProjectileId;
use crate::skills::Element;
use crate::state::{CombatantId, LaneDirection, Position, Side};
use crate::timer::Timer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileState {
    InFlight,
    /// Hit something; removed once the fade finishes.
    Fading(Timer),
    /// Left the grid; removed once the grace period finishes.
    OutOfBounds(Timer),
}

/// Launch parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSpec {
    pub owner: CombatantId,
    pub origin: Position,
    pub direction: LaneDirection,
    /// Cells per second.
    pub speed: f32,
    pub damage: u32,
    pub element: Option<Element>,
}

#[derive(Clone, Debug)]
pub struct Projectile {
    id: ProjectileId,
    owner: CombatantId,
    side: Side,
    row: i32,
    lane_x: f32,
    cell_x: i32,
    direction: LaneDirection,
    speed: f32,
    launch_speed: f32,
    damage: u32,
    element: Option<Element>,
    deflections: u32,
    state: ProjectileState,
}

impl Projectile {
    pub fn launch(id: ProjectileId, spec: ProjectileSpec, grid_width: u32) -> Self {
        let speed = spec.speed.max(0.0);
        Self {
            id,
            owner: spec.owner,
            side: Side::of_column(spec.origin.x, grid_width),
            row: spec.origin.y,
            lane_x: spec.origin.x as f32,
            cell_x: spec.origin.x,
            direction: spec.direction,
            speed,
            launch_speed: speed,
            damage: spec.damage,
            element: spec.element,
            deflections: 0,
            state: ProjectileState::InFlight,
        }
    }

    pub fn id(&self) -> ProjectileId {
        self.id
    }

    /// Combatant credited with this projectile's hits.
    pub fn owner(&self) -> CombatantId {
        self.owner
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn cell(&self) -> Position {
        Position::new(self.cell_x, self.row)
    }

    pub fn lane_position(&self) -> f32 {
        self.lane_x
    }

    pub fn direction(&self) -> LaneDirection {
        self.direction
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn damage(&self) -> u32 {
        self.damage
    }

    pub fn element(&self) -> Option<Element> {
        self.element
    }

    pub fn deflections(&self) -> u32 {
        self.deflections
    }

    pub fn state(&self) -> ProjectileState {
        self.state
    }

    /// False once the projectile has hit, left the grid, or been removed.
    #[inline]
    pub fn is_in_flight(&self) -> bool {
        self.state == ProjectileState::InFlight
    }

    // ===== travel =====

    /// Distance left before the projectile leaves its current cell.
    pub fn distance_to_boundary(&self) -> f32 {
        let boundary = self.cell_x as f32 + 0.5 * self.direction.sign() as f32;
        (boundary - self.lane_x).abs()
    }

    /// Moves inside the current cell without crossing its boundary.
    pub fn glide(&mut self, distance: f32) {
        self.lane_x += distance * self.direction.sign() as f32;
    }

    /// Moves onto the boundary and into the next cell, returning it.
    pub fn cross_boundary(&mut self) -> Position {
        self.cell_x += self.direction.sign();
        self.lane_x = self.cell_x as f32 - 0.5 * self.direction.sign() as f32;
        self.cell()
    }

    // ===== resolution =====

    /// Rewrites the projectile after a successful parry.
    ///
    /// Ownership moves to the defender and the side follows the defender's
    /// cell. Direction reverses, damage is multiplied (rounded up) and speed
    /// is multiplied, both subject to the configured caps.
    pub fn deflect(
        &mut self,
        new_owner: CombatantId,
        owner_cell: Position,
        boost: DeflectBoost,
        tuning: &DeflectTuning,
        grid_width: u32,
    ) {
        self.owner = new_owner;
        self.side = Side::of_column(owner_cell.x, grid_width);
        self.row = owner_cell.y;
        self.direction = self.direction.reversed();
        self.lane_x = self.cell_x as f32;

        let boosted = (self.damage as f32 * boost.damage_multiplier).ceil();
        let mut damage = if boosted.is_finite() && boosted > 0.0 {
            boosted as u32
        } else {
            self.damage
        };
        if let Some(cap) = tuning.max_damage {
            damage = damage.min(cap);
        }
        self.damage = damage;

        let mut speed = self.speed * boost.speed_multiplier;
        if let Some(factor) = tuning.max_speed_factor {
            speed = speed.min(self.launch_speed * factor);
        }
        self.speed = speed.max(0.0);
        self.deflections += 1;
    }

    /// Starts the post-hit fade. Ignored unless in flight.
    pub fn begin_fade(&mut self, fade: Duration) {
        if self.is_in_flight() {
            self.state = ProjectileState::Fading(Timer::new(fade));
        }
    }

    /// Starts the out-of-bounds grace period. Ignored unless in flight.
    pub fn begin_out_of_bounds(&mut self, grace: Duration) {
        if self.is_in_flight() {
            self.state = ProjectileState::OutOfBounds(Timer::new(grace));
        }
    }

    /// Ticks fade/grace timers. Returns `true` when the projectile should be removed.
    pub fn tick_expiry(&mut self, dt: Duration) -> bool {
        match &mut self.state {
            ProjectileState::InFlight => false,
            ProjectileState::Fading(timer) | ProjectileState::OutOfBounds(timer) => timer.tick(dt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bolt(speed: f32, damage: u32) -> Projectile {
        Projectile::launch(
            ProjectileId(1),
            ProjectileSpec {
                owner: CombatantId::P1,
                origin: Position::new(1, 2),
                direction: LaneDirection::Rightward,
                speed,
                damage,
                element: None,
            },
            8,
        )
    }

    #[test]
    fn crossing_moves_one_cell_at_a_time() {
        let mut p = bolt(10.0, 10);
        assert_eq!(p.distance_to_boundary(), 0.5);
        assert_eq!(p.cross_boundary(), Position::new(2, 2));
        assert_eq!(p.distance_to_boundary(), 1.0);
        p.glide(0.25);
        assert_eq!(p.distance_to_boundary(), 0.75);
    }

    #[test]
    fn deflect_flips_owner_and_direction() {
        let mut p = bolt(10.0, 10);
        let boost = DeflectBoost {
            damage_multiplier: 2.0,
            speed_multiplier: 1.5,
            count: 1,
        };
        p.deflect(CombatantId::P2, Position::new(6, 2), boost, &DeflectTuning::default(), 8);

        assert_eq!(p.owner(), CombatantId::P2);
        assert_eq!(p.side(), Side::Right);
        assert_eq!(p.direction(), LaneDirection::Leftward);
        assert_eq!(p.damage(), 20);
        assert_eq!(p.speed(), 15.0);

        p.deflect(CombatantId::P1, Position::new(1, 2), boost, &DeflectTuning::default(), 8);
        assert_eq!(p.owner(), CombatantId::P1);
        assert_eq!(p.side(), Side::Left);
        assert_eq!(p.direction(), LaneDirection::Rightward);
    }

    #[test]
    fn deflect_respects_caps() {
        let mut p = bolt(10.0, 300);
        let boost = DeflectBoost {
            damage_multiplier: 2.0,
            speed_multiplier: 10.0,
            count: 1,
        };
        p.deflect(CombatantId::P2, Position::new(6, 2), boost, &DeflectTuning::default(), 8);
        assert_eq!(p.damage(), DeflectTuning::DEFAULT_MAX_DAMAGE);
        assert_eq!(p.speed(), 60.0);

        let mut p = bolt(10.0, 300);
        p.deflect(CombatantId::P2, Position::new(6, 2), boost, &DeflectTuning::uncapped(), 8);
        assert_eq!(p.damage(), 600);
        assert_eq!(p.speed(), 100.0);
    }

    #[test]
    fn expiry_only_after_leaving_flight() {
        let mut p = bolt(10.0, 10);
        assert!(!p.tick_expiry(Duration::from_secs(10)));

        p.begin_fade(Duration::from_millis(100));
        assert!(!p.is_in_flight());
        p.begin_out_of_bounds(Duration::from_secs(5));
        assert!(p.tick_expiry(Duration::from_millis(100)));
    }
}
