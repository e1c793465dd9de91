//! Authoritative tile grid.
//!
//! The grid owns three layers per cell:
//!
//! - the current [`TileState`]
//! - the original owner, restored when crack/break damage is repaired
//! - a transient takeover mark, restored when an ultimate's claim ends
//!
//! Every mutation goes through a method that emits [`Event::TileChanged`], and
//! each cell carries at most one pending repair so the last trigger always wins.
mod tile;

use std::collections::BTreeMap;
use std::time::Duration;

pub use tile::TileState;

use crate::config::GridRules;
use crate::event::Event;
use crate::state::{Position, Side};
use crate::timer::Timer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DamageFamily {
    Crack,
    Break,
}

#[derive(Clone, Copy, Debug)]
struct Repair {
    family: DamageFamily,
    timer: Timer,
}

/// Bookkeeping for a cell claimed by a takeover.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TakeoverMark {
    pub claimant: Side,
    /// Ownership to put back when the claim ends.
    pub restore: TileState,
}

#[derive(Clone, Debug)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<TileState>,
    original: Vec<TileState>,
    repairs: Vec<Option<Repair>>,
    takeover: BTreeMap<Position, TakeoverMark>,
    crack_repair: Duration,
    break_repair: Duration,
}

impl TileGrid {
    /// Creates a grid seeded by column: the left half belongs to `Left`,
    /// the right half to `Right`.
    pub fn new(rules: &GridRules) -> Self {
        let len = (rules.width * rules.height) as usize;
        let mut tiles = Vec::with_capacity(len);
        for _y in 0..rules.height {
            for x in 0..rules.width {
                tiles.push(TileState::Owned(Side::of_column(x as i32, rules.width)));
            }
        }

        Self {
            width: rules.width,
            height: rules.height,
            original: tiles.clone(),
            tiles,
            repairs: vec![None; len],
            takeover: BTreeMap::new(),
            crack_repair: rules.crack_repair,
            break_repair: rules.break_repair,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_valid_cell(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.is_valid_cell(pos)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Current state of a cell, `None` outside the grid.
    pub fn tile(&self, pos: Position) -> Option<TileState> {
        self.index(pos).map(|idx| self.tiles[idx])
    }

    /// Intact state the cell reverts to after crack/break damage.
    pub fn original_owner(&self, pos: Position) -> Option<TileState> {
        self.index(pos).map(|idx| self.original[idx])
    }

    pub fn is_walkable_for_side(&self, pos: Position, side: Side) -> bool {
        self.tile(pos).is_some_and(|tile| tile.is_walkable_for(side))
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, TileState)> + '_ {
        self.tiles.iter().enumerate().map(|(idx, tile)| {
            let x = (idx % self.width as usize) as i32;
            let y = (idx / self.width as usize) as i32;
            (Position::new(x, y), *tile)
        })
    }

    // ========================================================================
    // Damage
    // ========================================================================

    /// Cracks a cell. Ignored on broken cells; re-cracking restarts the repair.
    ///
    /// Returns `true` if the cell is cracked afterwards.
    pub fn crack(&mut self, pos: Position, events: &mut Vec<Event>) -> bool {
        let Some(idx) = self.index(pos) else {
            return false;
        };
        if self.tiles[idx].is_broken() {
            return false;
        }

        let next = self.original[idx].cracked();
        self.write(idx, pos, next, events);
        self.repairs[idx] = Some(Repair {
            family: DamageFamily::Crack,
            timer: Timer::new(self.crack_repair),
        });
        true
    }

    /// Breaks a cell, replacing any pending crack repair.
    pub fn break_tile(&mut self, pos: Position, events: &mut Vec<Event>) -> bool {
        let Some(idx) = self.index(pos) else {
            return false;
        };

        let next = self.original[idx].broken();
        self.write(idx, pos, next, events);
        self.repairs[idx] = Some(Repair {
            family: DamageFamily::Break,
            timer: Timer::new(self.break_repair),
        });
        true
    }

    // ========================================================================
    // Ownership
    // ========================================================================

    /// Re-skins a cell to an intact owner state.
    ///
    /// The new owner also becomes the cell's original owner and any pending
    /// repair is dropped. Damaged states are rejected.
    pub fn set_owner(&mut self, pos: Position, owner: TileState, events: &mut Vec<Event>) -> bool {
        if !owner.is_intact() {
            return false;
        }
        let Some(idx) = self.index(pos) else {
            return false;
        };

        self.original[idx] = owner;
        self.repairs[idx] = None;
        self.write(idx, pos, owner, events);
        true
    }

    /// Records that `claimant` took this cell and what it held before.
    pub fn mark_taken_over(&mut self, pos: Position, claimant: Side, restore: TileState) {
        if self.is_valid_cell(pos) {
            self.takeover.insert(pos, TakeoverMark { claimant, restore });
        }
    }

    /// Clears a takeover mark, returning it if one existed.
    pub fn unmark_taken_over(&mut self, pos: Position) -> Option<TakeoverMark> {
        self.takeover.remove(&pos)
    }

    pub fn takeover_mark(&self, pos: Position) -> Option<TakeoverMark> {
        self.takeover.get(&pos).copied()
    }

    pub fn is_taken_over_by(&self, pos: Position, claimant: Side) -> bool {
        self.takeover
            .get(&pos)
            .is_some_and(|mark| mark.claimant == claimant)
    }

    // ========================================================================
    // Timers
    // ========================================================================

    /// Runs every pending repair. A repair only restores the cell if it is
    /// still in the damage family that scheduled it.
    pub fn advance(&mut self, dt: Duration, events: &mut Vec<Event>) {
        for idx in 0..self.repairs.len() {
            let Some(repair) = self.repairs[idx].as_mut() else {
                continue;
            };
            if !repair.timer.tick(dt) {
                continue;
            }

            let family = repair.family;
            self.repairs[idx] = None;

            let current = self.tiles[idx];
            let still_damaged = match family {
                DamageFamily::Crack => current.is_cracked(),
                DamageFamily::Break => current.is_broken(),
            };
            if still_damaged {
                let pos = Position::new(
                    (idx % self.width as usize) as i32,
                    (idx / self.width as usize) as i32,
                );
                let restored = self.original[idx];
                self.write(idx, pos, restored, events);
            }
        }
    }

    fn write(&mut self, idx: usize, pos: Position, state: TileState, events: &mut Vec<Event>) {
        if self.tiles[idx] == state {
            return;
        }
        self.tiles[idx] = state;
        tracing::trace!(%pos, %state, "tile changed");
        events.push(Event::TileChanged { cell: pos, state });
    }
}
