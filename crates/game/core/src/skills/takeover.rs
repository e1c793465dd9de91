//! Territory takeover claims.
//!
//! Both combatants' takeover casts are coordinated by one
//! [`TakeoverArbiter`] owned by the engine. It keeps at most one active claim
//! per side. A claim made while the opponent's claim is active, and that
//! arrives later than the mutual-cancel window, cancels both.

use std::time::Duration;

use crate::grid::TileGrid;
use crate::state::{Position, Side};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClaimId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Claim {
    pub id: ClaimId,
    pub claimant: Side,
    pub cells: Vec<Position>,
    pub started_at: Duration,
    pub expires_at: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClaimOutcome {
    Granted(ClaimId),
    /// The opposing claim was withdrawn and nothing new was granted.
    MutualCancel { withdrawn: Claim },
}

#[derive(Clone, Debug)]
pub struct TakeoverArbiter {
    window: Duration,
    active: [Option<Claim>; 2],
    next_id: u32,
}

const fn slot(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Right => 1,
    }
}

impl TakeoverArbiter {
    pub fn new(mutual_cancel_window: Duration) -> Self {
        Self {
            window: mutual_cancel_window,
            active: [None, None],
            next_id: 0,
        }
    }

    pub fn active(&self, side: Side) -> Option<&Claim> {
        self.active[slot(side)].as_ref()
    }

    /// Registers a claim for `claimant` starting at `now`.
    ///
    /// Returns the claim a same-side recast replaced, if any, alongside the outcome.
    pub fn register(
        &mut self,
        claimant: Side,
        cells: Vec<Position>,
        now: Duration,
        lifetime: Duration,
    ) -> (ClaimOutcome, Option<Claim>) {
        let opposing = slot(claimant.opposite());
        let window = self.window;
        if let Some(withdrawn) =
            self.active[opposing].take_if(|other| now.saturating_sub(other.started_at) > window)
        {
            let replaced = self.active[slot(claimant)].take();
            return (ClaimOutcome::MutualCancel { withdrawn }, replaced);
        }

        let id = ClaimId(self.next_id);
        self.next_id += 1;
        let replaced = self.active[slot(claimant)].replace(Claim {
            id,
            claimant,
            cells,
            started_at: now,
            expires_at: now + lifetime,
        });
        (ClaimOutcome::Granted(id), replaced)
    }

    /// Removes and returns every claim whose lifetime ended by `now`.
    pub fn expire(&mut self, now: Duration) -> Vec<Claim> {
        let mut ended = Vec::new();
        for entry in &mut self.active {
            if entry.as_ref().is_some_and(|c| c.expires_at <= now) {
                ended.extend(entry.take());
            }
        }
        ended
    }
}

/// Enemy front column cells claimed by `claimant`.
///
/// The column just across the midline, limited to `rows` rows centred
/// vertically (every row when the grid is not taller than `rows`).
pub fn claim_cells(width: u32, height: u32, claimant: Side, rows: u32) -> Vec<Position> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let mid = (width / 2).max(1) as i32;
    let front_x = match claimant {
        Side::Left => mid,
        Side::Right => mid - 1,
    }
    .clamp(0, width as i32 - 1);

    let (count, start) = if height <= rows {
        (height, 0)
    } else {
        (rows, (height - rows) / 2)
    };
    (start..start + count)
        .map(|y| Position::new(front_x, y as i32))
        .collect()
}

/// First cell behind `from` along its row that `side` may stand on.
pub fn push_back_cell(grid: &TileGrid, from: Position, side: Side) -> Option<Position> {
    let back = side.forward().reversed();
    (1..=grid.width() as i32)
        .map(|step| from.along_lane(back, step))
        .take_while(|cell| grid.is_valid_cell(*cell))
        .find(|cell| grid.is_walkable_for_side(*cell, side))
}

/// Where a combatant displaced from `from` goes: the push-back cell, else
/// its spawn. Cells rejected by `is_free` are skipped; `None` leaves the
/// combatant where it stands.
pub fn displacement_cell(
    grid: &TileGrid,
    from: Position,
    side: Side,
    spawn: Position,
    is_free: impl Fn(Position) -> bool,
) -> Option<Position> {
    push_back_cell(grid, from, side)
        .filter(|cell| is_free(*cell))
        .or_else(|| Some(spawn).filter(|cell| is_free(*cell)))
}
