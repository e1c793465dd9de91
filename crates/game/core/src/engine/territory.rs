//! Takeover claims applied to the grid.

use std::time::Duration;

use super::{CombatEngine, occupant, teleport};
use crate::event::Event;
use crate::grid::TileState;
use crate::skills::{Claim, ClaimOutcome, claim_cells, displacement_cell};
use crate::state::{CombatantId, Position, Side};

impl CombatEngine {
    /// Registers a takeover for `caster` with the arbiter and applies it.
    pub(super) fn claim_territory(&mut self, caster: CombatantId, lifetime: Duration) {
        let claimant = caster.home_side();
        let cells = claim_cells(
            self.grid.width(),
            self.grid.height(),
            claimant,
            self.rules.takeover.claimed_rows,
        );
        let (outcome, replaced) =
            self.arbiter
                .register(claimant, cells.clone(), self.elapsed, lifetime);

        if let Some(previous) = replaced {
            self.revert_claim(&previous);
        }

        match outcome {
            ClaimOutcome::Granted(id) => {
                for &cell in &cells {
                    let restore = self
                        .grid
                        .original_owner(cell)
                        .unwrap_or(TileState::Owned(claimant.opposite()));
                    self.grid
                        .set_owner(cell, TileState::Owned(claimant), &mut self.events);
                    self.grid.mark_taken_over(cell, claimant, restore);
                }
                tracing::debug!(claim = id.0, %claimant, cells = cells.len(), "takeover granted");
                self.events.push(Event::TakeoverStarted { claimant, cells });
                self.push_out(caster.opponent());
            }
            ClaimOutcome::MutualCancel { withdrawn } => {
                tracing::debug!(%claimant, withdrawn = %withdrawn.claimant, "takeover mutual cancel");
                self.revert_claim(&withdrawn);
                self.events.push(Event::TakeoverCancelled);
                self.push_out(CombatantId::P1);
                self.push_out(CombatantId::P2);
            }
        }
    }

    /// Ends every claim whose lifetime is over.
    pub(super) fn expire_claims(&mut self) {
        for claim in self.arbiter.expire(self.elapsed) {
            tracing::debug!(claimant = %claim.claimant, "takeover expired");
            self.revert_claim(&claim);
            self.events.push(Event::TakeoverEnded {
                claimant: claim.claimant,
            });
            self.push_out(owner_of(claim.claimant));
        }
    }

    /// Gives a claim's cells back, skipping cells another claim has since taken.
    fn revert_claim(&mut self, claim: &Claim) {
        for &cell in &claim.cells {
            if !self.grid.is_taken_over_by(cell, claim.claimant) {
                continue;
            }
            if let Some(mark) = self.grid.unmark_taken_over(cell) {
                self.grid.set_owner(cell, mark.restore, &mut self.events);
            }
        }
    }

    /// Moves a combatant standing on a cell it may no longer occupy back
    /// along its row, or to its spawn when the row offers nothing.
    fn push_out(&mut self, id: CombatantId) {
        let c = &self.combatants[id.index()];
        if !c.is_alive() || self.grid.is_walkable_for_side(c.position, c.side()) {
            return;
        }

        let free = |cell: Position| occupant(&self.combatants, cell).is_none();
        let Some(destination) = displacement_cell(&self.grid, c.position, c.side(), c.spawn, free)
        else {
            tracing::debug!(combatant = %id, at = %c.position, "no free cell to push out to");
            return;
        };
        tracing::debug!(combatant = %id, from = %c.position, to = %destination, "pushed out of claimed cell");
        teleport(&mut self.combatants[id.index()], destination, &mut self.events);
    }
}

fn owner_of(side: Side) -> CombatantId {
    match side {
        Side::Left => CombatantId::P1,
        Side::Right => CombatantId::P2,
    }
}
