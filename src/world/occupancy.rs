//! Occupancy index - at most one live actor per cell

use crate::core::error::{BrainsError, Result};
use crate::core::types::{ActorId, Cell};
use ahash::AHashMap;

#[derive(Debug, Default, Clone)]
pub struct Occupancy {
    cells: AHashMap<Cell, ActorId>,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn occupant(&self, cell: Cell) -> Option<ActorId> {
        self.cells.get(&cell).copied()
    }

    pub fn is_free(&self, cell: Cell) -> bool {
        !self.cells.contains_key(&cell)
    }

    /// Claim a free cell. Claiming a cell the actor already holds is a no-op.
    pub fn claim(&mut self, cell: Cell, actor: ActorId) -> Result<()> {
        match self.occupant(cell) {
            Some(occupant) if occupant != actor => Err(BrainsError::CellOccupied { cell, occupant }),
            _ => {
                self.cells.insert(cell, actor);
                Ok(())
            }
        }
    }

    /// Release a cell, but only if `actor` holds it
    pub fn release(&mut self, cell: Cell, actor: ActorId) {
        if self.occupant(cell) == Some(actor) {
            self.cells.remove(&cell);
        }
    }

    /// Move `actor` from one cell to another in a single step
    ///
    /// Nothing changes if the destination is held by someone else.
    pub fn relocate(&mut self, actor: ActorId, from: Cell, to: Cell) -> Result<()> {
        if let Some(occupant) = self.occupant(to) {
            if occupant != actor {
                return Err(BrainsError::CellOccupied { cell: to, occupant });
            }
        }
        self.release(from, actor);
        self.cells.insert(to, actor);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cell, ActorId)> + '_ {
        self.cells.iter().map(|(cell, actor)| (*cell, *actor))
    }
}
