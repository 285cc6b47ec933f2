//! Per-position state machine: open options, collapse, narrowing and undo
//!
//! A cell is `Open(options)` until it collapses to a single tile. Every
//! collapse pushes the prior state onto the cell's history so a later
//! `revert` can restore it exactly.

use std::fmt;

use crate::algorithm::bitset::TileSet;
use crate::algorithm::selection::RandomSelector;
use crate::io::error::{AlgorithmError, Result};
use crate::spatial::grid::Position;
use crate::spatial::tiles::{AdjacencyModel, Direction, TileId};

/// Value snapshot of a cell, as stored in its history
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellState {
    /// Whether the cell holds its final tile
    pub collapsed: bool,
    /// Remaining candidate tiles (one element once collapsed)
    pub options: TileSet,
}

/// Neighbor snapshots indexed by [`Direction::index`], `None` past the grid edge
pub type NeighborStates = [Option<CellState>; 4];

/// A single grid position with its possibility set and undo stack
#[derive(Clone, Debug)]
pub struct Cell {
    position: Position,
    state: CellState,
    history: Vec<CellState>,
}

impl Cell {
    /// Create an open cell with the given starting options
    pub const fn new(position: Position, options: TileSet) -> Self {
        Self {
            position,
            state: CellState {
                collapsed: false,
                options,
            },
            history: Vec::new(),
        }
    }

    /// Grid coordinates of this cell
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Whether the cell holds its final tile
    pub const fn is_collapsed(&self) -> bool {
        self.state.collapsed
    }

    /// Remaining candidate tiles
    pub const fn options(&self) -> &TileSet {
        &self.state.options
    }

    /// Number of remaining candidates
    pub fn entropy(&self) -> usize {
        self.state.options.count()
    }

    /// The resolved tile, once collapsed
    pub fn tile(&self) -> Option<TileId> {
        if self.state.collapsed {
            self.state.options.only()
        } else {
            None
        }
    }

    /// Open with nothing left to choose from
    pub fn is_contradiction(&self) -> bool {
        !self.state.collapsed && self.state.options.is_empty()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> CellState {
        self.state.clone()
    }

    /// Borrow the current state
    pub const fn state(&self) -> &CellState {
        &self.state
    }

    /// Number of saved states available to `revert`
    pub const fn history_depth(&self) -> usize {
        self.history.len()
    }

    /// Whether `revert` would do anything
    pub const fn has_history(&self) -> bool {
        !self.history.is_empty()
    }

    /// Fix the cell to one of its options, chosen uniformly at random
    ///
    /// # Errors
    ///
    /// Refuses without touching state if the cell is already collapsed or has
    /// no options left
    pub fn collapse(&mut self, selector: &mut RandomSelector) -> Result<TileId> {
        self.check_collapsible()?;
        let tile = selector
            .pick_tile(&self.state.options)
            .ok_or(AlgorithmError::NoOptions {
                position: self.position,
            })?;
        self.fix(tile);
        Ok(tile)
    }

    /// Fix the cell to a caller-chosen tile
    ///
    /// # Errors
    ///
    /// Refuses without touching state if the cell is already collapsed, has no
    /// options, or does not list `tile` among them
    pub fn collapse_to(&mut self, tile: TileId) -> Result<()> {
        self.check_collapsible()?;
        if !self.state.options.contains(tile) {
            return Err(AlgorithmError::TileNotAllowed {
                position: self.position,
                tile: tile.to_string(),
            });
        }
        self.fix(tile);
        Ok(())
    }

    fn check_collapsible(&self) -> Result<()> {
        if self.state.collapsed {
            return Err(AlgorithmError::CellAlreadyCollapsed {
                position: self.position,
            });
        }
        if self.state.options.is_empty() {
            return Err(AlgorithmError::NoOptions {
                position: self.position,
            });
        }
        Ok(())
    }

    fn fix(&mut self, tile: TileId) {
        self.save_state();
        self.state.options = TileSet::singleton(self.state.options.capacity(), tile);
        self.state.collapsed = true;
    }

    /// Narrow the options against collapsed neighbors
    ///
    /// A neighbor in direction `d` permits the union of
    /// `model.allowed(t, d.opposite())` over its options `t`. Returns true if
    /// the options changed. Collapsed cells are left alone. No history is
    /// pushed; call [`Cell::save_state`] first to make the change revertible.
    pub fn update(&mut self, neighbors: &NeighborStates, model: &AdjacencyModel) -> bool {
        self.narrow(neighbors, model, |neighbor| neighbor.collapsed)
    }

    /// Narrow the options against every neighbor, open ones included
    ///
    /// Same contract as [`Cell::update`]; used by arc-consistent propagation.
    pub fn update_from_all(&mut self, neighbors: &NeighborStates, model: &AdjacencyModel) -> bool {
        self.narrow(neighbors, model, |_| true)
    }

    fn narrow(
        &mut self,
        neighbors: &NeighborStates,
        model: &AdjacencyModel,
        constrains: impl Fn(&CellState) -> bool,
    ) -> bool {
        if self.state.collapsed {
            return false;
        }

        let mut narrowed = self.state.options.clone();
        for direction in Direction::ALL {
            let Some(Some(neighbor)) = neighbors.get(direction.index()) else {
                continue;
            };
            if !constrains(neighbor) {
                continue;
            }
            let permitted = model.allowed_by_any(&neighbor.options, direction.opposite());
            narrowed.intersect_with(&permitted);
        }

        if narrowed == self.state.options {
            return false;
        }

        log::trace!(
            "Cell {} narrowed from {} to {}",
            self.position,
            model.format_set(&self.state.options),
            model.format_set(&narrowed)
        );
        self.state.options = narrowed;
        true
    }

    /// Restore the most recent saved state
    ///
    /// Returns false, leaving the cell untouched, when there is no history.
    pub fn revert(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.state = previous;
                true
            }
            None => false,
        }
    }

    /// Push the current state without changing it
    pub fn save_state(&mut self) {
        self.history.push(self.state.clone());
    }

    // Makes the current state permanent for backtracking
    pub(crate) fn forget_history(&mut self) {
        self.history.clear();
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.state.collapsed {
            "Collapsed"
        } else {
            "Open"
        };
        write!(
            f,
            "Cell {}: {status}, Options: {}",
            self.position, self.state.options
        )
    }
}
