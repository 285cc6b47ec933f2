use std::collections::VecDeque;

use ndarray::Array2;

use crate::{
    algorithm::{cell::Cell, selection::RandomSelector},
    io::error::Result,
    spatial::{Grid, grid::Position, tiles::TileId},
};

/// How far the consequences of a collapse are pushed through the grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PropagationMode {
    /// Re-narrow only the direct neighbors of the collapsed cell, each against
    /// its own collapsed neighbors
    ///
    /// Contradictions further away surface only when a later collapse
    /// reaches them.
    #[default]
    Shallow,
    /// Re-narrow against every neighbor, open ones included, and keep going
    /// until nothing changes
    ArcConsistent,
}

/// Cells whose options changed during one propagation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropagationReport {
    /// Changed cells, in the order they were narrowed
    pub narrowed: Vec<Position>,
}

impl PropagationReport {
    /// Whether any cell changed
    pub const fn changed(&self) -> bool {
        !self.narrowed.is_empty()
    }
}

/// Collapse the cell at `position` and propagate the consequence
///
/// # Errors
///
/// Returns an error, leaving the grid untouched, if the position is outside
/// the grid or the cell is already collapsed or has no options
pub fn collapse_at(
    grid: &mut Grid,
    position: Position,
    selector: &mut RandomSelector,
    mode: PropagationMode,
) -> Result<(TileId, PropagationReport)> {
    let tile = grid.require_cell_mut(position)?.collapse(selector)?;
    log_collapse(grid, position, tile);
    let report = propagate(grid, position, mode);
    Ok((tile, report))
}

/// Fix the cell at `position` to `tile` and propagate the consequence
///
/// # Errors
///
/// Returns an error, leaving the grid untouched, if the position is outside
/// the grid, the cell is already collapsed, or `tile` is not one of its options
pub fn collapse_to(
    grid: &mut Grid,
    position: Position,
    tile: TileId,
    mode: PropagationMode,
) -> Result<PropagationReport> {
    grid.require_cell_mut(position)?.collapse_to(tile)?;
    log_collapse(grid, position, tile);
    Ok(propagate(grid, position, mode))
}

fn log_collapse(grid: &Grid, position: Position, tile: TileId) {
    log::debug!(
        "Collapsed cell {position} to '{}'",
        grid.model().name(tile).unwrap_or("?")
    );
}

/// Narrow the neighborhood of a freshly collapsed cell
pub fn propagate(grid: &mut Grid, origin: Position, mode: PropagationMode) -> PropagationReport {
    match mode {
        PropagationMode::Shallow => propagate_shallow(grid, origin),
        PropagationMode::ArcConsistent => propagate_to_fixed_point(grid, origin),
    }
}

// One layer: each direct neighbor is recomputed once
fn propagate_shallow(grid: &mut Grid, origin: Position) -> PropagationReport {
    let mut report = PropagationReport::default();
    for (_, neighbor) in grid.neighbors_of(origin) {
        if grid.update_cell(neighbor) {
            report.narrowed.push(neighbor);
        }
    }
    report
}

fn propagate_to_fixed_point(grid: &mut Grid, origin: Position) -> PropagationReport {
    let mut report = PropagationReport::default();
    let mut worklist = Worklist::new(grid);
    for (_, neighbor) in grid.neighbors_of(origin) {
        worklist.push(neighbor);
    }

    while let Some(position) = worklist.pop() {
        if !grid.update_cell_from_all(position) {
            continue;
        }
        report.narrowed.push(position);

        // An emptied cell cannot narrow anything further into a useful state
        if grid.cell(position).is_some_and(Cell::is_contradiction) {
            break;
        }

        for (_, next) in grid.neighbors_of(position) {
            if grid.cell(next).is_some_and(|cell| !cell.is_collapsed()) {
                worklist.push(next);
            }
        }
    }

    report
}

// FIFO of positions, each queued at most once at a time
struct Worklist {
    queue: VecDeque<Position>,
    queued: Array2<bool>,
}

impl Worklist {
    fn new(grid: &Grid) -> Self {
        Self {
            queue: VecDeque::new(),
            queued: Array2::from_elem(grid.dimensions(), false),
        }
    }

    fn push(&mut self, position: Position) {
        let slot = self.queued.get_mut([position.row, position.col]);
        if let Some(flag) = slot.filter(|flag| !**flag) {
            *flag = true;
            self.queue.push_back(position);
        }
    }

    fn pop(&mut self) -> Option<Position> {
        let position = self.queue.pop_front()?;
        if let Some(flag) = self.queued.get_mut([position.row, position.col]) {
            *flag = false;
        }
        Some(position)
    }
}
