use crate::algorithm::cell::Cell;
use crate::spatial::{Grid, grid::Position};

/// Revert a single cell to escape a contradiction
///
/// Cells are scanned in reverse row-major order and the first one with saved
/// history is reverted. This is not a chronological undo: the reverted cell
/// need not be the most recently collapsed one. Returns the reverted position,
/// or `None` when no cell anywhere has history left.
pub fn backtrack_once(grid: &mut Grid) -> Option<Position> {
    let position = grid
        .positions()
        .rev()
        .find(|&position| grid.cell(position).is_some_and(Cell::has_history))?;

    let reverted = grid.require_cell_mut(position).is_ok_and(Cell::revert);
    if reverted {
        log::debug!("Backtracked cell {position}");
    }
    reverted.then_some(position)
}

/// Cells that `backtrack_once` could still revert
pub fn revertible_count(grid: &Grid) -> usize {
    grid.cells().filter(|cell| cell.has_history()).count()
}
