//! Fixed-size cell grid with coordinate-based neighbor lookup
//!
//! Cells never reference each other. Neighbor relationships are computed from
//! coordinates on demand, so the grid is a plain index-addressed array that
//! owns every cell and the adjacency model they are checked against.

use std::fmt::{self, Write as _};

use ndarray::Array2;
use serde::Serialize;

use crate::algorithm::cell::{Cell, NeighborStates};
use crate::io::configuration::{CONTRADICTION_GLYPH, MAX_GRID_DIMENSION, OPEN_GLYPH};
use crate::io::error::{AlgorithmError, Result, invalid_parameter};
use crate::spatial::tiles::{AdjacencyModel, Direction, TileId};

/// Row and column of a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    /// Row index, growing downwards
    pub row: usize,
    /// Column index, growing rightwards
    pub col: usize,
}

impl Position {
    /// Create a position
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// One step in `direction`, `None` if it would underflow
    pub const fn step(self, direction: Direction) -> Option<Self> {
        let (d_row, d_col) = direction.offset();
        match (
            self.row.checked_add_signed(d_row),
            self.col.checked_add_signed(d_col),
        ) {
            (Some(row), Some(col)) => Some(Self { row, col }),
            _ => None,
        }
    }

    const fn index(self) -> [usize; 2] {
        [self.row, self.col]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// What a renderer needs to draw one cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellView {
    /// Grid coordinates
    pub position: Position,
    /// Whether the cell holds its final tile
    pub collapsed: bool,
    /// The resolved tile, once collapsed
    pub tile: Option<TileId>,
    /// Remaining candidate count
    pub entropy: usize,
}

/// Structured dump of one cell
#[derive(Clone, Debug, Serialize)]
pub struct CellDump {
    /// Row index
    pub row: usize,
    /// Column index
    pub col: usize,
    /// Whether the cell holds its final tile
    pub collapsed: bool,
    /// Names of the remaining candidates
    pub options: Vec<String>,
    /// Saved states available to revert
    pub history_depth: usize,
}

/// Structured dump of a whole grid
#[derive(Clone, Debug, Serialize)]
pub struct GridDump {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
    /// Whether every cell is collapsed
    pub fully_collapsed: bool,
    /// Whether some open cell has no options
    pub contradiction: bool,
    /// Every cell in row-major order
    pub cells: Vec<CellDump>,
}

/// Rectangular array of cells plus the adjacency model they obey
///
/// Dimensions are fixed at construction.
#[derive(Clone, Debug)]
pub struct Grid {
    cells: Array2<Cell>,
    model: AdjacencyModel,
}

impl Grid {
    /// Create a grid whose cells all start with the full alphabet
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or exceeds `MAX_GRID_DIMENSION`
    pub fn new(rows: usize, cols: usize, model: AdjacencyModel) -> Result<Self> {
        for (parameter, value) in [("rows", rows), ("cols", cols)] {
            if value == 0 || value > MAX_GRID_DIMENSION {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &format!("must be between 1 and {MAX_GRID_DIMENSION}"),
                ));
            }
        }

        let alphabet = model.alphabet();
        let cells = Array2::from_shape_fn((rows, cols), |(row, col)| {
            Cell::new(Position::new(row, col), alphabet.clone())
        });

        Ok(Self { cells, model })
    }

    /// Get the number of rows in the grid
    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    /// Get the number of columns in the grid
    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    /// Grid dimensions (rows, cols)
    pub fn dimensions(&self) -> (usize, usize) {
        self.cells.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false; grids have at least one cell
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The adjacency model cells are checked against
    pub const fn model(&self) -> &AdjacencyModel {
        &self.model
    }

    /// Whether `position` lies inside the grid
    pub fn contains(&self, position: Position) -> bool {
        position.row < self.rows() && position.col < self.cols()
    }

    /// Borrow a cell
    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.cells.get(position.index())
    }

    /// Borrow a cell or fail with [`AlgorithmError::OutOfBounds`]
    ///
    /// # Errors
    ///
    /// Returns an error if the position lies outside the grid
    pub fn require_cell(&self, position: Position) -> Result<&Cell> {
        self.cells
            .get(position.index())
            .ok_or(AlgorithmError::OutOfBounds {
                position,
                grid_dimensions: self.dimensions(),
            })
    }

    pub(crate) fn require_cell_mut(&mut self, position: Position) -> Result<&mut Cell> {
        let grid_dimensions = self.dimensions();
        self.cells
            .get_mut(position.index())
            .ok_or(AlgorithmError::OutOfBounds {
                position,
                grid_dimensions,
            })
    }

    /// Iterate cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Every position in row-major order
    pub fn positions(&self) -> impl DoubleEndedIterator<Item = Position> + use<> {
        let cols = self.cols();
        (0..self.len()).map(move |index| Position::new(index / cols, index % cols))
    }

    /// In-bounds neighbors in the fixed order up, right, down, left
    pub fn neighbors_of(&self, position: Position) -> Vec<(Direction, Position)> {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| {
                position
                    .step(direction)
                    .filter(|&next| self.contains(next))
                    .map(|next| (direction, next))
            })
            .collect()
    }

    /// Snapshots of the four neighbors, `None` past the edge
    pub fn neighbor_states(&self, position: Position) -> NeighborStates {
        Direction::ALL.map(|direction| {
            position
                .step(direction)
                .and_then(|next| self.cell(next))
                .map(Cell::snapshot)
        })
    }

    /// Re-narrow one cell against its collapsed neighbors
    ///
    /// Returns true if the cell's options changed.
    pub fn update_cell(&mut self, position: Position) -> bool {
        let neighbors = self.neighbor_states(position);
        let Some(cell) = self.cells.get_mut(position.index()) else {
            return false;
        };
        cell.update(&neighbors, &self.model)
    }

    /// Re-narrow one cell against all neighbors, open ones included
    pub fn update_cell_from_all(&mut self, position: Position) -> bool {
        let neighbors = self.neighbor_states(position);
        let Some(cell) = self.cells.get_mut(position.index()) else {
            return false;
        };
        cell.update_from_all(&neighbors, &self.model)
    }

    /// True iff every cell is collapsed
    pub fn is_fully_collapsed(&self) -> bool {
        self.cells.iter().all(Cell::is_collapsed)
    }

    /// True iff some open cell has run out of options
    pub fn has_contradiction(&self) -> bool {
        self.first_contradiction().is_some()
    }

    /// First contradicted cell in row-major order
    pub fn first_contradiction(&self) -> Option<Position> {
        self.cells
            .iter()
            .find(|cell| cell.is_contradiction())
            .map(Cell::position)
    }

    /// Number of collapsed cells
    pub fn collapsed_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_collapsed()).count()
    }

    /// Renderer-facing state of every cell in row-major order
    pub fn views(&self) -> impl Iterator<Item = CellView> + '_ {
        self.cells.iter().map(|cell| CellView {
            position: cell.position(),
            collapsed: cell.is_collapsed(),
            tile: cell.tile(),
            entropy: cell.entropy(),
        })
    }

    /// Resolved tiles in row-major rows, `None` for open cells
    pub fn assignment(&self) -> Vec<Vec<Option<TileId>>> {
        self.cells
            .rows()
            .into_iter()
            .map(|row| row.iter().map(Cell::tile).collect())
            .collect()
    }

    /// Adjacent collapsed pairs the model does not permit
    ///
    /// Each entry is a cell, a direction, and the neighbor in that direction.
    pub fn violations(&self) -> Vec<(Position, Direction, Position)> {
        let mut found = Vec::new();
        for cell in &self.cells {
            let Some(tile) = cell.tile() else {
                continue;
            };
            // Right and down cover every pair once
            for direction in [Direction::Right, Direction::Down] {
                let Some(next) = cell.position().step(direction) else {
                    continue;
                };
                let Some(neighbor) = self.cell(next).and_then(Cell::tile) else {
                    continue;
                };
                let permitted = self
                    .model
                    .allowed(tile, direction)
                    .is_some_and(|set| set.contains(neighbor));
                if !permitted {
                    found.push((cell.position(), direction, next));
                }
            }
        }
        found
    }

    /// One line per cell describing its status and options by name
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for cell in &self.cells {
            let status = if cell.is_collapsed() {
                "Collapsed"
            } else {
                "Open"
            };
            let _ = writeln!(
                out,
                "Cell {}: {status}, Options: {}",
                cell.position(),
                self.model.format_set(cell.options())
            );
        }
        out
    }

    /// Serializable snapshot of the whole grid
    pub fn dump(&self) -> GridDump {
        let cells = self
            .cells
            .iter()
            .map(|cell| CellDump {
                row: cell.position().row,
                col: cell.position().col,
                collapsed: cell.is_collapsed(),
                options: cell
                    .options()
                    .iter()
                    .map(|tile| self.model.name(tile).unwrap_or("?").to_string())
                    .collect(),
                history_depth: cell.history_depth(),
            })
            .collect();

        GridDump {
            rows: self.rows(),
            cols: self.cols(),
            fully_collapsed: self.is_fully_collapsed(),
            contradiction: self.has_contradiction(),
            cells,
        }
    }

    fn glyph_for(&self, cell: &Cell) -> char {
        match cell.tile() {
            Some(tile) => self.model.glyph(tile).unwrap_or('?'),
            None if cell.is_contradiction() => CONTRADICTION_GLYPH,
            None => OPEN_GLYPH,
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.rows() {
            let line: String = row.iter().map(|cell| self.glyph_for(cell)).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
