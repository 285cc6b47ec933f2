//! Predetermined tile placements applied before generation starts

use std::fmt;
use std::str::FromStr;

use crate::algorithm::executor::WaveSolver;
use crate::io::error::{AlgorithmError, Result, invalid_parameter};
use crate::spatial::grid::Position;

/// A tile fixed at a position, written `ROW,COL=NAME`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    /// Cell to fix
    pub position: Position,
    /// Name of the tile to place there
    pub tile_name: String,
}

impl FromStr for Pin {
    type Err = AlgorithmError;

    fn from_str(text: &str) -> Result<Self> {
        let malformed = || invalid_parameter("pin", &text, &"expected ROW,COL=NAME");

        let (coordinates, name) = text.split_once('=').ok_or_else(malformed)?;
        let (row, col) = coordinates.split_once(',').ok_or_else(malformed)?;
        let row: usize = row.trim().parse().map_err(|_e| malformed())?;
        let col: usize = col.trim().parse().map_err(|_e| malformed())?;

        let tile_name = name.trim();
        if tile_name.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            position: Position::new(row, col),
            tile_name: tile_name.to_string(),
        })
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}={}",
            self.position.row, self.position.col, self.tile_name
        )
    }
}

/// Parser hook for `clap` value parsing
///
/// # Errors
///
/// Returns the formatted parse error if `text` is not `ROW,COL=NAME`
pub fn parse_pin(text: &str) -> std::result::Result<Pin, String> {
    text.parse().map_err(|e: AlgorithmError| e.to_string())
}

/// Apply pins in order, propagating after each
///
/// # Errors
///
/// Returns the first refused pin's error: unknown tile names, positions
/// outside the grid, repeated cells, or tiles already ruled out by earlier pins
pub fn apply_pins(solver: &mut WaveSolver, pins: &[Pin]) -> Result<()> {
    for pin in pins {
        solver.pin_named(pin.position, &pin.tile_name)?;
        log::debug!("Pinned {pin}");
    }
    Ok(())
}
