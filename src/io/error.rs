//! Error types and context management for solver operations

use std::fmt;
use std::path::PathBuf;

use crate::spatial::grid::Position;

/// Main error type for all solver operations
#[derive(Debug)]
pub enum AlgorithmError {
    /// A cell was asked to collapse after it had already collapsed
    CellAlreadyCollapsed {
        /// Position of the offending cell
        position: Position,
    },

    /// A cell was asked to collapse while holding no options
    ///
    /// This is the dead-end state a contradiction leaves behind; the
    /// solver backtracks instead of collapsing such a cell.
    NoOptions {
        /// Position of the offending cell
        position: Position,
    },

    /// A tile was forced onto a cell whose options exclude it
    TileNotAllowed {
        /// Position of the offending cell
        position: Position,
        /// Name of the rejected tile
        tile: String,
    },

    /// Position lies outside the grid
    OutOfBounds {
        /// Requested position
        position: Position,
        /// Grid dimensions (rows, cols)
        grid_dimensions: (usize, usize),
    },

    /// Adjacency rules reference a tile id outside the alphabet
    UnknownTile {
        /// The invalid tile index
        index: usize,
        /// Number of tiles in the alphabet
        tile_count: usize,
    },

    /// A tile name could not be resolved against the alphabet
    UnknownTileName {
        /// The unresolved name
        name: String,
    },

    /// Two tiles in one alphabet share a name
    DuplicateTileName {
        /// The repeated name
        name: String,
    },

    /// The tile alphabet contains no tiles
    EmptyAlphabet,

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Every generation attempt ended in an unresolved contradiction
    GenerationFailed {
        /// Number of attempts made
        attempts: usize,
        /// Seed of the last attempt
        last_seed: u64,
    },

    /// Rules file could not be parsed
    RulesParse {
        /// Path to the rules file
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// Failed to save a rendered image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for AlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CellAlreadyCollapsed { position } => {
                write!(f, "Cell {position} is already collapsed")
            }
            Self::NoOptions { position } => {
                write!(f, "Cell {position} has no remaining options")
            }
            Self::TileNotAllowed { position, tile } => {
                write!(f, "Tile '{tile}' is not an option for cell {position}")
            }
            Self::OutOfBounds {
                position,
                grid_dimensions,
            } => {
                write!(
                    f,
                    "Position {position} is outside the grid (grid size {}x{})",
                    grid_dimensions.0, grid_dimensions.1
                )
            }
            Self::UnknownTile { index, tile_count } => {
                write!(
                    f,
                    "Tile index {index} is out of bounds (alphabet has {tile_count} tiles)"
                )
            }
            Self::UnknownTileName { name } => write!(f, "Unknown tile name '{name}'"),
            Self::DuplicateTileName { name } => write!(f, "Duplicate tile name '{name}'"),
            Self::EmptyAlphabet => write!(f, "Tile alphabet is empty"),
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::GenerationFailed {
                attempts,
                last_seed,
            } => {
                write!(
                    f,
                    "Generation failed after {attempts} attempt(s) (last seed {last_seed})"
                )
            }
            Self::RulesParse { path, source } => {
                write!(
                    f,
                    "Failed to parse rules file '{}': {source}",
                    path.display()
                )
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for AlgorithmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RulesParse { source, .. } => Some(source),
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for solver results
pub type Result<T> = std::result::Result<T, AlgorithmError>;

impl From<std::io::Error> for AlgorithmError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> AlgorithmError {
    AlgorithmError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl AlgorithmError {
    /// Whether the error is a refused operation on an existing grid
    ///
    /// Such errors leave the grid untouched, so a driver may keep going.
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::CellAlreadyCollapsed { .. }
                | Self::NoOptions { .. }
                | Self::TileNotAllowed { .. }
                | Self::OutOfBounds { .. }
        )
    }
}
