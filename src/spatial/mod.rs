//! Spatial data structures and grid manipulation
//!
//! This module contains spatial-related functionality including:
//! - Grid construction, neighbor lookup and dumps
//! - Tile identifiers, directions and adjacency models

/// Grid state management and neighbor lookup
pub mod grid;
/// Tile alphabet, directions and adjacency rules
pub mod tiles;

pub use grid::Grid;
