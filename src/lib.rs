//! Wave function collapse over a rectangular tile grid
//!
//! Every cell starts with the full tile alphabet. The solver repeatedly
//! collapses the cell with the fewest options, narrows its neighbors against
//! the adjacency rules, and reverts single cells when a contradiction leaves
//! some cell without options.

#![forbid(unsafe_code)]

/// Core algorithm implementation including cells, selection, propagation and backtracking
pub mod algorithm;
/// Input/output operations and error handling
pub mod io;
/// Spatial grid management and adjacency models
pub mod spatial;

pub use io::error::{AlgorithmError, Result};
