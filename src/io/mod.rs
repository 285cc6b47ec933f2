/// Command-line interface and generation driver
pub mod cli;
/// Solver constants and rendering defaults
pub mod configuration;
/// Error types shared across the crate
pub mod error;
/// PNG rendering of grid snapshots
pub mod image;
/// Tiles fixed before generation
pub mod prefill;
/// Progress bar for generation runs
pub mod progress;
/// JSON adjacency rules files
pub mod rules;
/// Collapse traces and GIF export
pub mod visualization;
