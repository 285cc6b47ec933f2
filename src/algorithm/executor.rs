use crate::{
    algorithm::{
        backtrack,
        cell::Cell,
        propagation::{self, PropagationMode},
        selection::{self, RandomSelector},
    },
    io::{error::Result, visualization::TraceCapture},
    spatial::{
        Grid,
        grid::{GridDump, Position},
        tiles::{AdjacencyModel, TileId},
    },
};

/// Solver parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Seed for every random choice of the run
    pub seed: u64,
    /// How far collapses propagate
    pub propagation: PropagationMode,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            seed: crate::io::configuration::DEFAULT_SEED,
            propagation: PropagationMode::default(),
        }
    }
}

/// How a run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every cell collapsed
    Complete,
    /// A contradiction remained with nothing left to revert
    Unresolved {
        /// First contradicted cell at the time the run stopped
        position: Position,
    },
}

/// Counters accumulated over a solver's lifetime
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Loop iterations performed
    pub steps: usize,
    /// Cells collapsed, pins included
    pub collapses: usize,
    /// Cells reverted by backtracking
    pub backtracks: usize,
}

/// Final outcome of `WaveSolver::run` with the counters that led there
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// How the run ended
    pub outcome: Outcome,
    /// Counters at the end of the run
    pub stats: RunStats,
}

impl RunReport {
    /// Whether the grid was fully generated
    pub const fn is_complete(&self) -> bool {
        matches!(self.outcome, Outcome::Complete)
    }
}

/// Result of a single solver iteration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepResult {
    /// A cell was collapsed and its neighbors narrowed
    Collapsed {
        /// Collapsed cell
        position: Position,
        /// Chosen tile
        tile: TileId,
    },
    /// A contradiction was present and one cell was reverted
    Backtracked {
        /// Reverted cell
        position: Position,
    },
    /// Every cell is collapsed
    Complete,
    /// A contradiction is present and nothing can be reverted
    Unresolved {
        /// First contradicted cell
        position: Position,
    },
}

impl StepResult {
    /// Whether the run is over
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Unresolved { .. })
    }
}

/// Drives a grid to full collapse or to an unresolvable contradiction
///
/// Each iteration either backtracks one cell (when a contradiction exists)
/// or collapses the lowest-entropy cell and propagates. The solver owns the
/// grid and the random source, so a run is fully determined by its seed.
#[derive(Debug)]
pub struct WaveSolver {
    grid: Grid,
    selector: RandomSelector,
    propagation: PropagationMode,
    stats: RunStats,
    trace: Option<TraceCapture>,
}

impl WaveSolver {
    /// Create a solver seeded from the configuration
    pub fn new(grid: Grid, config: SolverConfig) -> Self {
        Self::with_selector(grid, RandomSelector::new(config.seed), config.propagation)
    }

    /// Create a solver drawing from an existing random source
    pub const fn with_selector(
        grid: Grid,
        selector: RandomSelector,
        propagation: PropagationMode,
    ) -> Self {
        Self {
            grid,
            selector,
            propagation,
            stats: RunStats {
                steps: 0,
                collapses: 0,
                backtracks: 0,
            },
            trace: None,
        }
    }

    /// Build a fresh grid and a solver for it
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are invalid
    pub fn from_model(
        rows: usize,
        cols: usize,
        model: AdjacencyModel,
        config: SolverConfig,
    ) -> Result<Self> {
        Ok(Self::new(Grid::new(rows, cols, model)?, config))
    }

    /// Access the grid
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Give up the solver and keep the grid
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Counters so far
    pub const fn stats(&self) -> RunStats {
        self.stats
    }

    /// Active propagation mode
    pub const fn propagation(&self) -> PropagationMode {
        self.propagation
    }

    /// Recorded collapses and reverts, if tracing was enabled
    pub const fn trace(&self) -> Option<&TraceCapture> {
        self.trace.as_ref()
    }

    /// Start recording collapses and reverts for GIF export
    pub fn enable_trace(&mut self) {
        self.trace = Some(TraceCapture::new(self.grid.rows(), self.grid.cols()));
    }

    /// Collapse the cell at `position` and propagate
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the grid untouched, if the position is
    /// outside the grid or the cell is already collapsed or has no options
    pub fn collapse_at(&mut self, position: Position) -> Result<TileId> {
        let (tile, _) =
            propagation::collapse_at(&mut self.grid, position, &mut self.selector, self.propagation)?;
        self.record_collapse(position, tile);
        Ok(tile)
    }

    /// Fix the cell at `position` to `tile` for good and propagate
    ///
    /// Unlike [`WaveSolver::collapse_at`], a pinned cell keeps no history, so
    /// backtracking never reverts it.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the grid untouched, if the position is
    /// outside the grid, the cell is collapsed, or `tile` is not an option
    pub fn pin(&mut self, position: Position, tile: TileId) -> Result<()> {
        propagation::collapse_to(&mut self.grid, position, tile, self.propagation)?;
        self.grid.require_cell_mut(position)?.forget_history();
        self.record_collapse(position, tile);
        Ok(())
    }

    /// Name-based variant of [`WaveSolver::pin`]
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unknown or the pin is refused
    pub fn pin_named(&mut self, position: Position, name: &str) -> Result<()> {
        let tile = self.grid.model().require(name)?;
        self.pin(position, tile)
    }

    fn record_collapse(&mut self, position: Position, tile: TileId) {
        self.stats.collapses += 1;
        if let Some(trace) = &mut self.trace {
            trace.record_collapse(position, tile, self.stats.steps);
        }
    }

    /// The most constrained open cell, ties broken at random
    pub fn lowest_entropy_cell(&mut self) -> Option<Position> {
        selection::lowest_entropy_cell(&self.grid, &mut self.selector)
    }

    /// Revert one cell, scanning in reverse row-major order
    pub fn backtrack_once(&mut self) -> Option<Position> {
        let position = backtrack::backtrack_once(&mut self.grid)?;
        self.stats.backtracks += 1;
        if let Some(trace) = &mut self.trace {
            let tile = self.grid.cell(position).and_then(Cell::tile);
            trace.record_revert(position, tile, self.stats.steps);
        }
        Some(position)
    }

    /// True iff every cell is collapsed
    pub fn is_fully_collapsed(&self) -> bool {
        self.grid.is_fully_collapsed()
    }

    /// True iff some open cell has no options
    pub fn has_contradiction(&self) -> bool {
        self.grid.has_contradiction()
    }

    /// Structured dump of every cell
    pub fn dump(&self) -> GridDump {
        self.grid.dump()
    }

    /// Perform one iteration of the solver loop
    ///
    /// # Errors
    ///
    /// Only fails if the grid was left in a state the loop cannot act on,
    /// which collapsing the lowest-entropy open cell never produces
    pub fn step(&mut self) -> Result<StepResult> {
        self.stats.steps += 1;

        if let Some(contradiction) = self.grid.first_contradiction() {
            return Ok(self.backtrack_once().map_or(
                StepResult::Unresolved {
                    position: contradiction,
                },
                |position| StepResult::Backtracked { position },
            ));
        }

        let Some(position) = self.lowest_entropy_cell() else {
            return Ok(StepResult::Complete);
        };
        let tile = self.collapse_at(position)?;
        Ok(StepResult::Collapsed { position, tile })
    }

    /// Run until every cell is collapsed or a contradiction cannot be undone
    ///
    /// Open cells carry no history, so a contradicted cell is never reverted:
    /// once a contradiction appears the loop only drains history until
    /// nothing is left, and the run stops.
    ///
    /// # Errors
    ///
    /// Propagates [`WaveSolver::step`] errors
    pub fn run(&mut self) -> Result<RunReport> {
        self.run_with(|_, _| {})
    }

    /// [`WaveSolver::run`] with a callback after every step
    ///
    /// The callback sees the step just taken and the grid it left behind.
    ///
    /// # Errors
    ///
    /// Propagates [`WaveSolver::step`] errors
    pub fn run_with(&mut self, mut on_step: impl FnMut(&StepResult, &Grid)) -> Result<RunReport> {
        loop {
            let step = self.step()?;
            on_step(&step, &self.grid);
            match step {
                StepResult::Complete => {
                    log::info!(
                        "Grid complete after {} steps ({} backtracks)",
                        self.stats.steps,
                        self.stats.backtracks
                    );
                    return Ok(self.report(Outcome::Complete));
                }
                StepResult::Unresolved { position } => {
                    log::warn!("Failed to resolve contradiction at cell {position}");
                    return Ok(self.report(Outcome::Unresolved { position }));
                }
                StepResult::Collapsed { .. } | StepResult::Backtracked { .. } => {}
            }
        }
    }

    const fn report(&self, outcome: Outcome) -> RunReport {
        RunReport {
            outcome,
            stats: self.stats,
        }
    }
}
