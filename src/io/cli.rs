//! Command-line interface for generating a tile grid from adjacency rules

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::algorithm::executor::{RunReport, SolverConfig, StepResult, WaveSolver};
use crate::algorithm::propagation::PropagationMode;
use crate::io::configuration::{
    DEFAULT_ATTEMPTS, DEFAULT_COLS, DEFAULT_ROWS, DEFAULT_SEED, DEFAULT_TILE_PIXELS,
    GIF_FRAME_DELAY_MS,
};
use crate::io::error::{AlgorithmError, Result, invalid_parameter};
use crate::io::image::{export_grid_as_png, validate_tile_pixels};
use crate::io::prefill::{Pin, apply_pins, parse_pin};
use crate::io::progress::ProgressTracker;
use crate::io::rules::load_rules;
use crate::spatial::tiles::AdjacencyModel;

#[derive(Parser, Debug)]
#[command(name = "tilewave")]
#[command(
    author,
    version,
    about = "Fill a grid with tiles that respect adjacency rules"
)]
/// Command-line arguments for the grid generator
pub struct Cli {
    /// Number of grid rows
    #[arg(short, long, default_value_t = DEFAULT_ROWS)]
    pub rows: usize,

    /// Number of grid columns
    #[arg(short, long, default_value_t = DEFAULT_COLS)]
    pub cols: usize,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Seeds to try before giving up on a contradiction
    #[arg(short, long, default_value_t = DEFAULT_ATTEMPTS)]
    pub attempts: usize,

    /// JSON rules file (defaults to the built-in pipe tiles)
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// How far each collapse is propagated
    #[arg(short, long, value_enum, default_value_t = PropagationMode::Shallow)]
    pub propagation: PropagationMode,

    /// Fix a tile before generation, repeatable
    #[arg(long = "pin", value_name = "ROW,COL=NAME", value_parser = parse_pin)]
    pub pins: Vec<Pin>,

    /// Write the finished grid as a PNG image
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the collapse sequence as an animated GIF
    #[arg(short, long, value_name = "FILE")]
    pub trace: Option<PathBuf>,

    /// Edge length of one tile in rendered images
    #[arg(long, default_value_t = DEFAULT_TILE_PIXELS)]
    pub tile_pixels: u32,

    /// Write a structured JSON dump of the final grid
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Pause between solver steps, for watching the progress bar
    #[arg(long, default_value_t = 0)]
    pub delay_ms: u64,

    /// Print one line per cell instead of the glyph grid
    #[arg(long)]
    pub describe: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Seed used by the zero-based `attempt`
    pub const fn seed_for(&self, attempt: usize) -> u64 {
        self.seed.wrapping_add(attempt as u64)
    }

    /// Reject argument combinations no run could satisfy
    ///
    /// # Errors
    ///
    /// Returns an error if no attempts are allowed or the tile size is out of range
    pub fn validate(&self) -> Result<()> {
        if self.attempts == 0 {
            return Err(invalid_parameter(
                "attempts",
                &self.attempts,
                &"at least one attempt is required",
            ));
        }
        validate_tile_pixels(self.tile_pixels)
    }

    /// The adjacency model selected by `--rules`
    ///
    /// # Errors
    ///
    /// Returns an error if the rules file cannot be loaded
    pub fn model(&self) -> Result<AdjacencyModel> {
        self.rules
            .as_deref()
            .map_or_else(|| Ok(AdjacencyModel::pipes()), load_rules)
    }
}

/// Outcome of a successful generation
#[derive(Debug)]
pub struct Generation {
    /// Solver holding the finished grid
    pub solver: WaveSolver,
    /// Report of the successful attempt
    pub report: RunReport,
    /// Zero-based index of the successful attempt
    pub attempt: usize,
    /// Seed of the successful attempt
    pub seed: u64,
}

/// Runs attempts with successive seeds until one completes, then writes outputs
pub struct GenerationRunner {
    cli: Cli,
    progress: Option<ProgressTracker>,
}

impl GenerationRunner {
    /// Create a runner for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let cells = cli.rows.saturating_mul(cli.cols);
        let progress = cli
            .should_show_progress()
            .then(|| ProgressTracker::new(cells));

        Self { cli, progress }
    }

    /// Generate, write every requested output and print the grid
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments or rules are invalid, a pin is
    /// refused, every attempt ends unresolved, or an output cannot be written
    // Printing the finished grid is the tool's purpose
    #[allow(clippy::print_stdout)]
    pub fn process(&mut self) -> Result<()> {
        let generation = self.generate()?;
        self.write_outputs(&generation)?;

        let grid = generation.solver.grid();
        if self.cli.describe {
            print!("{}", grid.describe());
        } else {
            print!("{grid}");
        }
        Ok(())
    }

    /// Run attempts until one completes
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::GenerationFailed`] when every attempt ends
    /// unresolved, or any setup error
    pub fn generate(&mut self) -> Result<Generation> {
        self.cli.validate()?;
        let model = self.cli.model()?;

        for (a, b, c) in model.asymmetries() {
            log::warn!(
                "Rule is one-sided: '{}' allows '{}' {b} but not the reverse",
                model.name(a).unwrap_or("?"),
                model.name(c).unwrap_or("?")
            );
        }

        let mut last_seed = self.cli.seed;
        for attempt in 0..self.cli.attempts {
            let seed = self.cli.seed_for(attempt);
            last_seed = seed;

            let (solver, report) = self.attempt(model.clone(), attempt, seed)?;
            if report.is_complete() {
                if let Some(progress) = &self.progress {
                    progress.finish();
                }
                return Ok(Generation {
                    solver,
                    report,
                    attempt,
                    seed,
                });
            }
            log::info!("Attempt {attempt} with seed {seed} ended unresolved");
        }

        if let Some(progress) = &self.progress {
            progress.finish();
        }
        Err(AlgorithmError::GenerationFailed {
            attempts: self.cli.attempts,
            last_seed,
        })
    }

    fn attempt(
        &mut self,
        model: AdjacencyModel,
        attempt: usize,
        seed: u64,
    ) -> Result<(WaveSolver, RunReport)> {
        let config = SolverConfig {
            seed,
            propagation: self.cli.propagation,
        };
        let mut solver = WaveSolver::from_model(self.cli.rows, self.cli.cols, model, config)?;
        if self.cli.trace.is_some() {
            solver.enable_trace();
        }
        apply_pins(&mut solver, &self.cli.pins)?;

        if let Some(progress) = &mut self.progress {
            progress.start_attempt(attempt, seed);
        }

        let delay = Duration::from_millis(self.cli.delay_ms);
        let progress = &mut self.progress;
        let report = solver.run_with(|step, grid| {
            if let Some(progress) = progress.as_mut() {
                if matches!(step, StepResult::Backtracked { .. }) {
                    progress.record_backtrack();
                }
                progress.set_collapsed(grid.collapsed_count());
            }
            if !delay.is_zero() && !step.is_terminal() {
                std::thread::sleep(delay);
            }
        })?;

        Ok((solver, report))
    }

    fn write_outputs(&self, generation: &Generation) -> Result<()> {
        let solver = &generation.solver;

        if let Some(path) = &self.cli.output {
            export_grid_as_png(solver.grid(), self.cli.tile_pixels, path)?;
            log::info!("Wrote {}", path.display());
        }

        if let (Some(path), Some(trace)) = (&self.cli.trace, solver.trace()) {
            trace.export_gif(path, GIF_FRAME_DELAY_MS, self.cli.tile_pixels)?;
            log::info!("Wrote {}", path.display());
        }

        if let Some(path) = &self.cli.json {
            let text = serde_json::to_string_pretty(&solver.dump()).map_err(|e| {
                AlgorithmError::FileSystem {
                    path: path.clone(),
                    operation: "serialize grid",
                    source: e.into(),
                }
            })?;
            std::fs::write(path, text).map_err(|e| AlgorithmError::FileSystem {
                path: path.clone(),
                operation: "write dump",
                source: e,
            })?;
            log::info!("Wrote {}", path.display());
        }

        Ok(())
    }
}
