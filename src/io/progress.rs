//! Progress display for a generation run, tracking collapsed cells

use std::sync::LazyLock;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Single progress bar over the cells of one grid
///
/// The bar restarts for every attempt and reports backtracks in its message.
pub struct ProgressTracker {
    bar: ProgressBar,
    backtracks: usize,
}

impl ProgressTracker {
    /// Create a visible tracker for a grid with `cell_count` cells
    pub fn new(cell_count: usize) -> Self {
        Self::with_bar(ProgressBar::new(cell_count as u64))
    }

    /// Create a tracker that draws nowhere
    pub fn hidden(cell_count: usize) -> Self {
        Self::with_bar(ProgressBar::with_draw_target(
            Some(cell_count as u64),
            ProgressDrawTarget::hidden(),
        ))
    }

    fn with_bar(bar: ProgressBar) -> Self {
        bar.set_style(PROGRESS_STYLE.clone());
        Self { bar, backtracks: 0 }
    }

    /// Reset the bar for a new attempt
    pub fn start_attempt(&mut self, attempt: usize, seed: u64) {
        self.backtracks = 0;
        self.bar.reset();
        self.bar.set_prefix(format!("attempt {attempt} (seed {seed})"));
        self.bar.set_message(String::new());
    }

    /// Report how many cells are collapsed right now
    pub fn set_collapsed(&self, collapsed: usize) {
        self.bar.set_position(collapsed as u64);
    }

    /// Count one backtrack
    pub fn record_backtrack(&mut self) {
        self.backtracks += 1;
        self.bar
            .set_message(format!("{} backtracks", self.backtracks));
    }

    /// Backtracks seen since the current attempt started
    pub const fn backtracks(&self) -> usize {
        self.backtracks
    }

    /// Collapsed cells last reported
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Clear the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
