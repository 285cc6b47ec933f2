use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    algorithm::bitset::TileSet,
    spatial::{Grid, grid::Position},
    spatial::tiles::TileId,
};

/// Seeded random selector for reproducible stochastic choices
///
/// Every random decision of a run (tile choice on collapse, tie-break among
/// equally constrained cells) draws from this one source.
#[derive(Clone, Debug)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Wrap an already seeded generator
    pub const fn from_rng(rng: StdRng) -> Self {
        Self { rng }
    }

    /// Uniform index in `0..len`, `None` when `len` is zero
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.random_range(0..len))
    }

    /// Uniform choice among the members of a tile set
    pub fn pick_tile(&mut self, options: &TileSet) -> Option<TileId> {
        let index = self.pick_index(options.count())?;
        options.nth(index)
    }

    /// Uniform choice from a slice
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        let index = self.pick_index(items.len())?;
        items.get(index).copied()
    }
}

/// Positions of the open cells with the fewest remaining options
///
/// Returned in row-major order; empty when every cell is collapsed.
pub fn lowest_entropy_candidates(grid: &Grid) -> Vec<Position> {
    let mut minimum = usize::MAX;
    let mut candidates = Vec::new();

    for cell in grid.cells().filter(|cell| !cell.is_collapsed()) {
        let entropy = cell.entropy();
        if entropy < minimum {
            minimum = entropy;
            candidates.clear();
        }
        if entropy == minimum {
            candidates.push(cell.position());
        }
    }

    candidates
}

/// Pick the next cell to collapse: the most constrained open cell
///
/// Ties are broken uniformly at random. Returns `None` once every cell is
/// collapsed.
pub fn lowest_entropy_cell(grid: &Grid, selector: &mut RandomSelector) -> Option<Position> {
    let candidates = lowest_entropy_candidates(grid);
    selector.pick(&candidates)
}
