//! Tests for seeded random choices and lowest-entropy cell selection

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tilewave::algorithm::bitset::TileSet;
    use tilewave::algorithm::propagation::{PropagationMode, collapse_to};
    use tilewave::algorithm::selection::{
        RandomSelector, lowest_entropy_candidates, lowest_entropy_cell,
    };
    use tilewave::spatial::Grid;
    use tilewave::spatial::grid::Position;
    use tilewave::spatial::tiles::{AdjacencyModel, Direction, TileId};

    const A: TileId = TileId::new(0);
    const B: TileId = TileId::new(1);

    // Three tiles; A and B alternate horizontally, C fits anywhere
    fn model() -> AdjacencyModel {
        let mut builder = AdjacencyModel::builder();
        let c = TileId::new(2);
        for name in ["a", "b", "c"] {
            builder.add_tile(name, 'x').unwrap();
        }
        builder
            .allow_both(A, Direction::Right, B)
            .allow_both(B, Direction::Right, A);
        for tile in [A, B, c] {
            builder.allow_both(c, Direction::Right, tile);
            builder.allow_both(tile, Direction::Right, c);
            for other in [A, B, c] {
                builder.allow(tile, Direction::Up, other);
                builder.allow(tile, Direction::Down, other);
            }
        }
        builder.build().unwrap()
    }

    // Tests pick_index stays in range and rejects empty ranges
    // Verified by using an inclusive range in pick_index
    #[test]
    fn test_pick_index_bounds() {
        let mut selector = RandomSelector::new(9);
        assert_eq!(selector.pick_index(0), None);
        for _ in 0..100 {
            let index = selector.pick_index(3).unwrap();
            assert!(index < 3);
        }
    }

    // Tests pick_tile only returns members of the set
    // Verified by picking from the full alphabet instead of the set
    #[test]
    fn test_pick_tile_returns_member() {
        let options = TileSet::from_tiles(8, [TileId::new(2), TileId::new(6)]);
        let mut selector = RandomSelector::new(4);

        for _ in 0..50 {
            let tile = selector.pick_tile(&options).unwrap();
            assert!(options.contains(tile));
        }
        assert_eq!(selector.pick_tile(&TileSet::new(8)), None);
    }

    // Tests identical seeds produce identical choice sequences
    // Verified by seeding from entropy instead of the given seed
    #[test]
    fn test_same_seed_same_choices() {
        let mut first = RandomSelector::new(123);
        let mut second = RandomSelector::from_rng(StdRng::seed_from_u64(123));

        let a: Vec<_> = (0..20).map(|_| first.pick_index(10)).collect();
        let b: Vec<_> = (0..20).map(|_| second.pick_index(10)).collect();
        assert_eq!(a, b);
    }

    // Tests a fresh grid offers every cell as a candidate in row-major order
    // Verified by skipping the candidate reset on a new minimum
    #[test]
    fn test_fresh_grid_all_candidates() {
        let grid = Grid::new(2, 2, model()).unwrap();
        assert_eq!(
            lowest_entropy_candidates(&grid),
            vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(1, 0),
                Position::new(1, 1),
            ]
        );
    }

    // Tests narrowed cells win over untouched ones
    // Verified by selecting the maximum entropy instead of the minimum
    #[test]
    fn test_lowest_entropy_prefers_constrained_cell() {
        let mut grid = Grid::new(1, 3, model()).unwrap();
        collapse_to(&mut grid, Position::new(0, 0), A, PropagationMode::Shallow).unwrap();

        // (0, 1) is left with {b, c}
        assert_eq!(
            lowest_entropy_candidates(&grid),
            vec![Position::new(0, 1)]
        );
        let mut selector = RandomSelector::new(0);
        assert_eq!(
            lowest_entropy_cell(&grid, &mut selector),
            Some(Position::new(0, 1))
        );
    }

    // Tests a fully collapsed grid has no next cell
    // Verified by including collapsed cells in the candidate scan
    #[test]
    fn test_no_candidate_when_complete() {
        let mut grid = Grid::new(1, 2, model()).unwrap();
        collapse_to(&mut grid, Position::new(0, 0), A, PropagationMode::Shallow).unwrap();
        collapse_to(&mut grid, Position::new(0, 1), B, PropagationMode::Shallow).unwrap();

        let mut selector = RandomSelector::new(0);
        assert_eq!(lowest_entropy_cell(&grid, &mut selector), None);
        assert!(lowest_entropy_candidates(&grid).is_empty());
    }

    proptest! {
        // Tests the chosen cell is open and of minimal entropy over all open cells
        // Verified by returning the first open cell regardless of entropy
        #[test]
        fn prop_selected_cell_is_open_and_minimal(
            seed in any::<u64>(),
            pinned in prop::collection::vec((0usize..3, 0usize..4, 0u16..3), 0..4),
        ) {
            let mut grid = Grid::new(3, 4, model()).unwrap();
            for (row, col, tile) in pinned {
                // Refused pins leave the grid untouched
                let _ = collapse_to(
                    &mut grid,
                    Position::new(row, col),
                    TileId::new(tile),
                    PropagationMode::Shallow,
                );
            }

            let mut selector = RandomSelector::new(seed);
            if let Some(position) = lowest_entropy_cell(&grid, &mut selector) {
                let chosen = grid.cell(position).unwrap();
                prop_assert!(!chosen.is_collapsed());
                let minimum = grid
                    .cells()
                    .filter(|cell| !cell.is_collapsed())
                    .map(|cell| cell.entropy())
                    .min()
                    .unwrap();
                prop_assert_eq!(chosen.entropy(), minimum);
            } else {
                prop_assert!(grid.is_fully_collapsed());
            }
        }
    }
}
