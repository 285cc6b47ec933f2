//! Tests for directions, adjacency model construction and the pipe tile set

#[cfg(test)]
mod tests {
    use tilewave::AlgorithmError;
    use tilewave::algorithm::bitset::TileSet;
    use tilewave::spatial::tiles::{AdjacencyModel, Direction, TileId};

    // Tests opposite directions pair up and round-trip
    // Verified by mapping Up to Left in opposite
    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }

    // Tests direction indices follow up, right, down, left
    // Verified by reordering the ALL constant
    #[test]
    fn test_direction_order() {
        let indices: Vec<_> = Direction::ALL.iter().map(|d| d.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(Direction::Up.offset(), (-1, 0));
        assert_eq!(Direction::Right.offset(), (0, 1));
    }

    // Tests builder rules land in the requested direction only
    // Verified by inserting rules under the opposite direction
    #[test]
    fn test_builder_allow() {
        let mut builder = AdjacencyModel::builder();
        let a = builder.add_tile("a", 'a').unwrap();
        let b = builder.add_tile("b", 'b').unwrap();
        builder.allow(a, Direction::Right, b);
        let model = builder.build().unwrap();

        assert!(model.allowed(a, Direction::Right).unwrap().contains(b));
        assert!(!model.allowed(a, Direction::Left).unwrap().contains(b));
        assert!(model.allowed(b, Direction::Left).unwrap().is_empty());
        assert!(model.allowed(TileId::new(5), Direction::Up).is_none());
    }

    // Tests one-sided rules are reported as asymmetries
    // Verified by checking the rule in the same direction instead of the opposite
    #[test]
    fn test_asymmetries() {
        let mut builder = AdjacencyModel::builder();
        let a = builder.add_tile("a", 'a').unwrap();
        let b = builder.add_tile("b", 'b').unwrap();
        builder.allow(a, Direction::Right, b);
        let model = builder.build().unwrap();

        assert_eq!(model.asymmetries(), vec![(a, Direction::Right, b)]);

        let mut mirrored = AdjacencyModel::builder();
        mirrored.add_tile("a", 'a').unwrap();
        mirrored.add_tile("b", 'b').unwrap();
        mirrored.allow_both(a, Direction::Right, b);
        assert!(mirrored.build().unwrap().asymmetries().is_empty());
    }

    // Tests empty alphabets are rejected
    // Verified by removing the empty check in build
    #[test]
    fn test_empty_alphabet() {
        assert!(matches!(
            AdjacencyModel::builder().build(),
            Err(AlgorithmError::EmptyAlphabet)
        ));
    }

    // Tests rules referencing ids outside the alphabet are rejected
    // Verified by silently dropping out-of-range rules in build
    #[test]
    fn test_unknown_tile_in_rule() {
        let mut builder = AdjacencyModel::builder();
        let a = builder.add_tile("a", 'a').unwrap();
        builder.allow(a, Direction::Down, TileId::new(3));

        assert!(matches!(
            builder.build(),
            Err(AlgorithmError::UnknownTile {
                index: 3,
                tile_count: 1
            })
        ));
    }

    // Tests duplicate and empty names are refused
    // Verified by removing the duplicate scan in add_tile
    #[test]
    fn test_tile_names_validated() {
        let mut builder = AdjacencyModel::builder();
        builder.add_tile("a", 'a').unwrap();

        assert!(matches!(
            builder.add_tile("a", 'x'),
            Err(AlgorithmError::DuplicateTileName { .. })
        ));
        assert!(matches!(
            builder.add_tile("", 'x'),
            Err(AlgorithmError::InvalidParameter { .. })
        ));
        assert_eq!(builder.tile_count(), 1);
    }

    // Tests name-based rules resolve names and reject unknown ones
    // Verified by skipping the neighbor lookup
    #[test]
    fn test_allow_named() {
        let mut builder = AdjacencyModel::builder();
        builder.add_tile("sea", '~').unwrap();
        builder.add_tile("land", '#').unwrap();
        builder.allow_named("sea", Direction::Up, "land").unwrap();
        assert!(matches!(
            builder.allow_named("sea", Direction::Up, "sky"),
            Err(AlgorithmError::UnknownTileName { .. })
        ));

        let model = builder.build().unwrap();
        let sea = model.require("sea").unwrap();
        let land = model.tile_id("land").unwrap();
        assert!(model.allowed(sea, Direction::Up).unwrap().contains(land));
        assert_eq!(model.glyph(sea), Some('~'));
        assert!(model.tile_id("sky").is_none());
    }

    // Tests socket matching compares the facing edges
    // Verified by comparing both tiles on the same side
    #[test]
    fn test_connect_sockets() {
        let mut builder = AdjacencyModel::builder();
        let a = builder.add_tile("a", 'a').unwrap();
        let b = builder.add_tile("b", 'b').unwrap();
        // a: right edge "x"; b: left edge "x", right edge "y"
        builder.connect_sockets(&[["-", "x", "-", "-"], ["-", "y", "-", "x"]]);
        let model = builder.build().unwrap();

        let right_of_a = model.allowed(a, Direction::Right).unwrap();
        assert!(right_of_a.contains(b));
        assert!(!right_of_a.contains(a));
        assert!(model.allowed(b, Direction::Left).unwrap().contains(a));
        assert!(model.asymmetries().is_empty());
    }

    // Tests the pipe set is symmetric and connects matching pipes only
    // Verified by flipping one socket of the cross tile
    #[test]
    fn test_pipes_model() {
        let model = AdjacencyModel::pipes();
        assert_eq!(model.tile_count(), 12);
        assert!(model.asymmetries().is_empty());

        let horizontal = model.require("horizontal").unwrap();
        let vertical = model.require("vertical").unwrap();
        let cross = model.require("cross").unwrap();
        let blank = model.require("blank").unwrap();

        let right_of_horizontal = model.allowed(horizontal, Direction::Right).unwrap();
        assert!(right_of_horizontal.contains(cross));
        assert!(!right_of_horizontal.contains(vertical));
        assert!(model.allowed(blank, Direction::Up).unwrap().contains(horizontal));
    }

    // Tests union of allowed sets over several tiles
    // Verified by intersecting instead of unioning
    #[test]
    fn test_allowed_by_any() {
        let model = AdjacencyModel::pipes();
        let vertical = model.require("vertical").unwrap();
        let blank = model.require("blank").unwrap();
        let both = TileSet::from_tiles(model.tile_count(), [vertical, blank]);

        let union = model.allowed_by_any(&both, Direction::Down);
        // Below vertical needs an upward pipe, below blank needs none: every tile fits
        assert_eq!(union.count(), 12);
    }

    // Tests sets render by name
    // Verified by rendering raw ids
    #[test]
    fn test_format_set() {
        let model = AdjacencyModel::pipes();
        let cross = model.require("cross").unwrap();
        let set = model.allowed(cross, Direction::Up).unwrap();

        let text = model.format_set(set);
        assert!(text.starts_with('{') && text.ends_with('}'));
        assert!(text.contains("vertical"));
        assert!(!text.contains("horizontal"));
        assert_eq!(model.name(cross), Some("cross"));
    }
}
