//! Tests for loading adjacency models from JSON rules files

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::TempDir;
    use tilewave::AlgorithmError;
    use tilewave::io::rules::{load_rules, parse_rules};
    use tilewave::spatial::tiles::Direction;

    const COAST: &str = r#"{
        "tiles": [
            {"name": "sea", "glyph": "~", "right": ["sea", "coast"], "left": ["sea"]},
            {"name": "coast", "left": ["sea"]}
        ]
    }"#;

    const SOCKETS: &str = r#"{
        "tiles": [
            {"name": "grass", "sockets": ["g", "g", "g", "g"]},
            {"name": "edge", "glyph": "|", "sockets": ["g", "w", "g", "g"]},
            {"name": "water", "sockets": ["w", "w", "w", "w"]}
        ]
    }"#;

    fn origin() -> &'static Path {
        Path::new("rules.json")
    }

    // Tests explicit lists become rules in the listed direction
    // Verified by reading the up list for every direction
    #[test]
    fn test_parse_explicit_lists() {
        let model = parse_rules(COAST, origin()).unwrap();
        let sea = model.require("sea").unwrap();
        let coast = model.require("coast").unwrap();

        assert_eq!(model.tile_count(), 2);
        assert!(model.allowed(sea, Direction::Right).unwrap().contains(coast));
        assert!(model.allowed(coast, Direction::Left).unwrap().contains(sea));
        // Missing sides allow nothing
        assert!(model.allowed(coast, Direction::Up).unwrap().is_empty());
        assert!(model.asymmetries().is_empty());
    }

    // Tests glyphs default to the first character of the name
    // Verified by defaulting to the open glyph instead
    #[test]
    fn test_glyph_defaults() {
        let model = parse_rules(COAST, origin()).unwrap();

        assert_eq!(model.glyph(model.require("sea").unwrap()), Some('~'));
        assert_eq!(model.glyph(model.require("coast").unwrap()), Some('c'));
    }

    // Tests socket files connect tiles with equal facing labels
    // Verified by matching sockets on the same side
    #[test]
    fn test_parse_sockets() {
        let model = parse_rules(SOCKETS, origin()).unwrap();
        let grass = model.require("grass").unwrap();
        let edge = model.require("edge").unwrap();
        let water = model.require("water").unwrap();

        assert!(model.allowed(edge, Direction::Right).unwrap().contains(water));
        assert!(!model.allowed(grass, Direction::Right).unwrap().contains(water));
        assert!(model.allowed(water, Direction::Left).unwrap().contains(edge));
        assert_eq!(model.glyph(edge), Some('|'));
    }

    // Tests a file mixing sockets and lists is refused
    // Verified by ignoring lists when any tile has sockets
    #[test]
    fn test_mixed_styles_rejected() {
        let text = r#"{"tiles": [
            {"name": "a", "sockets": ["x", "x", "x", "x"]},
            {"name": "b", "up": ["a"]}
        ]}"#;

        assert!(matches!(
            parse_rules(text, origin()),
            Err(AlgorithmError::InvalidParameter { parameter: "rules", .. })
        ));
    }

    // Tests lists naming unknown tiles are refused
    // Verified by skipping unresolved neighbor names
    #[test]
    fn test_unknown_neighbor_name() {
        let text = r#"{"tiles": [{"name": "a", "up": ["ghost"]}]}"#;

        assert!(matches!(
            parse_rules(text, origin()),
            Err(AlgorithmError::UnknownTileName { .. })
        ));
    }

    // Tests malformed JSON and unknown fields are parse errors
    // Verified by dropping deny_unknown_fields
    #[test]
    fn test_bad_json() {
        assert!(matches!(
            parse_rules("{\"tiles\": [", origin()),
            Err(AlgorithmError::RulesParse { .. })
        ));
        assert!(matches!(
            parse_rules(r#"{"tiles": [{"name": "a", "colour": "red"}]}"#, origin()),
            Err(AlgorithmError::RulesParse { .. })
        ));
    }

    // Tests empty and duplicate alphabets are refused
    // Verified by building an empty model
    #[test]
    fn test_alphabet_errors() {
        assert!(matches!(
            parse_rules(r#"{"tiles": []}"#, origin()),
            Err(AlgorithmError::EmptyAlphabet)
        ));
        assert!(matches!(
            parse_rules(r#"{"tiles": [{"name": "a"}, {"name": "a"}]}"#, origin()),
            Err(AlgorithmError::DuplicateTileName { .. })
        ));
    }

    // Tests rules load from disk
    // Verified by parsing an empty string instead of the file contents
    #[test]
    fn test_load_rules_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sockets.json");
        std::fs::write(&path, SOCKETS).unwrap();

        let model = load_rules(&path).unwrap();
        assert_eq!(model.tile_count(), 3);
    }

    // Tests a missing file is a file system error naming the path
    // Verified by mapping read errors to parse errors
    #[test]
    fn test_load_rules_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.json");

        let err = load_rules(&path).unwrap_err();

        assert!(matches!(
            &err,
            AlgorithmError::FileSystem { path: reported, operation: "read rules", .. }
                if *reported == path
        ));
    }
}
