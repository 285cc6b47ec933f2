//! Tests for pin parsing and applying pins to a solver

#[cfg(test)]
mod tests {
    use tilewave::AlgorithmError;
    use tilewave::algorithm::executor::{SolverConfig, WaveSolver};
    use tilewave::io::prefill::{Pin, apply_pins, parse_pin};
    use tilewave::spatial::grid::Position;
    use tilewave::spatial::tiles::AdjacencyModel;

    fn solver() -> WaveSolver {
        WaveSolver::from_model(3, 3, AdjacencyModel::pipes(), SolverConfig::default()).unwrap()
    }

    // Tests a well-formed pin parses with surrounding whitespace
    // Verified by swapping row and column during parsing
    #[test]
    fn test_parse_pin() {
        let pin: Pin = "1, 2 = cross".parse().unwrap();

        assert_eq!(pin.position, Position::new(1, 2));
        assert_eq!(pin.tile_name, "cross");
        assert_eq!(pin.to_string(), "1,2=cross");
    }

    // Tests malformed pins are rejected
    // Verified by defaulting missing coordinates to zero
    #[test]
    fn test_parse_pin_malformed() {
        for text in ["", "1,2", "1=cross", "a,2=cross", "1,2=", "-1,2=cross"] {
            assert!(
                matches!(
                    text.parse::<Pin>(),
                    Err(AlgorithmError::InvalidParameter { parameter: "pin", .. })
                ),
                "{text:?}"
            );
        }
    }

    // Tests the clap hook returns the error message
    // Verified by returning an empty message
    #[test]
    fn test_parse_pin_hook() {
        assert!(parse_pin("0,0=blank").is_ok());
        let message = parse_pin("nonsense").unwrap_err();
        assert!(message.contains("ROW,COL=NAME"));
    }

    // Tests pins collapse their cells and stay permanent
    // Verified by skipping the collapse in apply_pins
    #[test]
    fn test_apply_pins() {
        let mut solver = solver();
        let pins = vec![
            "0,0=blank".parse::<Pin>().unwrap(),
            "2,2=blank".parse::<Pin>().unwrap(),
        ];

        apply_pins(&mut solver, &pins).unwrap();

        let blank = solver.grid().model().require("blank").unwrap();
        assert_eq!(
            solver.grid().cell(Position::new(0, 0)).unwrap().tile(),
            Some(blank)
        );
        assert_eq!(solver.grid().collapsed_count(), 2);
        assert_eq!(solver.grid().cell(Position::new(2, 2)).unwrap().history_depth(), 0);
    }

    // Tests an unknown tile name stops at that pin
    // Verified by skipping unknown names silently
    #[test]
    fn test_apply_pins_unknown_name() {
        let mut solver = solver();
        let pins = vec![
            "0,0=blank".parse::<Pin>().unwrap(),
            "1,1=dragon".parse::<Pin>().unwrap(),
        ];

        let result = apply_pins(&mut solver, &pins);

        assert!(matches!(result, Err(AlgorithmError::UnknownTileName { .. })));
        assert_eq!(solver.grid().collapsed_count(), 1);
    }

    // Tests pins outside the grid are refused
    // Verified by clamping positions into the grid
    #[test]
    fn test_apply_pins_out_of_bounds() {
        let mut solver = solver();
        let pins = vec!["5,0=blank".parse::<Pin>().unwrap()];

        assert!(matches!(
            apply_pins(&mut solver, &pins),
            Err(AlgorithmError::OutOfBounds { .. })
        ));
    }
}
