//! JSON rules files describing a tile alphabet and its adjacency
//!
//! Two styles are accepted, one per file:
//!
//! ```json
//! {"tiles": [{"name": "sea", "glyph": "~", "up": ["sea"], "right": ["sea", "coast"]}]}
//! {"tiles": [{"name": "sea", "sockets": ["w", "w", "w", "w"]}]}
//! ```
//!
//! Explicit lists name the tiles allowed on each side; missing sides allow
//! nothing. Sockets label the four edges `[up, right, down, left]` and two
//! tiles may touch where the facing labels are equal.

use std::path::Path;

use serde::Deserialize;

use crate::io::error::{AlgorithmError, Result, invalid_parameter};
use crate::spatial::tiles::{AdjacencyModel, Direction};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RulesFile {
    tiles: Vec<TileEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TileEntry {
    name: String,
    #[serde(default)]
    glyph: Option<char>,
    #[serde(default)]
    sockets: Option<[String; 4]>,
    #[serde(default)]
    up: Option<Vec<String>>,
    #[serde(default)]
    right: Option<Vec<String>>,
    #[serde(default)]
    down: Option<Vec<String>>,
    #[serde(default)]
    left: Option<Vec<String>>,
}

impl TileEntry {
    // First character of the name stands in for a missing glyph
    fn display_glyph(&self) -> char {
        self.glyph
            .or_else(|| self.name.chars().next())
            .unwrap_or('?')
    }

    const fn has_lists(&self) -> bool {
        self.up.is_some() || self.right.is_some() || self.down.is_some() || self.left.is_some()
    }

    fn side(&self, direction: Direction) -> &[String] {
        let side = match direction {
            Direction::Up => &self.up,
            Direction::Right => &self.right,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
        };
        side.as_deref().unwrap_or_default()
    }
}

/// Load an adjacency model from a JSON rules file
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The JSON is malformed or has unknown fields
/// - The file mixes socket and list styles
/// - A rule names an unknown tile, or tile names repeat
pub fn load_rules(path: &Path) -> Result<AdjacencyModel> {
    let text = std::fs::read_to_string(path).map_err(|e| AlgorithmError::FileSystem {
        path: path.to_path_buf(),
        operation: "read rules",
        source: e,
    })?;
    let model = parse_rules(&text, path)?;
    log::debug!(
        "Loaded {} tiles from {}",
        model.tile_count(),
        path.display()
    );
    Ok(model)
}

/// Build an adjacency model from rules text
///
/// `origin` only labels parse errors.
///
/// # Errors
///
/// Returns the same errors as [`load_rules`] apart from reading the file
pub fn parse_rules(text: &str, origin: &Path) -> Result<AdjacencyModel> {
    let file: RulesFile =
        serde_json::from_str(text).map_err(|e| AlgorithmError::RulesParse {
            path: origin.to_path_buf(),
            source: e,
        })?;

    let socket_style = file.tiles.iter().any(|tile| tile.sockets.is_some());
    let mixed = file
        .tiles
        .iter()
        .find(|tile| tile.sockets.is_none() || tile.has_lists());
    if let Some(mixed) = mixed.filter(|_| socket_style) {
        return Err(invalid_parameter(
            "rules",
            &mixed.name,
            &"socket and list styles cannot be mixed in one file",
        ));
    }

    let mut builder = AdjacencyModel::builder();
    for tile in &file.tiles {
        builder.add_tile(&tile.name, tile.display_glyph())?;
    }

    if socket_style {
        let sockets: Vec<[String; 4]> = file
            .tiles
            .iter()
            .filter_map(|tile| tile.sockets.clone())
            .collect();
        builder.connect_sockets(&sockets);
    } else {
        for tile in &file.tiles {
            for direction in Direction::ALL {
                for neighbor in tile.side(direction) {
                    builder.allow_named(&tile.name, direction, neighbor)?;
                }
            }
        }
    }

    builder.build()
}
