//! Tile identifiers, directions and the adjacency model
//!
//! The model is a static lookup from each tile and direction to the tiles
//! permitted on that side. It is built once, validated, and then only read.

use std::fmt;

use crate::algorithm::bitset::TileSet;
use crate::io::configuration::MAX_TILES;
use crate::io::error::{AlgorithmError, Result};

/// Opaque identifier of a tile within one alphabet
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(u16);

impl TileId {
    /// Wrap a raw alphabet index
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index as u16)
    }

    /// Position of this tile in its alphabet
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the four grid directions, in the fixed order up, right, down, left
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards row - 1
    Up,
    /// Towards col + 1
    Right,
    /// Towards row + 1
    Down,
    /// Towards col - 1
    Left,
}

impl Direction {
    /// All directions in index order
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Index used for per-direction arrays
    pub const fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        }
    }

    /// The direction pointing back
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }

    /// Row and column step of one move in this direction
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Right => (0, 1),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "up",
            Self::Right => "right",
            Self::Down => "down",
            Self::Left => "left",
        };
        f.write_str(name)
    }
}

/// Validated adjacency rules over a tile alphabet
///
/// `allowed(a, d)` is the set of tiles that may sit in direction `d` of
/// tile `a`. The rules are taken as given; asymmetric rules are reported by
/// [`AdjacencyModel::asymmetries`] but never repaired.
#[derive(Clone, Debug)]
pub struct AdjacencyModel {
    names: Vec<String>,
    glyphs: Vec<char>,
    allowed: Vec<[TileSet; 4]>,
}

impl AdjacencyModel {
    /// Start an empty model
    pub fn builder() -> ModelBuilder {
        ModelBuilder::default()
    }

    /// Number of tiles in the alphabet
    pub const fn tile_count(&self) -> usize {
        self.names.len()
    }

    /// Every tile of the alphabet
    pub fn alphabet(&self) -> TileSet {
        TileSet::all(self.tile_count())
    }

    /// Iterate tile ids in alphabet order
    pub fn tiles(&self) -> impl Iterator<Item = TileId> {
        (0..self.tile_count()).map(TileId::from_index)
    }

    /// Tiles permitted in `direction` of `tile`, `None` for ids outside the alphabet
    pub fn allowed(&self, tile: TileId, direction: Direction) -> Option<&TileSet> {
        self.allowed
            .get(tile.index())
            .and_then(|sets| sets.get(direction.index()))
    }

    /// Union of the allowed-sets of every tile in `tiles` for one direction
    pub fn allowed_by_any(&self, tiles: &TileSet, direction: Direction) -> TileSet {
        let mut union = TileSet::new(self.tile_count());
        for tile in tiles.iter() {
            if let Some(set) = self.allowed(tile, direction) {
                union.union_with(set);
            }
        }
        union
    }

    /// Name of a tile
    pub fn name(&self, tile: TileId) -> Option<&str> {
        self.names.get(tile.index()).map(String::as_str)
    }

    /// Display glyph of a tile
    pub fn glyph(&self, tile: TileId) -> Option<char> {
        self.glyphs.get(tile.index()).copied()
    }

    /// Resolve a tile by name
    pub fn tile_id(&self, name: &str) -> Option<TileId> {
        self.names
            .iter()
            .position(|candidate| candidate == name)
            .map(TileId::from_index)
    }

    /// Resolve a tile by name or fail with [`AlgorithmError::UnknownTileName`]
    ///
    /// # Errors
    ///
    /// Returns an error if no tile carries the name
    pub fn require(&self, name: &str) -> Result<TileId> {
        self.tile_id(name)
            .ok_or_else(|| AlgorithmError::UnknownTileName {
                name: name.to_string(),
            })
    }

    /// Render a set of tiles by name, e.g. `{a, b}`
    pub fn format_set(&self, set: &TileSet) -> String {
        let names: Vec<&str> = set
            .iter()
            .map(|tile| self.name(tile).unwrap_or("?"))
            .collect();
        format!("{{{}}}", names.join(", "))
    }

    /// Rules that are not mirrored on the other side
    ///
    /// Each entry `(a, d, b)` says `b` may sit in direction `d` of `a` while
    /// `a` may not sit in the opposite direction of `b`.
    pub fn asymmetries(&self) -> Vec<(TileId, Direction, TileId)> {
        let mut found = Vec::new();
        for a in self.tiles() {
            for direction in Direction::ALL {
                let Some(set) = self.allowed(a, direction) else {
                    continue;
                };
                for b in set.iter() {
                    let mirrored = self
                        .allowed(b, direction.opposite())
                        .is_some_and(|back| back.contains(a));
                    if !mirrored {
                        found.push((a, direction, b));
                    }
                }
            }
        }
        found
    }

    /// The twelve pipe tiles: blank, straights, corners, tees and a cross
    ///
    /// Two tiles may touch iff both or neither of the facing edges carry a pipe.
    pub fn pipes() -> Self {
        // Pipe presence per edge: up, right, down, left
        const PIPES: [(&str, char, [bool; 4]); 12] = [
            ("blank", ' ', [false, false, false, false]),
            ("vertical", '│', [true, false, true, false]),
            ("horizontal", '─', [false, true, false, true]),
            ("down-right", '┌', [false, true, true, false]),
            ("down-left", '┐', [false, false, true, true]),
            ("up-left", '┘', [true, false, false, true]),
            ("up-right", '└', [true, true, false, false]),
            ("tee-right", '├', [true, true, true, false]),
            ("tee-left", '┤', [true, false, true, true]),
            ("tee-up", '┴', [true, true, false, true]),
            ("tee-down", '┬', [false, true, true, true]),
            ("cross", '┼', [true, true, true, true]),
        ];

        let mut builder = Self::builder();
        for (name, glyph, _) in PIPES {
            builder.push_tile(name, glyph);
        }
        builder.connect_sockets(&PIPES.map(|(_, _, sockets)| sockets));
        builder.assemble()
    }
}

/// Incremental constructor for [`AdjacencyModel`]
///
/// Rules may reference any id; validation happens once in [`ModelBuilder::build`].
#[derive(Debug, Default)]
pub struct ModelBuilder {
    names: Vec<String>,
    glyphs: Vec<char>,
    rules: Vec<(TileId, Direction, TileId)>,
}

impl ModelBuilder {
    /// Add a tile to the alphabet and return its id
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or already used, or the alphabet is full
    pub fn add_tile(&mut self, name: &str, glyph: char) -> Result<TileId> {
        if name.is_empty() {
            return Err(crate::io::error::invalid_parameter(
                "tile name",
                &name,
                &"must not be empty",
            ));
        }
        if self.names.iter().any(|existing| existing == name) {
            return Err(AlgorithmError::DuplicateTileName {
                name: name.to_string(),
            });
        }
        if self.names.len() >= MAX_TILES {
            return Err(crate::io::error::invalid_parameter(
                "tile count",
                &self.names.len(),
                &format!("at most {MAX_TILES} tiles are supported"),
            ));
        }
        Ok(self.push_tile(name, glyph))
    }

    fn push_tile(&mut self, name: &str, glyph: char) -> TileId {
        let id = TileId::from_index(self.names.len());
        self.names.push(name.to_string());
        self.glyphs.push(glyph);
        id
    }

    /// Number of tiles added so far
    pub const fn tile_count(&self) -> usize {
        self.names.len()
    }

    /// Permit `neighbor` to sit in `direction` of `tile`
    pub fn allow(&mut self, tile: TileId, direction: Direction, neighbor: TileId) -> &mut Self {
        self.rules.push((tile, direction, neighbor));
        self
    }

    /// Permit the pair from both sides
    pub fn allow_both(
        &mut self,
        tile: TileId,
        direction: Direction,
        neighbor: TileId,
    ) -> &mut Self {
        self.allow(tile, direction, neighbor);
        self.allow(neighbor, direction.opposite(), tile)
    }

    /// Name-based variant of [`ModelBuilder::allow`]
    ///
    /// # Errors
    ///
    /// Returns an error if either name is not in the alphabet
    pub fn allow_named(&mut self, tile: &str, direction: Direction, neighbor: &str) -> Result<()> {
        let tile = self.lookup(tile)?;
        let neighbor = self.lookup(neighbor)?;
        self.allow(tile, direction, neighbor);
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<TileId> {
        self.names
            .iter()
            .position(|candidate| candidate == name)
            .map(TileId::from_index)
            .ok_or_else(|| AlgorithmError::UnknownTileName {
                name: name.to_string(),
            })
    }

    /// Derive rules from edge labels, one `[up, right, down, left]` per tile
    ///
    /// `b` may sit in direction `d` of `a` iff the label of `a` on side `d`
    /// equals the label of `b` on the opposite side. Labels are matched to
    /// tiles by position; extra labels are ignored.
    pub fn connect_sockets<S: PartialEq>(&mut self, sockets: &[[S; 4]]) -> &mut Self {
        let count = sockets.len().min(self.names.len());
        let mut rules = Vec::new();
        for (a, a_sockets) in sockets.iter().take(count).enumerate() {
            for direction in Direction::ALL {
                let Some(edge) = a_sockets.get(direction.index()) else {
                    continue;
                };
                for (b, b_sockets) in sockets.iter().take(count).enumerate() {
                    if b_sockets.get(direction.opposite().index()) == Some(edge) {
                        rules.push((TileId::from_index(a), direction, TileId::from_index(b)));
                    }
                }
            }
        }
        self.rules.extend(rules);
        self
    }

    /// Validate and freeze the model
    ///
    /// # Errors
    ///
    /// Returns an error if the alphabet is empty or a rule references an
    /// id outside the alphabet
    pub fn build(self) -> Result<AdjacencyModel> {
        let tile_count = self.names.len();
        if tile_count == 0 {
            return Err(AlgorithmError::EmptyAlphabet);
        }

        for &(tile, _, neighbor) in &self.rules {
            for id in [tile, neighbor] {
                if id.index() >= tile_count {
                    return Err(AlgorithmError::UnknownTile {
                        index: id.index(),
                        tile_count,
                    });
                }
            }
        }

        Ok(self.assemble())
    }

    // Rules outside the alphabet are dropped; `build` rejects them first
    fn assemble(self) -> AdjacencyModel {
        let tile_count = self.names.len();
        let mut allowed: Vec<[TileSet; 4]> = (0..tile_count)
            .map(|_| std::array::from_fn(|_| TileSet::new(tile_count)))
            .collect();

        for (tile, direction, neighbor) in self.rules {
            if let Some(set) = allowed
                .get_mut(tile.index())
                .and_then(|sets| sets.get_mut(direction.index()))
            {
                set.insert(neighbor);
            }
        }

        AdjacencyModel {
            names: self.names,
            glyphs: self.glyphs,
            allowed,
        }
    }
}
