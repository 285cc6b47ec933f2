use bitvec::prelude::*;
use std::fmt;

use crate::spatial::tiles::TileId;

/// Fixed-size bitset of tile ids, used for possibility sets and allowed-sets
///
/// Capacity equals the alphabet size; ids at or beyond it are ignored on
/// insert and never reported as members.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileSet {
    bits: BitVec,
}

impl TileSet {
    /// Create a set with no tiles present
    pub fn new(tile_count: usize) -> Self {
        Self {
            bits: bitvec![0; tile_count],
        }
    }

    /// Create a set containing every tile of the alphabet
    pub fn all(tile_count: usize) -> Self {
        Self {
            bits: bitvec![1; tile_count],
        }
    }

    /// Create a set holding exactly one tile
    pub fn singleton(tile_count: usize, tile: TileId) -> Self {
        let mut set = Self::new(tile_count);
        set.insert(tile);
        set
    }

    /// Build a set from any sequence of tiles
    pub fn from_tiles(tile_count: usize, tiles: impl IntoIterator<Item = TileId>) -> Self {
        let mut set = Self::new(tile_count);
        for tile in tiles {
            set.insert(tile);
        }
        set
    }

    /// Size of the alphabet this set ranges over
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Insert a tile
    pub fn insert(&mut self, tile: TileId) {
        if tile.index() < self.bits.len() {
            self.bits.set(tile.index(), true);
        }
    }

    /// Test tile membership
    pub fn contains(&self, tile: TileId) -> bool {
        self.bits.get(tile.index()).as_deref() == Some(&true)
    }

    /// Intersect this set with another in-place
    pub fn intersect_with(&mut self, other: &Self) {
        self.bits &= &other.bits;
    }

    /// Union this set with another in-place
    pub fn union_with(&mut self, other: &Self) {
        self.bits |= &other.bits;
    }

    /// Create a new set containing the intersection
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.intersect_with(other);
        result
    }

    /// Test if no tiles are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count tiles in the set
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Iterate member tiles in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = TileId> + '_ {
        self.bits.iter_ones().map(TileId::from_index)
    }

    /// The `n`th member in ascending id order
    pub fn nth(&self, n: usize) -> Option<TileId> {
        self.bits.iter_ones().nth(n).map(TileId::from_index)
    }

    /// The single member of a one-element set
    pub fn only(&self) -> Option<TileId> {
        if self.count() == 1 { self.nth(0) } else { None }
    }

    /// Extract all member tiles as a vector
    pub fn to_vec(&self) -> Vec<TileId> {
        self.iter().collect()
    }
}

impl fmt::Display for TileSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, tile) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{tile}")?;
        }
        write!(f, "}}")
    }
}
