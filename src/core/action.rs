//! Moves and the flat action-index map.
//!
//! A `Move` removes `beans` from heap `heap`. Learners usually act through a
//! flat integer instead, so `ActionIndexMap` enumerates every move that is
//! legal against the reset heaps:
//!
//! ```text
//! reset heaps [2, 1]  ->  0: (0, 1)  1: (0, 2)  2: (1, 1)
//! ```
//!
//! The map is rebuilt only when the configuration changes. Indices are
//! stable for a whole playthrough, even as some entries become illegal.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::error::{NimError, NimResult};
use super::state::Heaps;

/// Take `beans` from heap `heap`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move {
    pub heap: usize,
    pub beans: u32,
}

impl Move {
    /// Create a move.
    #[must_use]
    pub const fn new(heap: usize, beans: u32) -> Self {
        Self { heap, beans }
    }

    /// Parse a raw `[heap, beans]` pair.
    ///
    /// Anything other than exactly two non-negative integers is malformed.
    /// Legality against a state is checked separately by the engine.
    pub fn from_raw(raw: &[i64]) -> NimResult<Self> {
        let malformed = || NimError::MalformedMove { raw: raw.to_vec() };
        match raw {
            &[heap, beans] => {
                let heap = usize::try_from(heap).map_err(|_| malformed())?;
                let beans = u32::try_from(beans).map_err(|_| malformed())?;
                Ok(Self { heap, beans })
            }
            _ => Err(malformed()),
        }
    }

    /// The move as a `[heap, beans]` pair.
    #[must_use]
    pub fn to_pair(self) -> [usize; 2] {
        [self.heap, self.beans as usize]
    }
}

impl From<(usize, u32)> for Move {
    fn from((heap, beans): (usize, u32)) -> Self {
        Self { heap, beans }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.heap, self.beans)
    }
}

/// Every move legal against the reset heaps, in canonical order.
///
/// Order: heap index ascending, then bean count ascending from 1 to the
/// heap's reset size. Entries are unique by construction.
#[derive(Clone, Debug, Default)]
pub struct ActionIndexMap {
    moves: Vec<Move>,
    index: FxHashMap<Move, usize>,
}

impl ActionIndexMap {
    /// Enumerate the moves for the given reset heaps.
    #[must_use]
    pub fn build(reset: &Heaps) -> Self {
        let moves: Vec<Move> = reset
            .iter()
            .flat_map(|(heap, size)| (1..=size).map(move |beans| Move::new(heap, beans)))
            .collect();

        let index: FxHashMap<Move, usize> =
            moves.iter().enumerate().map(|(i, &mv)| (mv, i)).collect();
        debug_assert_eq!(index.len(), moves.len(), "action map has duplicate entries");

        Self { moves, index }
    }

    /// Number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// True if the reset heaps were all empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Map a flat index to its move. Bounds are strict: `index < len`.
    pub fn lookup(&self, index: usize) -> NimResult<Move> {
        self.moves
            .get(index)
            .copied()
            .ok_or(NimError::IndexOutOfRange {
                index: i64::try_from(index).unwrap_or(i64::MAX),
                len: self.moves.len(),
            })
    }

    /// Index of a move, `None` if the reset heaps never allowed it.
    #[must_use]
    pub fn index_of(&self, mv: Move) -> Option<usize> {
        self.index.get(&mv).copied()
    }

    /// All moves in index order.
    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Iterate over `(index, move)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Move)> + '_ {
        self.moves.iter().copied().enumerate()
    }
}
