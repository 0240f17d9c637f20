//! Heap sizes: the whole of a Nim position.
//!
//! `Heaps` is used for both the reset configuration and the current state.
//! It is always handed out by clone, so callers can never alias the
//! engine's internal vectors.

use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Ordered heap sizes, one entry per heap.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Heaps(Vec<u32>);

impl Heaps {
    /// Create heaps from explicit sizes.
    #[must_use]
    pub fn new(sizes: Vec<u32>) -> Self {
        Self(sizes)
    }

    /// Number of heaps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no heaps at all (never the case for a configured engine).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Size of one heap, `None` if out of range.
    #[must_use]
    pub fn get(&self, heap: usize) -> Option<u32> {
        self.0.get(heap).copied()
    }

    /// Total beans left on the board.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.iter().map(|&h| u64::from(h)).sum()
    }

    /// Largest heap, 0 if there are no heaps.
    #[must_use]
    pub fn largest(&self) -> u32 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    /// True once every heap is empty.
    #[must_use]
    pub fn all_empty(&self) -> bool {
        self.0.iter().all(|&h| h == 0)
    }

    /// Bitwise XOR of all heap sizes.
    #[must_use]
    pub fn nim_sum(&self) -> u32 {
        self.0.iter().fold(0, |acc, &h| acc ^ h)
    }

    /// Heap sizes as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Iterate over `(heap_index, size)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.0.iter().copied().enumerate()
    }

    /// Heap sizes widened for array consumers.
    #[must_use]
    pub fn to_i32_vec(&self) -> Vec<i32> {
        self.0.iter().map(|&h| h as i32).collect()
    }

    /// Remove beans from a heap. Callers validate first.
    pub(crate) fn remove(&mut self, heap: usize, beans: u32) {
        self.0[heap] -= beans;
    }
}

impl Index<usize> for Heaps {
    type Output = u32;

    fn index(&self, heap: usize) -> &u32 {
        &self.0[heap]
    }
}

impl From<Vec<u32>> for Heaps {
    fn from(sizes: Vec<u32>) -> Self {
        Self(sizes)
    }
}

impl std::fmt::Display for Heaps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, h) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", h)?;
        }
        write!(f, "]")
    }
}
