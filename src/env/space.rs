//! Action space description.

use std::ops::{Range, RangeInclusive};

use serde::{Deserialize, Serialize};

use crate::core::Move;

/// Two bounded integers (heap index, bean count) plus the size of the flat
/// action-index map.
///
/// The bean bound is the configured max heap size, not the largest current
/// heap, so the space does not shrink during play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpace {
    heap_count: usize,
    max_beans: u32,
    action_count: usize,
}

impl ActionSpace {
    /// Create an action space.
    #[must_use]
    pub const fn new(heap_count: usize, max_beans: u32, action_count: usize) -> Self {
        Self {
            heap_count,
            max_beans,
            action_count,
        }
    }

    /// Valid heap indices.
    #[must_use]
    pub fn heap_range(&self) -> Range<usize> {
        0..self.heap_count
    }

    /// Valid bean counts.
    #[must_use]
    pub fn bean_range(&self) -> RangeInclusive<u32> {
        1..=self.max_beans
    }

    /// Number of heaps.
    #[must_use]
    pub const fn heap_count(&self) -> usize {
        self.heap_count
    }

    /// Largest bean count.
    #[must_use]
    pub const fn max_beans(&self) -> u32 {
        self.max_beans
    }

    /// Size of the flat (discrete) action space.
    #[must_use]
    pub const fn n(&self) -> usize {
        self.action_count
    }

    /// Inclusive lower corner `[heap, beans]`.
    #[must_use]
    pub fn low(&self) -> [i64; 2] {
        [0, 1]
    }

    /// Inclusive upper corner `[heap, beans]`.
    #[must_use]
    pub fn high(&self) -> [i64; 2] {
        [self.heap_count as i64 - 1, i64::from(self.max_beans)]
    }

    /// True if the move lies inside the box. Says nothing about legality.
    #[must_use]
    pub fn contains(&self, mv: Move) -> bool {
        self.heap_range().contains(&mv.heap) && self.bean_range().contains(&mv.beans)
    }
}
