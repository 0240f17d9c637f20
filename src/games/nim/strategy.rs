//! Nim-sum strategy.
//!
//! A position is lost for the player to move exactly when the XOR of all
//! heap sizes is zero. From any other position, reducing a heap `s` to
//! `s ^ nim_sum` (possible whenever that is smaller than `s`) restores a
//! zero Nim-sum.

use crate::core::{Heaps, Move};

/// Every move that leaves a zero Nim-sum, in heap order.
///
/// Empty when the Nim-sum is already zero: every move loses against
/// optimal play, so none is preferred.
#[must_use]
pub fn optimal_moves(heaps: &Heaps) -> Vec<Move> {
    let nim_sum = heaps.nim_sum();
    if nim_sum == 0 {
        return Vec::new();
    }

    heaps
        .iter()
        .filter_map(|(heap, size)| {
            let target = size ^ nim_sum;
            (target < size).then(|| Move::new(heap, size - target))
        })
        .collect()
}

/// All legal moves against `heaps`, heap order then bean count ascending.
#[must_use]
pub fn possible_moves(heaps: &Heaps) -> Vec<Move> {
    heaps
        .iter()
        .flat_map(|(heap, size)| (1..=size).map(move |beans| Move::new(heap, beans)))
        .collect()
}
