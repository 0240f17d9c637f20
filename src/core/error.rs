//! Error types for the Nim engine.
//!
//! Every error is raised at the point the precondition fails, and the
//! operation that raised it leaves the engine untouched.

use thiserror::Error;

use super::state::Heaps;

/// Which move precondition was violated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveViolation {
    /// The heap index does not name a heap.
    HeapOutOfRange,
    /// A move must remove at least one bean.
    ZeroBeans,
    /// The heap holds fewer beans than requested.
    NotEnoughBeans,
}

impl std::fmt::Display for MoveViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveViolation::HeapOutOfRange => write!(f, "heap out of range"),
            MoveViolation::ZeroBeans => write!(f, "must take at least one bean"),
            MoveViolation::NotEnoughBeans => write!(f, "heap is not big enough"),
        }
    }
}

/// Errors raised by the engine and its adapters.
#[derive(Debug, Error)]
pub enum NimError {
    /// A raw move was not a `[heap, beans]` pair of non-negative integers.
    #[error("malformed move {raw:?}: expected [heap, beans] with non-negative values")]
    MalformedMove { raw: Vec<i64> },

    /// A well-formed move that is illegal against the current heaps.
    #[error(
        "invalid move ({violation}): heap {heap}, tried to take {requested} but there are only {available} beans; heaps: {state}"
    )]
    InvalidMove {
        violation: MoveViolation,
        heap: usize,
        requested: u32,
        available: u32,
        state: Heaps,
    },

    /// Action index outside `0..len` of the action-index map.
    #[error("action index {index} outside of range of possible actions 0..{len}")]
    IndexOutOfRange { index: i64, len: usize },

    /// Rejected configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Checkpoint encoding or decoding failed.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),
}

impl NimError {
    /// True for both malformed and illegal moves.
    #[must_use]
    pub fn is_invalid_move(&self) -> bool {
        matches!(self, NimError::MalformedMove { .. } | NimError::InvalidMove { .. })
    }
}

/// Result alias used throughout the crate.
pub type NimResult<T> = Result<T, NimError>;
