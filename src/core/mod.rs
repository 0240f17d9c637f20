//! Core engine types: heaps, moves, configuration, errors, RNG.
//!
//! These are independent of any environment framework. The engine in
//! `games::nim` and the adapters in `env` and `python` are built on them.

pub mod action;
pub mod config;
pub mod error;
pub mod rng;
pub mod state;

pub use action::{ActionIndexMap, Move};
pub use config::{parse_raw_heaps, NimConfig, RewardScheme, DEFAULT_HEAP_COUNT, DEFAULT_MAX_HEAP_SIZE};
pub use error::{MoveViolation, NimError, NimResult};
pub use rng::{GameRng, GameRngState};
pub use state::Heaps;
