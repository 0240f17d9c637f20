//! # rust-nim
//!
//! A Nim game environment for RL training.
//!
//! ## Design Principles
//!
//! 1. **One Owner**: `NimEngine` owns configuration, reset heaps, current
//!    heaps and the action-index map. Nothing else mutates them.
//!
//! 2. **Atomic Configuration**: `NimEngine::configure` validates first and
//!    then replaces heaps and action map together. No setter ordering.
//!
//! 3. **Explicit Randomness**: random heaps are drawn from a `GameRng`
//!    passed in by the caller, so a seed reproduces a game exactly.
//!
//! ## Modules
//!
//! - `core`: Heaps, moves, action-index map, configuration, errors, RNG
//! - `games`: The Nim engine and Nim-sum strategy
//! - `env`: Reset/step/render adapter and action space description
//! - `training`: Scripted policies and two-player episodes
//! - `python`: PyO3 bindings (feature `python`)

pub mod core;
pub mod env;
pub mod games;
pub mod training;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    ActionIndexMap, GameRng, GameRngState, Heaps, Move, MoveViolation, NimConfig, NimError,
    NimResult, RewardScheme,
};

pub use crate::games::nim::{EngineSnapshot, Info, NimEngine, StepResult};

pub use crate::env::{ActionSpace, EnvMetadata, Environment, InvalidActionPolicy, NimEnv, ENV_ID};

pub use crate::training::{
    play_episode, Episode, EpisodeStep, OptimalPolicy, Policy, RandomPolicy, RolloutConfig,
};
