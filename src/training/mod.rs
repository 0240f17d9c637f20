//! Scripted callers of the engine, for generating training episodes.
//!
//! - **Policy**: picks a move from the engine's current heaps
//! - **Episode**: a recorded two-player game with its winner
//!
//! ## Usage
//!
//! ```
//! use rust_nim::games::nim::NimEngine;
//! use rust_nim::training::{play_episode, OptimalPolicy, RandomPolicy, RolloutConfig};
//!
//! let mut engine = NimEngine::with_heaps(vec![3, 4, 5]).unwrap();
//! let mut learner = RandomPolicy::with_seed(7);
//! let mut expert = OptimalPolicy;
//!
//! let episode = play_episode(&mut engine, [&mut expert, &mut learner], &RolloutConfig::default()).unwrap();
//! assert_eq!(episode.winner, Some(0));
//! ```

pub mod episode;
pub mod policy;

pub use episode::{play_episode, Episode, EpisodeStep, RolloutConfig};
pub use policy::{OptimalPolicy, Policy, RandomPolicy};
