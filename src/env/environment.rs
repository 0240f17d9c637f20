//! Framework adapter around `NimEngine`.
//!
//! `NimEnv` is what an RL framework talks to: reset/step/render, an action
//! space, and an identifying name. It owns the RNG used for random heap
//! draws so reconfiguration stays reproducible from a seed.

use tracing::debug;

use crate::core::{GameRng, Heaps, Move, NimConfig, NimError, NimResult};
use crate::games::nim::{NimEngine, StepResult};

use super::space::ActionSpace;

/// Identifier under which the environment registers.
pub const ENV_ID: &str = "Nim-v0";

/// Registration metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvMetadata {
    /// Name/version string, e.g. `Nim-v0`.
    pub id: &'static str,
    /// Supported render modes.
    pub render_modes: &'static [&'static str],
}

impl Default for EnvMetadata {
    fn default() -> Self {
        Self {
            id: ENV_ID,
            render_modes: &["human"],
        }
    }
}

/// Environment contract consumed by training loops.
pub trait Environment {
    /// What `step` accepts.
    type Action;

    /// Registration metadata.
    fn metadata(&self) -> &EnvMetadata;

    /// Start a new episode and return the first observation.
    fn reset(&mut self) -> Heaps;

    /// Advance one move.
    fn step(&mut self, action: Self::Action) -> NimResult<StepResult>;

    /// Action space description.
    fn action_space(&self) -> ActionSpace;

    /// Text rendering of the current state.
    fn render(&self) -> String;
}

/// What to do with an invalid move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InvalidActionPolicy {
    /// Return the error.
    #[default]
    Error,
    /// Keep the state, return `rewards.invalid_move`.
    Penalize,
}

/// Nim environment.
#[derive(Clone, Debug)]
pub struct NimEnv {
    engine: NimEngine,
    rng: GameRng,
    metadata: EnvMetadata,
    invalid_action_policy: InvalidActionPolicy,
}

impl NimEnv {
    /// Create an environment from a config and seed.
    pub fn new(config: NimConfig, seed: u64) -> NimResult<Self> {
        Self::with_rng(config, GameRng::new(seed))
    }

    /// Create an environment drawing heaps from an existing RNG.
    pub fn with_rng(config: NimConfig, mut rng: GameRng) -> NimResult<Self> {
        let engine = NimEngine::new(config, &mut rng)?;
        Ok(Self {
            engine,
            rng,
            metadata: EnvMetadata::default(),
            invalid_action_policy: InvalidActionPolicy::default(),
        })
    }

    /// Default configuration with the given seed.
    pub fn with_seed(seed: u64) -> NimResult<Self> {
        Self::new(NimConfig::default(), seed)
    }

    /// Set the invalid-action policy.
    #[must_use]
    pub fn with_invalid_action_policy(mut self, policy: InvalidActionPolicy) -> Self {
        self.invalid_action_policy = policy;
        self
    }

    /// Underlying engine.
    #[must_use]
    pub fn engine(&self) -> &NimEngine {
        &self.engine
    }

    /// Mutable access to the engine, for callers driving it directly.
    pub fn engine_mut(&mut self) -> &mut NimEngine {
        &mut self.engine
    }

    /// Replace the RNG used for future random configurations.
    pub fn seed(&mut self, seed: u64) {
        self.rng = GameRng::new(seed);
    }

    /// Apply a new configuration and return the fresh state.
    pub fn reconfigure(&mut self, config: NimConfig) -> NimResult<Heaps> {
        self.engine.configure(config, &mut self.rng).cloned()
    }

    /// Step with a raw `[heap, beans]` pair.
    pub fn step_raw(&mut self, raw: &[i64]) -> NimResult<StepResult> {
        match Move::from_raw(raw) {
            Ok(mv) => self.step(mv),
            Err(err) => self.handle_invalid(err),
        }
    }

    /// Step with a flat action index.
    pub fn step_index(&mut self, index: i64) -> NimResult<StepResult> {
        let mv = self.lookup_index(index)?;
        self.step(mv)
    }

    /// Resolve a possibly negative action index.
    pub fn lookup_index(&self, index: i64) -> NimResult<Move> {
        let len = self.engine.action_size();
        usize::try_from(index)
            .map_err(|_| NimError::IndexOutOfRange { index, len })
            .and_then(|i| self.engine.lookup_action(i))
    }

    /// Legality of every action index against the current state.
    #[must_use]
    pub fn action_mask(&self) -> Vec<bool> {
        let mut mask = vec![false; self.engine.action_size()];
        for i in self.engine.possible_move_indices() {
            mask[i] = true;
        }
        mask
    }

    fn handle_invalid(&self, err: NimError) -> NimResult<StepResult> {
        match self.invalid_action_policy {
            InvalidActionPolicy::Penalize if err.is_invalid_move() => {
                debug!(error = %err, "penalizing invalid move");
                Ok(StepResult {
                    state: self.engine.state().clone(),
                    reward: self.engine.config().rewards.invalid_move,
                    done: self.engine.is_terminal(),
                    info: Default::default(),
                })
            }
            _ => Err(err),
        }
    }
}

impl Environment for NimEnv {
    type Action = Move;

    fn metadata(&self) -> &EnvMetadata {
        &self.metadata
    }

    fn reset(&mut self) -> Heaps {
        self.engine.reset()
    }

    fn step(&mut self, action: Move) -> NimResult<StepResult> {
        match self.engine.step(action) {
            Ok(result) => Ok(result),
            Err(err) => self.handle_invalid(err),
        }
    }

    fn action_space(&self) -> ActionSpace {
        self.engine.action_space()
    }

    fn render(&self) -> String {
        self.engine.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(heaps: Vec<u32>) -> NimEnv {
        NimEnv::new(NimConfig::new().with_starting_heaps(heaps), 0).unwrap()
    }

    #[test]
    fn test_metadata() {
        let env = NimEnv::with_seed(1).unwrap();
        assert_eq!(env.metadata().id, "Nim-v0");
        assert_eq!(env.metadata().render_modes, &["human"]);
    }

    #[test]
    fn test_step_index_negative() {
        let mut env = env(vec![2]);
        let err = env.step_index(-1).unwrap_err();
        assert!(matches!(err, NimError::IndexOutOfRange { index: -1, len: 2 }));
    }

    #[test]
    fn test_step_raw_malformed() {
        let mut env = env(vec![2]);
        assert!(matches!(
            env.step_raw(&[0, 1, 2]),
            Err(NimError::MalformedMove { .. })
        ));
        assert_eq!(env.engine().state().as_slice(), &[2]);
    }

    #[test]
    fn test_penalize_policy() {
        let mut env = env(vec![2, 1]).with_invalid_action_policy(InvalidActionPolicy::Penalize);

        let result = env.step(Move::new(1, 2)).unwrap();
        assert_eq!(result.reward, -10.0);
        assert!(!result.done);
        assert_eq!(result.state.as_slice(), &[2, 1]);

        let result = env.step_raw(&[-1, 1]).unwrap();
        assert_eq!(result.reward, -10.0);

        // Index errors are never penalized
        assert!(env.step_index(99).is_err());
    }

    #[test]
    fn test_action_mask() {
        let mut env = env(vec![2, 1]);
        env.step(Move::new(0, 2)).unwrap();
        assert_eq!(env.action_mask(), vec![false, false, true]);
    }

    #[test]
    fn test_reseed_reproduces_heaps() {
        let mut env = NimEnv::with_seed(5).unwrap();
        env.seed(99);
        let a = env.reconfigure(NimConfig::default()).unwrap();
        env.seed(99);
        let b = env.reconfigure(NimConfig::default()).unwrap();
        assert_eq!(a, b);
    }
}
