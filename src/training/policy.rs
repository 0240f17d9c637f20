//! Scripted move-selection policies.

use crate::core::{GameRng, Move};
use crate::games::nim::NimEngine;

/// Chooses a move for the player to act.
pub trait Policy {
    /// Pick a move against the engine's current heaps.
    ///
    /// Returns `None` only when no legal move exists.
    fn select_move(&mut self, engine: &NimEngine) -> Option<Move>;
}

/// Uniformly random legal moves.
#[derive(Clone, Debug)]
pub struct RandomPolicy {
    rng: GameRng,
}

impl RandomPolicy {
    pub fn new(rng: GameRng) -> Self {
        Self { rng }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(GameRng::new(seed))
    }
}

impl Policy for RandomPolicy {
    fn select_move(&mut self, engine: &NimEngine) -> Option<Move> {
        let moves = engine.possible_moves();
        self.rng.choose(&moves).copied()
    }
}

/// Plays the Nim-sum strategy.
///
/// From a losing position there is nothing to gain, so it takes a single
/// bean from the first non-empty heap to make the game as long as possible.
#[derive(Clone, Copy, Debug, Default)]
pub struct OptimalPolicy;

impl Policy for OptimalPolicy {
    fn select_move(&mut self, engine: &NimEngine) -> Option<Move> {
        engine.optimal_moves().first().copied().or_else(|| {
            engine
                .state()
                .iter()
                .find(|&(_, size)| size > 0)
                .map(|(heap, _)| Move::new(heap, 1))
        })
    }
}
