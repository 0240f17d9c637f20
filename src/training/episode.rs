//! Two-player episodes driven by scripted policies.
//!
//! An episode records every move from a reset position until the heaps are
//! empty (or a move limit is hit), which is enough to build value targets:
//! the player who made the last move wins.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Heaps, Move, NimResult, RewardScheme};
use crate::games::nim::NimEngine;

use super::policy::Policy;

/// Rollout settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RolloutConfig {
    /// Maximum moves before the episode is cut off.
    pub max_moves: usize,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self { max_moves: 10_000 }
    }
}

impl RolloutConfig {
    /// Set maximum moves per episode.
    pub fn with_max_moves(mut self, max: usize) -> Self {
        self.max_moves = max;
        self
    }
}

/// One move of an episode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStep {
    /// Player who moved (0 or 1).
    pub player: usize,
    /// Heaps before the move.
    pub heaps_before: Heaps,
    /// The move made.
    pub mv: Move,
    /// Its action index, if the reset heaps allow it (always, for legal moves).
    pub action_index: Option<usize>,
    /// Reward returned by the engine.
    pub reward: f32,
}

/// A played episode.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Episode {
    pub steps: Vec<EpisodeStep>,
    /// Player who emptied the last heap. `None` if truncated or the start was empty.
    pub winner: Option<usize>,
    /// True if `max_moves` ran out first.
    pub truncated: bool,
}

impl Episode {
    /// Number of moves played.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True if no move was played.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps taken by one player.
    pub fn player_steps(&self, player: usize) -> impl Iterator<Item = &EpisodeStep> {
        self.steps.iter().filter(move |s| s.player == player)
    }

    /// Final return per player.
    ///
    /// Winner gets `win`, the other `loss`; without a winner both get
    /// `transition`.
    pub fn returns(&self, rewards: &RewardScheme) -> [f32; 2] {
        match self.winner {
            Some(0) => [rewards.win, rewards.loss],
            Some(_) => [rewards.loss, rewards.win],
            None => [rewards.transition, rewards.transition],
        }
    }
}

/// Reset the engine and play one episode, player 0 moving first.
///
/// Fails if a policy proposes an illegal move.
pub fn play_episode(
    engine: &mut NimEngine,
    mut policies: [&mut dyn Policy; 2],
    config: &RolloutConfig,
) -> NimResult<Episode> {
    engine.reset();
    let mut episode = Episode::default();

    for move_number in 0..config.max_moves {
        if engine.is_terminal() {
            break;
        }

        let player = move_number % 2;
        let Some(mv) = policies[player].select_move(engine) else {
            break;
        };

        let heaps_before = engine.state().clone();
        let result = engine.step(mv)?;
        episode.steps.push(EpisodeStep {
            player,
            heaps_before,
            mv,
            action_index: engine.action_index_of(mv),
            reward: result.reward,
        });

        if result.done {
            episode.winner = Some(player);
        }
    }

    episode.truncated = episode.winner.is_none() && !engine.is_terminal();
    debug!(
        moves = episode.len(),
        winner = ?episode.winner,
        truncated = episode.truncated,
        "episode finished"
    );
    Ok(episode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::{OptimalPolicy, RandomPolicy};

    #[test]
    fn test_optimal_first_player_wins_from_winning_position() {
        let mut engine = NimEngine::with_heaps(vec![3, 4, 5]).unwrap();
        let mut p0 = OptimalPolicy;
        let mut p1 = OptimalPolicy;

        let episode = play_episode(&mut engine, [&mut p0, &mut p1], &RolloutConfig::default()).unwrap();
        assert_eq!(episode.winner, Some(0));
        assert!(!episode.truncated);
        assert_eq!(episode.returns(&RewardScheme::default()), [1.0, -1.0]);
    }

    #[test]
    fn test_optimal_second_player_wins_from_losing_position() {
        let mut engine = NimEngine::with_heaps(vec![1, 2, 3]).unwrap();
        let mut p0 = RandomPolicy::with_seed(4);
        let mut p1 = OptimalPolicy;

        let episode = play_episode(&mut engine, [&mut p0, &mut p1], &RolloutConfig::default()).unwrap();
        assert_eq!(episode.winner, Some(1));
    }

    #[test]
    fn test_truncation() {
        let mut engine = NimEngine::with_heaps(vec![10]).unwrap();
        let mut p0 = OptimalPolicy;
        let mut p1 = OptimalPolicy;
        let config = RolloutConfig::default().with_max_moves(0);

        let episode = play_episode(&mut engine, [&mut p0, &mut p1], &config).unwrap();
        assert!(episode.is_empty());
        assert!(episode.truncated);
        assert_eq!(episode.returns(&RewardScheme::default()), [0.0, 0.0]);
    }

    #[test]
    fn test_steps_record_action_indices() {
        let mut engine = NimEngine::with_heaps(vec![2, 2]).unwrap();
        let mut p0 = RandomPolicy::with_seed(1);
        let mut p1 = RandomPolicy::with_seed(2);

        let episode = play_episode(&mut engine, [&mut p0, &mut p1], &RolloutConfig::default()).unwrap();
        for step in &episode.steps {
            let index = step.action_index.unwrap();
            assert_eq!(engine.lookup_action(index).unwrap(), step.mv);
        }
        let last = episode.steps.last().unwrap();
        assert_eq!(last.reward, 1.0);
        assert_eq!(episode.winner, Some(last.player));
    }
}
