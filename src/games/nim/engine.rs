//! The Nim engine: configuration, state, moves, termination, optimal play.
//!
//! ## State machine
//!
//! - **InPlay**: at least one heap is non-empty.
//! - **Terminal**: every heap is empty. Only `step` enters it; only
//!   `reset`/`configure` leave it.
//!
//! The player who empties the last heap wins (normal play), so the step
//! reaching Terminal is the one that earns the win reward.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{
    ActionIndexMap, GameRng, Heaps, Move, MoveViolation, NimConfig, NimError, NimResult,
};
use crate::env::ActionSpace;

use super::strategy;

/// Auxiliary step information. The engine never fills it.
pub type Info = std::collections::BTreeMap<String, String>;

/// Outcome of a successful `step`.
#[derive(Clone, Debug, PartialEq)]
pub struct StepResult {
    /// Heaps after the move (a copy).
    pub state: Heaps,
    /// `rewards.win` on the emptying move, `rewards.transition` otherwise.
    pub reward: f32,
    /// True once all heaps are empty.
    pub done: bool,
    /// Always empty.
    pub info: Info,
}

impl StepResult {
    /// The classic `(state, reward, done, info)` tuple.
    #[must_use]
    pub fn into_tuple(self) -> (Heaps, f32, bool, Info) {
        (self.state, self.reward, self.done, self.info)
    }
}

/// Nim game engine.
///
/// Owns the configuration, the reset heaps, the current heaps and the
/// action-index map. The last three are only replaced together.
///
/// ```
/// use rust_nim::core::{GameRng, Move, NimConfig};
/// use rust_nim::games::nim::NimEngine;
///
/// let config = NimConfig::new().with_starting_heaps(vec![1, 2, 3]);
/// let mut engine = NimEngine::new(config, &mut GameRng::new(0)).unwrap();
///
/// assert!(engine.optimal_moves().is_empty());
/// let result = engine.step(Move::new(2, 1)).unwrap();
/// assert_eq!(result.state.as_slice(), &[1, 2, 2]);
/// assert!(!result.done);
/// ```
#[derive(Clone, Debug)]
pub struct NimEngine {
    config: NimConfig,
    reset_heaps: Heaps,
    heaps: Heaps,
    action_map: ActionIndexMap,
}

impl NimEngine {
    /// Create an engine from a config, drawing random heaps from `rng` if needed.
    pub fn new(config: NimConfig, rng: &mut GameRng) -> NimResult<Self> {
        let (config, reset_heaps, action_map) = Self::prepare(config, rng)?;
        Ok(Self {
            config,
            heaps: reset_heaps.clone(),
            reset_heaps,
            action_map,
        })
    }

    /// Create an engine with explicit starting heaps and default settings otherwise.
    pub fn with_heaps(heaps: Vec<u32>) -> NimResult<Self> {
        // No draws happen with explicit heaps
        Self::new(NimConfig::new().with_starting_heaps(heaps), &mut GameRng::new(0))
    }

    /// Validate a config and build the reset heaps and action map for it.
    fn prepare(
        mut config: NimConfig,
        rng: &mut GameRng,
    ) -> NimResult<(NimConfig, Heaps, ActionIndexMap)> {
        config.validate()?;

        let effective_max = config.effective_max_heap_size();
        if effective_max > config.max_heap_size {
            warn!(
                requested = config.max_heap_size,
                raised_to = effective_max,
                "starting heap exceeds max heap size, raising max"
            );
            config.max_heap_size = effective_max;
        }

        let reset_heaps = match &config.starting_heaps {
            Some(heaps) => Heaps::new(heaps.clone()),
            None => Heaps::new(
                (0..config.heap_count)
                    .map(|_| rng.gen_heap_size(config.max_heap_size))
                    .collect(),
            ),
        };
        let action_map = ActionIndexMap::build(&reset_heaps);

        debug!(
            heaps = %reset_heaps,
            max_heap_size = config.max_heap_size,
            actions = action_map.len(),
            "configured nim engine"
        );
        Ok((config, reset_heaps, action_map))
    }

    /// Apply a new configuration.
    ///
    /// Replaces the reset heaps, the current heaps and the action map
    /// together. On error nothing changes.
    pub fn configure(&mut self, config: NimConfig, rng: &mut GameRng) -> NimResult<&Heaps> {
        let (config, reset_heaps, action_map) = Self::prepare(config, rng)?;
        self.config = config;
        self.heaps = reset_heaps.clone();
        self.reset_heaps = reset_heaps;
        self.action_map = action_map;
        Ok(&self.heaps)
    }

    /// Restore the current heaps to the reset heaps. The action map is kept.
    pub fn reset(&mut self) -> Heaps {
        self.heaps = self.reset_heaps.clone();
        debug!(heaps = %self.heaps, "reset nim engine");
        self.heaps.clone()
    }

    /// Check a move against the current heaps without applying it.
    pub fn validate_move(&self, mv: Move) -> NimResult<()> {
        let violation = match self.heaps.get(mv.heap) {
            None => Some(MoveViolation::HeapOutOfRange),
            Some(_) if mv.beans == 0 => Some(MoveViolation::ZeroBeans),
            Some(available) if mv.beans > available => Some(MoveViolation::NotEnoughBeans),
            Some(_) => None,
        };

        match violation {
            None => Ok(()),
            Some(violation) => Err(NimError::InvalidMove {
                violation,
                heap: mv.heap,
                requested: mv.beans,
                available: self.heaps.get(mv.heap).unwrap_or(0),
                state: self.heaps.clone(),
            }),
        }
    }

    /// Apply a move.
    ///
    /// Fails with `InvalidMove` and leaves the heaps untouched if the move is
    /// illegal, including any move once every heap is empty.
    pub fn step(&mut self, mv: Move) -> NimResult<StepResult> {
        if let Err(err) = self.validate_move(mv) {
            debug!(%mv, heaps = %self.heaps, "rejected move");
            return Err(err);
        }

        self.heaps.remove(mv.heap, mv.beans);
        let done = self.heaps.all_empty();
        let reward = if done {
            self.config.rewards.win
        } else {
            self.config.rewards.transition
        };
        trace!(%mv, heaps = %self.heaps, done, "applied move");

        Ok(StepResult {
            state: self.heaps.clone(),
            reward,
            done,
            info: Info::new(),
        })
    }

    /// Map a flat action index to a move.
    pub fn lookup_action(&self, index: usize) -> NimResult<Move> {
        self.action_map.lookup(index)
    }

    /// Action index of a move, if the reset heaps allow it.
    #[must_use]
    pub fn action_index_of(&self, mv: Move) -> Option<usize> {
        self.action_map.index_of(mv)
    }

    /// Every legal move against the current heaps.
    #[must_use]
    pub fn possible_moves(&self) -> Vec<Move> {
        strategy::possible_moves(&self.heaps)
    }

    /// Action indices whose move is legal now, ascending.
    #[must_use]
    pub fn possible_move_indices(&self) -> Vec<usize> {
        self.partition_indices(true)
    }

    /// Action indices whose move is illegal now, ascending.
    #[must_use]
    pub fn illegal_move_indices(&self) -> Vec<usize> {
        self.partition_indices(false)
    }

    fn partition_indices(&self, legal: bool) -> Vec<usize> {
        let possible: FxHashSet<Move> = self.possible_moves().into_iter().collect();
        self.action_map
            .iter()
            .filter(|(_, mv)| possible.contains(mv) == legal)
            .map(|(i, _)| i)
            .collect()
    }

    /// Moves that restore a zero Nim-sum. Empty from a losing position.
    #[must_use]
    pub fn optimal_moves(&self) -> Vec<Move> {
        strategy::optimal_moves(&self.heaps)
    }

    /// XOR of the current heaps.
    #[must_use]
    pub fn nim_sum(&self) -> u32 {
        self.heaps.nim_sum()
    }

    /// True once every heap is empty.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.heaps.all_empty()
    }

    /// One line per heap: `Heap <index>: <size>`.
    #[must_use]
    pub fn render(&self) -> String {
        self.heaps
            .iter()
            .map(|(i, size)| format!("Heap {}: {}\n", i, size))
            .collect()
    }

    /// Action space description derived from the configuration.
    #[must_use]
    pub fn action_space(&self) -> ActionSpace {
        ActionSpace::new(self.heap_count(), self.config.max_heap_size, self.action_map.len())
    }

    // === Accessors ===

    /// Current configuration (with any raised max heap size applied).
    #[must_use]
    pub fn config(&self) -> &NimConfig {
        &self.config
    }

    /// Number of heaps.
    #[must_use]
    pub fn heap_count(&self) -> usize {
        self.config.heap_count
    }

    /// Maximum heap size.
    #[must_use]
    pub fn max_heap_size(&self) -> u32 {
        self.config.max_heap_size
    }

    /// Current heaps.
    #[must_use]
    pub fn state(&self) -> &Heaps {
        &self.heaps
    }

    /// Heaps restored by `reset`.
    #[must_use]
    pub fn reset_state(&self) -> &Heaps {
        &self.reset_heaps
    }

    /// Observation length.
    #[must_use]
    pub fn state_size(&self) -> usize {
        self.heaps.len()
    }

    /// Number of entries in the action-index map.
    #[must_use]
    pub fn action_size(&self) -> usize {
        self.action_map.len()
    }

    /// The full action-index map in index order.
    #[must_use]
    pub fn move_list(&self) -> &[Move] {
        self.action_map.moves()
    }

    // === Checkpointing ===

    /// Capture the engine for later restore.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            config: self.config.clone(),
            reset_heaps: self.reset_heaps.clone(),
            heaps: self.heaps.clone(),
        }
    }

    /// Rebuild an engine from a snapshot.
    ///
    /// The snapshot is checked against the engine invariants; the action map
    /// is regenerated from the reset heaps.
    pub fn restore(snapshot: EngineSnapshot) -> NimResult<Self> {
        let EngineSnapshot {
            config,
            reset_heaps,
            heaps,
        } = snapshot;
        config.validate()?;

        if reset_heaps.len() != config.heap_count || heaps.len() != config.heap_count {
            return Err(NimError::Configuration(format!(
                "snapshot has {} reset heaps and {} heaps for heap count {}",
                reset_heaps.len(),
                heaps.len(),
                config.heap_count
            )));
        }
        if reset_heaps.largest() > config.max_heap_size {
            return Err(NimError::Configuration(format!(
                "snapshot heap {} exceeds max heap size {}",
                reset_heaps.largest(),
                config.max_heap_size
            )));
        }
        if let Some(starting) = &config.starting_heaps {
            if starting.as_slice() != reset_heaps.as_slice() {
                return Err(NimError::Configuration(
                    "snapshot reset heaps disagree with configured starting heaps".to_string(),
                ));
            }
        }
        if heaps.iter().any(|(i, h)| h > reset_heaps[i]) {
            return Err(NimError::Configuration(format!(
                "snapshot heaps {} not reachable from {}",
                heaps, reset_heaps
            )));
        }

        let action_map = ActionIndexMap::build(&reset_heaps);
        debug!(heaps = %heaps, reset = %reset_heaps, "restored nim engine");
        Ok(Self {
            config,
            reset_heaps,
            heaps,
            action_map,
        })
    }
}

/// Serializable engine checkpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub config: NimConfig,
    pub reset_heaps: Heaps,
    pub heaps: Heaps,
}

impl EngineSnapshot {
    /// Encode with bincode.
    pub fn to_bytes(&self) -> NimResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bincode.
    pub fn from_bytes(bytes: &[u8]) -> NimResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(heaps: Vec<u32>) -> NimEngine {
        NimEngine::with_heaps(heaps).unwrap()
    }

    #[test]
    fn test_random_heaps_within_bounds() {
        let config = NimConfig::new().with_heap_count(6).with_max_heap_size(8);
        let engine = NimEngine::new(config, &mut GameRng::new(3)).unwrap();

        assert_eq!(engine.state().len(), 6);
        assert!(engine.state().iter().all(|(_, h)| (1..=8).contains(&h)));
        assert_eq!(engine.action_size() as u64, engine.reset_state().total());
    }

    #[test]
    fn test_same_seed_same_heaps() {
        let a = NimEngine::new(NimConfig::new(), &mut GameRng::new(11)).unwrap();
        let b = NimEngine::new(NimConfig::new(), &mut GameRng::new(11)).unwrap();
        assert_eq!(a.reset_state(), b.reset_state());
    }

    #[test]
    fn test_explicit_heaps_raise_max() {
        let config = NimConfig::new()
            .with_max_heap_size(5)
            .with_starting_heaps(vec![2, 12]);
        let engine = NimEngine::new(config, &mut GameRng::new(0)).unwrap();
        assert_eq!(engine.max_heap_size(), 12);
        assert_eq!(engine.action_space().max_beans(), 12);
    }

    #[test]
    fn test_configure_failure_leaves_engine_untouched() {
        let mut engine = engine(vec![3, 4]);
        engine.step(Move::new(0, 1)).unwrap();
        let before = engine.snapshot();

        let result = engine.configure(NimConfig::new().with_heap_count(0), &mut GameRng::new(0));
        assert!(matches!(result, Err(NimError::Configuration(_))));
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_configure_rebuilds_everything() {
        let mut engine = engine(vec![3, 4]);
        engine.step(Move::new(0, 1)).unwrap();

        engine
            .configure(NimConfig::new().with_starting_heaps(vec![1, 1, 1]), &mut GameRng::new(0))
            .unwrap();
        assert_eq!(engine.state().as_slice(), &[1, 1, 1]);
        assert_eq!(engine.reset_state().as_slice(), &[1, 1, 1]);
        assert_eq!(engine.action_size(), 3);
        assert_eq!(engine.heap_count(), 3);
    }

    #[test]
    fn test_step_rejections() {
        let mut engine = engine(vec![2, 0]);

        let err = engine.step(Move::new(5, 1)).unwrap_err();
        assert!(matches!(
            err,
            NimError::InvalidMove { violation: MoveViolation::HeapOutOfRange, available: 0, .. }
        ));

        let err = engine.step(Move::new(0, 0)).unwrap_err();
        assert!(matches!(
            err,
            NimError::InvalidMove { violation: MoveViolation::ZeroBeans, .. }
        ));

        let err = engine.step(Move::new(0, 3)).unwrap_err();
        assert!(matches!(
            err,
            NimError::InvalidMove {
                violation: MoveViolation::NotEnoughBeans,
                heap: 0,
                requested: 3,
                available: 2,
                ..
            }
        ));

        assert_eq!(engine.state().as_slice(), &[2, 0]);
    }

    #[test]
    fn test_winning_step() {
        let mut engine = engine(vec![0, 3]);
        let result = engine.step(Move::new(1, 3)).unwrap();
        assert!(result.done);
        assert_eq!(result.reward, 1.0);
        assert!(result.info.is_empty());
        assert!(engine.is_terminal());

        // No legal move remains
        assert!(engine.step(Move::new(1, 1)).unwrap_err().is_invalid_move());
    }

    #[test]
    fn test_transition_reward() {
        let mut engine = engine(vec![4]);
        let (state, reward, done, info) = engine.step(Move::new(0, 1)).unwrap().into_tuple();
        assert_eq!(state.as_slice(), &[3]);
        assert_eq!(reward, 0.0);
        assert!(!done);
        assert!(info.is_empty());
    }

    #[test]
    fn test_reset_is_a_copy() {
        let mut engine = engine(vec![3, 3]);
        let mut observed = engine.reset();
        observed.remove(0, 3);

        engine.step(Move::new(1, 2)).unwrap();
        assert_eq!(engine.reset().as_slice(), &[3, 3]);
        assert_eq!(engine.reset().as_slice(), &[3, 3]);
    }

    #[test]
    fn test_action_map_survives_steps() {
        let mut engine = engine(vec![2, 2]);
        let before = engine.move_list().to_vec();
        engine.step(Move::new(0, 2)).unwrap();
        assert_eq!(engine.move_list(), before.as_slice());
        engine.reset();
        assert_eq!(engine.move_list(), before.as_slice());
    }

    #[test]
    fn test_partition() {
        let mut engine = engine(vec![2, 1]);
        engine.step(Move::new(0, 1)).unwrap();

        // map: 0:(0,1) 1:(0,2) 2:(1,1)
        assert_eq!(engine.possible_move_indices(), vec![0, 2]);
        assert_eq!(engine.illegal_move_indices(), vec![1]);
    }

    #[test]
    fn test_render() {
        let engine = engine(vec![1, 0]);
        assert_eq!(engine.render(), "Heap 0: 1\nHeap 1: 0\n");
    }

    #[test]
    fn test_all_zero_start_is_terminal() {
        let mut engine = engine(vec![0, 0, 0, 0]);
        assert!(engine.is_terminal());
        assert_eq!(engine.action_size(), 0);
        assert!(engine.step(Move::new(0, 1)).is_err());
        assert!(engine.lookup_action(0).is_err());
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut engine = engine(vec![5, 6, 7]);
        engine.step(Move::new(2, 4)).unwrap();

        let bytes = engine.snapshot().to_bytes().unwrap();
        let restored = NimEngine::restore(EngineSnapshot::from_bytes(&bytes).unwrap()).unwrap();

        assert_eq!(restored.state(), engine.state());
        assert_eq!(restored.reset_state(), engine.reset_state());
        assert_eq!(restored.move_list(), engine.move_list());
    }

    #[test]
    fn test_restore_rejects_unreachable_state() {
        let mut snapshot = engine(vec![2, 2]).snapshot();
        snapshot.heaps = Heaps::new(vec![3, 0]);
        assert!(matches!(
            NimEngine::restore(snapshot),
            Err(NimError::Configuration(_))
        ));
    }

    #[test]
    fn test_garbage_snapshot_bytes() {
        assert!(matches!(
            EngineSnapshot::from_bytes(&[1, 2]),
            Err(NimError::Snapshot(_))
        ));
    }
}
