//! Engine configuration.
//!
//! A `NimConfig` describes everything `NimEngine::configure` needs:
//! - heap count and maximum heap size
//! - optional explicit starting heaps (random sampling otherwise)
//! - the reward table
//!
//! Configs are plain data. They are validated once, when the engine applies
//! them, so an invalid config never reaches engine state.

use serde::{Deserialize, Serialize};

use super::error::{NimError, NimResult};

/// Default number of heaps.
pub const DEFAULT_HEAP_COUNT: usize = 4;

/// Default maximum heap size.
pub const DEFAULT_MAX_HEAP_SIZE: u32 = 50;

/// Reward signals.
///
/// The engine itself only emits `win` and `transition`. `loss` is credited to
/// the other player by the episode runner, and `invalid_move` is used by the
/// environment adapter when it is told to penalize instead of failing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardScheme {
    pub win: f32,
    pub loss: f32,
    pub transition: f32,
    pub invalid_move: f32,
}

impl Default for RewardScheme {
    fn default() -> Self {
        Self {
            win: 1.0,
            loss: -1.0,
            transition: 0.0,
            invalid_move: -10.0,
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NimConfig {
    /// Number of heaps.
    pub heap_count: usize,

    /// Upper bound for sampled heaps and the bean axis of the action space.
    pub max_heap_size: u32,

    /// Explicit starting heaps. `None` samples each heap from `[1, max_heap_size]`.
    pub starting_heaps: Option<Vec<u32>>,

    /// Reward table.
    pub rewards: RewardScheme,
}

impl Default for NimConfig {
    fn default() -> Self {
        Self {
            heap_count: DEFAULT_HEAP_COUNT,
            max_heap_size: DEFAULT_MAX_HEAP_SIZE,
            starting_heaps: None,
            rewards: RewardScheme::default(),
        }
    }
}

impl NimConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of heaps.
    #[must_use]
    pub fn with_heap_count(mut self, count: usize) -> Self {
        self.heap_count = count;
        self
    }

    /// Set the maximum heap size.
    #[must_use]
    pub fn with_max_heap_size(mut self, size: u32) -> Self {
        self.max_heap_size = size;
        self
    }

    /// Use explicit starting heaps. Also sets the heap count.
    #[must_use]
    pub fn with_starting_heaps(mut self, heaps: Vec<u32>) -> Self {
        self.heap_count = heaps.len();
        self.starting_heaps = Some(heaps);
        self
    }

    /// Go back to random starting heaps.
    #[must_use]
    pub fn with_random_heaps(mut self) -> Self {
        self.starting_heaps = None;
        self
    }

    /// Set the reward table.
    #[must_use]
    pub fn with_rewards(mut self, rewards: RewardScheme) -> Self {
        self.rewards = rewards;
        self
    }

    /// Check the config can be applied.
    pub fn validate(&self) -> NimResult<()> {
        if self.heap_count == 0 {
            return Err(NimError::Configuration("must have at least 1 heap".to_string()));
        }
        if self.max_heap_size == 0 {
            return Err(NimError::Configuration("max heap size must be positive".to_string()));
        }
        if let Some(heaps) = &self.starting_heaps {
            if heaps.len() != self.heap_count {
                return Err(NimError::Configuration(format!(
                    "{} starting heaps given for {} heaps",
                    heaps.len(),
                    self.heap_count
                )));
            }
        }
        Ok(())
    }

    /// Max heap size after accounting for explicit heaps.
    ///
    /// Explicit heaps can raise the maximum but never lower it.
    #[must_use]
    pub fn effective_max_heap_size(&self) -> u32 {
        let largest = self
            .starting_heaps
            .as_ref()
            .and_then(|h| h.iter().copied().max())
            .unwrap_or(0);
        self.max_heap_size.max(largest)
    }
}

/// Convert externally supplied heap sizes, rejecting negatives.
pub fn parse_raw_heaps(raw: &[i64]) -> NimResult<Vec<u32>> {
    raw.iter()
        .enumerate()
        .map(|(i, &h)| {
            u32::try_from(h).map_err(|_| {
                NimError::Configuration(format!("heap {} has invalid size {}", i, h))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NimConfig::default();
        assert_eq!(config.heap_count, 4);
        assert_eq!(config.max_heap_size, 50);
        assert!(config.starting_heaps.is_none());
        assert_eq!(config.rewards.win, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = NimConfig::new().with_heap_count(3).with_max_heap_size(10);
        assert_eq!(config.heap_count, 3);
        assert_eq!(config.max_heap_size, 10);
    }

    #[test]
    fn test_starting_heaps_set_count() {
        let config = NimConfig::new().with_starting_heaps(vec![1, 2, 3]);
        assert_eq!(config.heap_count, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_heaps() {
        let config = NimConfig::new().with_heap_count(0);
        assert!(matches!(config.validate(), Err(NimError::Configuration(_))));

        let config = NimConfig::new().with_starting_heaps(vec![]);
        assert!(matches!(config.validate(), Err(NimError::Configuration(_))));
    }

    #[test]
    fn test_rejects_zero_max() {
        let config = NimConfig::new().with_max_heap_size(0);
        assert!(matches!(config.validate(), Err(NimError::Configuration(_))));
    }

    #[test]
    fn test_rejects_count_mismatch() {
        let config = NimConfig::new()
            .with_starting_heaps(vec![1, 2, 3])
            .with_heap_count(4);
        assert!(matches!(config.validate(), Err(NimError::Configuration(_))));
    }

    #[test]
    fn test_effective_max_only_grows() {
        let config = NimConfig::new()
            .with_max_heap_size(5)
            .with_starting_heaps(vec![3, 9]);
        assert_eq!(config.effective_max_heap_size(), 9);

        let config = NimConfig::new()
            .with_max_heap_size(20)
            .with_starting_heaps(vec![3, 9]);
        assert_eq!(config.effective_max_heap_size(), 20);
    }

    #[test]
    fn test_parse_raw_heaps() {
        assert_eq!(parse_raw_heaps(&[1, 0, 7]).unwrap(), vec![1, 0, 7]);
        assert!(matches!(
            parse_raw_heaps(&[1, -2]),
            Err(NimError::Configuration(_))
        ));
    }

    #[test]
    fn test_json_defaults() {
        let config: NimConfig = serde_json::from_str(r#"{"max_heap_size": 7}"#).unwrap();
        assert_eq!(config.max_heap_size, 7);
        assert_eq!(config.heap_count, 4);
        assert_eq!(config.rewards, RewardScheme::default());
    }
}
