//! Core environment trait definitions.

use crate::spaces::DynSpace;
use crate::stats::EpisodeSummary;
use crate::{Result, StatsError};
use ndarray::ArrayD;

/// Information returned from environment steps
#[derive(Clone, Debug, Default)]
pub struct EnvInfo {
    /// Summary of the episode that ended on this step
    pub episode: Option<EpisodeSummary>,
    /// Last observation of an episode that a vector backend auto-reset
    pub final_observation: Option<ArrayD<f32>>,
    /// Custom metrics (kept minimal for performance)
    pub extra: smallvec::SmallVec<[(&'static str, f32); 4]>,
}

impl EnvInfo {
    /// Create empty info
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an episode summary.
    ///
    /// Fails if a summary is already present: an info is only ever annotated
    /// once per completed episode.
    pub fn insert_episode(&mut self, summary: EpisodeSummary) -> Result<()> {
        if self.episode.is_some() {
            return Err(StatsError::DuplicateKey("episode"));
        }
        self.episode = Some(summary);
        Ok(())
    }

    /// Add a custom metric (use rarely)
    pub fn with_extra(mut self, key: &'static str, value: f32) -> Self {
        self.extra.push((key, value));
        self
    }

    /// Get a custom metric by key
    pub fn get(&self, key: &str) -> Option<f32> {
        self.extra.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

/// Result from a single environment step
#[derive(Clone, Debug)]
pub struct StepResult {
    /// Observation after the step
    pub observation: ArrayD<f32>,
    /// Reward received
    pub reward: f32,
    /// Whether episode terminated (goal reached, failure, etc.)
    pub terminated: bool,
    /// Whether episode truncated (time limit, etc.)
    pub truncated: bool,
    /// Additional info
    pub info: EnvInfo,
}

impl StepResult {
    /// Check if episode is done (terminated or truncated)
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Core trait for environments.
///
/// # Example
///
/// ```rust,ignore
/// use pufferstats::env::{EnvInfo, PufferEnv, StepResult};
/// use pufferstats::spaces::DynSpace;
///
/// struct Coin {
///     flips: u32,
/// }
///
/// impl PufferEnv for Coin {
///     fn observation_space(&self) -> DynSpace {
///         DynSpace::uniform(&[1], 0.0, 1.0)
///     }
///
///     fn action_space(&self) -> DynSpace {
///         DynSpace::discrete(2)
///     }
///
///     fn reset(&mut self, _seed: Option<u64>) -> (ArrayD<f32>, EnvInfo) {
///         self.flips = 0;
///         (ArrayD::zeros(IxDyn(&[1])), EnvInfo::new())
///     }
///
///     fn step(&mut self, action: &ArrayD<f32>) -> StepResult {
///         // ... implement step logic
///     }
/// }
/// ```
pub trait PufferEnv: Send {
    /// Get the observation space
    fn observation_space(&self) -> DynSpace;

    /// Get the action space
    fn action_space(&self) -> DynSpace;

    /// Reset the environment to an initial state
    ///
    /// # Arguments
    /// * `seed` - Optional random seed for reproducibility
    fn reset(&mut self, seed: Option<u64>) -> (ArrayD<f32>, EnvInfo);

    /// Take a single step in the environment
    fn step(&mut self, action: &ArrayD<f32>) -> StepResult;

    /// Optional: Render the environment
    fn render(&self) -> Option<String> {
        None
    }

    /// Optional: Close the environment and free resources
    fn close(&mut self) {}

    /// Check if environment is done and needs reset
    fn is_done(&self) -> bool {
        false
    }
}

impl<E: PufferEnv + ?Sized> PufferEnv for Box<E> {
    fn observation_space(&self) -> DynSpace {
        (**self).observation_space()
    }

    fn action_space(&self) -> DynSpace {
        (**self).action_space()
    }

    fn reset(&mut self, seed: Option<u64>) -> (ArrayD<f32>, EnvInfo) {
        (**self).reset(seed)
    }

    fn step(&mut self, action: &ArrayD<f32>) -> StepResult {
        (**self).step(action)
    }

    fn render(&self) -> Option<String> {
        (**self).render()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn is_done(&self) -> bool {
        (**self).is_done()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_episode_once() {
        let mut info = EnvInfo::new();
        let summary = EpisodeSummary { r: 1.0, l: 1, t: 0.0 };

        info.insert_episode(summary).unwrap();
        assert_eq!(info.episode, Some(summary));

        let err = info.insert_episode(summary).unwrap_err();
        assert!(matches!(err, StatsError::DuplicateKey("episode")));
    }

    #[test]
    fn test_extra_lookup() {
        let info = EnvInfo::new().with_extra("score", 1.0);
        assert_eq!(info.get("score"), Some(1.0));
        assert_eq!(info.get("missing"), None);
    }
}
