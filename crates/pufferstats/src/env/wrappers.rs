//! Environment wrappers.

use super::{EnvInfo, PufferEnv, StepResult};
use crate::spaces::DynSpace;
use crate::stats::{EpisodeAccumulator, EpisodeStatsConfig, HistoryQueue};
use crate::{Result, StatsError};
use ndarray::ArrayD;

/// Wrapper that tracks episode statistics (return and length).
///
/// When a step terminates or truncates the episode, an `EpisodeSummary` is
/// attached to `info.episode` and recorded in the history queues. The inner
/// environment's results are otherwise passed through untouched.
pub struct EpisodeStats<E: PufferEnv> {
    env: E,
    config: EpisodeStatsConfig,
    current: EpisodeAccumulator,
    return_queue: HistoryQueue<f64>,
    length_queue: HistoryQueue<u64>,
    time_queue: HistoryQueue<f64>,
    episode_count: u64,
}

impl<E: PufferEnv> EpisodeStats<E> {
    /// Wrap an environment, keeping the last 100 episodes
    pub fn new(env: E) -> Self {
        let config = EpisodeStatsConfig::default();
        Self::build(env, config)
    }

    /// Wrap an environment with a custom configuration
    pub fn with_config(env: E, config: EpisodeStatsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(env, config))
    }

    fn build(env: E, config: EpisodeStatsConfig) -> Self {
        Self {
            env,
            current: EpisodeAccumulator::new(),
            return_queue: HistoryQueue::new(config.deque_size),
            length_queue: HistoryQueue::new(config.deque_size),
            time_queue: HistoryQueue::new(config.deque_size),
            episode_count: 0,
            config,
        }
    }

    /// Step the inner environment, reporting contract violations as errors.
    ///
    /// Fails with `StatsError::DuplicateKey` if the inner environment already
    /// attached an episode summary on the step that ends the episode.
    pub fn try_step(&mut self, action: &ArrayD<f32>) -> Result<StepResult> {
        let mut result = self.env.step(action);
        if result.done() && result.info.episode.is_some() {
            return Err(StatsError::DuplicateKey("episode"));
        }
        self.current.record(result.reward);

        if result.done() {
            let summary = self.current.summarize();
            result.info.insert_episode(summary)?;

            self.return_queue.push(summary.r);
            self.length_queue.push(summary.l);
            self.time_queue.push(summary.t);
            self.episode_count += 1;
            tracing::debug!(
                episode = self.episode_count,
                r = summary.r,
                l = summary.l,
                t = summary.t,
                "Episode finished"
            );

            // The caller resets the env; start counting the next episode now
            self.current.reset();
        }

        Ok(result)
    }

    /// Return accumulated in the current episode
    pub fn episode_return(&self) -> f64 {
        self.current.episode_return()
    }

    /// Steps taken in the current episode
    pub fn episode_length(&self) -> u64 {
        self.current.length()
    }

    /// Returns of the most recent episodes, oldest first
    pub fn return_queue(&self) -> &HistoryQueue<f64> {
        &self.return_queue
    }

    /// Lengths of the most recent episodes, oldest first
    pub fn length_queue(&self) -> &HistoryQueue<u64> {
        &self.length_queue
    }

    /// Wall-clock seconds of the most recent episodes, oldest first
    pub fn time_queue(&self) -> &HistoryQueue<f64> {
        &self.time_queue
    }

    /// Number of episodes completed since the wrapper was created
    pub fn episode_count(&self) -> u64 {
        self.episode_count
    }

    /// Mean of the return history
    pub fn mean_return(&self) -> Option<f64> {
        self.return_queue.mean()
    }

    /// Mean of the length history
    pub fn mean_length(&self) -> Option<f64> {
        self.length_queue.mean()
    }

    pub fn config(&self) -> &EpisodeStatsConfig {
        &self.config
    }

    /// Get a reference to the inner environment
    pub fn inner(&self) -> &E {
        &self.env
    }

    /// Get a mutable reference to the inner environment
    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.env
    }

    /// Unwrap, discarding the recorded statistics
    pub fn into_inner(self) -> E {
        self.env
    }
}

impl<E: PufferEnv> PufferEnv for EpisodeStats<E> {
    fn observation_space(&self) -> DynSpace {
        self.env.observation_space()
    }

    fn action_space(&self) -> DynSpace {
        self.env.action_space()
    }

    fn reset(&mut self, seed: Option<u64>) -> (ArrayD<f32>, EnvInfo) {
        let reset = self.env.reset(seed);
        self.current.reset();
        tracing::trace!(?seed, "Episode statistics reset");
        reset
    }

    /// # Panics
    ///
    /// Panics if the inner environment already attached an episode summary;
    /// use [`EpisodeStats::try_step`] to receive the error instead.
    fn step(&mut self, action: &ArrayD<f32>) -> StepResult {
        self.try_step(action).unwrap_or_else(|err| panic!("{err}"))
    }

    fn render(&self) -> Option<String> {
        self.env.render()
    }

    fn close(&mut self) {
        self.env.close()
    }

    fn is_done(&self) -> bool {
        self.env.is_done()
    }
}
