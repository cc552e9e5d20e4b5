//! Episode statistics for vectorized environments.

use super::vecenv::{VecEnvBackend, VecEnvResult, VecInfos};
use crate::spaces::DynSpace;
use crate::stats::{
    add_vector_episode_statistics, EpisodeAccumulator, EpisodeStatsConfig, HistoryQueue,
};
use crate::{Result, StatsError};
use ndarray::Array2;

/// Vector counterpart of [`EpisodeStats`](crate::env::EpisodeStats).
///
/// Keeps one accumulator per sub-environment. On every step where at least
/// one sub-environment finishes, the batched info gains an `EpisodeBatch`
/// whose mask marks exactly the finished slots. Backends auto-reset finished
/// sub-environments, so each accumulator restarts as soon as its episode is
/// recorded.
pub struct VecEpisodeStats<B: VecEnvBackend> {
    backend: B,
    num_envs: usize,
    config: EpisodeStatsConfig,
    current: Vec<EpisodeAccumulator>,
    return_queue: HistoryQueue<f64>,
    length_queue: HistoryQueue<u64>,
    time_queue: HistoryQueue<f64>,
    episode_count: u64,
}

impl<B: VecEnvBackend> VecEpisodeStats<B> {
    /// Wrap a backend, keeping the last 100 episodes
    pub fn new(backend: B) -> Self {
        Self::build(backend, EpisodeStatsConfig::default())
    }

    /// Wrap a backend with a custom configuration
    pub fn with_config(backend: B, config: EpisodeStatsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(backend, config))
    }

    fn build(backend: B, config: EpisodeStatsConfig) -> Self {
        let num_envs = backend.num_envs();
        Self {
            backend,
            num_envs,
            current: vec![EpisodeAccumulator::new(); num_envs],
            return_queue: HistoryQueue::new(config.deque_size),
            length_queue: HistoryQueue::new(config.deque_size),
            time_queue: HistoryQueue::new(config.deque_size),
            episode_count: 0,
            config,
        }
    }

    /// Step all sub-environments, reporting contract violations as errors.
    ///
    /// Fails with:
    /// - `StatsError::InfoLayout` if the backend's info is not batched (the
    ///   backend was wrapped in `ListInfo` before this wrapper)
    /// - `StatsError::ShapeMismatch` if the step reports a different number
    ///   of environments than the backend did at construction
    /// - `StatsError::DuplicateKey` if an episode batch, or a sub-environment's
    ///   own episode summary, is already present on a step where a
    ///   sub-environment finishes
    pub fn try_step(&mut self, actions: &Array2<f32>) -> Result<VecEnvResult> {
        let mut result = self.backend.step(actions);

        let info = match &mut result.infos {
            VecInfos::Batched(info) => info,
            other => return Err(StatsError::InfoLayout(other.layout())),
        };
        for len in [
            result.rewards.len(),
            result.terminated.len(),
            result.truncated.len(),
        ] {
            if len != self.num_envs {
                return Err(StatsError::ShapeMismatch {
                    expected: self.num_envs,
                    actual: len,
                });
            }
        }

        let any_done = result
            .terminated
            .iter()
            .zip(&result.truncated)
            .any(|(&t, &tr)| t || tr);
        if any_done
            && (info.episode.is_some() || info.envs.iter().any(|env| env.episode.is_some()))
        {
            return Err(StatsError::DuplicateKey("episode"));
        }

        for (i, acc) in self.current.iter_mut().enumerate() {
            acc.record(result.rewards[i]);
            if !(result.terminated[i] || result.truncated[i]) {
                continue;
            }

            let summary = acc.summarize();
            add_vector_episode_statistics(info, &summary, self.num_envs, i)?;

            self.return_queue.push(summary.r);
            self.length_queue.push(summary.l);
            self.time_queue.push(summary.t);
            self.episode_count += 1;
            tracing::debug!(
                env = i,
                episode = self.episode_count,
                r = summary.r,
                l = summary.l,
                t = summary.t,
                "Episode finished"
            );

            acc.reset();
        }

        Ok(result)
    }

    /// Return accumulated in each sub-environment's current episode
    pub fn episode_returns(&self) -> Vec<f64> {
        self.current.iter().map(|a| a.episode_return()).collect()
    }

    /// Steps taken in each sub-environment's current episode
    pub fn episode_lengths(&self) -> Vec<u64> {
        self.current.iter().map(|a| a.length()).collect()
    }

    /// Returns of the most recent episodes across all sub-environments
    pub fn return_queue(&self) -> &HistoryQueue<f64> {
        &self.return_queue
    }

    /// Lengths of the most recent episodes across all sub-environments
    pub fn length_queue(&self) -> &HistoryQueue<u64> {
        &self.length_queue
    }

    /// Wall-clock seconds of the most recent episodes
    pub fn time_queue(&self) -> &HistoryQueue<f64> {
        &self.time_queue
    }

    /// Number of episodes completed since the wrapper was created
    pub fn episode_count(&self) -> u64 {
        self.episode_count
    }

    pub fn mean_return(&self) -> Option<f64> {
        self.return_queue.mean()
    }

    pub fn mean_length(&self) -> Option<f64> {
        self.length_queue.mean()
    }

    pub fn config(&self) -> &EpisodeStatsConfig {
        &self.config
    }

    pub fn inner(&self) -> &B {
        &self.backend
    }

    pub fn inner_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: VecEnvBackend> VecEnvBackend for VecEpisodeStats<B> {
    fn observation_space(&self) -> DynSpace {
        self.backend.observation_space()
    }

    fn action_space(&self) -> DynSpace {
        self.backend.action_space()
    }

    fn num_envs(&self) -> usize {
        self.num_envs
    }

    fn reset(&mut self, seed: Option<u64>) -> (Array2<f32>, VecInfos) {
        let reset = self.backend.reset(seed);
        for acc in &mut self.current {
            acc.reset();
        }
        tracing::trace!(?seed, num_envs = self.num_envs, "Episode statistics reset");
        reset
    }

    /// # Panics
    ///
    /// Panics on any contract violation reported by
    /// [`VecEpisodeStats::try_step`].
    fn step(&mut self, actions: &Array2<f32>) -> VecEnvResult {
        self.try_step(actions).unwrap_or_else(|err| panic!("{err}"))
    }

    fn close(&mut self) {
        self.backend.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{EnvInfo, EpisodeStats, PufferEnv, StepResult};
    use crate::stats::EpisodeSummary;
    use crate::vector::{ListInfo, Serial, VecEnvInfo};
    use ndarray::{ArrayD, IxDyn};

    // Fixed-length episodes with a constant reward per step
    struct FixedEpisode {
        length: u32,
        reward: f32,
        steps: u32,
    }

    impl FixedEpisode {
        fn new(length: u32, reward: f32) -> Self {
            Self {
                length,
                reward,
                steps: 0,
            }
        }
    }

    impl PufferEnv for FixedEpisode {
        fn observation_space(&self) -> DynSpace {
            DynSpace::uniform(&[1], 0.0, 1.0)
        }

        fn action_space(&self) -> DynSpace {
            DynSpace::discrete(2)
        }

        fn reset(&mut self, _seed: Option<u64>) -> (ArrayD<f32>, EnvInfo) {
            self.steps = 0;
            (ArrayD::zeros(IxDyn(&[1])), EnvInfo::new())
        }

        fn step(&mut self, _action: &ArrayD<f32>) -> StepResult {
            self.steps += 1;
            StepResult {
                observation: ArrayD::zeros(IxDyn(&[1])),
                reward: self.reward,
                terminated: self.steps >= self.length,
                truncated: false,
                info: EnvInfo::new(),
            }
        }
    }

    // Backend that reports a pre-filled episode batch on every step
    struct PrefilledBackend;

    impl VecEnvBackend for PrefilledBackend {
        fn observation_space(&self) -> DynSpace {
            DynSpace::uniform(&[1], 0.0, 1.0)
        }

        fn action_space(&self) -> DynSpace {
            DynSpace::discrete(2)
        }

        fn num_envs(&self) -> usize {
            2
        }

        fn reset(&mut self, _seed: Option<u64>) -> (Array2<f32>, VecInfos) {
            let info = VecEnvInfo::new(vec![EnvInfo::new(); 2]);
            (Array2::zeros((2, 1)), VecInfos::Batched(info))
        }

        fn step(&mut self, _actions: &Array2<f32>) -> VecEnvResult {
            let mut info = VecEnvInfo::new(vec![EnvInfo::new(); 2]);
            let summary = EpisodeSummary { r: 9.0, l: 9, t: 9.0 };
            add_vector_episode_statistics(&mut info, &summary, 2, 0).unwrap();
            VecEnvResult {
                observations: Array2::zeros((2, 1)),
                rewards: vec![1.0, 1.0],
                terminated: vec![false, true],
                truncated: vec![false, false],
                infos: VecInfos::Batched(info),
            }
        }

        fn close(&mut self) {}
    }

    fn actions(num_envs: usize) -> Array2<f32> {
        Array2::zeros((num_envs, 1))
    }

    fn tracked(lengths: &[u32]) -> VecEpisodeStats<Serial<FixedEpisode>> {
        let envs = lengths
            .iter()
            .enumerate()
            .map(|(i, &len)| FixedEpisode::new(len, i as f32 + 1.0))
            .collect();
        VecEpisodeStats::new(Serial::from_envs(envs))
    }

    #[test]
    fn test_mask_marks_finished_envs() {
        // Envs 1 and 3 finish on the second step, 0 and 2 keep running
        let mut envs = tracked(&[5, 2, 5, 2]);
        envs.reset(Some(0));

        let first = envs.step(&actions(4));
        assert!(first.infos.as_batched().unwrap().episode.is_none());

        let second = envs.step(&actions(4));
        let info = second.infos.as_batched().unwrap();
        let batch = info.episode.as_ref().unwrap();

        assert_eq!(batch.mask, vec![false, true, false, true]);
        assert_eq!(info.episode_mask(), Some(&batch.mask[..]));
        assert_eq!(batch.r[1], 4.0);
        assert_eq!(batch.l[1], 2);
        assert_eq!(batch.r[3], 8.0);
        assert_eq!(batch.l[3], 2);
        assert!(batch.t[1] >= 0.0 && batch.t[3] >= 0.0);

        assert_eq!(batch.r[0], 0.0);
        assert_eq!(batch.r[2], 0.0);
        assert_eq!(batch.l[0], 0);
        assert_eq!(batch.t[2], 0.0);

        let dones = second.dones();
        assert_eq!(batch.mask, dones);
    }

    #[test]
    fn test_accumulators_restart_after_finish() {
        let mut envs = tracked(&[3, 1]);
        envs.reset(None);

        envs.step(&actions(2));
        assert_eq!(envs.episode_lengths(), vec![1, 0]);
        assert_eq!(envs.episode_returns(), vec![1.0, 0.0]);

        envs.step(&actions(2));
        envs.step(&actions(2));
        assert_eq!(envs.episode_lengths(), vec![0, 0]);
        assert_eq!(envs.episode_count(), 4);
        assert_eq!(envs.length_queue().to_vec(), vec![1, 1, 3, 1]);
        assert_eq!(envs.mean_length(), Some(1.5));
    }

    #[test]
    fn test_reset_zeroes_all_accumulators() {
        let mut envs = tracked(&[10, 10, 10]);
        envs.reset(None);
        envs.step(&actions(3));
        envs.step(&actions(3));
        assert_eq!(envs.episode_lengths(), vec![2, 2, 2]);

        envs.reset(None);
        assert_eq!(envs.episode_lengths(), vec![0, 0, 0]);
        assert_eq!(envs.episode_returns(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_queue_bound() {
        let config = EpisodeStatsConfig::default().with_deque_size(3);
        let backend = Serial::from_envs(vec![
            FixedEpisode::new(1, 1.0),
            FixedEpisode::new(1, 2.0),
        ]);
        let mut envs = VecEpisodeStats::with_config(backend, config).unwrap();
        envs.reset(None);

        for _ in 0..4 {
            envs.step(&actions(2));
        }

        assert_eq!(envs.episode_count(), 8);
        assert_eq!(envs.return_queue().len(), 3);
        assert_eq!(envs.length_queue().len(), 3);
        assert_eq!(envs.return_queue().to_vec(), vec![2.0, 1.0, 2.0]);
    }

    #[test]
    fn test_list_info_after_stats() {
        let mut envs = ListInfo::new(tracked(&[1, 2]));
        envs.reset(None);

        let result = envs.step(&actions(2));
        let infos = result.infos.as_list().unwrap();
        assert_eq!(infos[0].episode.map(|e| e.l), Some(1));
        assert!(infos[1].episode.is_none());

        let result = envs.step(&actions(2));
        let infos = result.infos.as_list().unwrap();
        assert_eq!(infos[1].episode.map(|e| e.r), Some(4.0));
        assert_eq!(envs.inner().episode_count(), 3);
    }

    #[test]
    fn test_wrong_wrapping_order() {
        let backend = ListInfo::new(Serial::from_envs(vec![
            FixedEpisode::new(1, 1.0),
            FixedEpisode::new(1, 1.0),
        ]));
        let mut envs = VecEpisodeStats::new(backend);
        envs.reset(None);

        let err = envs.try_step(&actions(2)).unwrap_err();
        assert!(matches!(err, StatsError::InfoLayout("list")));
        assert_eq!(envs.episode_count(), 0);
    }

    #[test]
    #[should_panic(expected = "wrap with ListInfo after VecEpisodeStats")]
    fn test_wrong_wrapping_order_panics_in_step() {
        let backend = ListInfo::new(Serial::from_envs(vec![FixedEpisode::new(50, 1.0)]));
        let mut envs = VecEpisodeStats::new(backend);
        envs.reset(None);
        envs.step(&actions(1));
    }

    #[test]
    fn test_sub_env_summary_is_error() {
        let backend = Serial::new(|| EpisodeStats::new(FixedEpisode::new(2, 1.0)), 2);
        let mut envs = VecEpisodeStats::new(backend);
        envs.reset(None);

        envs.try_step(&actions(2)).unwrap();
        let err = envs.try_step(&actions(2)).unwrap_err();
        assert!(matches!(err, StatsError::DuplicateKey("episode")));
        assert_eq!(envs.episode_count(), 0);
        assert!(envs.return_queue().is_empty());
        assert_eq!(envs.episode_lengths(), vec![1, 1]);
    }

    #[test]
    fn test_existing_batch_is_error() {
        let mut envs = VecEpisodeStats::new(PrefilledBackend);
        envs.reset(None);

        let err = envs.try_step(&actions(2)).unwrap_err();
        assert!(matches!(err, StatsError::DuplicateKey("episode")));
    }
}
