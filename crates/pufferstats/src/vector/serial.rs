//! Serial (sequential) vectorization backend.
//!
//! Runs environments one at a time in a single thread. Sub-environments
//! whose episode ends are reset inside the same step.

use super::vecenv::{VecEnvBackend, VecEnvInfo, VecEnvResult, VecInfos};
use crate::env::PufferEnv;
use crate::spaces::DynSpace;
use ndarray::{Array2, ArrayD, ArrayViewMut1};

/// Serial vectorization backend
pub struct Serial<E: PufferEnv> {
    /// Created environments
    envs: Vec<E>,
    /// Flattened observation size of one environment
    obs_size: usize,
}

impl<E: PufferEnv> Serial<E> {
    /// Create `num_envs` environments from a factory
    pub fn new<F>(env_creator: F, num_envs: usize) -> Self
    where
        F: Fn() -> E,
    {
        Self::from_envs((0..num_envs).map(|_| env_creator()).collect())
    }

    /// Use already-built environments; slot `i` is `envs[i]`
    pub fn from_envs(envs: Vec<E>) -> Self {
        assert!(!envs.is_empty(), "Number of environments must be > 0");
        let obs_size = envs[0].observation_space().num_elements();
        Self { envs, obs_size }
    }

    /// Sub-environments, in slot order
    pub fn envs(&self) -> &[E] {
        &self.envs
    }
}

fn write_row(mut row: ArrayViewMut1<'_, f32>, obs: &ArrayD<f32>) {
    assert_eq!(
        row.len(),
        obs.len(),
        "Observation size does not match the observation space"
    );
    for (dst, &src) in row.iter_mut().zip(obs.iter()) {
        *dst = src;
    }
}

impl<E: PufferEnv> VecEnvBackend for Serial<E> {
    fn observation_space(&self) -> DynSpace {
        self.envs[0].observation_space()
    }

    fn action_space(&self) -> DynSpace {
        self.envs[0].action_space()
    }

    fn num_envs(&self) -> usize {
        self.envs.len()
    }

    fn reset(&mut self, seed: Option<u64>) -> (Array2<f32>, VecInfos) {
        let mut observations = Array2::zeros((self.envs.len(), self.obs_size));
        let mut infos = Vec::with_capacity(self.envs.len());

        for (i, env) in self.envs.iter_mut().enumerate() {
            let env_seed = seed.map(|s| s.wrapping_add(i as u64));
            let (obs, info) = env.reset(env_seed);
            write_row(observations.row_mut(i), &obs);
            infos.push(info);
        }

        (observations, VecInfos::Batched(VecEnvInfo::new(infos)))
    }

    fn step(&mut self, actions: &Array2<f32>) -> VecEnvResult {
        assert_eq!(
            actions.nrows(),
            self.envs.len(),
            "Expected one action row per environment"
        );
        let num_envs = self.envs.len();
        let mut observations = Array2::zeros((num_envs, self.obs_size));
        let mut rewards = Vec::with_capacity(num_envs);
        let mut terminated = Vec::with_capacity(num_envs);
        let mut truncated = Vec::with_capacity(num_envs);
        let mut infos = Vec::with_capacity(num_envs);

        for (i, env) in self.envs.iter_mut().enumerate() {
            let action = actions.row(i).to_owned().into_dyn();
            let mut result = env.step(&action);

            if result.done() {
                // Same-step auto-reset: report the first observation of the
                // next episode and keep the terminal one in the info
                let (obs, _) = env.reset(None);
                result.info.final_observation =
                    Some(std::mem::replace(&mut result.observation, obs));
            }

            write_row(observations.row_mut(i), &result.observation);
            rewards.push(result.reward);
            terminated.push(result.terminated);
            truncated.push(result.truncated);
            infos.push(result.info);
        }

        VecEnvResult {
            observations,
            rewards,
            terminated,
            truncated,
            infos: VecInfos::Batched(VecEnvInfo::new(infos)),
        }
    }

    fn close(&mut self) {
        for env in &mut self.envs {
            env.close();
        }
    }
}
