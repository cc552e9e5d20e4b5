//! Flattening of batched vector info.

use super::vecenv::{VecEnvBackend, VecEnvResult, VecInfos};
use crate::spaces::DynSpace;
use ndarray::Array2;

/// Converts batched info into one `EnvInfo` per sub-environment.
///
/// Episode summaries from `VecEpisodeStats` land in each sub-environment's
/// `EnvInfo::episode`. Wrap statistics first and flatten last:
/// `ListInfo::new(VecEpisodeStats::new(backend))`. The other order fails on
/// the first step because the statistics need the batched layout.
pub struct ListInfo<B: VecEnvBackend> {
    backend: B,
}

impl<B: VecEnvBackend> ListInfo<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn inner(&self) -> &B {
        &self.backend
    }

    pub fn inner_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: VecEnvBackend> VecEnvBackend for ListInfo<B> {
    fn observation_space(&self) -> DynSpace {
        self.backend.observation_space()
    }

    fn action_space(&self) -> DynSpace {
        self.backend.action_space()
    }

    fn num_envs(&self) -> usize {
        self.backend.num_envs()
    }

    fn reset(&mut self, seed: Option<u64>) -> (Array2<f32>, VecInfos) {
        let (obs, infos) = self.backend.reset(seed);
        (obs, VecInfos::List(infos.into_list()))
    }

    fn step(&mut self, actions: &Array2<f32>) -> VecEnvResult {
        let mut result = self.backend.step(actions);
        result.infos = VecInfos::List(result.infos.into_list());
        result
    }

    fn close(&mut self) {
        self.backend.close()
    }
}
