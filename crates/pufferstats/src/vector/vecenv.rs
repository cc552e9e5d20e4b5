//! Vectorized environment abstraction.

use crate::env::EnvInfo;
use crate::spaces::DynSpace;
use crate::stats::EpisodeBatch;
use ndarray::Array2;

/// Batched info for one vector step
#[derive(Clone, Debug, Default)]
pub struct VecEnvInfo {
    /// Info reported by each sub-environment
    pub envs: Vec<EnvInfo>,
    /// Episode summaries of sub-environments that finished this step
    pub episode: Option<EpisodeBatch>,
}

impl VecEnvInfo {
    /// Wrap per-sub-environment infos with no episode batch
    pub fn new(envs: Vec<EnvInfo>) -> Self {
        Self {
            envs,
            episode: None,
        }
    }

    /// Which sub-environments finished an episode this step
    pub fn episode_mask(&self) -> Option<&[bool]> {
        self.episode.as_ref().map(|batch| batch.mask.as_slice())
    }
}

/// Layout of the info returned by a vector step
#[derive(Clone, Debug)]
pub enum VecInfos {
    /// One batched structure, as produced by backends
    Batched(VecEnvInfo),
    /// One info per sub-environment, as produced by `ListInfo`
    List(Vec<EnvInfo>),
}

impl VecInfos {
    /// Short name of the layout, used in error messages
    pub fn layout(&self) -> &'static str {
        match self {
            Self::Batched(_) => "batched",
            Self::List(_) => "list",
        }
    }

    pub fn as_batched(&self) -> Option<&VecEnvInfo> {
        match self {
            Self::Batched(info) => Some(info),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[EnvInfo]> {
        match self {
            Self::Batched(_) => None,
            Self::List(infos) => Some(infos),
        }
    }

    /// Convert to one info per sub-environment.
    ///
    /// Each masked slot of the episode batch moves into the matching
    /// `EnvInfo::episode`. A summary the sub-environment already reported is
    /// kept.
    pub fn into_list(self) -> Vec<EnvInfo> {
        match self {
            Self::List(infos) => infos,
            Self::Batched(VecEnvInfo { mut envs, episode }) => {
                if let Some(batch) = episode {
                    for (i, summary) in batch.completed() {
                        if let Some(info) = envs.get_mut(i) {
                            info.episode.get_or_insert(summary);
                        }
                    }
                }
                envs
            }
        }
    }
}

/// Result from stepping all environments
#[derive(Clone, Debug)]
pub struct VecEnvResult {
    /// Observations for all environments, one row each
    pub observations: Array2<f32>,
    /// Rewards for all environments
    pub rewards: Vec<f32>,
    /// Terminated flags
    pub terminated: Vec<bool>,
    /// Truncated flags
    pub truncated: Vec<bool>,
    /// Step info
    pub infos: VecInfos,
}

impl VecEnvResult {
    /// Check which environments are done
    pub fn dones(&self) -> Vec<bool> {
        self.terminated
            .iter()
            .zip(self.truncated.iter())
            .map(|(&t, &tr)| t || tr)
            .collect()
    }
}

/// Trait for vectorized environment backends and wrappers around them
pub trait VecEnvBackend: Send {
    /// Get the observation space (single env)
    fn observation_space(&self) -> DynSpace;

    /// Get the action space (single env)
    fn action_space(&self) -> DynSpace;

    /// Get the number of environments
    fn num_envs(&self) -> usize;

    /// Reset all environments
    fn reset(&mut self, seed: Option<u64>) -> (Array2<f32>, VecInfos);

    /// Step all environments with given actions, one row per environment
    fn step(&mut self, actions: &Array2<f32>) -> VecEnvResult;

    /// Close all environments
    fn close(&mut self);
}
