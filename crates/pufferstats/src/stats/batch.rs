//! Batched episode statistics for vectorized environments.

use super::EpisodeSummary;
use crate::vector::VecEnvInfo;
use crate::{Result, StatsError};
use serde::{Deserialize, Serialize};

/// Episode summaries of every sub-environment for one vector step.
///
/// Slot `i` holds sub-environment `i`. Numeric slots are only meaningful
/// where `mask[i]` is true; everywhere else they stay at 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeBatch {
    /// Episode returns
    pub r: Vec<f64>,
    /// Episode lengths
    pub l: Vec<u64>,
    /// Episode wall-clock seconds
    pub t: Vec<f64>,
    /// Which sub-environments finished an episode on this step
    pub mask: Vec<bool>,
}

impl EpisodeBatch {
    /// Zero-filled batch with an all-false mask
    pub fn new(num_envs: usize) -> Self {
        Self {
            r: vec![0.0; num_envs],
            l: vec![0; num_envs],
            t: vec![0.0; num_envs],
            mask: vec![false; num_envs],
        }
    }

    pub fn num_envs(&self) -> usize {
        self.mask.len()
    }

    /// Summary for `index`, if that sub-environment finished this step
    pub fn get(&self, index: usize) -> Option<EpisodeSummary> {
        match self.mask.get(index) {
            Some(true) => Some(EpisodeSummary {
                r: self.r[index],
                l: self.l[index],
                t: self.t[index],
            }),
            _ => None,
        }
    }

    /// Masked summaries in index order
    pub fn completed(&self) -> impl Iterator<Item = (usize, EpisodeSummary)> + '_ {
        (0..self.num_envs()).filter_map(move |i| self.get(i).map(|s| (i, s)))
    }

    fn write(&mut self, index: usize, summary: &EpisodeSummary) {
        self.r[index] = summary.r;
        self.l[index] = summary.l;
        self.t[index] = summary.t;
        self.mask[index] = true;
    }
}

/// Merge one sub-environment's summary into the batched info.
///
/// Allocates the batch on first use, then writes only slot `env_index`, so
/// it can be called once per finished sub-environment against the same info.
/// Fails without touching `info` if `env_index` is outside `0..num_envs` or
/// an existing batch was sized for a different `num_envs`.
pub fn add_vector_episode_statistics(
    info: &mut VecEnvInfo,
    summary: &EpisodeSummary,
    num_envs: usize,
    env_index: usize,
) -> Result<()> {
    if env_index >= num_envs {
        return Err(StatsError::IndexOutOfRange {
            index: env_index,
            num_envs,
        });
    }
    if let Some(batch) = &info.episode {
        if batch.num_envs() != num_envs {
            return Err(StatsError::ShapeMismatch {
                expected: num_envs,
                actual: batch.num_envs(),
            });
        }
    }

    info.episode
        .get_or_insert_with(|| EpisodeBatch::new(num_envs))
        .write(env_index, summary);
    Ok(())
}
