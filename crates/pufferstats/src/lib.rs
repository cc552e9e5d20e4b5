//! # pufferstats
//!
//! Episode statistics recording for reinforcement learning environments.
//!
//! ## Overview
//!
//! pufferstats provides:
//! - `EpisodeStats`, a wrapper that records the return and length of every
//!   episode of a single `PufferEnv`
//! - `VecEpisodeStats`, the same for a vectorized backend, merging the
//!   summaries of all sub-environments into one masked batch per step
//! - Bounded history queues of recent returns, lengths and wall-times
//!
//! The wrappers never change what the inner environment returns; they only
//! add an episode summary to the step info when an episode ends.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pufferstats::prelude::*;
//! use pufferstats_envs::CartPole;
//!
//! let mut env = EpisodeStats::new(CartPole::new());
//! env.reset(Some(42));
//!
//! let action = ArrayD::from_elem(IxDyn(&[1]), 1.0);
//! let result = env.step(&action);
//! if let Some(episode) = result.info.episode {
//!     println!("return={} length={}", episode.r, episode.l);
//! }
//! ```

pub mod env;
pub mod spaces;
pub mod stats;
pub mod vector;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::env::{EnvInfo, EpisodeStats, PufferEnv, StepResult};
    pub use crate::spaces::DynSpace;
    pub use crate::stats::{
        add_vector_episode_statistics, EpisodeAccumulator, EpisodeBatch, EpisodeStatsConfig,
        EpisodeSummary, HistoryQueue,
    };
    pub use crate::vector::{
        ListInfo, Serial, VecEnvBackend, VecEnvInfo, VecEnvResult, VecEpisodeStats, VecInfos,
    };
    pub use crate::{Result, StatsError};
    pub use ndarray::{Array2, ArrayD, IxDyn};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Contract violations raised by the statistics wrappers.
///
/// None of these are transient: each one means the wrappers were composed or
/// called incorrectly.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("info already contains `{0}`; episode statistics would be recorded twice")]
    DuplicateKey(&'static str),

    #[error("sub-environment index {index} out of range for {num_envs} environments")]
    IndexOutOfRange { index: usize, num_envs: usize },

    #[error("Shape mismatch: expected {expected} environments, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error(
        "info layout is `{0}` but episode statistics need batched info; \
         wrap with ListInfo after VecEpisodeStats, not before"
    )]
    InfoLayout(&'static str),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, StatsError>;
