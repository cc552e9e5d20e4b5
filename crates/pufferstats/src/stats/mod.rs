//! Episode bookkeeping shared by the scalar and vector wrappers.
//!
//! Provides:
//! - `EpisodeAccumulator` for the running return and length of one episode
//! - `EpisodeSummary` emitted once per completed episode
//! - `HistoryQueue` bounded FIFO of recent results
//! - `EpisodeBatch` and `add_vector_episode_statistics` for vector steps

mod accumulator;
mod batch;
mod config;
mod history;
mod summary;

pub use accumulator::EpisodeAccumulator;
pub use batch::{add_vector_episode_statistics, EpisodeBatch};
pub use config::EpisodeStatsConfig;
pub use history::HistoryQueue;
pub use summary::EpisodeSummary;
