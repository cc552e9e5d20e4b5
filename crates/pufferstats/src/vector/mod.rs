//! Vectorized environments.
//!
//! Provides:
//! - `VecEnvBackend` trait and the batched step/info types
//! - `Serial` - Sequential in-thread backend with same-step auto-reset
//! - `VecEpisodeStats` - per-sub-environment episode statistics
//! - `ListInfo` - flattens batched info into one `EnvInfo` per sub-environment

mod episode_stats;
mod list_info;
mod serial;
mod vecenv;

pub use episode_stats::VecEpisodeStats;
pub use list_info::ListInfo;
pub use serial::Serial;
pub use vecenv::{VecEnvBackend, VecEnvInfo, VecEnvResult, VecInfos};
