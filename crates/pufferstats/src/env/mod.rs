//! Environment traits and wrappers.
//!
//! Provides the core `PufferEnv` trait that wrapped environments implement,
//! plus the `EpisodeStats` wrapper that records per-episode return and length.

mod traits;
mod wrappers;

pub use traits::{EnvInfo, PufferEnv, StepResult};
pub use wrappers::EpisodeStats;
