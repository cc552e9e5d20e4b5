//! Completed-episode summary.

use serde::{Deserialize, Serialize};

/// Final statistics of one completed episode.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Episode return (sum of rewards)
    pub r: f64,
    /// Episode length in steps
    pub l: u64,
    /// Wall-clock seconds from episode start, microsecond precision
    pub t: f64,
}
