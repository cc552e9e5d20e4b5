//! Running statistics of the episode in progress.

use super::EpisodeSummary;
use std::time::Instant;

/// Return, length and start time of the current episode.
#[derive(Clone, Debug)]
pub struct EpisodeAccumulator {
    return_sum: f64,
    length: u64,
    start_time: Instant,
}

impl Default for EpisodeAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl EpisodeAccumulator {
    /// Start a fresh episode now
    pub fn new() -> Self {
        Self {
            return_sum: 0.0,
            length: 0,
            start_time: Instant::now(),
        }
    }

    /// Zero the return and length and restart the clock
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Account for one step
    pub fn record(&mut self, reward: f32) {
        self.return_sum += f64::from(reward);
        self.length += 1;
    }

    /// Return accumulated so far
    pub fn episode_return(&self) -> f64 {
        self.return_sum
    }

    /// Steps taken so far
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Seconds since the episode started, rounded to microseconds
    pub fn elapsed(&self) -> f64 {
        (self.start_time.elapsed().as_secs_f64() * 1e6).round() / 1e6
    }

    /// Snapshot the episode as a summary
    pub fn summarize(&self) -> EpisodeSummary {
        EpisodeSummary {
            r: self.return_sum,
            l: self.length,
            t: self.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_reset() {
        let mut acc = EpisodeAccumulator::new();
        assert_eq!(acc.episode_return(), 0.0);
        assert_eq!(acc.length(), 0);

        acc.record(1.5);
        acc.record(-0.5);
        assert_eq!(acc.episode_return(), 1.0);
        assert_eq!(acc.length(), 2);

        acc.reset();
        assert_eq!(acc.episode_return(), 0.0);
        assert_eq!(acc.length(), 0);
    }

    #[test]
    fn test_summarize() {
        let mut acc = EpisodeAccumulator::new();
        for _ in 0..3 {
            acc.record(2.0);
        }

        let summary = acc.summarize();
        assert_eq!(summary.r, 6.0);
        assert_eq!(summary.l, 3);
        assert!(summary.t >= 0.0);
        assert_eq!((summary.t * 1e6).round() / 1e6, summary.t);
    }
}
