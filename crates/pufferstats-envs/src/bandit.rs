//! Multi-armed bandit environment.

use ndarray::{ArrayD, IxDyn};
use pufferstats::env::{EnvInfo, PufferEnv, StepResult};
use pufferstats::spaces::DynSpace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Multi-armed bandit environment
///
/// Every episode is a single pull. The paying arm is chosen from a fixed
/// seed, so all instances share it.
pub struct Bandit {
    num_actions: usize,
    reward_noise: f32,
    solution_idx: usize,
    rng: StdRng,
}

impl Bandit {
    /// Create a noiseless bandit
    pub fn new(num_actions: usize) -> Self {
        Self::with_noise(num_actions, 0.0)
    }

    /// Create a bandit whose rewards carry uniform noise of the given scale
    pub fn with_noise(num_actions: usize, reward_noise: f32) -> Self {
        assert!(num_actions > 0, "Bandit needs at least one arm");
        let solution_idx = StdRng::seed_from_u64(42).gen_range(0..num_actions);

        Self {
            num_actions,
            reward_noise,
            solution_idx,
            rng: StdRng::from_entropy(),
        }
    }

    /// Index of the paying arm
    pub fn solution(&self) -> usize {
        self.solution_idx
    }
}

impl PufferEnv for Bandit {
    fn observation_space(&self) -> DynSpace {
        DynSpace::uniform(&[1], -1.0, 1.0)
    }

    fn action_space(&self) -> DynSpace {
        DynSpace::discrete(self.num_actions)
    }

    fn reset(&mut self, seed: Option<u64>) -> (ArrayD<f32>, EnvInfo) {
        if let Some(s) = seed {
            self.rng = StdRng::seed_from_u64(s);
        }
        (ArrayD::from_elem(IxDyn(&[1]), 1.0), EnvInfo::new())
    }

    fn step(&mut self, action: &ArrayD<f32>) -> StepResult {
        let arm = action.iter().next().map(|a| a.round() as usize);
        let correct = arm == Some(self.solution_idx);

        let mut reward = if correct { 1.0 } else { 0.0 };
        if self.reward_noise > 0.0 {
            reward += (self.rng.gen::<f32>() * 2.0 - 1.0) * self.reward_noise;
        }

        StepResult {
            observation: ArrayD::from_elem(IxDyn(&[1]), 1.0),
            reward,
            terminated: true,
            truncated: false,
            info: EnvInfo::new().with_extra("score", if correct { 1.0 } else { 0.0 }),
        }
    }

    fn render(&self) -> Option<String> {
        Some(format!("Bandit: solution arm = {}", self.solution_idx))
    }
}
