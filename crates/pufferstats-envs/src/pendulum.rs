//! Inverted pendulum swing-up environment.
//!
//! Continuous torque control with no terminal state: every episode ends by
//! truncation.

use ndarray::{arr1, ArrayD};
use pufferstats::env::{EnvInfo, PufferEnv, StepResult};
use pufferstats::spaces::DynSpace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

const MAX_SPEED: f32 = 8.0;
const MAX_TORQUE: f32 = 2.0;
const DT: f32 = 0.05;
const G: f32 = 10.0;
const M: f32 = 1.0;
const L: f32 = 1.0;

/// Wrap an angle into `[-pi, pi)`
fn angle_normalize(x: f32) -> f32 {
    (x + PI).rem_euclid(2.0 * PI) - PI
}

/// Pendulum environment
///
/// Observation: [cos(theta), sin(theta), theta_dot]
/// Action: torque in [-2, 2]
pub struct Pendulum {
    max_steps: u32,
    theta: f32,
    theta_dot: f32,
    steps: u32,
    rng: StdRng,
}

impl Pendulum {
    /// Create a new Pendulum truncating at 200 steps
    pub fn new() -> Self {
        Self::with_max_steps(200)
    }

    pub fn with_max_steps(max_steps: u32) -> Self {
        assert!(max_steps > 0, "max_steps must be > 0");
        Self {
            max_steps,
            theta: 0.0,
            theta_dot: 0.0,
            steps: 0,
            rng: StdRng::from_entropy(),
        }
    }

    fn observation(&self) -> ArrayD<f32> {
        arr1(&[self.theta.cos(), self.theta.sin(), self.theta_dot]).into_dyn()
    }
}

impl Default for Pendulum {
    fn default() -> Self {
        Self::new()
    }
}

impl PufferEnv for Pendulum {
    fn observation_space(&self) -> DynSpace {
        let high = arr1(&[1.0, 1.0, MAX_SPEED]).into_dyn();
        DynSpace::Box {
            low: -&high,
            high,
        }
    }

    fn action_space(&self) -> DynSpace {
        DynSpace::uniform(&[1], -MAX_TORQUE, MAX_TORQUE)
    }

    fn reset(&mut self, seed: Option<u64>) -> (ArrayD<f32>, EnvInfo) {
        if let Some(s) = seed {
            self.rng = StdRng::seed_from_u64(s);
        }

        self.theta = self.rng.gen_range(-PI..PI);
        self.theta_dot = self.rng.gen_range(-1.0..1.0);
        self.steps = 0;

        (self.observation(), EnvInfo::new())
    }

    fn step(&mut self, action: &ArrayD<f32>) -> StepResult {
        let torque = action
            .iter()
            .next()
            .copied()
            .unwrap_or(0.0)
            .clamp(-MAX_TORQUE, MAX_TORQUE);

        let (theta, theta_dot) = (self.theta, self.theta_dot);
        let cost = angle_normalize(theta).powi(2)
            + 0.1 * theta_dot * theta_dot
            + 0.001 * torque * torque;

        let new_theta_dot = theta_dot
            + (3.0 * G / (2.0 * L) * theta.sin() + 3.0 / (M * L * L) * torque) * DT;
        self.theta_dot = new_theta_dot.clamp(-MAX_SPEED, MAX_SPEED);
        self.theta = angle_normalize(theta + self.theta_dot * DT);
        self.steps += 1;

        StepResult {
            observation: self.observation(),
            reward: -cost,
            terminated: false,
            truncated: self.steps >= self.max_steps,
            info: EnvInfo::new(),
        }
    }

    fn is_done(&self) -> bool {
        self.steps >= self.max_steps
    }
}
