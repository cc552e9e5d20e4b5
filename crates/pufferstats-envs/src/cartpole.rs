//! CartPole classic control environment.

use ndarray::{Array1, ArrayD};
use pufferstats::env::{EnvInfo, PufferEnv, StepResult};
use pufferstats::spaces::DynSpace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

const GRAVITY: f32 = 9.8;
const MASS_CART: f32 = 1.0;
const MASS_POLE: f32 = 0.1;
const TOTAL_MASS: f32 = MASS_CART + MASS_POLE;
// Half-pole length
const LENGTH: f32 = 0.5;
const POLE_MASS_LENGTH: f32 = MASS_POLE * LENGTH;
const FORCE_MAG: f32 = 10.0;
const TAU: f32 = 0.02;
const THETA_THRESHOLD: f32 = 12.0 * 2.0 * PI / 360.0;
const X_THRESHOLD: f32 = 2.4;

/// CartPole environment
///
/// A pole is attached to a cart on a frictionless track. The goal
/// is to balance the pole by applying forces to the cart.
///
/// Observation: [cart_pos, cart_vel, pole_angle, pole_vel]
/// Action: 0 = push left, 1 = push right
pub struct CartPole {
    max_steps: u32,
    // x, x_dot, theta, theta_dot
    state: [f32; 4],
    steps: u32,
    done: bool,
    rng: StdRng,
}

impl CartPole {
    /// Create a new CartPole environment truncating at 500 steps
    pub fn new() -> Self {
        Self::with_max_steps(500)
    }

    pub fn with_max_steps(max_steps: u32) -> Self {
        assert!(max_steps > 0, "max_steps must be > 0");
        Self {
            max_steps,
            state: [0.0; 4],
            steps: 0,
            done: false,
            rng: StdRng::from_entropy(),
        }
    }

    fn is_terminal(&self) -> bool {
        let x = self.state[0];
        let theta = self.state[2];

        x.abs() > X_THRESHOLD || theta.abs() > THETA_THRESHOLD
    }

    fn observation(&self) -> ArrayD<f32> {
        Array1::from(self.state.to_vec()).into_dyn()
    }
}

impl Default for CartPole {
    fn default() -> Self {
        Self::new()
    }
}

impl PufferEnv for CartPole {
    fn observation_space(&self) -> DynSpace {
        // Observation bounds (loosely)
        DynSpace::uniform(&[4], -4.8, 4.8)
    }

    fn action_space(&self) -> DynSpace {
        DynSpace::discrete(2)
    }

    fn reset(&mut self, seed: Option<u64>) -> (ArrayD<f32>, EnvInfo) {
        if let Some(s) = seed {
            self.rng = StdRng::seed_from_u64(s);
        }

        // Initialize state randomly in [-0.05, 0.05]
        for v in self.state.iter_mut() {
            *v = self.rng.gen::<f32>() * 0.1 - 0.05;
        }

        self.steps = 0;
        self.done = false;

        (self.observation(), EnvInfo::new())
    }

    fn step(&mut self, action: &ArrayD<f32>) -> StepResult {
        let push_right = action.iter().next().is_some_and(|&a| a.round() >= 1.0);

        let [x, x_dot, theta, theta_dot] = self.state;
        let force = if push_right { FORCE_MAG } else { -FORCE_MAG };

        let cos_theta = theta.cos();
        let sin_theta = theta.sin();

        let temp = (force + POLE_MASS_LENGTH * theta_dot * theta_dot * sin_theta) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin_theta - cos_theta * temp)
            / (LENGTH * (4.0 / 3.0 - MASS_POLE * cos_theta * cos_theta / TOTAL_MASS));
        let x_acc = temp - POLE_MASS_LENGTH * theta_acc * cos_theta / TOTAL_MASS;

        // Euler integration
        self.state[0] = x + TAU * x_dot;
        self.state[1] = x_dot + TAU * x_acc;
        self.state[2] = theta + TAU * theta_dot;
        self.state[3] = theta_dot + TAU * theta_acc;

        self.steps += 1;

        let terminated = self.is_terminal();
        let truncated = !terminated && self.steps >= self.max_steps;
        self.done = terminated || truncated;

        StepResult {
            observation: self.observation(),
            reward: 1.0,
            terminated,
            truncated,
            info: EnvInfo::new(),
        }
    }

    fn render(&self) -> Option<String> {
        let [x, _, theta, _] = self.state;

        let cart_pos = ((x + X_THRESHOLD) / (2.0 * X_THRESHOLD) * 20.0) as i32;
        let cart_pos = cart_pos.clamp(0, 20);

        let mut line = vec![' '; 21];
        line[cart_pos as usize] = if theta.abs() < 0.1 { '|' } else { '/' };

        Some(format!("[{}]", line.iter().collect::<String>()))
    }

    fn is_done(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    fn push(direction: f32) -> ArrayD<f32> {
        ArrayD::from_elem(IxDyn(&[1]), direction)
    }

    #[test]
    fn test_cartpole_reset() {
        let mut env = CartPole::new();
        let (obs, info) = env.reset(Some(42));

        assert_eq!(obs.len(), 4);
        assert!(obs.iter().all(|v| v.abs() <= 0.05));
        assert!(info.episode.is_none());
        assert!(!env.is_done());
    }

    #[test]
    fn test_cartpole_falls_when_pushed_one_way() {
        let mut env = CartPole::new();
        env.reset(Some(0));

        let mut steps = 0;
        loop {
            let result = env.step(&push(1.0));
            steps += 1;
            assert_eq!(result.reward, 1.0);
            if result.done() {
                assert!(result.terminated);
                break;
            }
        }
        assert!(steps < 100);
        assert!(env.is_done());
    }

    #[test]
    fn test_cartpole_truncates_at_max_steps() {
        let mut env = CartPole::with_max_steps(3);
        env.reset(Some(1));

        // Alternate pushes keep the pole up for a few steps
        env.step(&push(1.0));
        env.step(&push(0.0));
        let result = env.step(&push(1.0));
        assert!(result.truncated);
        assert!(!result.terminated);
    }

    #[test]
    fn test_cartpole_determinism() {
        let mut env1 = CartPole::new();
        let mut env2 = CartPole::new();

        env1.reset(Some(42));
        env2.reset(Some(42));

        for _ in 0..10 {
            let res1 = env1.step(&push(1.0));
            let res2 = env2.step(&push(1.0));
            assert_eq!(res1.observation, res2.observation);
        }
    }
}
