//! Reference environments for exercising the episode statistics wrappers.
//!
//! - `CartPole` - Classic control, terminates on failure, truncates at 500 steps
//! - `Pendulum` - Continuous control, never terminates, truncates at 200 steps
//! - `Bandit` - Multi-armed bandit, every episode is a single step

mod bandit;
mod cartpole;
mod pendulum;

pub use bandit::Bandit;
pub use cartpole::CartPole;
pub use pendulum::Pendulum;

use pufferstats::env::PufferEnv;

/// Names accepted by [`make`]
pub const ENV_NAMES: [&str; 3] = ["cartpole", "pendulum", "bandit"];

/// Build a boxed environment by name
pub fn make(name: &str) -> Option<Box<dyn PufferEnv>> {
    match name {
        "cartpole" => Some(Box::new(CartPole::new())),
        "pendulum" => Some(Box::new(Pendulum::new())),
        "bandit" => Some(Box::new(Bandit::new(4))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_known_names() {
        for name in ENV_NAMES {
            assert!(make(name).is_some(), "{name} should be constructible");
        }
        assert!(make("atari").is_none());
    }
}
