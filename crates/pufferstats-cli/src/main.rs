//! pufferstats CLI
//!
//! Runs the reference environments under the episode statistics trackers
//! with a random policy and logs what they record.

use anyhow::{anyhow, ensure, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use pufferstats::prelude::*;
use pufferstats_envs::ENV_NAMES;

#[derive(Parser)]
#[command(name = "pstats")]
#[command(version, about = "pufferstats - Episode statistics for RL environments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available environments
    List,

    /// Record episode statistics of a single environment (random policy)
    Eval {
        /// Environment name
        env: String,

        /// Number of episodes
        #[arg(long, default_value = "10")]
        episodes: usize,

        /// Number of recent episodes kept in the history queues
        #[arg(long, default_value = "100")]
        deque_size: usize,

        /// Seed for the first reset and the policy
        #[arg(long, default_value = "0")]
        seed: u64,
    },

    /// Record episode statistics of a serial vector of environments
    VecEval {
        /// Environment name
        env: String,

        /// Number of environments
        #[arg(long, default_value = "4")]
        num_envs: usize,

        /// Number of vector steps
        #[arg(long, default_value = "1000")]
        steps: usize,

        /// Seed for the first reset and the policy
        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => list_envs(),
        Commands::Eval {
            env,
            episodes,
            deque_size,
            seed,
        } => eval(&env, episodes, deque_size, seed)?,
        Commands::VecEval {
            env,
            num_envs,
            steps,
            seed,
        } => vec_eval(&env, num_envs, steps, seed)?,
    }

    Ok(())
}

fn make_env(name: &str) -> Result<Box<dyn PufferEnv>> {
    pufferstats_envs::make(name).ok_or_else(|| {
        anyhow!(
            "Unknown environment: {name} (expected one of {})",
            ENV_NAMES.join(", ")
        )
    })
}

fn eval(env_name: &str, episodes: usize, deque_size: usize, seed: u64) -> Result<()> {
    let config = EpisodeStatsConfig::default().with_deque_size(deque_size);
    let mut env = EpisodeStats::with_config(make_env(env_name)?, config)?;
    let mut rng = StdRng::seed_from_u64(seed);

    tracing::info!(
        env = env_name,
        episodes,
        deque_size,
        seed,
        "Starting evaluation (random policy)"
    );

    env.reset(Some(seed));
    let mut completed = 0;
    while completed < episodes {
        let action = env.action_space().sample(&mut rng);
        let result = env.step(&action);

        if let Some(episode) = result.info.episode {
            completed += 1;
            tracing::info!(
                episode = completed,
                r = episode.r,
                l = episode.l,
                t = episode.t,
                "Episode finished"
            );
            env.reset(None);
        }
    }

    tracing::info!(
        episodes = env.episode_count(),
        kept = env.return_queue().len(),
        mean_return = env.mean_return().unwrap_or_default(),
        mean_length = env.mean_length().unwrap_or_default(),
        "Evaluation complete"
    );
    env.close();
    Ok(())
}

fn vec_eval(env_name: &str, num_envs: usize, steps: usize, seed: u64) -> Result<()> {
    ensure!(num_envs > 0, "--num-envs must be at least 1");
    let envs = (0..num_envs)
        .map(|_| make_env(env_name))
        .collect::<Result<Vec<_>>>()?;
    let mut envs = VecEpisodeStats::new(Serial::from_envs(envs));
    let mut rng = StdRng::seed_from_u64(seed);

    tracing::info!(
        env = env_name,
        num_envs,
        steps,
        seed,
        "Starting vectorized evaluation (random policy)"
    );

    envs.reset(Some(seed));
    for step in 0..steps {
        let actions = envs.action_space().sample_batch(num_envs, &mut rng);
        let result = envs.try_step(&actions)?;

        if let Some(mask) = result.infos.as_batched().and_then(|info| info.episode_mask()) {
            tracing::info!(step, ?mask, "Sub-environments finished");
        }
    }

    tracing::info!(
        episodes = envs.episode_count(),
        mean_return = envs.mean_return().unwrap_or_default(),
        mean_length = envs.mean_length().unwrap_or_default(),
        "Evaluation complete"
    );
    envs.close();
    Ok(())
}

fn list_envs() {
    println!("Available environments:");
    println!();
    println!("  cartpole   CartPole classic control");
    println!("             Terminates on failure, truncates at 500 steps");
    println!();
    println!("  pendulum   Pendulum swing-up (continuous action)");
    println!("             Never terminates, truncates at 200 steps");
    println!();
    println!("  bandit     Multi-armed bandit (discrete, 4 arms)");
    println!("             Every episode is a single step");
}
