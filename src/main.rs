use std::fs::File;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pellet_world::render::render;
use pellet_world::stats::{self, Summary};
use pellet_world::training::{evaluate, train};
use pellet_world::{Agent, Environment, GridConfig, Hyperparameters, TrainingConfig};

#[derive(Parser)]
#[command(name = "pellet-world")]
#[command(version, about = "Train a Q-learning agent to collect pellets while dodging a ghost")]
struct Cli {
    /// Board side length, border included
    #[arg(long, default_value = "20")]
    size: usize,

    /// Pellets placed each episode
    #[arg(long, default_value = "10")]
    density: usize,

    /// Training episodes
    #[arg(long, default_value = "1000")]
    episodes: usize,

    /// Exploration rate
    #[arg(long, default_value = "0.05")]
    epsilon: f64,

    /// Discount factor
    #[arg(long, default_value = "0.99")]
    gamma: f64,

    /// Learning rate
    #[arg(long, default_value = "0.01")]
    alpha: f64,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Cut episodes short after this many steps
    #[arg(long, default_value = "1000")]
    max_steps: usize,

    /// Pause between rendered evaluation steps
    #[arg(long, default_value = "100")]
    delay_ms: u64,

    /// Write per-episode training statistics to this CSV file
    #[arg(long)]
    stats: Option<String>,

    /// Skip the rendered evaluation episode
    #[arg(long)]
    no_render: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let grid = GridConfig::new(cli.size, cli.density);
    let params = Hyperparameters {
        epsilon: cli.epsilon,
        gamma: cli.gamma,
        alpha: cli.alpha,
    };
    let training = TrainingConfig {
        episodes: cli.episodes,
        max_steps: Some(cli.max_steps),
        ..Default::default()
    };

    let (mut env, mut agent) = match cli.seed {
        // agent and environment draw from separate streams
        Some(seed) => (
            Environment::seeded(grid, seed)?,
            Agent::seeded(params, seed.wrapping_add(1))?,
        ),
        None => (Environment::new(grid)?, Agent::new(params)?),
    };

    info!(size = cli.size, density = cli.density, episodes = cli.episodes, "training");
    let history = train(&mut env, &mut agent, &training)?;
    let summary = Summary::of(&history);
    info!(
        mean_reward = summary.mean_reward,
        cleared = summary.cleared,
        caught = summary.caught,
        truncated = summary.truncated,
        weights = agent.estimator().weights().len(),
        "training finished"
    );

    if let Some(path) = &cli.stats {
        let file = File::create(path).with_context(|| format!("could not create {}", path))?;
        stats::write_csv(file, &history).with_context(|| format!("could not write {}", path))?;
        info!(path = %path, "statistics written");
    }

    if cli.no_render {
        return Ok(());
    }

    let delay = Duration::from_millis(cli.delay_ms);
    let result = evaluate(&mut env, &mut agent, Some(cli.max_steps), |env| {
        println!("{}", render(env));
        thread::sleep(delay);
    });
    info!(
        steps = result.steps,
        reward = result.total_reward,
        outcome = %result.outcome,
        "evaluation finished"
    );

    Ok(())
}
