use tracing::{debug, info};

use crate::agent::Agent;
use crate::config::TrainingConfig;
use crate::environment::{Environment, CAUGHT_REWARD, PELLET_REWARD};
use crate::error::Result;
use crate::rl::ValueEstimator;
use crate::stats::{EpisodeStats, Outcome, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Epsilon-greedy actions, every transition is learned from.
    Explore,
    /// Greedy actions only, nothing is learned.
    Greedy,
}

/// Run a full episode, ie until the environment reaches a terminal state or
/// `max_steps` updates have been made. `on_step` sees the freshly reset
/// environment and then the environment after every update.
pub fn run_episode<E, F>(
    env: &mut Environment,
    agent: &mut Agent<E>,
    mode: Mode,
    max_steps: Option<usize>,
    mut on_step: F,
) -> EpisodeStats
where
    E: ValueEstimator,
    F: FnMut(&Environment),
{
    env.initialize();
    on_step(&*env);

    let mut steps = 0;
    let mut total_reward = 0i64;
    let mut pellets_eaten = 0;
    let mut max_td_error = 0.0f64;

    while !env.is_terminal() {
        if max_steps.map_or(false, |max| steps >= max) {
            break;
        }

        let s = env.state();
        let a = match mode {
            Mode::Explore => agent.choose(&s, env.actions()),
            Mode::Greedy => agent.policy(&s, env.actions()),
        };
        env.update(a);
        let r = env.reward();

        if mode == Mode::Explore {
            let s_p = env.state();
            let t_d = agent.observe(&s, a, &s_p, f64::from(r), env.actions());
            max_td_error = max_td_error.max(t_d.abs());
        }

        steps += 1;
        total_reward += i64::from(r);
        if r == PELLET_REWARD {
            pellets_eaten += 1;
        }
        on_step(&*env);
    }

    let outcome = if env.reward() == CAUGHT_REWARD {
        Outcome::Caught
    } else if env.pellets().is_empty() {
        Outcome::Cleared
    } else {
        Outcome::Truncated
    };

    EpisodeStats {
        episode: 0,
        steps,
        total_reward,
        pellets_eaten,
        outcome,
        max_td_error,
    }
}

/// Train `agent` for `config.episodes` episodes. The agent keeps everything
/// it learns between episodes.
pub fn train<E: ValueEstimator>(
    env: &mut Environment,
    agent: &mut Agent<E>,
    config: &TrainingConfig,
) -> Result<Vec<EpisodeStats>> {
    config.validate()?;
    let mut history = Vec::with_capacity(config.episodes);
    for episode in 0..config.episodes {
        let mut stats = run_episode(env, agent, Mode::Explore, config.max_steps, |_| {});
        stats.episode = episode;
        debug!(
            episode,
            steps = stats.steps,
            reward = stats.total_reward,
            outcome = %stats.outcome,
            "episode finished"
        );
        history.push(stats);

        if config.log_every > 0 && (episode + 1) % config.log_every == 0 {
            let summary = Summary::of(&history[history.len() - config.log_every..]);
            info!(
                episode = episode + 1,
                mean_reward = summary.mean_reward,
                mean_steps = summary.mean_steps,
                cleared = summary.cleared,
                caught = summary.caught,
                truncated = summary.truncated,
                "training progress"
            );
        }
    }
    Ok(history)
}

/// Play one greedy episode without learning.
pub fn evaluate<E, F>(
    env: &mut Environment,
    agent: &mut Agent<E>,
    max_steps: Option<usize>,
    on_step: F,
) -> EpisodeStats
where
    E: ValueEstimator,
    F: FnMut(&Environment),
{
    run_episode(env, agent, Mode::Greedy, max_steps, on_step)
}
