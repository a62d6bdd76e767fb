use std::collections::HashMap;

use pellet_world::features::{self, Features};
use pellet_world::training::train;
use pellet_world::{
    Agent, Environment, GridConfig, Hyperparameters, Movement, Outcome, TrainingConfig,
    ValueEstimator,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn params(epsilon: f64) -> Hyperparameters {
    Hyperparameters {
        epsilon,
        ..Default::default()
    }
}

fn bias_state() -> Features {
    vec![(features::BIAS, 1.0), (features::PELLETS_LEFT, 0.5)]
        .into_iter()
        .collect()
}

/// Counts what it is told instead of learning.
#[derive(Default)]
struct Tally {
    updates: usize,
    reward_sum: f64,
    terminal_updates: usize,
}

impl ValueEstimator for Tally {
    fn estimate(&self, _state: &Features, _action: Movement) -> f64 {
        0.0
    }

    fn update(
        &mut self,
        _state: &Features,
        _action: Movement,
        _next_state: &Features,
        reward: f64,
        next_actions: &[Movement],
    ) -> f64 {
        self.updates += 1;
        self.reward_sum += reward;
        if next_actions.is_empty() {
            self.terminal_updates += 1;
        }
        0.0
    }
}

#[test]
fn test_policy_stays_within_actions() {
    let mut agent = Agent::seeded(params(0.0), 9).unwrap();
    let subset = [Movement::Left, Movement::Up];
    for _ in 0..200 {
        assert!(subset.contains(&agent.policy(&bias_state(), &subset)));
    }
}

#[test]
fn test_policy_breaks_ties_at_random() {
    // all weights are zero, every action ties
    let mut agent = Agent::seeded(params(0.0), 17).unwrap();
    let mut counts: HashMap<Movement, usize> = HashMap::new();
    for _ in 0..400 {
        *counts.entry(agent.policy(&bias_state(), Movement::actions())).or_insert(0) += 1;
    }
    for a in Movement::actions() {
        let n = counts.get(a).copied().unwrap_or(0);
        assert!(n > 40, "{a:?} chosen only {n} times out of 400");
    }
}

#[test]
fn test_greedy_choose_matches_policy() {
    let mut chooser = Agent::seeded(params(0.0), 123).unwrap();
    let mut greedy = Agent::seeded(params(0.0), 123).unwrap();
    let s = bias_state();
    for _ in 0..100 {
        assert_eq!(
            chooser.choose(&s, Movement::actions()),
            greedy.policy(&s, Movement::actions())
        );
    }
}

#[test]
fn test_full_exploration_tries_every_action() {
    let mut agent = Agent::seeded(params(1.0), 5).unwrap();
    let s = bias_state();
    // make Right clearly the greedy choice
    agent.observe(&s, Movement::Right, &s, 10.0, &[]);
    let mut seen: HashMap<Movement, usize> = HashMap::new();
    for _ in 0..400 {
        *seen.entry(agent.choose(&s, Movement::actions())).or_insert(0) += 1;
    }
    assert_eq!(seen.len(), 4);
}

#[test]
fn test_learning_persists_across_episodes() {
    let mut agent = Agent::with_estimator(0.1, Tally::default(), StdRng::seed_from_u64(3)).unwrap();
    let mut env = Environment::seeded(GridConfig::new(8, 4), 3).unwrap();
    let config = TrainingConfig {
        episodes: 1,
        max_steps: Some(200),
        log_every: 0,
    };

    let first = train(&mut env, &mut agent, &config).unwrap();
    assert_eq!(agent.estimator().updates, first[0].steps);
    assert_eq!(agent.estimator().reward_sum, first[0].total_reward as f64);

    let second = train(&mut env, &mut agent, &config).unwrap();
    let steps = first[0].steps + second[0].steps;
    let reward = first[0].total_reward + second[0].total_reward;
    assert_eq!(agent.estimator().updates, steps);
    assert_eq!(agent.estimator().reward_sum, reward as f64);

    // every episode that ended on its own fed exactly one terminal transition
    let finished = first
        .iter()
        .chain(&second)
        .filter(|s| s.outcome != Outcome::Truncated)
        .count();
    assert_eq!(agent.estimator().terminal_updates, finished);
}

#[test]
fn test_linear_weights_are_never_reset() {
    let mut agent = Agent::seeded(params(0.2), 8).unwrap();
    let mut env = Environment::seeded(GridConfig::new(8, 4), 8).unwrap();
    let config = TrainingConfig {
        episodes: 5,
        max_steps: Some(200),
        log_every: 0,
    };

    train(&mut env, &mut agent, &config).unwrap();
    let before = agent.estimator().weights().clone();
    assert!(!before.is_empty());

    train(&mut env, &mut agent, &config).unwrap();
    let after = agent.estimator().weights();
    for ((feature, action), _) in before.iter() {
        assert!(after.iter().any(|(key, _)| *key == (*feature, *action)));
    }
    assert_ne!(&before, after);
}
