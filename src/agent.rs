use ordered_float::OrderedFloat;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::config::{self, Hyperparameters};
use crate::environment::Movement;
use crate::error::Result;
use crate::features::Features;
use crate::rl::{LinearQ, ValueEstimator};

/// Epsilon-greedy learner over a pluggable action-value estimator.
///
/// The agent outlives episodes: whatever the estimator learns keeps
/// accumulating until the agent is dropped.
pub struct Agent<E = LinearQ> {
    epsilon: f64,
    estimator: E,
    rng: StdRng,
}

impl Agent<LinearQ> {
    pub fn new(params: Hyperparameters) -> Result<Self> {
        Self::linear(params, StdRng::from_entropy())
    }

    pub fn seeded(params: Hyperparameters, seed: u64) -> Result<Self> {
        Self::linear(params, StdRng::seed_from_u64(seed))
    }

    fn linear(params: Hyperparameters, rng: StdRng) -> Result<Self> {
        params.validate()?;
        Self::with_estimator(params.epsilon, LinearQ::from_hyperparameters(&params), rng)
    }
}

impl<E: ValueEstimator> Agent<E> {
    pub fn with_estimator(epsilon: f64, estimator: E, rng: StdRng) -> Result<Self> {
        config::check_unit("epsilon", epsilon)?;
        Ok(Self {
            epsilon,
            estimator,
            rng,
        })
    }

    /// Explore with probability epsilon, otherwise follow [`policy`](Self::policy).
    ///
    /// # Panics
    ///
    /// Panics if `actions` is empty.
    pub fn choose(&mut self, state: &Features, actions: &[Movement]) -> Movement {
        assert!(!actions.is_empty(), "choose called without any available action");
        // no draw is spent when exploration is off, so choose and policy
        // agree for the same generator state
        if self.epsilon > 0.0 && self.rng.gen::<f64>() < self.epsilon {
            return actions[self.rng.gen_range(0..actions.len())];
        }
        self.policy(state, actions)
    }

    /// Greedy action, ties broken uniformly at random.
    ///
    /// # Panics
    ///
    /// Panics if `actions` is empty.
    pub fn policy(&mut self, state: &Features, actions: &[Movement]) -> Movement {
        assert!(!actions.is_empty(), "policy called without any available action");
        let values: Vec<OrderedFloat<f64>> = actions
            .iter()
            .map(|a| OrderedFloat(self.q(state, *a)))
            .collect();
        let max_value = values.iter().copied().max().unwrap_or(OrderedFloat(0.0));
        let max_actions: Vec<Movement> = actions
            .iter()
            .zip(values)
            .filter(|(_, value)| *value == max_value)
            .map(|(a, _)| *a)
            .collect();
        max_actions[self.rng.gen_range(0..max_actions.len())]
    }

    /// Estimated action-value.
    pub fn q(&self, state: &Features, action: Movement) -> f64 {
        self.estimator.estimate(state, action)
    }

    /// Feed one transition to the estimator. Returns its temporal difference
    /// error.
    pub fn observe(
        &mut self,
        state: &Features,
        action: Movement,
        next_state: &Features,
        reward: f64,
        next_actions: &[Movement],
    ) -> f64 {
        self.estimator
            .update(state, action, next_state, reward, next_actions)
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features;

    fn greedy(seed: u64) -> Agent {
        let params = Hyperparameters {
            epsilon: 0.0,
            ..Default::default()
        };
        Agent::seeded(params, seed).unwrap()
    }

    #[test]
    fn rejects_bad_epsilon() {
        let params = Hyperparameters {
            epsilon: -0.1,
            ..Default::default()
        };
        assert!(Agent::seeded(params, 0).is_err());
    }

    #[test]
    fn hyperparameters_reach_the_estimator() {
        let agent = greedy(0);
        assert_eq!(agent.epsilon(), 0.0);
        assert_eq!(agent.estimator().gamma(), 0.99);
        assert_eq!(agent.estimator().alpha(), 0.01);
        assert!(agent.estimator().weights().is_empty());
    }

    #[test]
    fn policy_follows_learned_values() {
        let mut agent = greedy(3);
        let s: Features = vec![(features::BIAS, 1.0)].into_iter().collect();
        agent.observe(&s, Movement::Down, &s, 10.0, &[]);
        for _ in 0..50 {
            assert_eq!(agent.policy(&s, Movement::actions()), Movement::Down);
        }
        assert!(agent.q(&s, Movement::Down) > agent.q(&s, Movement::Up));
    }

    #[test]
    #[should_panic(expected = "without any available action")]
    fn policy_needs_actions() {
        greedy(0).policy(&Features::new(), &[]);
    }

    #[test]
    #[should_panic(expected = "without any available action")]
    fn choose_needs_actions() {
        greedy(0).choose(&Features::new(), &[]);
    }
}
