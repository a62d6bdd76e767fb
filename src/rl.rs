use std::collections::hash_map::HashMap;

use ordered_float::OrderedFloat;

use crate::config::Hyperparameters;
use crate::environment::Movement;
use crate::features::Features;

/// Learned weight per (feature, action) pair.
///
/// Reading a pair that was never updated yields 0.0; only `add` creates
/// entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Weights {
    w: HashMap<(&'static str, Movement), f64>,
}

impl Weights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, feature: &'static str, action: Movement) -> f64 {
        self.w.get(&(feature, action)).copied().unwrap_or(0.0)
    }

    pub fn add(&mut self, feature: &'static str, action: Movement, delta: f64) {
        *self.w.entry((feature, action)).or_insert(0.0) += delta;
    }

    /// Number of pairs that have been written at least once.
    pub fn len(&self) -> usize {
        self.w.len()
    }

    pub fn is_empty(&self) -> bool {
        self.w.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(&'static str, Movement), &f64)> {
        self.w.iter()
    }
}

/// Action-value estimate together with the rule that learns it.
pub trait ValueEstimator {
    /// Estimated return of taking `action` in `state`.
    fn estimate(&self, state: &Features, action: Movement) -> f64;

    /// Learn from one observed transition and return the temporal difference
    /// error that drove the update. An empty `next_actions` marks
    /// `next_state` as terminal.
    fn update(
        &mut self,
        state: &Features,
        action: Movement,
        next_state: &Features,
        reward: f64,
        next_actions: &[Movement],
    ) -> f64;
}

/// Linear function approximation trained with semi-gradient Q-learning.
#[derive(Debug, Clone)]
pub struct LinearQ {
    weights: Weights,
    gamma: f64,
    alpha: f64,
}

impl LinearQ {
    pub fn new(gamma: f64, alpha: f64) -> Self {
        Self {
            weights: Weights::new(),
            gamma,
            alpha,
        }
    }

    pub fn from_hyperparameters(params: &Hyperparameters) -> Self {
        Self::new(params.gamma, params.alpha)
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl ValueEstimator for LinearQ {
    fn estimate(&self, state: &Features, action: Movement) -> f64 {
        state
            .iter()
            .map(|(f, value)| self.weights.get(f, action) * value)
            .sum()
    }

    fn update(
        &mut self,
        state: &Features,
        action: Movement,
        next_state: &Features,
        reward: f64,
        next_actions: &[Movement],
    ) -> f64 {
        let future = max_value(&*self, next_state, next_actions).unwrap_or(0.0);
        // Temporal difference
        let t_d = reward + self.gamma * future - self.estimate(state, action);
        for (f, value) in state.iter() {
            // learning step
            self.weights.add(f, action, self.alpha * t_d * value);
        }
        t_d
    }
}

/// Highest estimate over `actions`, `None` when there are no actions.
pub fn max_value<E: ValueEstimator + ?Sized>(
    estimator: &E,
    state: &Features,
    actions: &[Movement],
) -> Option<f64> {
    actions
        .iter()
        .map(|a| OrderedFloat(estimator.estimate(state, *a)))
        .max()
        .map(OrderedFloat::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features;

    fn state(values: &[(&'static str, f64)]) -> Features {
        values.iter().copied().collect()
    }

    #[test]
    fn unseen_weights_read_zero() {
        let w = Weights::new();
        assert_eq!(w.get(features::BIAS, Movement::Up), 0.0);
        assert!(w.is_empty());
    }

    #[test]
    fn estimate_is_weighted_sum() {
        let mut q = LinearQ::new(0.9, 0.1);
        q.weights.add(features::BIAS, Movement::Left, 2.0);
        q.weights.add(features::PELLETS_LEFT, Movement::Left, -4.0);
        q.weights.add(features::PELLETS_LEFT, Movement::Right, 100.0);
        let s = state(&[(features::BIAS, 1.0), (features::PELLETS_LEFT, 0.5)]);
        assert_eq!(q.estimate(&s, Movement::Left), 0.0);
        assert_eq!(q.estimate(&s, Movement::Right), 50.0);
        assert_eq!(q.estimate(&s, Movement::Up), 0.0);
    }

    #[test]
    fn terminal_transition_has_no_continuation() {
        let mut q = LinearQ::new(0.99, 0.5);
        let s = state(&[(features::PELLETS_LEFT, 1.0)]);
        // next state would look valuable, but it is terminal
        q.weights.add(features::BIAS, Movement::Up, 1000.0);
        let next = state(&[(features::BIAS, 1.0)]);
        let t_d = q.update(&s, Movement::Right, &next, 10.0, &[]);
        assert_eq!(t_d, 10.0);
        assert_eq!(q.weights().get(features::PELLETS_LEFT, Movement::Right), 5.0);
        assert_eq!(q.estimate(&s, Movement::Right), 5.0);
    }

    #[test]
    fn update_bootstraps_from_best_next_action() {
        let mut q = LinearQ::new(0.5, 0.25);
        q.weights.add(features::BIAS, Movement::Up, 2.0);
        q.weights.add(features::BIAS, Movement::Down, -8.0);
        let s = state(&[(features::PELLETS_LEFT, 2.0)]);
        let next = state(&[(features::BIAS, 1.0)]);
        // t_d = 1 + 0.5 * 2 - 0
        let t_d = q.update(&s, Movement::Left, &next, 1.0, Movement::actions());
        assert_eq!(t_d, 2.0);
        assert_eq!(q.weights().get(features::PELLETS_LEFT, Movement::Left), 1.0);
        // untouched pairs stay unmaterialized
        assert_eq!(q.weights().len(), 3);
    }

    #[test]
    fn features_absent_from_state_are_not_updated() {
        let mut q = LinearQ::new(0.9, 0.1);
        let s = state(&[(features::BIAS, 1.0)]);
        q.update(&s, Movement::Up, &s, -100.0, &[]);
        assert_eq!(q.weights().get(features::PELLETS_LEFT, Movement::Up), 0.0);
        assert_eq!(q.weights().len(), 1);
    }

    #[test]
    fn max_value_of_no_actions() {
        let q = LinearQ::new(0.9, 0.1);
        assert_eq!(max_value(&q, &Features::new(), &[]), None);
    }
}
