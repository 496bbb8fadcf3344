use ndarray::{Array, Array1};
use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::utils::argmax;

/// Epsilon-greedy selection over a row of action values.
///
/// A single selector (and a single epsilon) is shared by every agent of a
/// learner; each call draws independently from the seeded generator.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    epsilon: f64,
    seed: u64,
    rng: SmallRng,
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self::new(1.0, 42)
    }
}

impl EpsilonGreedy {
    pub fn new(epsilon: f64, seed: u64) -> Self {
        Self {
            epsilon,
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    fn should_explore(&mut self) -> bool {
        self.epsilon != 0.0 && self.rng.gen_range(0.0..1.0) < self.epsilon
    }

    pub fn get_action(&mut self, values: &Array1<f64>) -> usize {
        if self.should_explore() {
            self.rng.gen_range(0..values.len())
        } else {
            argmax(values.iter())
        }
    }

    /// Probability of picking each action on the next draw.
    pub fn get_exploration_probs(&self, values: &Array1<f64>) -> Array1<f64> {
        let mut policy_probs: Array1<f64> =
            Array::from_elem((values.len(),), self.epsilon / values.len() as f64);
        policy_probs[argmax(values.iter())] += 1.0 - self.epsilon;
        policy_probs
    }

    /// Restarts the random stream from the construction seed.
    pub fn reset(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
        self.rng = SmallRng::seed_from_u64(self.seed);
    }
}
