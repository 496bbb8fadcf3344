use crate::error::{IqlError, Result};
use crate::schedule::HyperparameterSchedule;

/// Construction parameters of an [`IndependentQLearner`](crate::IndependentQLearner).
#[derive(Debug, Clone, PartialEq)]
pub struct LearnerConfig {
    pub num_agents: usize,
    /// Discount factor, fixed for the lifetime of the learner.
    pub gamma: f64,
    /// Learning rate used until the first schedule update.
    pub learning_rate: f64,
    /// Exploration rate used until the first schedule update.
    pub epsilon: f64,
    pub seed: u64,
    pub schedule: HyperparameterSchedule,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            num_agents: 2,
            gamma: 0.99,
            learning_rate: 0.5,
            epsilon: 1.0,
            seed: 42,
            schedule: HyperparameterSchedule::default(),
        }
    }
}

impl LearnerConfig {
    pub fn new(num_agents: usize, gamma: f64) -> Self {
        Self {
            num_agents,
            gamma,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(IqlError::configuration(format!(
                "gamma must be within [0, 1], got {}",
                self.gamma
            )));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(IqlError::configuration(format!(
                "epsilon must be within [0, 1], got {}",
                self.epsilon
            )));
        }
        if !(self.learning_rate > 0.0) || !self.learning_rate.is_finite() {
            return Err(IqlError::configuration(format!(
                "learning rate must be positive and finite, got {}",
                self.learning_rate
            )));
        }
        self.schedule.validate()
    }
}

/// Parameters of the episodic training loop in [`trainer`](crate::trainer).
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    pub n_episodes: u64,
    /// Run a greedy evaluation every `eval_freq` episodes; 0 disables it.
    pub eval_freq: u64,
    pub eval_episodes: u64,
    pub show_progress: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            n_episodes: 20_000,
            eval_freq: 1_000,
            eval_episodes: 10,
            show_progress: true,
        }
    }
}
