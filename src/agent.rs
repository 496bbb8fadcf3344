use log::{debug, info, trace};
use ndarray::Array1;

use crate::action_selection::EpsilonGreedy;
use crate::config::LearnerConfig;
use crate::error::{IqlError, Result};
use crate::observation::{Observation, ObservationKey};
use crate::schedule::{HyperparameterSchedule, Hyperparameters};
use crate::space::ActionSpace;
use crate::value_table::ValueTable;

/// Independent Q-learning over `num_agents` agents.
///
/// Each agent owns a [`ValueTable`] and learns with a one-step Q-learning
/// update, treating every other agent as part of the environment. The
/// exploration rate and learning rate are shared by all agents and annealed
/// once per episode through [`schedule_hyperparameters`](Self::schedule_hyperparameters).
#[derive(Debug, Clone)]
pub struct IndependentQLearner {
    num_agents: usize,
    action_spaces: Vec<ActionSpace>,
    n_acts: Vec<usize>,
    gamma: f64,
    learning_rate: f64,
    initial: Hyperparameters,
    action_selection: EpsilonGreedy,
    schedule: HyperparameterSchedule,
    q_tables: Vec<ValueTable>,
}

impl IndependentQLearner {
    pub fn new(
        num_agents: usize,
        action_spaces: Vec<ActionSpace>,
        gamma: f64,
        learning_rate: f64,
        epsilon: f64,
        seed: u64,
    ) -> Result<Self> {
        let config = LearnerConfig {
            num_agents,
            gamma,
            learning_rate,
            epsilon,
            seed,
            ..LearnerConfig::default()
        };
        Self::from_config(&config, action_spaces)
    }

    pub fn from_config(config: &LearnerConfig, action_spaces: Vec<ActionSpace>) -> Result<Self> {
        config.validate()?;
        if action_spaces.len() != config.num_agents {
            return Err(IqlError::configuration(format!(
                "expected one action space per agent ({}), got {}",
                config.num_agents,
                action_spaces.len()
            )));
        }
        let n_acts = action_spaces
            .iter()
            .map(|space| space.n_actions())
            .collect::<Result<Vec<usize>>>()?;
        let q_tables = n_acts.iter().map(|&n| ValueTable::new(n, 0.0)).collect();

        info!(
            "independent Q-learner: {} agents, actions per agent {:?}, gamma {}",
            config.num_agents, n_acts, config.gamma
        );

        Ok(Self {
            num_agents: config.num_agents,
            action_spaces,
            n_acts,
            gamma: config.gamma,
            learning_rate: config.learning_rate,
            initial: Hyperparameters {
                epsilon: config.epsilon,
                learning_rate: config.learning_rate,
            },
            action_selection: EpsilonGreedy::new(config.epsilon, config.seed),
            schedule: config.schedule,
            q_tables,
        })
    }

    pub fn num_agents(&self) -> usize {
        self.num_agents
    }

    pub fn action_spaces(&self) -> &[ActionSpace] {
        &self.action_spaces
    }

    pub fn n_acts(&self) -> &[usize] {
        &self.n_acts
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn epsilon(&self) -> f64 {
        self.action_selection.epsilon()
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn q_tables(&self) -> &[ValueTable] {
        &self.q_tables
    }

    pub fn q_table(&self, agent: usize) -> Result<&ValueTable> {
        self.q_tables.get(agent).ok_or(IqlError::UnknownAgent {
            agent,
            num_agents: self.num_agents,
        })
    }

    pub fn q_value<O: Observation + ?Sized>(&self, agent: usize, obs: &O, action: usize) -> Result<f64> {
        self.check_action(agent, action)?;
        Ok(self.q_tables[agent].get(&obs.key(), action))
    }

    /// Values of every action of `agent` in `obs`.
    pub fn q_values<O: Observation + ?Sized>(&self, agent: usize, obs: &O) -> Result<Array1<f64>> {
        Ok(self.q_table(agent)?.row(&obs.key()).clone())
    }

    /// Distribution [`act`](Self::act) samples from for `agent` in `obs`.
    pub fn action_probabilities<O: Observation + ?Sized>(
        &self,
        agent: usize,
        obs: &O,
    ) -> Result<Array1<f64>> {
        let table = self.q_table(agent)?;
        Ok(self
            .action_selection
            .get_exploration_probs(table.row(&obs.key())))
    }

    /// Epsilon-greedy action of every agent, in agent order.
    pub fn act<O: Observation>(&mut self, observations: &[O]) -> Result<Vec<usize>> {
        self.check_len("observations", observations.len())?;
        let actions = observations
            .iter()
            .zip(self.q_tables.iter())
            .map(|(obs, table)| self.action_selection.get_action(table.row(&obs.key())))
            .collect();
        Ok(actions)
    }

    /// Greedy action of every agent; never explores and draws no randomness.
    pub fn greedy_act<O: Observation>(&self, observations: &[O]) -> Result<Vec<usize>> {
        self.check_len("observations", observations.len())?;
        Ok(observations
            .iter()
            .zip(self.q_tables.iter())
            .map(|(obs, table)| table.greedy_action(&obs.key()))
            .collect())
    }

    /// One Q-learning step per agent; returns the updated `Q_i(obs, action)`.
    ///
    /// The discounted value of the next observation is bootstrapped even when
    /// `done` is set. All arguments are checked before any table changes.
    pub fn learn<O: Observation>(
        &mut self,
        observations: &[O],
        actions: &[usize],
        rewards: &[f64],
        next_observations: &[O],
        done: bool,
    ) -> Result<Vec<f64>> {
        self.check_len("observations", observations.len())?;
        self.check_len("actions", actions.len())?;
        self.check_len("rewards", rewards.len())?;
        self.check_len("next_observations", next_observations.len())?;
        for (agent, &action) in actions.iter().enumerate() {
            self.check_action(agent, action)?;
        }

        let mut updated = Vec::with_capacity(self.num_agents);
        for (agent, table) in self.q_tables.iter_mut().enumerate() {
            let obs: ObservationKey = observations[agent].key();
            let next_obs: ObservationKey = next_observations[agent].key();
            let action = actions[agent];

            let best_next_q = table.max_value(&next_obs);
            let target = rewards[agent] + self.gamma * best_next_q;
            let current = table.get(&obs, action);
            let value = current + self.learning_rate * (target - current);
            trace!(
                "agent {} obs {} action {}: {} -> {} (target {}, done {})",
                agent, obs, action, current, value, target, done
            );
            table.set(obs, action, value);
            updated.push(value);
        }
        Ok(updated)
    }

    /// Recomputes epsilon and the learning rate for the episode starting at
    /// `timestep` out of `max_timestep`.
    pub fn schedule_hyperparameters(&mut self, timestep: u64, max_timestep: u64) -> Result<()> {
        let params = self.schedule.at(timestep, max_timestep)?;
        self.action_selection.set_epsilon(params.epsilon);
        self.learning_rate = params.learning_rate;
        debug!(
            "timestep {}/{}: epsilon {:.4}, learning rate {:.4}",
            timestep, max_timestep, params.epsilon, params.learning_rate
        );
        Ok(())
    }

    /// Forgets every learned value and restores the initial hyperparameters
    /// and random stream.
    pub fn reset(&mut self) {
        for table in self.q_tables.iter_mut() {
            table.clear();
        }
        self.learning_rate = self.initial.learning_rate;
        self.action_selection.reset(self.initial.epsilon);
    }

    fn check_len(&self, argument: &'static str, got: usize) -> Result<()> {
        if got != self.num_agents {
            return Err(IqlError::LengthMismatch {
                argument,
                expected: self.num_agents,
                got,
            });
        }
        Ok(())
    }

    fn check_action(&self, agent: usize, action: usize) -> Result<()> {
        let n_actions = *self.n_acts.get(agent).ok_or(IqlError::UnknownAgent {
            agent,
            num_agents: self.num_agents,
        })?;
        if action >= n_actions {
            return Err(IqlError::OutOfRange {
                agent,
                action,
                n_actions,
            });
        }
        Ok(())
    }
}
