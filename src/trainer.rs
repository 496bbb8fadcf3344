//! Episodic training and evaluation loops driving an [`IndependentQLearner`].

use kdam::{tqdm, Bar, BarExt};
use log::info;

use crate::agent::IndependentQLearner;
use crate::config::TrainConfig;
use crate::env::MultiAgentEnv;
use crate::error::{IqlError, Result};
use crate::observation::Observation;

/// Per-episode statistics of a training run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainResults {
    /// Undiscounted return of each episode, averaged over agents.
    pub episode_returns: Vec<f64>,
    pub episode_lengths: Vec<u64>,
    /// Mean of the Q-values written during each episode.
    pub mean_q_values: Vec<f64>,
    pub epsilons: Vec<f64>,
    pub learning_rates: Vec<f64>,
    /// Mean greedy return of each periodic evaluation.
    pub evaluation_returns: Vec<f64>,
}

fn check_agents<T, E>(env: &E, learner: &IndependentQLearner) -> Result<()>
where
    E: MultiAgentEnv<T> + ?Sized,
{
    if env.num_agents() != learner.num_agents() {
        return Err(IqlError::configuration(format!(
            "environment has {} agents but the learner was built for {}",
            env.num_agents(),
            learner.num_agents()
        )));
    }
    Ok(())
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

pub fn train<T, E>(
    env: &mut E,
    learner: &mut IndependentQLearner,
    config: &TrainConfig,
) -> Result<TrainResults>
where
    T: Observation,
    E: MultiAgentEnv<T> + ?Sized,
{
    check_agents::<T, E>(env, learner)?;
    let mut results = TrainResults::default();

    let mut pb: Option<Bar> = if config.show_progress {
        Some(tqdm!(total = config.n_episodes as usize))
    } else {
        None
    };

    for episode in 0..config.n_episodes {
        learner.schedule_hyperparameters(episode, config.n_episodes)?;
        results.epsilons.push(learner.epsilon());
        results.learning_rates.push(learner.learning_rate());

        let mut curr_obs: Vec<T> = env.reset();
        let mut returns = vec![0.0; learner.num_agents()];
        let mut q_values: Vec<f64> = vec![];
        let mut action_counter: u64 = 0;
        loop {
            action_counter += 1;
            let actions = learner.act(&curr_obs)?;
            let (next_obs, rewards, done) = env.step(&actions)?;
            let updated = learner.learn(&curr_obs, &actions, &rewards, &next_obs, done)?;
            q_values.extend(updated);
            for (total, reward) in returns.iter_mut().zip(rewards.iter()) {
                *total += reward;
            }
            curr_obs = next_obs;
            if done {
                break;
            }
        }
        results.episode_returns.push(mean(&returns));
        results.episode_lengths.push(action_counter);
        results.mean_q_values.push(mean(&q_values));

        if config.eval_freq > 0 && episode % config.eval_freq == 0 {
            let evaluation = evaluate::<T, E>(env, learner, config.eval_episodes)?;
            let mean_return = mean(&evaluation);
            if let Some(pb) = pb.as_mut() {
                pb.set_postfix(format!(
                    "eval return={:.2}, epsilon={:.3}",
                    mean_return,
                    learner.epsilon()
                ));
            }
            results.evaluation_returns.push(mean_return);
        }
        if let Some(pb) = pb.as_mut() {
            pb.update(1)?;
        }
    }

    info!(
        "trained {} episodes: last return {:.2}, last evaluation {:.2}",
        config.n_episodes,
        results.episode_returns.last().copied().unwrap_or(0.0),
        results.evaluation_returns.last().copied().unwrap_or(0.0)
    );
    Ok(results)
}

/// Plays `n_episodes` greedy episodes without learning; returns the
/// undiscounted return of each, averaged over agents.
pub fn evaluate<T, E>(
    env: &mut E,
    learner: &IndependentQLearner,
    n_episodes: u64,
) -> Result<Vec<f64>>
where
    T: Observation,
    E: MultiAgentEnv<T> + ?Sized,
{
    check_agents::<T, E>(env, learner)?;
    let mut reward_history: Vec<f64> = vec![];
    for _episode in 0..n_episodes {
        let mut obs: Vec<T> = env.reset();
        let mut returns = vec![0.0; learner.num_agents()];
        loop {
            let actions = learner.greedy_act(&obs)?;
            let (next_obs, rewards, done) = env.step(&actions)?;
            for (total, reward) in returns.iter_mut().zip(rewards.iter()) {
                *total += reward;
            }
            obs = next_obs;
            if done {
                break;
            }
        }
        reward_history.push(mean(&returns));
    }
    Ok(reward_history)
}
