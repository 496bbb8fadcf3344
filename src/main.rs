use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, bail, Result};
use log::info;
use plotters::style::{RGBColor, BLUE, RED};
use structopt::StructOpt;

use independent_q_learning::env::{MatrixGame, MultiAgentEnv};
use independent_q_learning::logging::init_logging;
use independent_q_learning::trainer::{evaluate, train};
use independent_q_learning::utils::{moving_average, plot_moving_average};
use independent_q_learning::{IndependentQLearner, LearnerConfig, TrainConfig};

/// Train independent Q-learning agents on a cooperative matrix game
#[derive(StructOpt, Debug)]
#[structopt(name = "iql")]
struct Cli {
    /// Game to play: "penalty" or "climbing"
    #[structopt(long = "game", default_value = "penalty")]
    game: String,

    /// Miscoordination payoff of the penalty game
    #[structopt(long = "penalty", default_value = "-100", allow_hyphen_values = true)]
    penalty: f64,

    /// Number of episodes for the training
    #[structopt(long = "n_episodes", short = "n", default_value = "20000")]
    n_episodes: u64,

    /// Simultaneous moves per episode
    #[structopt(long = "ep_length", default_value = "1")]
    ep_length: usize,

    /// Discount factor used on the temporal difference target
    #[structopt(long = "gamma", default_value = "0.99")]
    gamma: f64,

    /// Seed of the exploration random stream
    #[structopt(long = "seed", default_value = "42")]
    seed: u64,

    /// Evaluate the greedy policy every this many episodes (0 disables it)
    #[structopt(long = "eval_freq", default_value = "1000")]
    eval_freq: u64,

    /// Episodes per evaluation
    #[structopt(long = "eval_episodes", default_value = "10")]
    eval_episodes: u64,

    /// Moving average window used on the plots
    #[structopt(long = "moving_average_window", default_value = "100")]
    moving_average_window: usize,

    /// Write plots of the training curves into this directory
    #[structopt(long = "plot_dir", parse(from_os_str))]
    plot_dir: Option<PathBuf>,

    /// Hide the progress bar
    #[structopt(long = "quiet")]
    quiet: bool,
}

fn main() -> Result<()> {
    init_logging();
    let cli: Cli = Cli::from_args();

    let mut env = match cli.game.as_str() {
        "penalty" => MatrixGame::penalty_game(cli.penalty, cli.ep_length),
        "climbing" => MatrixGame::climbing_game(cli.ep_length),
        other => bail!("unknown game '{}', expected 'penalty' or 'climbing'", other),
    };

    let learner_config = LearnerConfig {
        seed: cli.seed,
        ..LearnerConfig::new(env.num_agents(), cli.gamma)
    };
    let train_config = TrainConfig {
        n_episodes: cli.n_episodes,
        eval_freq: cli.eval_freq,
        eval_episodes: cli.eval_episodes,
        show_progress: !cli.quiet,
    };
    let mut learner = IndependentQLearner::from_config(&learner_config, env.action_spaces())?;

    let now: Instant = Instant::now();
    let results = train(&mut env, &mut learner, &train_config)?;
    info!("training took {:.2?}", now.elapsed());

    let joint_action = learner.greedy_act(&env.reset())?;
    let final_returns = evaluate(&mut env, &learner, cli.eval_episodes.max(1))?;
    info!(
        "greedy joint action {:?}: mean return {:.2} (optimum per step {:.1})",
        joint_action,
        final_returns.iter().sum::<f64>() / final_returns.len() as f64,
        env.optimal_payoff()
    );
    for agent in 0..learner.num_agents() {
        info!("agent {} values {}", agent, learner.q_values(agent, &0usize)?);
    }

    if let Some(dir) = cli.plot_dir {
        let window = (cli.n_episodes as usize / cli.moving_average_window.max(1)).max(1);
        let colors: Vec<RGBColor> = vec![BLUE, RED];
        let returns = vec![moving_average(window, &results.episode_returns)];
        plot_moving_average(&returns, &colors, &["IQL"], "Train Returns", &dir)
            .map_err(|e| anyhow!("failed to plot returns: {}", e))?;
        let values = vec![moving_average(window, &results.mean_q_values)];
        plot_moving_average(&values, &colors, &["IQL"], "Mean Q Values", &dir)
            .map_err(|e| anyhow!("failed to plot values: {}", e))?;
        let schedule = vec![results.epsilons.clone(), results.learning_rates.clone()];
        plot_moving_average(
            &schedule,
            &colors,
            &["epsilon", "learning rate"],
            "Hyperparameters",
            &dir,
        )
        .map_err(|e| anyhow!("failed to plot hyperparameters: {}", e))?;
        info!("plots written to {}", dir.display());
    }
    Ok(())
}
