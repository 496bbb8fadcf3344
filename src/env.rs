mod matrix_game;

use thiserror::Error;

use crate::space::ActionSpace;

pub use matrix_game::MatrixGame;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("environment is not ready: call reset before stepping")]
    NotReady,

    #[error("expected {expected} actions (one per agent), got {got}")]
    InvalidActionCount { expected: usize, got: usize },

    #[error("action {action} of agent {agent} is not in the action space")]
    InvalidAction { agent: usize, action: usize },
}

/// Environment driven by a multi-agent training loop.
///
/// All agents act simultaneously; `step` returns one observation and one
/// reward per agent plus a shared termination flag.
pub trait MultiAgentEnv<T> {
    fn num_agents(&self) -> usize;
    fn action_spaces(&self) -> Vec<ActionSpace>;
    fn reset(&mut self) -> Vec<T>;
    fn step(&mut self, actions: &[usize]) -> Result<(Vec<T>, Vec<f64>, bool), EnvError>;
    fn render(&self) -> String;
}
