//! Error types for the independent Q-learning crate

use thiserror::Error;

use crate::env::EnvError;

/// Errors raised when a caller violates the learner's contract.
///
/// None of these are transient: they are reported at the call that caused
/// them and the learner state is left untouched.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum IqlError {
    #[error("invalid configuration: {message}")]
    Configuration { message: String },

    #[error("length mismatch for {argument}: expected {expected} entries (one per agent), got {got}")]
    LengthMismatch {
        argument: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("action {action} is out of range for agent {agent} (must be below {n_actions})")]
    OutOfRange {
        agent: usize,
        action: usize,
        n_actions: usize,
    },

    #[error("agent index {agent} is out of range ({num_agents} agents)")]
    UnknownAgent { agent: usize, num_agents: usize },

    #[error("schedule domain error: {message}")]
    Domain { message: String },

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

impl IqlError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        IqlError::Configuration {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for IqlError {
    fn from(source: std::io::Error) -> Self {
        IqlError::Io {
            operation: "write progress output".to_string(),
            source,
        }
    }
}

/// Convenience type alias for Results using the crate's error type
pub type Result<T> = std::result::Result<T, IqlError>;
