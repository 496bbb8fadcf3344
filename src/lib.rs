pub mod action_selection;
pub mod agent;
pub mod config;
pub mod env;
pub mod error;
pub mod logging;
pub mod observation;
pub mod schedule;
pub mod space;
pub mod trainer;
pub mod utils;
pub mod value_table;

pub use agent::IndependentQLearner;
pub use config::{LearnerConfig, TrainConfig};
pub use error::{IqlError, Result};
pub use observation::{Observation, ObservationKey};
pub use space::ActionSpace;
pub use value_table::ValueTable;
