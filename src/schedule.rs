//! Per-episode annealing of the exploration rate and the learning rate.
//!
//! Every schedule is a pure function of the training progress `t / T`, so
//! recomputing it for the same episode always gives the same value.

use std::f64::consts::PI;

use enum_dispatch::enum_dispatch;

use crate::error::{IqlError, Result};

#[enum_dispatch]
pub trait Schedule {
    /// Value at `progress`, where 0 is the first episode and 1 the last.
    fn value(&self, progress: f64) -> f64;

    /// Smallest and largest value the schedule can produce.
    fn bounds(&self) -> (f64, f64);
}

/// Half-cosine from `max` down to `min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CosineAnnealing {
    pub min: f64,
    pub max: f64,
}

impl CosineAnnealing {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl Schedule for CosineAnnealing {
    fn value(&self, progress: f64) -> f64 {
        self.min + 0.5 * (self.max - self.min) * (1.0 + (PI * progress).cos())
    }

    fn bounds(&self) -> (f64, f64) {
        (self.min.min(self.max), self.min.max(self.max))
    }
}

/// Straight line from `start` to `end`, held at `end` afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearDecay {
    pub start: f64,
    pub end: f64,
}

impl LinearDecay {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

impl Schedule for LinearDecay {
    fn value(&self, progress: f64) -> f64 {
        let progress = progress.clamp(0.0, 1.0);
        self.start + (self.end - self.start) * progress
    }

    fn bounds(&self) -> (f64, f64) {
        (self.start.min(self.end), self.start.max(self.end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant {
    pub value: f64,
}

impl Constant {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Schedule for Constant {
    fn value(&self, _progress: f64) -> f64 {
        self.value
    }

    fn bounds(&self) -> (f64, f64) {
        (self.value, self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[enum_dispatch(Schedule)]
pub enum ScheduleKind {
    CosineAnnealing(CosineAnnealing),
    LinearDecay(LinearDecay),
    Constant(Constant),
}

/// Fraction of training completed at the start of `timestep`.
pub fn progress(timestep: u64, max_timestep: u64) -> Result<f64> {
    if max_timestep == 0 {
        return Err(IqlError::Domain {
            message: format!(
                "max_timestep must be positive (got timestep {} of {})",
                timestep, max_timestep
            ),
        });
    }
    Ok(timestep as f64 / max_timestep as f64)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hyperparameters {
    pub epsilon: f64,
    pub learning_rate: f64,
}

/// Schedules of both annealed hyperparameters, shared by all agents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HyperparameterSchedule {
    pub epsilon: ScheduleKind,
    pub learning_rate: ScheduleKind,
}

impl Default for HyperparameterSchedule {
    fn default() -> Self {
        Self {
            epsilon: CosineAnnealing::new(0.0, 1.0).into(),
            learning_rate: CosineAnnealing::new(0.01, 0.05).into(),
        }
    }
}

impl HyperparameterSchedule {
    pub fn new(epsilon: ScheduleKind, learning_rate: ScheduleKind) -> Self {
        Self {
            epsilon,
            learning_rate,
        }
    }

    pub fn at(&self, timestep: u64, max_timestep: u64) -> Result<Hyperparameters> {
        let progress = progress(timestep, max_timestep)?;
        Ok(Hyperparameters {
            epsilon: self.epsilon.value(progress),
            learning_rate: self.learning_rate.value(progress),
        })
    }

    /// Rejects schedules that could leave epsilon outside `[0, 1]` or drive
    /// the learning rate to zero.
    pub fn validate(&self) -> Result<()> {
        let (eps_low, eps_high) = self.epsilon.bounds();
        if !(0.0..=1.0).contains(&eps_low) || !(0.0..=1.0).contains(&eps_high) {
            return Err(IqlError::configuration(format!(
                "epsilon schedule must stay within [0, 1], got [{}, {}]",
                eps_low, eps_high
            )));
        }
        let (lr_low, lr_high) = self.learning_rate.bounds();
        if !(lr_low > 0.0) || !lr_high.is_finite() {
            return Err(IqlError::configuration(format!(
                "learning rate schedule must stay positive and finite, got [{}, {}]",
                lr_low, lr_high
            )));
        }
        Ok(())
    }
}
