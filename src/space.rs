use enum_dispatch::enum_dispatch;

use crate::error::{IqlError, Result};

/// Common behaviour of action-space descriptors.
#[enum_dispatch]
pub trait Space {
    /// Number of entries of the one-hot flattened space.
    fn flat_dim(&self) -> Result<usize>;

    fn is_discrete(&self) -> bool;
}

/// `n` mutually exclusive choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discrete {
    pub n: usize,
}

impl Discrete {
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

impl Space for Discrete {
    fn flat_dim(&self) -> Result<usize> {
        if self.n == 0 {
            return Err(IqlError::configuration(
                "discrete action space must have at least one action",
            ));
        }
        Ok(self.n)
    }

    fn is_discrete(&self) -> bool {
        true
    }
}

/// Several independent discrete components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiDiscrete {
    pub nvec: Vec<usize>,
}

impl MultiDiscrete {
    pub fn new(nvec: Vec<usize>) -> Self {
        Self { nvec }
    }
}

impl Space for MultiDiscrete {
    fn flat_dim(&self) -> Result<usize> {
        if let Some(position) = self.nvec.iter().position(|&n| n == 0) {
            return Err(IqlError::configuration(format!(
                "multi-discrete component {} has no choices",
                position
            )));
        }
        Ok(self.nvec.iter().sum())
    }

    fn is_discrete(&self) -> bool {
        true
    }
}

/// `n` binary switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiBinary {
    pub n: usize,
}

impl MultiBinary {
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

impl Space for MultiBinary {
    fn flat_dim(&self) -> Result<usize> {
        Ok(self.n)
    }

    fn is_discrete(&self) -> bool {
        true
    }
}

/// Composite of other spaces, flattened by concatenation.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleSpace {
    pub spaces: Vec<ActionSpace>,
}

impl TupleSpace {
    pub fn new(spaces: Vec<ActionSpace>) -> Self {
        Self { spaces }
    }
}

impl Space for TupleSpace {
    fn flat_dim(&self) -> Result<usize> {
        let mut value = 0;
        for space in self.spaces.iter() {
            value += space.flat_dim()?;
        }
        Ok(value)
    }

    fn is_discrete(&self) -> bool {
        self.spaces.iter().all(|space| space.is_discrete())
    }
}

/// Continuous box bounded by `low` and `high` on every coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSpace {
    pub low: f64,
    pub high: f64,
    pub shape: Vec<usize>,
}

impl BoxSpace {
    pub fn new(low: f64, high: f64, shape: Vec<usize>) -> Self {
        Self { low, high, shape }
    }
}

impl Space for BoxSpace {
    fn flat_dim(&self) -> Result<usize> {
        Err(IqlError::configuration(format!(
            "continuous action space [{}, {}] with shape {:?} has no finite discrete size",
            self.low, self.high, self.shape
        )))
    }

    fn is_discrete(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq)]
#[enum_dispatch(Space)]
pub enum ActionSpace {
    Discrete(Discrete),
    MultiDiscrete(MultiDiscrete),
    MultiBinary(MultiBinary),
    Tuple(TupleSpace),
    Continuous(BoxSpace),
}

impl ActionSpace {
    pub fn discrete(n: usize) -> Self {
        Discrete::new(n).into()
    }

    /// Flattened size an agent can index into; always at least one.
    pub fn n_actions(&self) -> Result<usize> {
        let size = self.flat_dim()?;
        if size == 0 {
            return Err(IqlError::configuration(format!(
                "action space {:?} flattens to zero actions",
                self
            )));
        }
        Ok(size)
    }
}
