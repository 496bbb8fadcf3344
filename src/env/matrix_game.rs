use ndarray::{array, Array2};

use super::{EnvError, MultiAgentEnv};
use crate::space::ActionSpace;

/// Repeated two-player cooperative normal-form game.
///
/// Both agents receive `payoff[[a0, a1]]`. The game is stateless: every
/// observation is `0`. An episode lasts `ep_length` simultaneous moves.
#[derive(Debug, Clone)]
pub struct MatrixGame {
    payoff: Array2<f64>,
    ep_length: usize,
    curr_step: usize,
    ready: bool,
    last_actions: Option<[usize; 2]>,
}

impl MatrixGame {
    pub fn new(payoff: Array2<f64>, ep_length: usize) -> Self {
        Self {
            payoff,
            ep_length: ep_length.max(1),
            curr_step: 0,
            ready: false,
            last_actions: None,
        }
    }

    /// Coordinating on a corner pays 10, miscoordinating on the corners
    /// costs `k`, the safe middle pays 2.
    pub fn penalty_game(k: f64, ep_length: usize) -> Self {
        Self::new(
            array![[10.0, 0.0, k], [0.0, 2.0, 0.0], [k, 0.0, 10.0]],
            ep_length,
        )
    }

    pub fn climbing_game(ep_length: usize) -> Self {
        Self::new(
            array![[11.0, -30.0, 0.0], [-30.0, 7.0, 6.0], [0.0, 0.0, 5.0]],
            ep_length,
        )
    }

    pub fn payoff(&self) -> &Array2<f64> {
        &self.payoff
    }

    /// Best joint payoff attainable.
    pub fn optimal_payoff(&self) -> f64 {
        self.payoff
            .iter()
            .fold(f64::NEG_INFINITY, |acc, v| acc.max(*v))
    }
}

impl MultiAgentEnv<usize> for MatrixGame {
    fn num_agents(&self) -> usize {
        2
    }

    fn action_spaces(&self) -> Vec<ActionSpace> {
        let (rows, cols) = self.payoff.dim();
        vec![ActionSpace::discrete(rows), ActionSpace::discrete(cols)]
    }

    fn reset(&mut self) -> Vec<usize> {
        self.curr_step = 0;
        self.ready = true;
        self.last_actions = None;
        vec![0; 2]
    }

    fn step(&mut self, actions: &[usize]) -> Result<(Vec<usize>, Vec<f64>, bool), EnvError> {
        if !self.ready {
            return Err(EnvError::NotReady);
        }
        if actions.len() != 2 {
            return Err(EnvError::InvalidActionCount {
                expected: 2,
                got: actions.len(),
            });
        }
        let (rows, cols) = self.payoff.dim();
        for (agent, (&action, limit)) in actions.iter().zip([rows, cols]).enumerate() {
            if action >= limit {
                return Err(EnvError::InvalidAction { agent, action });
            }
        }

        let reward = self.payoff[[actions[0], actions[1]]];
        self.curr_step += 1;
        self.last_actions = Some([actions[0], actions[1]]);
        let done = self.curr_step >= self.ep_length;
        if done {
            self.ready = false;
        }
        Ok((vec![0; 2], vec![reward; 2], done))
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for (i, row) in self.payoff.outer_iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                let chosen = self.last_actions == Some([i, j]);
                out.push_str(&if chosen {
                    format!("[{:>6.1}]", value)
                } else {
                    format!(" {:>6.1} ", value)
                });
            }
            out.push('\n');
        }
        out.push_str(&format!("step {}/{}", self.curr_step, self.ep_length));
        out
    }
}
