//! Error types for the simulation engine.

use std::path::PathBuf;

use thiserror::Error;

use crate::state::StateVector;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("simulation {sim_id}: initial state {state} is not finite")]
    InvalidInitialState { sim_id: usize, state: StateVector },

    #[error("simulation id {0} appears more than once in the batch")]
    DuplicateSimId(usize),

    #[error("simulation {sim_id}: non-finite state {state} at step {step}")]
    NumericalFault {
        sim_id: usize,
        step: usize,
        state: StateVector,
    },

    #[error("simulation {sim_id}: cancelled before step {step}")]
    Cancelled { sim_id: usize, step: usize },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed trajectory file {}: {reason}", .path.display())]
    MalformedTrajectory { path: PathBuf, reason: String },

    #[error("worker pool error: {0}")]
    ThreadPool(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl SimError {
    /// Simulation the fault belongs to, if it is tied to a single job.
    pub fn sim_id(&self) -> Option<usize> {
        match self {
            SimError::InvalidInitialState { sim_id, .. }
            | SimError::NumericalFault { sim_id, .. }
            | SimError::Cancelled { sim_id, .. } => Some(*sim_id),
            SimError::DuplicateSimId(sim_id) => Some(*sim_id),
            _ => None,
        }
    }

    /// True for faults raised while integrating, as opposed to setup or I/O faults.
    pub fn is_numerical(&self) -> bool {
        matches!(self, SimError::NumericalFault { .. })
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
