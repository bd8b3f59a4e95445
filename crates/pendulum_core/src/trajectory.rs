use serde::{Deserialize, Serialize};

use crate::dynamics::bob_positions;
use crate::params::PhysicalParameters;
use crate::state::StateVector;

/// One recorded point of a trajectory: time, full state and the Cartesian
/// positions of both bobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub t: f64,
    pub state: StateVector,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Sample {
    pub fn new(t: f64, state: StateVector, params: &PhysicalParameters) -> Self {
        let (x1, y1, x2, y2) = bob_positions(params, &state);
        Self {
            t,
            state,
            x1,
            y1,
            x2,
            y2,
        }
    }
}

/// Time-ordered samples produced by one simulation job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    sim_id: usize,
    samples: Vec<Sample>,
}

impl Trajectory {
    pub fn new(sim_id: usize, samples: Vec<Sample>) -> Self {
        Self { sim_id, samples }
    }

    pub fn sim_id(&self) -> usize {
        self.sim_id
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// State after the final step, if any step was taken.
    pub fn final_state(&self) -> Option<StateVector> {
        self.samples.last().map(|s| s.state)
    }
}
