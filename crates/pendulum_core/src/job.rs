use std::sync::Arc;

use crate::error::{Result, SimError};
use crate::params::PhysicalParameters;
use crate::state::StateVector;

/// One unit of parallel work: an initial condition plus the batch's shared
/// parameters. Validated on construction and read-only afterwards.
#[derive(Debug, Clone)]
pub struct SimulationJob {
    sim_id: usize,
    initial: StateVector,
    params: Arc<PhysicalParameters>,
}

impl SimulationJob {
    pub fn new(sim_id: usize, initial: StateVector, params: Arc<PhysicalParameters>) -> Result<Self> {
        params.validate()?;
        if !initial.is_finite() {
            return Err(SimError::InvalidInitialState {
                sim_id,
                state: initial,
            });
        }
        Ok(Self {
            sim_id,
            initial,
            params,
        })
    }

    /// Builds one job per `(sim_id, initial state)` pair, all sharing `params`.
    /// Every job is validated before any is returned.
    pub fn batch<I>(params: PhysicalParameters, initial_conditions: I) -> Result<Vec<Self>>
    where
        I: IntoIterator<Item = (usize, StateVector)>,
    {
        params.validate()?;
        let params = Arc::new(params);
        initial_conditions
            .into_iter()
            .map(|(sim_id, initial)| Self::new(sim_id, initial, Arc::clone(&params)))
            .collect()
    }

    pub fn sim_id(&self) -> usize {
        self.sim_id
    }

    pub fn initial(&self) -> StateVector {
        self.initial
    }

    pub fn params(&self) -> &PhysicalParameters {
        &self.params
    }

    pub fn shared_params(&self) -> &Arc<PhysicalParameters> {
        &self.params
    }
}
