//! Runs a single simulation job to completion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::dynamics::DoublePendulum;
use crate::error::{Result, SimError};
use crate::job::SimulationJob;
use crate::solvers::Scheme;
use crate::state::StateVector;
use crate::traits::Steppable;
use crate::trajectory::{Sample, Trajectory};

/// Shared flag that asks in-flight runs to stop at the next step boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Integrates `job` for exactly `steps` steps and records the state after
/// each one. `steps == 0` yields an empty trajectory.
pub fn run_trajectory(job: &SimulationJob, scheme: Scheme) -> Result<Trajectory> {
    run(job, scheme, None)
}

/// Same as [`run_trajectory`], but checks `cancel` before every step.
pub fn run_trajectory_with_cancel(
    job: &SimulationJob,
    scheme: Scheme,
    cancel: &CancelToken,
) -> Result<Trajectory> {
    run(job, scheme, Some(cancel))
}

fn run(job: &SimulationJob, scheme: Scheme, cancel: Option<&CancelToken>) -> Result<Trajectory> {
    let params = job.params();
    let system = DoublePendulum::new(params);
    let dt = params.dt;

    let mut samples = Vec::with_capacity(params.steps);
    let mut state = job.initial().to_vector();
    let mut t = 0.0;

    for step in 0..params.steps {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(SimError::Cancelled {
                sim_id: job.sim_id(),
                step,
            });
        }

        state = scheme.step(&system, &state, dt);
        let current = StateVector::from_vector(&state);
        if !current.is_finite() {
            return Err(SimError::NumericalFault {
                sim_id: job.sim_id(),
                step,
                state: current,
            });
        }

        t += dt;
        samples.push(Sample::new(t, current, params));
    }

    Ok(Trajectory::new(job.sim_id(), samples))
}
