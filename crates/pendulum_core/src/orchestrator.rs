//! Parallel fan-out of independent simulation jobs onto a bounded worker pool.

use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroUsize;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{Result, SimError};
use crate::job::SimulationJob;
use crate::runner::{run_trajectory, run_trajectory_with_cancel, CancelToken};
use crate::solvers::Scheme;
use crate::trajectory::Trajectory;

/// Runs one trajectory per job on a dedicated thread pool and collects
/// every outcome, keyed by `sim_id`.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    scheme: Scheme,
    threads: Option<usize>,
    cancel: Option<CancelToken>,
}

impl Orchestrator {
    pub fn new(scheme: Scheme) -> Self {
        Self {
            scheme,
            ..Self::default()
        }
    }

    /// Caps the pool at `threads` workers. Zero restores the default
    /// (available hardware concurrency).
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = (threads > 0).then_some(threads);
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Number of workers the next [`Orchestrator::run`] will use.
    pub fn threads(&self) -> usize {
        self.threads.unwrap_or_else(default_parallelism)
    }

    /// Dispatches every job and blocks until all of them have produced a
    /// trajectory or a fault. A fault in one job never stops its siblings.
    ///
    /// Only batch-level problems are returned as `Err`: a repeated `sim_id`
    /// or a worker pool that cannot be started.
    pub fn run(&self, jobs: &[SimulationJob]) -> Result<BatchResult> {
        let mut seen = BTreeSet::new();
        for job in jobs {
            if !seen.insert(job.sim_id()) {
                return Err(SimError::DuplicateSimId(job.sim_id()));
            }
        }

        let threads = self.threads();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("pendulum-worker-{i}"))
            .build()
            .map_err(|e| SimError::ThreadPool(e.to_string()))?;

        info!(
            jobs = jobs.len(),
            threads,
            scheme = %self.scheme,
            "dispatching simulation batch"
        );

        let outcomes: Vec<(usize, Result<Trajectory>)> = pool.install(|| {
            jobs.par_iter()
                .map(|job| (job.sim_id(), self.run_job(job)))
                .collect()
        });

        let batch = BatchResult::from_outcomes(outcomes);
        info!(
            succeeded = batch.len() - batch.fault_count(),
            failed = batch.fault_count(),
            "simulation batch complete"
        );
        Ok(batch)
    }

    fn run_job(&self, job: &SimulationJob) -> Result<Trajectory> {
        let outcome = match &self.cancel {
            Some(token) => run_trajectory_with_cancel(job, self.scheme, token),
            None => run_trajectory(job, self.scheme),
        };
        match &outcome {
            Ok(trajectory) => debug!(sim_id = job.sim_id(), samples = trajectory.len(), "job finished"),
            Err(err) => warn!(sim_id = job.sim_id(), error = %err, "job failed"),
        }
        outcome
    }
}

fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Per-job outcomes of a batch, ordered by `sim_id`.
#[derive(Debug, Default)]
pub struct BatchResult {
    outcomes: BTreeMap<usize, Result<Trajectory>>,
}

impl BatchResult {
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (usize, Result<Trajectory>)>,
    {
        Self {
            outcomes: outcomes.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn get(&self, sim_id: usize) -> Option<&Result<Trajectory>> {
        self.outcomes.get(&sim_id)
    }

    /// The trajectory for `sim_id`, if that job exists and succeeded.
    pub fn trajectory(&self, sim_id: usize) -> Option<&Trajectory> {
        self.get(sim_id).and_then(|outcome| outcome.as_ref().ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Result<Trajectory>)> {
        self.outcomes.iter().map(|(id, outcome)| (*id, outcome))
    }

    pub fn trajectories(&self) -> impl Iterator<Item = &Trajectory> {
        self.outcomes.values().filter_map(|outcome| outcome.as_ref().ok())
    }

    pub fn faults(&self) -> impl Iterator<Item = (usize, &SimError)> {
        self.outcomes
            .iter()
            .filter_map(|(id, outcome)| outcome.as_ref().err().map(|e| (*id, e)))
    }

    pub fn fault_count(&self) -> usize {
        self.faults().count()
    }

    pub fn is_success(&self) -> bool {
        self.fault_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::Orchestrator;
    use crate::error::SimError;
    use crate::job::SimulationJob;
    use crate::params::PhysicalParameters;
    use crate::runner::{run_trajectory, CancelToken};
    use crate::solvers::Scheme;
    use crate::state::StateVector;

    fn params() -> PhysicalParameters {
        PhysicalParameters::default().with_steps(400)
    }

    #[test]
    fn results_are_keyed_by_sim_id_not_position() {
        let jobs = SimulationJob::batch(
            params(),
            [
                (42, StateVector::at_rest(1.0, 0.0)),
                (7, StateVector::at_rest(0.0, 1.0)),
                (19, StateVector::at_rest(0.5, 0.5)),
            ],
        )
        .expect("jobs should build");
        let batch = Orchestrator::new(Scheme::Rk4)
            .with_threads(3)
            .run(&jobs)
            .expect("batch should run");

        assert_eq!(batch.len(), 3);
        for job in &jobs {
            let trajectory = batch.trajectory(job.sim_id()).expect("job should succeed");
            assert_eq!(trajectory.sim_id(), job.sim_id());
            let expected = run_trajectory(job, Scheme::Rk4).expect("run should succeed");
            assert_eq!(trajectory, &expected);
        }
        let ids: Vec<usize> = batch.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![7, 19, 42]);
    }

    #[test]
    fn duplicate_sim_ids_are_rejected_before_dispatch() {
        let jobs = SimulationJob::batch(
            params(),
            [(1, StateVector::at_rest(0.1, 0.1)), (1, StateVector::at_rest(0.2, 0.2))],
        )
        .expect("jobs should build");
        let err = Orchestrator::default().run(&jobs).unwrap_err();
        assert!(matches!(err, SimError::DuplicateSimId(1)));
    }

    #[test]
    fn faulty_job_does_not_affect_siblings() {
        let jobs = SimulationJob::batch(
            params(),
            [
                (0, StateVector::at_rest(0.4, 0.2)),
                (1, StateVector::new(0.3, 0.3, 1e200, 0.0)),
                (2, StateVector::at_rest(-0.4, 0.9)),
            ],
        )
        .expect("jobs should build");
        let batch = Orchestrator::new(Scheme::Rk4).run(&jobs).expect("batch should run");

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.fault_count(), 1);
        assert!(!batch.is_success());
        let (id, err) = batch.faults().next().expect("one fault");
        assert_eq!(id, 1);
        assert!(err.is_numerical());
        assert_eq!(batch.trajectory(0).map(|t| t.len()), Some(400));
        assert_eq!(batch.trajectory(2).map(|t| t.len()), Some(400));
    }

    #[test]
    fn thread_count_does_not_change_results() {
        let jobs = SimulationJob::batch(
            params(),
            (0..6).map(|i| (i, StateVector::at_rest(0.3 * i as f64, 1.0))),
        )
        .expect("jobs should build");
        let serial = Orchestrator::new(Scheme::Euler).with_threads(1).run(&jobs).expect("serial run");
        let parallel = Orchestrator::new(Scheme::Euler).with_threads(4).run(&jobs).expect("parallel run");
        for id in 0..6 {
            assert_eq!(serial.trajectory(id), parallel.trajectory(id));
        }
    }

    #[test]
    fn empty_batch_returns_empty_result() {
        let batch = Orchestrator::default().run(&[]).expect("empty batch should run");
        assert!(batch.is_empty());
        assert!(batch.is_success());
    }

    #[test]
    fn cancelled_batch_reports_every_job() {
        let token = CancelToken::new();
        token.cancel();
        let jobs = SimulationJob::batch(
            params(),
            (0..4).map(|i| (i, StateVector::at_rest(0.1, 0.1))),
        )
        .expect("jobs should build");
        let batch = Orchestrator::new(Scheme::Rk4)
            .with_cancel(token)
            .run(&jobs)
            .expect("batch should run");
        assert_eq!(batch.len(), 4);
        assert_eq!(batch.fault_count(), 4);
        assert!(batch
            .faults()
            .all(|(_, e)| matches!(e, SimError::Cancelled { step: 0, .. })));
    }

    #[test]
    fn zero_threads_means_default_parallelism() {
        let orchestrator = Orchestrator::default().with_threads(0);
        assert!(orchestrator.threads() >= 1);
        assert_eq!(Orchestrator::default().with_threads(2).threads(), 2);
    }
}
