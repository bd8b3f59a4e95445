//! The `pendulum_core` crate is the numerical engine behind the double pendulum
//! batch runner.
//!
//! Key components:
//! - **Traits**: `DynamicalSystem` (autonomous flows) and `Steppable` (fixed-step solvers).
//! - **Dynamics**: closed-form equations of motion of the planar double pendulum.
//! - **Solvers**: RK4 and explicit Euler behind one `Scheme` switch.
//! - **Runner**: integrates one `SimulationJob` into a `Trajectory`.
//! - **Orchestrator**: runs a batch of jobs on a rayon worker pool, keyed by `sim_id`.
//! - **Output**: CSV persistence of trajectories, one file per job.

pub mod config;
pub mod dynamics;
pub mod energy;
pub mod error;
pub mod job;
pub mod orchestrator;
pub mod output;
pub mod params;
pub mod runner;
pub mod solvers;
pub mod state;
pub mod traits;
pub mod trajectory;

pub use config::{InitialCondition, SimulationConfig};
pub use error::{Result, SimError};
pub use job::SimulationJob;
pub use orchestrator::{BatchResult, Orchestrator};
pub use params::PhysicalParameters;
pub use runner::{run_trajectory, run_trajectory_with_cancel, CancelToken};
pub use solvers::{Euler, Scheme, RK4};
pub use state::{DerivativeVector, StateVector};
pub use trajectory::{Sample, Trajectory};
