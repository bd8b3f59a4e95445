//! Configuration types for loading a simulation batch from JSON.
//!
//! A batch consists of:
//!
//! - [`PhysicalParameters`] – gravity, rod lengths, masses, `dt` and `steps`
//! - [`Scheme`]             – integrator, `"rk4"` (default) or `"euler"`
//! - `threads`              – worker pool size, omitted for hardware concurrency
//! - [`InitialCondition`]   – one entry per simulation job
//!
//! ```json
//! {
//!   "parameters": { "g": 9.81, "l1": 1.0, "l2": 1.0, "m1": 1.0, "m2": 1.0,
//!                   "dt": 0.01, "steps": 100000 },
//!   "scheme": "rk4",
//!   "threads": 4,
//!   "initial_conditions": [
//!     { "sim_id": 0, "theta1": 1.5707963267948966, "theta2": 1.5707963267948966 },
//!     { "sim_id": 1, "theta1": 1.0471975511965976, "theta2": 1.0471975511965976,
//!       "omega1": 0.1 }
//!   ]
//! }
//! ```
//!
//! Every field is optional; missing ones take the values of
//! [`SimulationConfig::default`].

use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::job::SimulationJob;
use crate::orchestrator::Orchestrator;
use crate::params::PhysicalParameters;
use crate::solvers::Scheme;
use crate::state::StateVector;

/// Initial state of one simulation job. Angular velocities default to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialCondition {
    pub sim_id: usize,
    pub theta1: f64,
    pub theta2: f64,
    #[serde(default)]
    pub omega1: f64,
    #[serde(default)]
    pub omega2: f64,
}

impl InitialCondition {
    pub fn new(sim_id: usize, state: StateVector) -> Self {
        Self {
            sim_id,
            theta1: state.theta1,
            theta2: state.theta2,
            omega1: state.omega1,
            omega2: state.omega2,
        }
    }

    pub fn state(&self) -> StateVector {
        StateVector::new(self.theta1, self.theta2, self.omega1, self.omega2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub parameters: PhysicalParameters,
    pub scheme: Scheme,
    pub threads: Option<usize>,
    pub initial_conditions: Vec<InitialCondition>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            parameters: PhysicalParameters::default(),
            scheme: Scheme::default(),
            threads: None,
            initial_conditions: default_initial_conditions(),
        }
    }
}

/// Five showcase jobs: a horizontal release, the same release nudged by
/// 0.01 rad, two other angle pairs and a release with initial spin.
pub fn default_initial_conditions() -> Vec<InitialCondition> {
    [
        StateVector::at_rest(FRAC_PI_2, FRAC_PI_2),
        StateVector::at_rest(FRAC_PI_2 + 0.01, FRAC_PI_2),
        StateVector::at_rest(FRAC_PI_3, FRAC_PI_3),
        StateVector::at_rest(FRAC_PI_4, FRAC_PI_2),
        StateVector::new(FRAC_PI_2, FRAC_PI_2, 0.1, 0.0),
    ]
    .into_iter()
    .enumerate()
    .map(|(sim_id, state)| InitialCondition::new(sim_id, state))
    .collect()
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SimError::Config(e.to_string()))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
            .map_err(|e| SimError::Config(format!("{}: {e}", path.display())))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| SimError::Config(e.to_string()))
    }

    /// Validates the configuration and builds one job per initial condition.
    pub fn build_jobs(&self) -> Result<Vec<SimulationJob>> {
        SimulationJob::batch(
            self.parameters.clone(),
            self.initial_conditions.iter().map(|ic| (ic.sim_id, ic.state())),
        )
    }

    pub fn orchestrator(&self) -> Orchestrator {
        Orchestrator::new(self.scheme).with_threads(self.threads.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::{InitialCondition, SimulationConfig};
    use crate::error::SimError;
    use crate::solvers::Scheme;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_3};

    #[test]
    fn default_config_reproduces_showcase_batch() {
        let config = SimulationConfig::default();
        assert_eq!(config.parameters.g, 9.81);
        assert_eq!(config.parameters.steps, 100_000);
        assert_eq!(config.scheme, Scheme::Rk4);
        let ids: Vec<usize> = config.initial_conditions.iter().map(|ic| ic.sim_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert_eq!(config.initial_conditions[4].omega1, 0.1);
        assert_eq!(config.build_jobs().expect("defaults should build").len(), 5);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = SimulationConfig::from_json_str(
            r#"{
                "parameters": { "steps": 10, "dt": 0.005 },
                "scheme": "euler",
                "threads": 2,
                "initial_conditions": [ { "sim_id": 9, "theta1": 1.0, "theta2": -1.0 } ]
            }"#,
        )
        .expect("config should parse");
        assert_eq!(config.parameters.steps, 10);
        assert_eq!(config.parameters.dt, 0.005);
        assert_eq!(config.parameters.m2, 1.0);
        assert_eq!(config.scheme, Scheme::Euler);
        assert_eq!(config.orchestrator().threads(), 2);
        assert_eq!(
            config.initial_conditions,
            vec![InitialCondition {
                sim_id: 9,
                theta1: 1.0,
                theta2: -1.0,
                omega1: 0.0,
                omega2: 0.0
            }]
        );
    }

    #[test]
    fn empty_document_is_the_default_config() {
        let config = SimulationConfig::from_json_str("{}").expect("config should parse");
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn malformed_json_is_a_config_fault() {
        let err = SimulationConfig::from_json_str(r#"{ "scheme": "leapfrog" }"#).unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn invalid_parameters_fail_job_construction() {
        let config =
            SimulationConfig::from_json_str(r#"{ "parameters": { "l1": 0.0 } }"#).expect("parses");
        let err = config.build_jobs().unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { name: "l1", .. }));
    }

    #[test]
    fn oversized_step_count_fails_job_construction() {
        let config = SimulationConfig::from_json_str(
            r#"{ "parameters": { "steps": 10000000000000000000 } }"#,
        )
        .expect("parses");
        let err = config.build_jobs().unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { name: "steps", .. }));
    }

    #[test]
    fn json_round_trip_preserves_config() {
        let mut config = SimulationConfig::default();
        config.initial_conditions[0].theta1 = FRAC_PI_2 / 3.0;
        let text = config.to_json_string().expect("serializes");
        assert_eq!(SimulationConfig::from_json_str(&text).expect("parses"), config);
    }

    #[test]
    fn printed_angle_parses_to_identical_bits() {
        let json = format!(
            r#"{{"initial_conditions":[{{"sim_id":0,"theta1":{:?},"theta2":0.0}}]}}"#,
            FRAC_PI_3
        );
        let config = SimulationConfig::from_json_str(&json).expect("parses");
        assert_eq!(config.initial_conditions[0].theta1.to_bits(), FRAC_PI_3.to_bits());

        let config = SimulationConfig::from_json_str(
            r#"{"initial_conditions":[{"sim_id":0,"theta1":1.0471975511965979,"theta2":0.0}]}"#,
        )
        .expect("parses");
        assert_eq!(config.initial_conditions[0].theta1.to_bits(), 0x3ff0_c152_382d_7366);
    }
}
