//! Physical and numerical parameters shared by every job of a batch.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Upper bound on `steps`; every step keeps one sample in memory.
pub const MAX_STEPS: usize = 100_000_000;

/// Gravity, rod lengths, bob masses, step size and step count.
///
/// Missing fields fall back to [`PhysicalParameters::default`] when
/// deserialized, so a config file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalParameters {
    pub g: f64,   // gravitational acceleration
    pub l1: f64,  // upper rod length
    pub l2: f64,  // lower rod length
    pub m1: f64,  // upper bob mass
    pub m2: f64,  // lower bob mass
    pub dt: f64,  // fixed step size
    pub steps: usize,
}

impl Default for PhysicalParameters {
    fn default() -> Self {
        Self {
            g: 9.81,
            l1: 1.0,
            l2: 1.0,
            m1: 1.0,
            m2: 1.0,
            dt: 0.01,
            steps: 100_000,
        }
    }
}

impl PhysicalParameters {
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Total simulated time covered by a full run.
    pub fn duration(&self) -> f64 {
        self.dt * self.steps as f64
    }

    /// Rejects parameter sets that cannot describe a physical pendulum.
    pub fn validate(&self) -> Result<()> {
        if !self.g.is_finite() || self.g < 0.0 {
            return Err(SimError::InvalidParameter {
                name: "g",
                value: self.g,
                reason: "must be finite and non-negative",
            });
        }
        for (name, value) in [("l1", self.l1), ("l2", self.l2), ("m1", self.m1), ("m2", self.m2)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::InvalidParameter {
                    name,
                    value,
                    reason: "must be finite and positive",
                });
            }
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimError::InvalidParameter {
                name: "dt",
                value: self.dt,
                reason: "step size must be finite and positive",
            });
        }
        if self.steps > MAX_STEPS {
            return Err(SimError::InvalidParameter {
                name: "steps",
                value: self.steps as f64,
                reason: "exceeds the per-job step limit",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{PhysicalParameters, MAX_STEPS};

    fn assert_err_contains<T: std::fmt::Debug>(result: crate::error::Result<T>, needle: &str) {
        let err = result.expect_err("expected error");
        let message = format!("{err}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    #[test]
    fn defaults_are_valid() {
        let params = PhysicalParameters::default();
        params.validate().expect("defaults should validate");
        assert_eq!(params.g, 9.81);
        assert!((params.duration() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_physical_values() {
        let base = PhysicalParameters::default();
        assert_err_contains(PhysicalParameters { m1: 0.0, ..base.clone() }.validate(), "`m1`");
        assert_err_contains(PhysicalParameters { l2: -1.0, ..base.clone() }.validate(), "`l2`");
        assert_err_contains(PhysicalParameters { g: f64::NAN, ..base.clone() }.validate(), "`g`");
        assert_err_contains(base.clone().with_dt(0.0).validate(), "step size");
    }

    #[test]
    fn zero_steps_is_a_valid_configuration() {
        PhysicalParameters::default()
            .with_steps(0)
            .validate()
            .expect("zero steps is allowed");
    }

    #[test]
    fn step_count_is_bounded() {
        let base = PhysicalParameters::default();
        base.clone()
            .with_steps(MAX_STEPS)
            .validate()
            .expect("limit itself is allowed");
        assert_err_contains(base.clone().with_steps(MAX_STEPS + 1).validate(), "`steps`");
        assert_err_contains(base.with_steps(usize::MAX).validate(), "step limit");
    }
}
