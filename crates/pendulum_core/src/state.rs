//! State and derivative vectors of the double pendulum.
//!
//! Both are thin named views over a 4-component `nalgebra` vector so the
//! solvers can do their arithmetic on `Vector4<f64>` while the rest of the
//! crate reads `theta1`/`omega2` instead of indices.

use std::fmt;

use nalgebra::Vector4;
use serde::{Deserialize, Serialize};

/// Angles of the two rods from the downward vertical (radians) and their
/// angular velocities (rad/s).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StateVector {
    pub theta1: f64,
    pub theta2: f64,
    pub omega1: f64,
    pub omega2: f64,
}

impl StateVector {
    pub fn new(theta1: f64, theta2: f64, omega1: f64, omega2: f64) -> Self {
        Self {
            theta1,
            theta2,
            omega1,
            omega2,
        }
    }

    /// Both rods at rest at the given angles.
    pub fn at_rest(theta1: f64, theta2: f64) -> Self {
        Self::new(theta1, theta2, 0.0, 0.0)
    }

    pub fn to_vector(&self) -> Vector4<f64> {
        Vector4::new(self.theta1, self.theta2, self.omega1, self.omega2)
    }

    pub fn from_vector(v: &Vector4<f64>) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.theta1, self.theta2, self.omega1, self.omega2]
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|c| c.is_finite())
    }
}

impl From<Vector4<f64>> for StateVector {
    fn from(v: Vector4<f64>) -> Self {
        Self::from_vector(&v)
    }
}

impl From<StateVector> for Vector4<f64> {
    fn from(s: StateVector) -> Self {
        s.to_vector()
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(theta1={}, theta2={}, omega1={}, omega2={})",
            self.theta1, self.theta2, self.omega1, self.omega2
        )
    }
}

/// Instantaneous rate of change of a [`StateVector`]:
/// the angular velocities and angular accelerations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivativeVector {
    pub omega1: f64,
    pub omega2: f64,
    pub alpha1: f64,
    pub alpha2: f64,
}

impl DerivativeVector {
    pub fn to_vector(&self) -> Vector4<f64> {
        Vector4::new(self.omega1, self.omega2, self.alpha1, self.alpha2)
    }
}
