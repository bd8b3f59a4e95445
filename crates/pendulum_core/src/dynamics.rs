//! Equations of motion of the planar double pendulum with point masses on
//! massless rigid rods.

use nalgebra::Vector4;

use crate::params::PhysicalParameters;
use crate::state::{DerivativeVector, StateVector};
use crate::traits::DynamicalSystem;

/// Evaluates the closed-form Lagrangian equations of motion.
///
/// The shared denominator `2m1 + m2 - m2 cos(2θ1 - 2θ2)` is positive whenever
/// `m1 > 0`. No clamping is done here; degenerate inputs surface as
/// non-finite values that the trajectory runner reports.
pub fn derivatives(params: &PhysicalParameters, state: &StateVector) -> DerivativeVector {
    let PhysicalParameters { g, l1, l2, m1, m2, .. } = *params;
    let StateVector {
        theta1,
        theta2,
        omega1,
        omega2,
    } = *state;

    let delta = theta1 - theta2;
    let (sin_delta, cos_delta) = delta.sin_cos();
    let den = 2.0 * m1 + m2 - m2 * (2.0 * theta1 - 2.0 * theta2).cos();

    let num1 = -g * (2.0 * m1 + m2) * theta1.sin();
    let num2 = -m2 * g * (theta1 - 2.0 * theta2).sin();
    let num3 =
        -2.0 * sin_delta * m2 * (omega2 * omega2 * l2 + omega1 * omega1 * l1 * cos_delta);
    let alpha1 = (num1 + num2 + num3) / (l1 * den);

    let alpha2 = 2.0
        * sin_delta
        * (omega1 * omega1 * l1 * (m1 + m2)
            + g * (m1 + m2) * theta1.cos()
            + omega2 * omega2 * l2 * m2 * cos_delta)
        / (l2 * den);

    DerivativeVector {
        omega1,
        omega2,
        alpha1,
        alpha2,
    }
}

/// Cartesian positions `(x1, y1, x2, y2)` of the two bobs, pivot at the
/// origin and `y` pointing up.
pub fn bob_positions(params: &PhysicalParameters, state: &StateVector) -> (f64, f64, f64, f64) {
    let x1 = params.l1 * state.theta1.sin();
    let y1 = -params.l1 * state.theta1.cos();
    let x2 = x1 + params.l2 * state.theta2.sin();
    let y2 = y1 - params.l2 * state.theta2.cos();
    (x1, y1, x2, y2)
}

/// The double pendulum as a [`DynamicalSystem`] over `(θ1, θ2, ω1, ω2)`.
#[derive(Debug, Clone, Copy)]
pub struct DoublePendulum<'a> {
    params: &'a PhysicalParameters,
}

impl<'a> DoublePendulum<'a> {
    pub fn new(params: &'a PhysicalParameters) -> Self {
        Self { params }
    }
}

impl DynamicalSystem<4> for DoublePendulum<'_> {
    fn apply(&self, x: &Vector4<f64>) -> Vector4<f64> {
        derivatives(self.params, &StateVector::from_vector(x)).to_vector()
    }
}
