//! Mechanical energy of the double pendulum, used to judge integrator quality.

use crate::params::PhysicalParameters;
use crate::state::StateVector;
use crate::trajectory::Trajectory;

pub fn kinetic_energy(params: &PhysicalParameters, state: &StateVector) -> f64 {
    let PhysicalParameters { l1, l2, m1, m2, .. } = *params;
    let StateVector {
        theta1,
        theta2,
        omega1,
        omega2,
    } = *state;
    0.5 * m1 * l1 * l1 * omega1 * omega1
        + 0.5
            * m2
            * (l1 * l1 * omega1 * omega1
                + l2 * l2 * omega2 * omega2
                + 2.0 * l1 * l2 * omega1 * omega2 * (theta1 - theta2).cos())
}

/// Potential energy with the pivot as the zero level.
pub fn potential_energy(params: &PhysicalParameters, state: &StateVector) -> f64 {
    let PhysicalParameters { g, l1, l2, m1, m2, .. } = *params;
    -(m1 + m2) * g * l1 * state.theta1.cos() - m2 * g * l2 * state.theta2.cos()
}

pub fn total_energy(params: &PhysicalParameters, state: &StateVector) -> f64 {
    kinetic_energy(params, state) + potential_energy(params, state)
}

/// Total energy at every sample of a trajectory.
pub fn energy_series(params: &PhysicalParameters, trajectory: &Trajectory) -> Vec<f64> {
    trajectory
        .samples()
        .iter()
        .map(|s| total_energy(params, &s.state))
        .collect()
}

/// Largest absolute deviation of the total energy from `reference` over a
/// trajectory. Returns 0 for an empty trajectory.
pub fn max_energy_drift(params: &PhysicalParameters, trajectory: &Trajectory, reference: f64) -> f64 {
    energy_series(params, trajectory)
        .into_iter()
        .map(|e| (e - reference).abs())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::{kinetic_energy, potential_energy, total_energy};
    use crate::params::PhysicalParameters;
    use crate::state::StateVector;

    #[test]
    fn hanging_at_rest_has_minimum_potential() {
        let params = PhysicalParameters::default();
        let state = StateVector::at_rest(0.0, 0.0);
        assert_eq!(kinetic_energy(&params, &state), 0.0);
        let expected = -(2.0 * 9.81 * 1.0) - 9.81;
        assert!((potential_energy(&params, &state) - expected).abs() < 1e-12);
    }

    #[test]
    fn rigid_rotation_kinetic_energy() {
        // Both rods aligned and spinning together: T = ½ω²(m1 L1² + m2 (L1+L2)²).
        let params = PhysicalParameters::default();
        let state = StateVector::new(0.3, 0.3, 2.0, 2.0);
        let expected = 0.5 * 4.0 * (1.0 + 4.0);
        assert!((kinetic_energy(&params, &state) - expected).abs() < 1e-12);
        assert!(
            (total_energy(&params, &state) - expected - potential_energy(&params, &state)).abs()
                < 1e-12
        );
    }
}
