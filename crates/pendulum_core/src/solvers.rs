use std::fmt;
use std::str::FromStr;

use nalgebra::SVector;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::traits::{DynamicalSystem, Steppable};

/// Classic Runge-Kutta 4th Order Solver
#[derive(Debug, Clone, Copy, Default)]
pub struct RK4;

impl Steppable for RK4 {
    fn stages(&self) -> usize {
        4
    }

    fn step<const N: usize>(
        &self,
        system: &impl DynamicalSystem<N>,
        state: &SVector<f64, N>,
        dt: f64,
    ) -> SVector<f64, N> {
        let half = 0.5 * dt;

        // k1 = f(y)
        let k1 = system.apply(state);

        // k2 = f(y + dt*k1/2)
        let k2 = system.apply(&(state + k1 * half));

        // k3 = f(y + dt*k2/2)
        let k3 = system.apply(&(state + k2 * half));

        // k4 = f(y + dt*k3)
        let k4 = system.apply(&(state + k3 * dt));

        // y_next = y + dt/6 * (k1 + 2k2 + 2k3 + k4)
        state + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
    }
}

/// Explicit (forward) Euler Solver
/// y_next = y + dt * f(y). First order, one evaluation per step.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euler;

impl Steppable for Euler {
    fn stages(&self) -> usize {
        1
    }

    fn step<const N: usize>(
        &self,
        system: &impl DynamicalSystem<N>,
        state: &SVector<f64, N>,
        dt: f64,
    ) -> SVector<f64, N> {
        state + system.apply(state) * dt
    }
}

/// Integration scheme selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Rk4,
    Euler,
}

impl Steppable for Scheme {
    fn stages(&self) -> usize {
        match self {
            Scheme::Rk4 => RK4.stages(),
            Scheme::Euler => Euler.stages(),
        }
    }

    fn step<const N: usize>(
        &self,
        system: &impl DynamicalSystem<N>,
        state: &SVector<f64, N>,
        dt: f64,
    ) -> SVector<f64, N> {
        match self {
            Scheme::Rk4 => RK4.step(system, state, dt),
            Scheme::Euler => Euler.step(system, state, dt),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Rk4 => f.write_str("rk4"),
            Scheme::Euler => f.write_str("euler"),
        }
    }
}

impl FromStr for Scheme {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rk4" => Ok(Scheme::Rk4),
            "euler" => Ok(Scheme::Euler),
            other => Err(SimError::Config(format!(
                "unknown integration scheme '{other}' (expected 'rk4' or 'euler')"
            ))),
        }
    }
}
