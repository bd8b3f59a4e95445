use nalgebra::SVector;

/// Represents an autonomous continuous-time dynamical system `dx/dt = f(x)`
/// with an `N`-dimensional state.
pub trait DynamicalSystem<const N: usize> {
    /// Evaluates the vector field at `x`.
    /// Implementations must be pure: the same `x` always yields the same result.
    fn apply(&self, x: &SVector<f64, N>) -> SVector<f64, N>;
}

// Closures can stand in for a system, which keeps solver tests small.
impl<F, const N: usize> DynamicalSystem<N> for F
where
    F: Fn(&SVector<f64, N>) -> SVector<f64, N>,
{
    fn apply(&self, x: &SVector<f64, N>) -> SVector<f64, N> {
        (self)(x)
    }
}

/// A trait for fixed-step solvers that advance a system by one step.
pub trait Steppable {
    /// Number of vector field evaluations performed per step.
    fn stages(&self) -> usize;

    /// Returns the state one step of size `dt` after `state`.
    /// The input state is left untouched.
    fn step<const N: usize>(
        &self,
        system: &impl DynamicalSystem<N>,
        state: &SVector<f64, N>,
        dt: f64,
    ) -> SVector<f64, N>;
}
