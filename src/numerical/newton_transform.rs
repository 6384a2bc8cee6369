//! Newton update `x - f(x)/f'(x)` as an improvement step for the fixed-point iterator.
use crate::numerical::approx_derivative::{DEFAULT_DX, approx_derivative};
use crate::numerical::root_finding_utils::{NonlinearFunction, RootFindingError};
use std::cell::Cell;

/// Newton step for a `NonlinearFunction`. Uses the analytical derivative when the
/// function provides one and the forward difference with step `dx` otherwise.
/// Counts function evaluations of this transform only.
pub struct NewtonTransform<'a, F>
where
    F: NonlinearFunction,
{
    function: &'a F,
    dx: f64,
    evaluations: Cell<usize>,
}

impl<'a, F> NewtonTransform<'a, F>
where
    F: NonlinearFunction,
{
    pub fn new(function: &'a F) -> Self {
        Self::with_step(function, DEFAULT_DX)
    }

    pub fn with_step(function: &'a F, dx: f64) -> Self {
        Self {
            function,
            dx,
            evaluations: Cell::new(0),
        }
    }

    fn evaluate(&self, x: f64) -> f64 {
        self.evaluations.set(self.evaluations.get() + 1);
        self.function.evaluate(x)
    }

    /// f'(x), analytical if available
    pub fn derivative(&self, x: f64) -> f64 {
        match self.function.derivative(x) {
            Some(derivative) => derivative,
            None => approx_derivative(|x| self.evaluate(x), self.dx)(x),
        }
    }

    /// one Newton update from `x`
    pub fn step(&self, x: f64) -> Result<f64, RootFindingError> {
        let fx = self.evaluate(x);
        if !fx.is_finite() {
            return Err(RootFindingError::DomainError { x, value: fx });
        }
        newton_update(x, fx, self.derivative(x))
    }

    /// number of calls to the target function so far
    pub fn evaluations(&self) -> usize {
        self.evaluations.get()
    }
}

/// Newton step of a plain closure with the default forward-difference step
pub fn newton_step<F>(f: F) -> impl Fn(f64) -> Result<f64, RootFindingError>
where
    F: Fn(f64) -> f64,
{
    move |x: f64| {
        let fx = f(x);
        if !fx.is_finite() {
            return Err(RootFindingError::DomainError { x, value: fx });
        }
        newton_update(x, fx, approx_derivative(&f, DEFAULT_DX)(x))
    }
}

fn newton_update(x: f64, fx: f64, dfx: f64) -> Result<f64, RootFindingError> {
    if dfx == 0.0 {
        return Err(RootFindingError::DivisionByZero {
            x,
            divisor: "derivative",
        });
    }
    if !dfx.is_finite() {
        return Err(RootFindingError::DomainError { x, value: dfx });
    }
    Ok(x - fx / dfx)
}
