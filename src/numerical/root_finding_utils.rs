//! Shared types for the scalar root finders: the error enum, the function trait
//! and its closure wrappers, and the result/history records.
use std::fmt;

/// Error types for the fixed-point and Newton-Raphson solvers
#[derive(Debug, Clone, PartialEq)]
pub enum RootFindingError {
    /// a divisor vanished: the approximated derivative, the reference value of the
    /// relative convergence test, or a model parameter
    DivisionByZero { x: f64, divisor: &'static str },
    /// iteration ceiling exceeded before the convergence test accepted an iterate
    NonConvergence { iterations: usize },
    /// the function returned NaN or infinity
    DomainError { x: f64, value: f64 },
    InvalidInput(String),
}

impl fmt::Display for RootFindingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RootFindingError::DivisionByZero { x, divisor } => {
                write!(f, "Division by zero: {} vanished at x = {}", divisor, x)
            }
            RootFindingError::NonConvergence { iterations } => {
                write!(f, "No convergence after {} iterations", iterations)
            }
            RootFindingError::DomainError { x, value } => {
                write!(f, "Function is not finite at x = {}: f(x) = {}", x, value)
            }
            RootFindingError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for RootFindingError {}
//////////////////////////////////TRAITS AND IMPLEMENTATIONS/////////////////////////////////

/// Scalar equation f(x) = 0 driven by the Newton transform `x - f(x)/f'(x)`.
/// A NaN or infinite value of `evaluate` ends the solve with `DomainError`.
pub trait NonlinearFunction {
    fn evaluate(&self, x: f64) -> f64;

    /// f'(x) used in the Newton step instead of `(f(x + dx) - f(x)) / dx`. Each call to
    /// the default costs two extra evaluations per step, an override costs none.
    fn derivative(&self, _x: f64) -> Option<f64> {
        None
    }

    /// shown in the solver log and statistics
    fn name(&self) -> &str {
        "newton_function"
    }
}

/// closure with no derivative, Newton steps use the forward difference
pub struct ClosureFunction<F>
where
    F: Fn(f64) -> f64,
{
    func: F,
    name: String,
}

impl<F> ClosureFunction<F>
where
    F: Fn(f64) -> f64,
{
    pub fn new(func: F, name: impl Into<String>) -> Self {
        Self {
            func,
            name: name.into(),
        }
    }
}

impl<F> NonlinearFunction for ClosureFunction<F>
where
    F: Fn(f64) -> f64,
{
    fn evaluate(&self, x: f64) -> f64 {
        (self.func)(x)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// closure paired with its analytical derivative f'(x)
pub struct FunctionWithDerivative<F, D>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    func: F,
    derivative_func: D,
    name: String,
}

impl<F, D> FunctionWithDerivative<F, D>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    pub fn new(func: F, derivative_func: D, name: impl Into<String>) -> Self {
        Self {
            func,
            derivative_func,
            name: name.into(),
        }
    }
}

impl<F, D> NonlinearFunction for FunctionWithDerivative<F, D>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    fn evaluate(&self, x: f64) -> f64 {
        (self.func)(x)
    }

    fn derivative(&self, x: f64) -> Option<f64> {
        Some((self.derivative_func)(x))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

///////////////////////////////////////////RESULTS///////////////////////////////////////////
/// one accepted or rejected step of the iteration
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    pub iteration: usize,
    pub x: f64,
    pub next: f64,
    pub relative_change: f64,
}

/// Result structure for the Newton-Raphson solver
#[derive(Debug, Clone)]
pub struct RootFindingResult {
    /// the iterate that passed the convergence test
    pub root: f64,
    pub function_value: f64,
    pub iterations: usize,
    pub function_evaluations: usize,
    pub converged: bool,
    pub method: String,
    /// empty unless history recording is switched on
    pub history: Vec<IterationRecord>,
}
