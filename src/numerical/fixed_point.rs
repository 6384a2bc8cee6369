//! Generic fixed-point iteration: apply an `improve` step to the current guess until
//! a `good_enough(previous, next)` test accepts the new iterate.
//!
//! The relative convergence test used by every solver in the crate lives here too.
use crate::numerical::root_finding_utils::RootFindingError;
use log::{debug, error};

/// default tolerance of the relative convergence test
pub const DEFAULT_TOLERANCE: f64 = 1e-8;
/// default iteration ceiling
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Relative change between two consecutive iterates `|(v1 - v2) / v2|`.
/// A zero reference value `v2` has no relative change and is reported as a division by zero.
pub fn relative_change(v1: f64, v2: f64) -> Result<f64, RootFindingError> {
    if v2 == 0.0 {
        return Err(RootFindingError::DivisionByZero {
            x: v1,
            divisor: "reference iterate of the relative convergence test",
        });
    }
    Ok(((v1 - v2) / v2).abs())
}

/// Relative convergence test `|(v1 - v2) / v2| < epsilon`
pub fn good_enough(v1: f64, v2: f64, epsilon: f64) -> Result<bool, RootFindingError> {
    Ok(relative_change(v1, v2)? < epsilon)
}

/// converged value and the number of `improve` calls it took
#[derive(Debug, Clone, PartialEq)]
pub struct FixedPoint<T> {
    pub value: T,
    pub iterations: usize,
}

/// Fixed-point driver. `max_iterations = None` iterates until the test accepts,
/// however long that takes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPointIterator {
    max_iterations: Option<usize>,
}

impl FixedPointIterator {
    pub fn new() -> Self {
        Self {
            max_iterations: Some(DEFAULT_MAX_ITERATIONS),
        }
    }

    pub fn with_max_iterations(max_iterations: Option<usize>) -> Self {
        Self { max_iterations }
    }

    /// no ceiling at all
    pub fn unbounded() -> Self {
        Self {
            max_iterations: None,
        }
    }

    pub fn max_iterations(&self) -> Option<usize> {
        self.max_iterations
    }

    /// Iterate `next = improve(guess)` from `first_guess` and return the first `next`
    /// for which `good_enough(guess, next)` holds. Errors of either closure are
    /// propagated unchanged.
    pub fn iterate<T, G, I>(
        &self,
        mut good_enough: G,
        mut improve: I,
        first_guess: T,
    ) -> Result<FixedPoint<T>, RootFindingError>
    where
        G: FnMut(&T, &T) -> Result<bool, RootFindingError>,
        I: FnMut(&T) -> Result<T, RootFindingError>,
    {
        let mut guess = first_guess;
        let mut iterations = 0;
        loop {
            if let Some(max_iterations) = self.max_iterations {
                if iterations >= max_iterations {
                    error!(
                        "Maximum number of iterations ({}) reached. No fixed point found.",
                        max_iterations
                    );
                    return Err(RootFindingError::NonConvergence { iterations });
                }
            }
            let next = improve(&guess)?;
            iterations += 1;
            if good_enough(&guess, &next)? {
                debug!("fixed point accepted after {} iterations", iterations);
                return Ok(FixedPoint {
                    value: next,
                    iterations,
                });
            }
            guess = next;
        }
    }
}

impl Default for FixedPointIterator {
    fn default() -> Self {
        Self::new()
    }
}

// Convenience functions for quick usage

/// iterate with the default ceiling and return only the fixed point
pub fn iterate<T, G, I>(good_enough: G, improve: I, first_guess: T) -> Result<T, RootFindingError>
where
    G: FnMut(&T, &T) -> Result<bool, RootFindingError>,
    I: FnMut(&T) -> Result<T, RootFindingError>,
{
    let fixed_point = FixedPointIterator::new().iterate(good_enough, improve, first_guess)?;
    Ok(fixed_point.value)
}

/// Fixed point of a scalar map under the relative convergence test with tolerance `epsilon`
pub fn fixed_point<I>(improve: I, first_guess: f64, epsilon: f64) -> Result<f64, RootFindingError>
where
    I: FnMut(&f64) -> Result<f64, RootFindingError>,
{
    if !(epsilon > 0.0) {
        return Err(RootFindingError::InvalidInput(format!(
            "tolerance must be positive, got {}",
            epsilon
        )));
    }
    iterate(
        |previous: &f64, next: &f64| good_enough(*previous, *next, epsilon),
        improve,
        first_guess,
    )
}
