//! Chezy friction coefficient of the wall region.
//!
//! The Nikuradse equation
//! `fw * (0.86 * ln(4 * Rew * sqrt(fw)) - 0.8)^2 - 1 = 0`
//! is implicit in `fw` for a given wall Reynolds number `Rew`, and `Rew = fw / xRef`
//! depends on `fw` in turn. The inner problem is solved with Newton-Raphson, the outer
//! one by fixed-point iteration on `Rew`:
//! 1) first estimate `fw0 = 0.301 * xRef^0.2` (Blasius, as modified by Chiew and Parker 1994),
//!    `Rew0 = fw0 / xRef`
//! 2) Newton-solve the Nikuradse equation for `fw0` with `Rew0` frozen, starting at `fw = 0.01`
//! 3) `Rew0 = fw0 / xRef`, repeat 2) until `Rew0` passes the relative convergence test
//! 4) return `(fw0 / 8, Rew0)`
use crate::numerical::NR_scalar::NewtonRaphsonSolver;
use crate::numerical::fixed_point::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, FixedPointIterator, good_enough,
};
use crate::numerical::root_finding_utils::{ClosureFunction, RootFindingError};
use crate::numerical::solver_config::{
    SolverConfig, check_positive, parse_toml, read_document, toml_bool, toml_f64, toml_usize,
};
use log::{debug, info};
use std::path::Path;
use toml::{Table, Value};

pub const BLASIUS_COEFFICIENT: f64 = 0.301;
pub const BLASIUS_EXPONENT: f64 = 0.2;
/// starting point of every inner Newton solve
pub const INNER_INITIAL_GUESS: f64 = 0.01;

/// Nikuradse residual `fw * (0.86 * ln(4 * Rew * sqrt(fw)) - 0.8)^2 - 1`
pub fn nikuradse_residual(fw: f64, rew: f64) -> f64 {
    fw * (0.86 * (4.0 * rew * fw.sqrt()).ln() - 0.8).powi(2) - 1.0
}

/// closed-form first estimate of `fw0`
pub fn blasius_estimate(x_ref: f64) -> f64 {
    BLASIUS_COEFFICIENT * x_ref.powf(BLASIUS_EXPONENT)
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrictionFactorConfig {
    /// Newton solver settings for the inner problem
    pub inner: SolverConfig,
    /// epsilon of the relative test on consecutive `Rew`
    pub outer_tolerance: f64,
    pub inner_guess: f64,
    /// `None` iterates without a ceiling
    pub max_outer_iterations: Option<usize>,
}

impl Default for FrictionFactorConfig {
    fn default() -> Self {
        Self {
            inner: SolverConfig::default(),
            outer_tolerance: DEFAULT_TOLERANCE,
            inner_guess: INNER_INITIAL_GUESS,
            max_outer_iterations: Some(DEFAULT_MAX_ITERATIONS),
        }
    }
}

impl FrictionFactorConfig {
    /// Reads `[solver]` for the inner solver and `[friction]` for the outer loop
    /// ```toml
    /// [friction]
    /// outer_tolerance = 1e-8
    /// inner_guess = 0.01
    /// max_outer_iterations = 100   # or: unbounded = true
    /// ```
    pub fn from_toml_str(document: &str) -> Result<Self, RootFindingError> {
        let table = parse_toml(document)?;
        let mut config = Self {
            inner: SolverConfig::from_toml_str(document)?,
            ..Self::default()
        };
        match table.get("friction") {
            Some(Value::Table(friction)) => config.apply_toml_table(friction)?,
            Some(_) => {
                return Err(RootFindingError::InvalidInput(
                    "[friction] must be a table".to_string(),
                ));
            }
            None => {}
        }
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RootFindingError> {
        let document = read_document(path.as_ref())?;
        Self::from_toml_str(&document)
    }

    fn apply_toml_table(&mut self, table: &Table) -> Result<(), RootFindingError> {
        for (key, value) in table {
            match key.as_str() {
                "outer_tolerance" => {
                    let tolerance = toml_f64(key, value)?;
                    check_positive(key, tolerance)?;
                    self.outer_tolerance = tolerance;
                }
                "inner_guess" => {
                    let guess = toml_f64(key, value)?;
                    check_positive(key, guess)?;
                    self.inner_guess = guess;
                }
                "max_outer_iterations" => {
                    let max_iterations = toml_usize(key, value)?;
                    if max_iterations == 0 {
                        return Err(RootFindingError::InvalidInput(
                            "max_outer_iterations should be a positive number".to_string(),
                        ));
                    }
                    self.max_outer_iterations = Some(max_iterations);
                }
                "unbounded" => {
                    if toml_bool(key, value)? {
                        self.max_outer_iterations = None;
                    }
                }
                other => {
                    return Err(RootFindingError::InvalidInput(format!(
                        "unknown key in [friction]: {}",
                        other
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrictionFactorResult {
    /// Chezy wall friction coefficient, `fw0 / 8`
    pub fw: f64,
    /// wall Reynolds number `fw0 / xRef`
    pub rew: f64,
    pub outer_iterations: usize,
    /// Newton iterations summed over all inner solves
    pub inner_iterations: usize,
}

// outer-loop state
#[derive(Debug, Clone, Copy)]
struct WallState {
    fw0: f64,
    rew0: f64,
}

#[derive(Debug, Clone)]
pub struct ChezyWallSolver {
    config: FrictionFactorConfig,
}

impl ChezyWallSolver {
    pub fn new() -> Self {
        Self {
            config: FrictionFactorConfig::default(),
        }
    }

    pub fn with_config(config: FrictionFactorConfig) -> Self {
        Self { config }
    }

    pub fn solve(&self, x_ref: f64) -> Result<FrictionFactorResult, RootFindingError> {
        if x_ref == 0.0 {
            return Err(RootFindingError::DivisionByZero {
                x: x_ref,
                divisor: "reference parameter xRef",
            });
        }
        if !(x_ref > 0.0 && x_ref.is_finite()) {
            return Err(RootFindingError::InvalidInput(format!(
                "xRef must be positive and finite, got {}",
                x_ref
            )));
        }
        check_positive("outer_tolerance", self.config.outer_tolerance)?;

        let newton = NewtonRaphsonSolver::with_config(self.config.inner.clone());
        let inner_guess = self.config.inner_guess;
        let outer_tolerance = self.config.outer_tolerance;
        let iterator = FixedPointIterator::with_max_iterations(self.config.max_outer_iterations);
        let mut inner_iterations = 0;

        let fw0 = blasius_estimate(x_ref);
        let first = WallState {
            fw0,
            rew0: fw0 / x_ref,
        };
        info!(
            "Chezy wall friction for xRef = {}: first estimate fw0 = {}, Rew0 = {}",
            x_ref, first.fw0, first.rew0
        );

        let fixed_point = iterator.iterate(
            |previous: &WallState, next: &WallState| {
                good_enough(previous.rew0, next.rew0, outer_tolerance)
            },
            |state: &WallState| {
                let rew0 = state.rew0;
                let nikuradse = ClosureFunction::new(
                    move |fw| nikuradse_residual(fw, rew0),
                    "nikuradse".to_string(),
                );
                let inner = newton.solve(&nikuradse, inner_guess)?;
                inner_iterations += inner.iterations;
                debug!(
                    "Rew0 = {}: fw0 = {} after {} Newton iterations",
                    rew0, inner.root, inner.iterations
                );
                Ok(WallState {
                    fw0: inner.root,
                    rew0: inner.root / x_ref,
                })
            },
            first,
        )?;

        let WallState { fw0, rew0 } = fixed_point.value;
        info!(
            "Chezy wall friction converged after {} outer iterations: fw = {}, Rew = {}",
            fixed_point.iterations,
            fw0 / 8.0,
            rew0
        );
        Ok(FrictionFactorResult {
            fw: fw0 / 8.0,
            rew: rew0,
            outer_iterations: fixed_point.iterations,
            inner_iterations,
        })
    }
}

impl Default for ChezyWallSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// `(fw, Rew)` for the reference parameter `x_ref` with default settings
pub fn chezy_wall_friction(x_ref: f64) -> Result<(f64, f64), RootFindingError> {
    let result = ChezyWallSolver::new().solve(x_ref)?;
    Ok((result.fw, result.rew))
}
