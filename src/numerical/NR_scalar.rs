//! Newton-Raphson for a scalar function: the Newton transform iterated to a fixed point
//! under the relative convergence test.
//!
//! Example
//! ```
//! use RustedNewton::numerical::NR_scalar::solve_root;
//! let root = solve_root(|x| x * x * x - 1.0, 1.5, 1e-8).unwrap();
//! assert!((root - 1.0).abs() < 1e-6);
//! ```
use crate::Utils::logger::init_logger;
use crate::numerical::fixed_point::{FixedPointIterator, relative_change};
use crate::numerical::newton_transform::NewtonTransform;
use crate::numerical::root_finding_utils::{
    ClosureFunction, IterationRecord, NonlinearFunction, RootFindingError, RootFindingResult,
};
use crate::numerical::solver_config::SolverConfig;
use log::{debug, info, warn};
use std::time::Instant;
use tabled::{builder::Builder, settings::Style};

/// Newton-Raphson solver. Holds configuration only, every `solve` call is independent.
#[derive(Debug, Clone)]
pub struct NewtonRaphsonSolver {
    config: SolverConfig,
}

impl NewtonRaphsonSolver {
    pub fn new() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn set_tolerance(&mut self, tolerance: f64) -> Result<(), RootFindingError> {
        self.config.set_tolerance(tolerance)
    }

    pub fn set_max_iterations(
        &mut self,
        max_iterations: Option<usize>,
    ) -> Result<(), RootFindingError> {
        self.config.set_max_iterations(max_iterations)
    }

    pub fn set_record_history(&mut self, record_history: bool) {
        self.config.set_record_history(record_history);
    }
    /////////////////////////////////////////////////////////////////////////////////////////////
    //                MAIN LOOP
    /////////////////////////////////////////////////////////////////////////////////////////////
    /// Solve f(x) = 0 starting from `initial_guess`. The root is the first Newton iterate
    /// whose relative change from the previous one is below the tolerance; the residual
    /// f(root) is reported but not tested.
    pub fn solve<F>(
        &self,
        function: &F,
        initial_guess: f64,
    ) -> Result<RootFindingResult, RootFindingError>
    where
        F: NonlinearFunction,
    {
        self.config.validate()?;
        if !initial_guess.is_finite() {
            return Err(RootFindingError::InvalidInput(format!(
                "initial guess must be finite, got {}",
                initial_guess
            )));
        }
        let transform = NewtonTransform::with_step(function, self.config.dx);
        let iterator = FixedPointIterator::with_max_iterations(self.config.max_iterations);
        info!(
            "Newton-Raphson method for function: {}, initial guess: {}, tolerance: {}, max iterations: {:?}",
            function.name(),
            initial_guess,
            self.config.tolerance,
            iterator.max_iterations()
        );
        let tolerance = self.config.tolerance;
        let record_history = self.config.record_history;
        let mut history: Vec<IterationRecord> = Vec::new();
        let mut iteration = 0;
        let mut previous_change = f64::INFINITY;

        let fixed_point = iterator.iterate(
            |x: &f64, next: &f64| {
                iteration += 1;
                let change = relative_change(*x, *next)?;
                debug!(
                    "iteration = {}, x = {:.12}, relative change = {:.3e}",
                    iteration, next, change
                );
                if change > previous_change {
                    warn!("relative change is increasing at iteration {}", iteration);
                }
                previous_change = change;
                if record_history {
                    history.push(IterationRecord {
                        iteration,
                        x: *x,
                        next: *next,
                        relative_change: change,
                    });
                }
                Ok(change < tolerance)
            },
            |x: &f64| transform.step(*x),
            initial_guess,
        )?;

        let root = fixed_point.value;
        let function_value = function.evaluate(root);
        info!(
            "converged in {} iterations: root = {}, f(root) = {:.3e}",
            fixed_point.iterations, root, function_value
        );
        Ok(RootFindingResult {
            root,
            function_value,
            iterations: fixed_point.iterations,
            function_evaluations: transform.evaluations() + 1,
            converged: true,
            method: "newton_raphson".to_string(),
            history,
        })
    }

    /// `solve` with the logger from the configuration installed and a statistics table
    /// printed at the end
    pub fn solve_with_logging<F>(
        &self,
        function: &F,
        initial_guess: f64,
    ) -> Result<RootFindingResult, RootFindingError>
    where
        F: NonlinearFunction,
    {
        init_logger(self.config.loglevel, self.config.log_to_file);
        let begin = Instant::now();
        let result = self.solve(function, initial_guess)?;
        let elapsed = begin.elapsed();
        let table = calc_statistics(&result, elapsed.as_secs_f64());
        info!("\n \n CALC STATISTICS \n \n {}", table);
        Ok(result)
    }
}

impl Default for NewtonRaphsonSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// pretty table of the solution statistics
pub fn calc_statistics(result: &RootFindingResult, elapsed_seconds: f64) -> String {
    let stats: Vec<(&str, String)> = vec![
        ("method", result.method.clone()),
        ("root", format!("{}", result.root)),
        (
            "function value at root",
            format!("{:.3e}", result.function_value),
        ),
        ("number of iterations", result.iterations.to_string()),
        (
            "function evaluations",
            result.function_evaluations.to_string(),
        ),
        ("time elapsed, s", format!("{:.6}", elapsed_seconds)),
    ];
    let mut builder = Builder::default();
    for (name, value) in stats {
        builder.push_record([name.to_string(), value]);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

// Convenience functions for quick usage

/// Root of `f` near `initial_guess`, relative tolerance `epsilon`, forward-difference
/// derivative and the default iteration ceiling
pub fn solve_root<F>(f: F, initial_guess: f64, epsilon: f64) -> Result<f64, RootFindingError>
where
    F: Fn(f64) -> f64,
{
    let func = ClosureFunction::new(f, "newton_raphson_function".to_string());
    let mut solver = NewtonRaphsonSolver::new();
    solver.set_tolerance(epsilon)?;
    let result = solver.solve(&func, initial_guess)?;
    Ok(result.root)
}

/////////////////////////////////////////TESTS////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::fixed_point::{DEFAULT_TOLERANCE, good_enough};
    use crate::numerical::newton_transform::newton_step;
    use crate::numerical::root_finding_utils::FunctionWithDerivative;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_cubic() {
        let root = solve_root(|x| x * x * x - 1.0, 1.5, DEFAULT_TOLERANCE).unwrap();
        assert_abs_diff_eq!(root, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_quadratic() {
        let root = solve_root(|x| x * x - 4.0, 1.0, DEFAULT_TOLERANCE).unwrap();
        assert_abs_diff_eq!(root, 2.0, epsilon = 1e-6);
        let root = solve_root(|x| x * x - 4.0, -1.0, DEFAULT_TOLERANCE).unwrap();
        assert_abs_diff_eq!(root, -2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_transcendental() {
        // omega constant, x e^x = 1
        let root = solve_root(|x| x * x.exp() - 1.0, 0.5, DEFAULT_TOLERANCE).unwrap();
        assert_relative_eq!(root, 0.567143290409784, epsilon = 1e-9);
    }

    #[test]
    fn test_converged_root_is_a_fixed_point() {
        let f = |x: f64| x * x * x - 1.0;
        let root = solve_root(f, 1.5, DEFAULT_TOLERANCE).unwrap();
        let improved = newton_step(f)(root).unwrap();
        assert!(good_enough(root, improved, DEFAULT_TOLERANCE).unwrap());
    }

    #[test]
    fn test_zero_derivative() {
        let result = solve_root(|_x| 1.0, 0.0, DEFAULT_TOLERANCE);
        assert!(matches!(
            result,
            Err(RootFindingError::DivisionByZero { x, .. }) if x == 0.0
        ));
    }

    #[test]
    fn test_root_at_zero_hits_the_relative_test() {
        // iterates of 2x collapse onto 0 and the relative test ends up dividing by 0
        let result = solve_root(|x| 2.0 * x, 1.0, DEFAULT_TOLERANCE);
        assert!(matches!(
            result,
            Err(RootFindingError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_solver_result_fields() {
        let solver = NewtonRaphsonSolver::new();
        let func = ClosureFunction::new(|x| x * x - 4.0, "x^2 - 4".to_string());
        let result = solver.solve(&func, 1.0).unwrap();
        assert!(result.converged);
        assert_eq!(result.method, "newton_raphson");
        assert!(result.iterations > 1);
        // three evaluations per step plus the residual at the root
        assert_eq!(result.function_evaluations, 3 * result.iterations + 1);
        assert!(result.function_value.abs() < 1e-8);
        assert!(result.history.is_empty());
    }

    #[test]
    fn test_history_is_recorded() {
        let mut solver = NewtonRaphsonSolver::new();
        solver.set_record_history(true);
        let func = ClosureFunction::new(|x| x * x * x - 1.0, "x^3 - 1".to_string());
        let result = solver.solve(&func, 1.5).unwrap();
        assert_eq!(result.history.len(), result.iterations);
        let first = &result.history[0];
        assert_eq!(first.iteration, 1);
        assert_eq!(first.x, 1.5);
        let last = result.history.last().unwrap();
        assert_eq!(last.next, result.root);
        assert!(last.relative_change < 1e-8);
        for pair in result.history.windows(2) {
            assert_eq!(pair[0].next, pair[1].x);
        }
    }

    #[test]
    fn test_analytical_derivative() {
        let solver = NewtonRaphsonSolver::new();
        let func = FunctionWithDerivative::new(
            |x| x * x * x - 2.0 * x - 5.0,
            |x| 3.0 * x * x - 2.0,
            "x^3 - 2x - 5".to_string(),
        );
        let result = solver.solve(&func, 2.0).unwrap();
        assert_relative_eq!(result.root, 2.094551481542327, epsilon = 1e-9);
        assert_eq!(result.function_evaluations, result.iterations + 1);
    }

    #[test]
    fn test_iteration_ceiling() {
        let mut solver = NewtonRaphsonSolver::new();
        solver.set_max_iterations(Some(2)).unwrap();
        let func = ClosureFunction::new(|x| x * x * x - 1.0, "x^3 - 1".to_string());
        assert_eq!(
            solver.solve(&func, 1.5).unwrap_err(),
            RootFindingError::NonConvergence { iterations: 2 }
        );
    }

    #[test]
    fn test_cycling_newton_does_not_converge() {
        // x^3 - 2x + 2 from 0 cycles between 0 and 1
        let func = ClosureFunction::new(|x| x * x * x - 2.0 * x + 2.0, "cycle".to_string());
        let result = NewtonRaphsonSolver::new().solve(&func, 0.0);
        assert!(matches!(
            result,
            Err(RootFindingError::NonConvergence { .. })
                | Err(RootFindingError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_invalid_inputs() {
        let solver = NewtonRaphsonSolver::new();
        let func = ClosureFunction::new(|x| x - 1.0, "x - 1".to_string());
        assert!(matches!(
            solver.solve(&func, f64::NAN),
            Err(RootFindingError::InvalidInput(_))
        ));
        assert!(solve_root(|x| x - 1.0, 2.0, -1e-8).is_err());
    }

    #[test]
    fn test_domain_error_propagates() {
        let result = solve_root(|x| x.sqrt() - 3.0, -4.0, DEFAULT_TOLERANCE);
        assert!(matches!(
            result,
            Err(RootFindingError::DomainError { .. })
        ));
    }

    #[test]
    fn test_solve_with_logging_and_statistics() {
        let mut config = SolverConfig::default();
        config.set_loglevel("off").unwrap();
        let solver = NewtonRaphsonSolver::with_config(config);
        let func = ClosureFunction::new(|x| x * x - 2.0, "x^2 - 2".to_string());
        let result = solver.solve_with_logging(&func, 1.0).unwrap();
        assert_relative_eq!(result.root, 2.0_f64.sqrt(), epsilon = 1e-10);
        let table = calc_statistics(&result, 0.001);
        assert!(table.contains("number of iterations"));
        assert!(table.contains("newton_raphson"));
    }

    #[test]
    fn test_statistics_rows_keep_their_order() {
        let func = ClosureFunction::new(|x| x * x - 2.0, "x^2 - 2".to_string());
        let result = NewtonRaphsonSolver::new().solve(&func, 1.0).unwrap();
        let table = calc_statistics(&result, 0.001);
        assert_eq!(table, calc_statistics(&result, 0.001));
        let method = table.find("method").unwrap();
        let iterations = table.find("number of iterations").unwrap();
        let elapsed = table.find("time elapsed, s").unwrap();
        assert!(method < iterations && iterations < elapsed);
    }

    #[test]
    fn test_unbounded_solver() {
        let solver = NewtonRaphsonSolver::with_config(SolverConfig::unbounded());
        assert_eq!(solver.config().max_iterations, None);
        let func = ClosureFunction::new(|x| x * x * x - 1.0, "x^3 - 1".to_string());
        let result = solver.solve(&func, 1.5).unwrap();
        assert_abs_diff_eq!(result.root, 1.0, epsilon = 1e-6);
        assert!(result.converged);
        // far start, more steps than a tight ceiling would allow
        let mut bounded = NewtonRaphsonSolver::new();
        bounded.set_max_iterations(Some(3)).unwrap();
        assert!(bounded.solve(&func, 50.0).is_err());
        let far = solver.solve(&func, 50.0).unwrap();
        assert_abs_diff_eq!(far.root, 1.0, epsilon = 1e-6);
        assert!(far.iterations > 3);
    }
}
