// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
use crate::Utils::logger::{save_history_to_csv, save_history_to_file};
use crate::numerical::NR_scalar::{NewtonRaphsonSolver, solve_root};
use crate::numerical::fixed_point::DEFAULT_TOLERANCE;
use crate::numerical::friction_factor::{
    ChezyWallSolver, FrictionFactorConfig, chezy_wall_friction, nikuradse_residual,
};
use crate::numerical::root_finding_utils::{ClosureFunction, FunctionWithDerivative};
use crate::numerical::solver_config::SolverConfig;

pub fn root_finding_examples(example: usize) {
    match example {
        0 => {
            // roots of x^3 - 1 from the same initial guess computed in different ways
            let f = |x: f64| x.powi(3) - 1.0;
            let forward_difference = solve_root(f, 1.5, DEFAULT_TOLERANCE);

            // no iteration ceiling, the analytical derivative converges quadratically
            let solver = NewtonRaphsonSolver::with_config(SolverConfig::unbounded());
            let with_derivative = FunctionWithDerivative::new(
                f,
                |x: f64| 3.0 * x.powi(2),
                "x^3 - 1 with derivative".to_string(),
            );
            let analytical = solver.solve(&with_derivative, 1.5).map(|r| r.root);

            match (forward_difference, analytical) {
                (Ok(root), Ok(root_analytical)) => {
                    println!("forward difference Newton: {}", root);
                    println!("analytical derivative Newton: {}", root_analytical);
                }
                (Err(e), _) | (_, Err(e)) => println!("failed: {}", e),
            }
        }
        1 => {
            // Chezy friction coefficient of the wall region for several roughness scales
            for x_ref in [1e-4, 1e-3, 1e-2] {
                match chezy_wall_friction(x_ref) {
                    Ok((fw, rew)) => println!(
                        "xRef = {:e}: fw = {}, Rew = {}, Nikuradse residual = {:.3e}",
                        x_ref,
                        fw,
                        rew,
                        nikuradse_residual(8.0 * fw, rew)
                    ),
                    Err(e) => println!("xRef = {:e}: {}", x_ref, e),
                }
            }
        }
        2 => {
            // iteration history saved into csv file
            let mut solver = NewtonRaphsonSolver::new();
            solver.set_record_history(true);
            let func = ClosureFunction::new(|x| x * x.exp() - 1.0, "x*exp(x) - 1".to_string());
            match solver.solve(&func, 0.5) {
                Ok(result) => {
                    for record in &result.history {
                        println!(
                            "iteration {}: x = {:.15}, relative change = {:.3e}",
                            record.iteration, record.next, record.relative_change
                        );
                    }
                    if let Err(e) = save_history_to_csv(&result.history, "newton_history.csv") {
                        println!("history not saved: {}", e);
                    }
                    if let Err(e) = save_history_to_file(&result.history, "newton_history.txt") {
                        println!("history not saved: {}", e);
                    }
                }
                Err(e) => println!("failed: {}", e),
            }
        }
        3 => {
            // settings from TOML, logging to terminal with statistics table
            let document = r#"
                [solver]
                tolerance = 1e-12
                loglevel = "info"

                [friction]
                outer_tolerance = 1e-10
            "#;
            let config = match SolverConfig::from_toml_str(document) {
                Ok(config) => config,
                Err(e) => {
                    println!("bad config: {}", e);
                    return;
                }
            };
            let solver = NewtonRaphsonSolver::with_config(config);
            let func = ClosureFunction::new(|x| x.cos() - x, "cos(x) - x".to_string());
            match solver.solve_with_logging(&func, 1.0) {
                Ok(result) => println!("root = {}", result.root),
                Err(e) => println!("failed: {}", e),
            }
            match FrictionFactorConfig::from_toml_str(document)
                .and_then(|config| ChezyWallSolver::with_config(config).solve(1e-3))
            {
                Ok(result) => println!(
                    "fw = {}, Rew = {} after {} outer and {} inner iterations",
                    result.fw, result.rew, result.outer_iterations, result.inner_iterations
                ),
                Err(e) => println!("failed: {}", e),
            }
        }
        4 => {
            // failures are reported, not hidden
            match solve_root(|_x| 1.0, 0.0, DEFAULT_TOLERANCE) {
                Ok(root) => println!("unexpected root {}", root),
                Err(e) => println!("constant function: {}", e),
            }
            match chezy_wall_friction(0.05) {
                Ok((fw, rew)) => println!("fw = {}, Rew = {}", fw, rew),
                Err(e) => println!("xRef = 0.05: {}", e),
            }
            match chezy_wall_friction(0.0) {
                Ok((fw, rew)) => println!("fw = {}, Rew = {}", fw, rew),
                Err(e) => println!("xRef = 0: {}", e),
            }
        }
        _ => println!("no example with number {}", example),
    }
}
