/// error enum, function trait with closure wrappers, result and history records
pub mod root_finding_utils;
/// generic fixed-point iteration and the relative convergence test
pub mod fixed_point;
/// forward finite difference
pub mod approx_derivative;
/// Newton update x - f(x)/f'(x) as an improvement step
pub mod newton_transform;
/// tolerances, iteration ceiling, history and logging settings, TOML loading
pub mod solver_config;
///  Example#1
/// ```
///  use RustedNewton::numerical::NR_scalar::solve_root;
///  // root of x^3 - 1 starting from 1.5
///  let root = solve_root(|x| x.powi(3) - 1.0, 1.5, 1e-8).unwrap();
///  println!("root = {}", root);
///  ```
/// Example#2
///  ```
///  // or more verbose way with iteration history
///  use RustedNewton::numerical::NR_scalar::NewtonRaphsonSolver;
///  use RustedNewton::numerical::root_finding_utils::ClosureFunction;
///  let mut solver = NewtonRaphsonSolver::new();
///  solver.set_record_history(true);
///  let func = ClosureFunction::new(|x| x * x - 4.0, "x^2 - 4".to_string());
///  let result = solver.solve(&func, 1.0).unwrap();
///  assert_eq!(result.history.len(), result.iterations);
///  println!("root = {}, f(root) = {}", result.root, result.function_value);
///  ```
pub mod NR_scalar;
/// Chezy wall friction coefficient: Newton-Raphson nested in an outer fixed-point loop
pub mod friction_factor;
