//! High-level entry point for minimizing an [`Objective`] under box bounds.
//!
//! Selects the solver from [`LocalOptions::alg`], wraps the objective in an
//! [`ArgMinAdapter`] (projection, evaluation budget, best-point tracking) and
//! delegates the run to [`run_solver`]. Nelder–Mead is restarted from its
//! best vertex until a restart stops improving the cost.
use argmin::core::CostFunction;

use crate::optimization::{
    errors::{OptError, OptResult},
    local_optimizer::{
        LocalOutcome, Theta,
        adapter::{ArgMinAdapter, EvalTracker},
        builders::{build_lbfgs_hager_zhang, build_lbfgs_more_thuente, build_simplex},
        run::run_solver,
        traits::{LocalAlgorithm, LocalOptions, LocalStatus, Objective},
        types::MAX_SIMPLEX_RESTARTS,
        validation::{project_onto_bounds, validate_bounds},
    },
};

/// Minimize `objective` over the box `bounds`, starting from `theta0`.
///
/// # Behavior
/// - `theta0` is projected onto the bounds before the first evaluation, and
///   so is every candidate the solver proposes.
/// - With an empty `theta0` there is nothing to optimize: the objective is
///   evaluated once and the outcome carries [`LocalStatus::NotOptimized`].
/// - Reaching `opts.tols.max_eval` is reported as
///   [`LocalStatus::MaxEvalReached`], not as an error. The budget is shared
///   by every Nelder–Mead restart.
///
/// # Errors
/// - [`OptError::BoundsDimMismatch`] / [`OptError::InvalidBounds`] for bad
///   bounds.
/// - Any error raised by the objective, including
///   [`OptError::NonFiniteCost`].
/// - Solver construction errors from the builders.
///
/// # Example
/// ```
/// use likelihood_profiler::optimization::errors::OptResult;
/// use likelihood_profiler::optimization::local_optimizer::{minimize, LocalOptions, Theta};
/// use ndarray::array;
///
/// let objective = |theta: &Theta| -> OptResult<f64> { Ok((theta[0] - 1.0).powi(2)) };
/// let bounds = [(-10.0, 10.0)];
/// let out = minimize(&objective, &array![4.0], &bounds, &LocalOptions::default())?;
/// assert!((out.theta_hat[0] - 1.0).abs() < 0.1);
/// # Ok::<(), likelihood_profiler::optimization::errors::OptError>(())
/// ```
pub fn minimize<O: Objective + ?Sized>(
    objective: &O, theta0: &Theta, bounds: &[(f64, f64)], opts: &LocalOptions,
) -> OptResult<LocalOutcome> {
    validate_bounds(bounds, theta0.len())?;
    let start = project_onto_bounds(theta0, bounds);
    let tracker = EvalTracker::new();
    let problem = ArgMinAdapter::new(objective, bounds, opts.tols.max_eval, &tracker);
    if start.is_empty() {
        problem.cost(&start).map_err(OptError::from)?;
        return LocalOutcome::new(tracker.best(), LocalStatus::NotOptimized, 0, tracker.count());
    }
    match opts.alg {
        LocalAlgorithm::NelderMead => minimize_simplex(objective, start, bounds, opts, &tracker),
        LocalAlgorithm::LbfgsMoreThuente => {
            let solver = build_lbfgs_more_thuente(opts)?;
            run_solver(start, opts, problem, solver)
        }
        LocalAlgorithm::LbfgsHagerZhang => {
            let solver = build_lbfgs_hager_zhang(opts)?;
            run_solver(start, opts, problem, solver)
        }
    }
}

// ---- Helper Methods ----

/// Nelder–Mead restarted from the best point while restarts improve it.
///
/// A simplex stops once its vertex costs agree to `ftol_abs`, which also
/// happens when it straddles the minimum. Each converged run is followed by
/// a fresh simplex around the best point; the search ends when a restart
/// lowers the best cost by at most `ftol_abs`, when a run ends without
/// converging, or after `MAX_SIMPLEX_RESTARTS` restarts.
fn minimize_simplex<O: Objective + ?Sized>(
    objective: &O, start: Theta, bounds: &[(f64, f64)], opts: &LocalOptions,
    tracker: &EvalTracker,
) -> OptResult<LocalOutcome> {
    let ftol = opts.tols.ftol_abs.unwrap_or(f64::EPSILON);
    let mut outcome = run_simplex(objective, start, bounds, opts, tracker)?;
    let mut iterations = outcome.iterations;
    for _ in 0..MAX_SIMPLEX_RESTARTS {
        if outcome.status != LocalStatus::Converged {
            break;
        }
        let previous = outcome.value;
        outcome = run_simplex(objective, outcome.theta_hat.clone(), bounds, opts, tracker)?;
        iterations += outcome.iterations;
        if previous - outcome.value <= ftol {
            break;
        }
    }
    outcome.iterations = iterations;
    Ok(outcome)
}

/// One Nelder–Mead run. Failures while the initial simplex is evaluated are
/// deferred to the end of the run.
fn run_simplex<O: Objective + ?Sized>(
    objective: &O, start: Theta, bounds: &[(f64, f64)], opts: &LocalOptions,
    tracker: &EvalTracker,
) -> OptResult<LocalOutcome> {
    let solver = build_simplex(&start, bounds, opts)?;
    let problem = ArgMinAdapter::new(objective, bounds, opts.tols.max_eval, tracker)
        .defer_failures(start.len() + 1);
    run_solver(start, opts, problem, solver)
}
