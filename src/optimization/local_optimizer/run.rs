//! Execution helper that runs an `argmin` solver on an [`ArgMinAdapter`] and
//! returns a crate-friendly [`LocalOutcome`].
//!
//! Stop signals raised from inside the objective (`MaxEvalReached`,
//! `ForcedStop`) and backend failures (e.g. a line search giving up) end the
//! run with a status instead of an error, as long as at least one point was
//! evaluated. Objective failures propagate. A failure parked in the
//! [`EvalTracker`] takes precedence over whatever the solver reported, since
//! solvers may wrap or mask it.
use argmin::core::{Error, Executor, IterState, Solver, State, TerminationReason, TerminationStatus};
use tracing::trace;

use crate::optimization::{
    errors::{OptError, OptResult},
    local_optimizer::{
        LocalOptions, LocalOutcome, LocalStatus, Theta,
        adapter::{ArgMinAdapter, EvalTracker},
        traits::Objective,
    },
};

/// Run any solver over `IterState<Theta, G, ..>` from `theta0`.
///
/// Shared by Nelder–Mead (`G = ()`) and both L-BFGS variants (`G = Grad`).
/// Attaches the slog observer when the `obs_slog` feature is on and
/// `opts.verbose` is set, and applies `opts.tols.max_iter`.
///
/// # Errors
/// - Propagates objective failures and invalid solver configuration.
/// - Propagates validation errors from [`LocalOutcome::new`].
pub fn run_solver<'a, O, G, S>(
    theta0: Theta, opts: &LocalOptions, problem: ArgMinAdapter<'a, O>, solver: S,
) -> OptResult<LocalOutcome>
where
    O: Objective + ?Sized,
    S: Solver<ArgMinAdapter<'a, O>, IterState<Theta, G, (), (), (), f64>> + 'static,
{
    let tracker = problem.tracker;
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }
    let run = optimizer.run().map(|result| {
        let state = result.state();
        (state.get_termination_status().clone(), state.get_iter())
    });
    summarize(run, tracker)
}

// ---- Helper Methods ----

/// Turn the executor result into a [`LocalOutcome`] built from the tracker.
/// A parked failure replaces the executor result.
///
/// Iterations are unknown when the run was interrupted and reported as 0.
fn summarize(
    run: Result<(TerminationStatus, u64), Error>, tracker: &EvalTracker,
) -> OptResult<LocalOutcome> {
    let run = match tracker.take_failure() {
        Some(err) => Err(err),
        None => run.map_err(OptError::from),
    };
    let (status, iterations) = match run {
        Ok((termination, iterations)) => (status_from_termination(&termination), iterations),
        Err(err) => {
            let status = match &err {
                OptError::MaxEvalReached { .. } => LocalStatus::MaxEvalReached,
                OptError::ForcedStop { .. } => LocalStatus::ForcedStop,
                OptError::InvalidParameter { .. }
                | OptError::NotImplemented { .. }
                | OptError::NotInitialized { .. }
                | OptError::ConditionViolated { .. }
                | OptError::CheckPointNotFound { .. }
                | OptError::PotentialBug { .. }
                | OptError::ImpossibleError { .. }
                | OptError::BackendError { .. }
                | OptError::UnknownError
                    if tracker.best().is_some() =>
                {
                    LocalStatus::Failed(err.to_string())
                }
                _ => return Err(err),
            };
            (status, 0)
        }
    };
    trace!(%status, iterations, fn_evals = tracker.count(), "local run finished");
    LocalOutcome::new(tracker.best(), status, iterations, tracker.count())
}

fn status_from_termination(termination: &TerminationStatus) -> LocalStatus {
    match termination {
        TerminationStatus::Terminated(TerminationReason::SolverConverged)
        | TerminationStatus::Terminated(TerminationReason::TargetCostReached) => {
            LocalStatus::Converged
        }
        TerminationStatus::Terminated(TerminationReason::MaxItersReached) => {
            LocalStatus::MaxIterReached
        }
        TerminationStatus::Terminated(reason) => LocalStatus::Failed(format!("{reason:?}")),
        TerminationStatus::NotTerminated => LocalStatus::Failed("not terminated".to_string()),
    }
}
