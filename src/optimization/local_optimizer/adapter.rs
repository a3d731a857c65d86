//! Adapter that exposes an [`Objective`] as an `argmin` problem.
//!
//! Every cost evaluation goes through the same path:
//! 1. stop with `OptError::MaxEvalReached` once the evaluation budget is spent,
//! 2. project the candidate onto the box bounds,
//! 3. evaluate the objective and reject non-finite values,
//! 4. record the evaluation in the shared [`EvalTracker`],
//! 5. add `BOUND_PENALTY` times the squared distance to the box.
//!
//! Box constraints are therefore hard: the objective never sees a point
//! outside its bounds, whatever the solver proposes. Gradients are finite
//! differences of the penalized cost.
//!
//! The first failure of an evaluation is parked in the tracker and every
//! later call fails with it. Solvers that cannot take an error while they
//! initialize (Nelder–Mead evaluates its whole simplex first) get `+∞`
//! instead for their first `deferred_calls` calls; the runner re-raises the
//! parked failure once the run ends.
use std::cell::{Cell, RefCell};

use crate::optimization::{
    errors::{OptError, OptResult},
    local_optimizer::{
        traits::Objective,
        types::{BOUND_PENALTY, Cost, Grad, Theta},
        validation::{project_onto_bounds, validate_grad},
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Evaluation counter, best-point record and parked failure shared between
/// an adapter and the runner that owns it.
///
/// The best point is kept here rather than read back from the solver state
/// so that runs interrupted by a stop signal still report it.
#[derive(Debug, Default)]
pub struct EvalTracker {
    count: Cell<usize>,
    best: RefCell<Option<(Theta, Cost)>>,
    failure: RefCell<Option<OptError>>,
}

impl EvalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objective evaluations performed so far.
    pub fn count(&self) -> usize {
        self.count.get()
    }

    fn bump(&self) {
        self.count.set(self.count.get() + 1);
    }

    fn record(&self, theta: &Theta, value: Cost) {
        let mut best = self.best.borrow_mut();
        let improves = match best.as_ref() {
            Some((_, best_value)) => value < *best_value,
            None => true,
        };
        if improves {
            *best = Some((theta.clone(), value));
        }
    }

    /// Best `(θ, cost)` evaluated so far.
    pub fn best(&self) -> Option<(Theta, Cost)> {
        self.best.borrow().clone()
    }

    /// Keep the first failure of the run.
    pub(crate) fn park(&self, err: OptError) {
        let mut slot = self.failure.borrow_mut();
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    /// Failure parked during the current run, if any.
    pub fn failure(&self) -> Option<OptError> {
        self.failure.borrow().clone()
    }

    /// Remove and return the parked failure.
    pub fn take_failure(&self) -> Option<OptError> {
        self.failure.borrow_mut().take()
    }
}

/// Bridges an [`Objective`] to `argmin`'s `CostFunction` and `Gradient`.
pub struct ArgMinAdapter<'a, O: Objective + ?Sized> {
    pub f: &'a O,
    pub bounds: &'a [(f64, f64)],
    pub max_eval: Option<usize>,
    pub tracker: &'a EvalTracker,
    deferred_calls: usize,
    calls: Cell<usize>,
}

impl<'a, O: Objective + ?Sized> ArgMinAdapter<'a, O> {
    pub fn new(
        f: &'a O, bounds: &'a [(f64, f64)], max_eval: Option<usize>, tracker: &'a EvalTracker,
    ) -> Self {
        Self { f, bounds, max_eval, tracker, deferred_calls: 0, calls: Cell::new(0) }
    }

    /// Answer failures with `+∞` during the first `calls` cost calls.
    pub fn defer_failures(mut self, calls: usize) -> Self {
        self.deferred_calls = calls;
        self
    }

    /// Budgeted evaluation of the penalized cost at `theta`.
    fn evaluate(&self, theta: &Theta) -> OptResult<Cost> {
        if theta.iter().any(|x| x.is_nan()) {
            return Err(OptError::ConditionViolated {
                text: "Candidate has NaN coordinates.".to_string(),
            });
        }
        if let Some(max_eval) = self.max_eval {
            if self.tracker.count() >= max_eval {
                return Err(OptError::MaxEvalReached { max_eval });
            }
        }
        let projected = project_onto_bounds(theta, self.bounds);
        self.tracker.bump();
        let output = self.f.value(&projected)?;
        if !output.is_finite() {
            return Err(OptError::NonFiniteCost { value: output });
        }
        self.tracker.record(&projected, output);
        let excess = theta - &projected;
        Ok(output + BOUND_PENALTY * excess.dot(&excess))
    }
}

impl<'a, O: Objective + ?Sized> CostFunction for ArgMinAdapter<'a, O> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the objective at the projection of `θ` onto the bounds, plus
    /// the penalty on the distance between `θ` and its projection.
    ///
    /// # Errors
    /// The parked failure of the run, once there is one and the deferred
    /// calls are spent:
    /// - `OptError::MaxEvalReached` once `max_eval` evaluations were made.
    /// - `OptError::NonFiniteCost` if the objective returns `NaN` or `±∞`.
    /// - `OptError::ConditionViolated` for a candidate with NaN coordinates.
    /// - Any `OptError` raised by the objective itself.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        let deferred = call < self.deferred_calls;
        let err = match self.tracker.failure() {
            Some(err) => err,
            None => match self.evaluate(theta) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    self.tracker.park(err.clone());
                    err
                }
            },
        };
        if deferred { Ok(f64::INFINITY) } else { Err(err.into()) }
    }
}

impl<'a, O: Objective + ?Sized> Gradient for ArgMinAdapter<'a, O> {
    type Param = Theta;
    type Gradient = Grad;

    /// Finite-difference gradient of the cost.
    ///
    /// Central differences first; if any cost evaluation failed or the result
    /// is not finite, retry once with forward differences. The FD closure must
    /// return `f64`, so the first error is parked in `closure_err` and turned
    /// back into an `Err` afterwards.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let cost_func = |theta: &Theta| -> f64 {
            match self.cost(theta) {
                Ok(val) => val,
                Err(e) => {
                    let mut slot = closure_err.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                    f64::NAN
                }
            }
        };
        let fd_grad = theta.central_diff(&cost_func);
        let captured = closure_err.take();
        if let Some(err) = captured {
            if is_stop_signal(&err) {
                return Err(err);
            }
            return run_fd_diff(theta, &cost_func, &closure_err);
        }
        match validate_grad(&fd_grad, dim) {
            Ok(()) => Ok(fd_grad),
            Err(_) => run_fd_diff(theta, &cost_func, &closure_err),
        }
    }
}

fn is_stop_signal(err: &Error) -> bool {
    err.downcast_ref::<OptError>().is_some_and(OptError::is_stop_signal)
}

/// Forward-difference gradient of `func` at `theta`, with error capture.
///
/// # Errors
/// Returns any error captured while evaluating `func`, or the validation
/// error of the resulting gradient.
fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> Result<Grad, Error> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}
