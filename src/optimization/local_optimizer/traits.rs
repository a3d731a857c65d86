//! Public configuration and result surface of the local optimizer.
//!
//! - [`Objective`]: anything that maps a parameter vector to a scalar cost.
//! - [`LocalAlgorithm`]: which `argmin` solver runs the minimization.
//! - [`Tolerances`] and [`LocalOptions`]: validated run configuration.
//! - [`LocalStatus`] and [`LocalOutcome`]: normalized result of [`minimize`].
//!
//! Convention: the local optimizer always *minimizes*. Callers that need a
//! maximization (or a penalized objective) build it into the closure they
//! pass in.
//!
//! [`minimize`]: crate::optimization::local_optimizer::minimize
use std::str::FromStr;

use crate::optimization::{
    errors::{OptError, OptResult},
    local_optimizer::{
        Cost, Theta,
        types::{DEFAULT_FTOL_ABS, DEFAULT_MAX_EVAL, DEFAULT_SIMPLEX_STEP},
        validation::{
            validate_theta_hat, validate_value, verify_ftol_abs, verify_initial_step,
            verify_lbfgs_mem, verify_max_eval, verify_max_iter, verify_tol_grad,
        },
    },
};

/// Scalar objective minimized by the local optimizer.
///
/// Errors returned by `value` abort the run and are propagated to the caller
/// of [`minimize`](crate::optimization::local_optimizer::minimize), except
/// for the stop signals (`OptError::MaxEvalReached`, `OptError::ForcedStop`),
/// which end the run early with the best point seen so far.
pub trait Objective {
    fn value(&self, theta: &Theta) -> OptResult<Cost>;
}

impl<F> Objective for F
where
    F: Fn(&Theta) -> OptResult<Cost>,
{
    fn value(&self, theta: &Theta) -> OptResult<Cost> {
        self(theta)
    }
}

/// Choice of local solver.
///
/// Variants:
/// - `NelderMead`: derivative-free simplex (default).
/// - `LbfgsMoreThuente`: L-BFGS with More–Thuente line search and
///   finite-difference gradients.
/// - `LbfgsHagerZhang`: L-BFGS with Hager–Zhang line search and
///   finite-difference gradients.
///
/// Parsing:
/// `FromStr` accepts case-insensitive names (`"NelderMead"`,
/// `"LbfgsMoreThuente"`, `"LbfgsHagerZhang"`); unknown names return
/// `OptError::InvalidLocalAlgorithm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalAlgorithm {
    #[default]
    NelderMead,
    LbfgsMoreThuente,
    LbfgsHagerZhang,
}

impl FromStr for LocalAlgorithm {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "neldermead" => Ok(LocalAlgorithm::NelderMead),
            "lbfgsmorethuente" => Ok(LocalAlgorithm::LbfgsMoreThuente),
            "lbfgshagerzhang" => Ok(LocalAlgorithm::LbfgsHagerZhang),
            _ => Err(OptError::InvalidLocalAlgorithm {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'NelderMead', 'LbfgsMoreThuente' \
                         or 'LbfgsHagerZhang'.",
            }),
        }
    }
}

/// Numerical tolerances and limits of one local run.
///
/// - `ftol_abs`: absolute objective tolerance. Nelder–Mead stops when the
///   standard deviation of the simplex costs falls below it; L-BFGS uses it
///   as the cost-change tolerance.
/// - `tol_grad`: gradient-norm tolerance (L-BFGS only).
/// - `max_iter`: cap on solver iterations.
/// - `max_eval`: cap on objective evaluations; reaching it ends the run with
///   [`LocalStatus::MaxEvalReached`].
///
/// Any field can be `None` but at least one must be provided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub ftol_abs: Option<f64>,
    pub tol_grad: Option<f64>,
    pub max_iter: Option<usize>,
    pub max_eval: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if every field is `None`.
    /// - [`OptError::InvalidFtolAbs`] / [`OptError::InvalidTolGrad`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] / [`OptError::InvalidMaxEval`] for zero
    ///   limits.
    pub fn new(
        ftol_abs: Option<f64>, tol_grad: Option<f64>, max_iter: Option<usize>,
        max_eval: Option<usize>,
    ) -> OptResult<Self> {
        if ftol_abs.is_none() && tol_grad.is_none() && max_iter.is_none() && max_eval.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_ftol_abs(ftol_abs)?;
        verify_tol_grad(tol_grad)?;
        verify_max_iter(max_iter)?;
        verify_max_eval(max_eval)?;
        Ok(Self { ftol_abs, tol_grad, max_iter, max_eval })
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            ftol_abs: Some(DEFAULT_FTOL_ABS),
            tol_grad: None,
            max_iter: None,
            max_eval: Some(DEFAULT_MAX_EVAL),
        }
    }
}

/// Local optimizer configuration.
///
/// Default:
/// - `alg`: `NelderMead`
/// - `tols`: `ftol_abs = 1e-3`, `max_eval = 100_000`
/// - `initial_step`: `0.1` (relative simplex edge)
/// - `lbfgs_mem`: `None` (uses default of 7)
/// - `verbose`: `false`
#[derive(Debug, Clone, PartialEq)]
pub struct LocalOptions {
    pub alg: LocalAlgorithm,
    pub tols: Tolerances,
    pub initial_step: f64,
    pub lbfgs_mem: Option<usize>,
    pub verbose: bool,
}

impl LocalOptions {
    /// Create validated options.
    ///
    /// # Errors
    /// - [`OptError::InvalidInitialStep`] if `initial_step` is not positive
    ///   and finite.
    /// - [`OptError::InvalidLBFGSMem`] if `lbfgs_mem == Some(0)`.
    pub fn new(
        alg: LocalAlgorithm, tols: Tolerances, initial_step: f64, lbfgs_mem: Option<usize>,
        verbose: bool,
    ) -> OptResult<Self> {
        verify_initial_step(initial_step)?;
        verify_lbfgs_mem(lbfgs_mem)?;
        Ok(Self { alg, tols, initial_step, lbfgs_mem, verbose })
    }

    /// Copy of `self` with a different evaluation budget.
    pub fn with_max_eval(&self, max_eval: usize) -> OptResult<Self> {
        verify_max_eval(Some(max_eval))?;
        let mut opts = self.clone();
        opts.tols.max_eval = Some(max_eval);
        Ok(opts)
    }
}

impl Default for LocalOptions {
    fn default() -> Self {
        Self {
            alg: LocalAlgorithm::default(),
            tols: Tolerances::default(),
            initial_step: DEFAULT_SIMPLEX_STEP,
            lbfgs_mem: None,
            verbose: false,
        }
    }
}

/// Why a local run ended.
///
/// Only `Converged` means the solver's own stopping rule fired; every other
/// variant still comes with the best point evaluated during the run.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalStatus {
    Converged,
    MaxIterReached,
    MaxEvalReached,
    ForcedStop,
    /// The point was evaluated but not re-optimized.
    NotOptimized,
    /// The solver backend gave up (e.g. a failed line search).
    Failed(String),
}

impl LocalStatus {
    pub fn is_converged(&self) -> bool {
        matches!(self, LocalStatus::Converged | LocalStatus::NotOptimized)
    }
}

impl std::fmt::Display for LocalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocalStatus::Converged => write!(f, "converged"),
            LocalStatus::MaxIterReached => write!(f, "maximum iterations reached"),
            LocalStatus::MaxEvalReached => write!(f, "maximum evaluations reached"),
            LocalStatus::ForcedStop => write!(f, "forced stop"),
            LocalStatus::NotOptimized => write!(f, "not optimized"),
            LocalStatus::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Canonical result returned by `minimize`.
///
/// - `theta_hat`: best parameter vector evaluated (already projected onto
///   the bounds).
/// - `value`: objective value at `theta_hat`.
/// - `status`: why the run ended.
/// - `iterations`: solver iterations performed.
/// - `fn_evals`: objective evaluations performed.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalOutcome {
    pub theta_hat: Theta,
    pub value: Cost,
    pub status: LocalStatus,
    pub iterations: usize,
    pub fn_evals: usize,
}

impl LocalOutcome {
    /// Build a validated [`LocalOutcome`].
    ///
    /// # Errors
    /// - [`OptError::MissingThetaHat`] if no point was evaluated.
    /// - [`OptError::InvalidThetaHat`] / [`OptError::NonFiniteCost`] for
    ///   non-finite entries.
    pub fn new(
        best: Option<(Theta, Cost)>, status: LocalStatus, iterations: u64, fn_evals: usize,
    ) -> OptResult<Self> {
        let (theta_hat, value) = match best {
            Some((theta, value)) => (Some(theta), value),
            None => (None, f64::NAN),
        };
        let theta_hat = validate_theta_hat(theta_hat)?;
        validate_value(value)?;
        Ok(Self { theta_hat, value, status, iterations: iterations as usize, fn_evals })
    }
}
