//! local_optimizer — argmin-powered bounded minimization.
//!
//! Purpose
//! -------
//! Provide the single minimization capability the profiler depends on:
//! `minimize(objective, θ₀, bounds, options) -> LocalOutcome`. Callers hand
//! in any [`Objective`] (plain closures qualify) and never touch Argmin
//! types.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] projects candidates onto the box bounds,
//!   enforces the evaluation budget and records the best point.
//! - [`builders`] construct a Nelder–Mead simplex (default) or L-BFGS with
//!   either line search and finite-difference gradients.
//! - [`run`] executes the solver and normalizes every ending (convergence,
//!   iteration cap, evaluation budget, forced stop, backend failure) into a
//!   [`LocalStatus`].
//!
//! Invariants & assumptions
//! ------------------------
//! - The objective is only evaluated inside the bounds.
//! - `LocalOutcome::theta_hat` is the best point *evaluated*, so it is
//!   always feasible and its `value` is exact.
//! - Objective errors other than the stop signals abort the run and
//!   propagate as [`OptError`](crate::optimization::errors::OptError).
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover projection, budget accounting, solver
//!   construction and status mapping; `api` tests run full solves.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::traits::{LocalAlgorithm, LocalOptions, LocalOutcome, LocalStatus, Objective, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, Grad, Theta};

pub mod prelude {
    pub use super::api::minimize;
    pub use super::traits::{LocalAlgorithm, LocalOptions, LocalOutcome, LocalStatus, Objective};
    pub use super::types::Theta;
}
