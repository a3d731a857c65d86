//! local_optimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the core numeric types and solver aliases used by the local
//! optimizer so the rest of the crate stays agnostic to `ndarray` and
//! Argmin generics.
//!
//! Key behaviors
//! -------------
//! - Define canonical aliases for parameter vectors, gradients and scalar
//!   costs (`Theta`, `Grad`, `Cost`).
//! - Expose pre-wired solver aliases: the Nelder–Mead simplex used by
//!   default and L-BFGS with either line search.
//!
//! Invariants & assumptions
//! ------------------------
//! - All optimizer vectors are `ndarray` containers over `f64`.
//! - `Cost` is the value being *minimized*; callers that maximize build
//!   their own sign flip into the objective.
//! - Candidates outside the box are evaluated at their projection plus
//!   `BOUND_PENALTY` times the squared distance to it. The extension is
//!   continuous and its minimum always lies inside the box.
//!
//! Testing notes
//! -------------
//! - This module only defines type aliases and constants; correctness is
//!   exercised by the solver tests in the surrounding modules.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    neldermead::NelderMead,
    quasinewton::LBFGS,
};
use ndarray::Array1;

/// Parameter vector `θ` handed to the local optimizer.
pub type Theta = Array1<f64>;

/// Gradient vector `∇c(θ)`, matching the shape of `Theta`.
pub type Grad = Array1<f64>;

/// Scalar objective value being minimized.
pub type Cost = f64;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Default relative edge length of the initial Nelder–Mead simplex.
pub const DEFAULT_SIMPLEX_STEP: f64 = 0.1;

/// Default absolute objective tolerance.
pub const DEFAULT_FTOL_ABS: f64 = 1e-3;

/// Default objective-evaluation budget of one local run.
pub const DEFAULT_MAX_EVAL: usize = 100_000;

/// Weight of the squared distance to the box added to the cost of a
/// candidate outside the bounds.
pub const BOUND_PENALTY: f64 = 1.0;

/// Largest step tried by the Hager–Zhang line search.
pub const HAGER_ZHANG_MAX_STEP: f64 = 10.0;

/// Cap on Nelder–Mead restarts from the best vertex.
pub const MAX_SIMPLEX_RESTARTS: usize = 10;

/// Nelder–Mead simplex over this crate's numeric types.
pub type Simplex = NelderMead<Theta, Cost>;

/// Hager–Zhang line search specialized to this crate's numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search specialized to this crate's numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
