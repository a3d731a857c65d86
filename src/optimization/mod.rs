//! optimization — bounded local minimization, scale transforms and the
//! shared error surface.
//!
//! Purpose
//! -------
//! Provide the numerical layer the profiler is built on: an Argmin-backed
//! local optimizer that minimizes any scalar objective under box bounds,
//! the direct / log / logit transforms between declared and unconstrained
//! parameter scales, and a single error/result pair for both.
//!
//! Key behaviors
//! -------------
//! - `local_optimizer::minimize` runs Nelder–Mead (default) or L-BFGS and
//!   reports every ending as a `LocalStatus` on a validated `LocalOutcome`.
//! - `scaling` maps values, vectors and bounds between scales; forward
//!   transforms outside a scale's domain fail with
//!   `OptError::OutOfScaleDomain`.
//! - `errors::OptError` normalizes option validation, objective failures,
//!   scale-domain violations, internal stop signals and Argmin backend
//!   errors.
//!
//! Invariants & assumptions
//! ------------------------
//! - Objectives are only evaluated inside their bounds.
//! - Non-convergence is a status, never an error; only configuration
//!   mistakes and objective failures surface as `OptError`.
//!
//! Conventions
//! -----------
//! - Parameter vectors are `ndarray::Array1<f64>` (`Theta`).
//! - The local optimizer always minimizes.
//!
//! Downstream usage
//! ----------------
//! - The profiler builds its fixed-coordinate and augmented-Lagrangian
//!   objectives as closures and hands them to `minimize`.
//! - Front-ends import the curated surface via `optimization::prelude::*`.

pub mod errors;
pub mod local_optimizer;
pub mod scaling;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use likelihood_profiler::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::local_optimizer::prelude::*;
    pub use super::scaling::prelude::*;
}
