//! scaling — declared-scale ↔ unconstrained-space parameter transforms.
//!
//! Purpose
//! -------
//! Map parameters that live on a declared scale (unrestricted, positive, or
//! a probability) onto the unconstrained real line the local optimizer works
//! in, and back. Profile searches run entirely in the unconstrained space so
//! that wide positive ranges and (0, 1) parameters can be scanned with the
//! same step logic as unrestricted ones.
//!
//! Key behaviors
//! -------------
//! - [`Scale`] enumerates the supported transforms (`Direct`, `Log`,
//!   `Logit`) and parses case-insensitively from strings.
//! - [`scale`] / [`unscale`] are exact inverses on the open domain;
//!   [`scale`] fails with `OptError::OutOfScaleDomain` at or outside the
//!   domain boundary instead of returning ±∞ silently.
//! - [`scale_bound`] is the variant used for box bounds: it accepts the
//!   closed domain so that natural defaults such as `(0, ∞)` for `Log`
//!   become `(-∞, ∞)` in the unconstrained space.
//!
//! Invariants & assumptions
//! ------------------------
//! - All transforms are strictly increasing on their domain, so bound
//!   ordering is preserved by the mapping.
//! - The logistic inverse is evaluated in a guarded form that never
//!   overflows for large `|y|`.
//!
//! Conventions
//! -----------
//! - Natural logarithms are used for both `Log` and `Logit`.
//! - This module never logs and holds no state.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover round trips on grids inside
//!   each domain, strict monotonicity, domain-boundary errors, and the
//!   closed-domain handling of [`scale_bound`].

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    Scale, safe_logistic, scale, scale_bound, scale_bounds, scale_vector, unscale, unscale_vector,
};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::transformations::{Scale, scale, scale_bound, unscale};
}
