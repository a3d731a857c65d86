//! likelihood_profiler — profile-likelihood confidence intervals for model
//! parameters.
//!
//! Purpose
//! -------
//! Estimate confidence intervals of individual parameters of a fitted model
//! from its loss function (typically `-2 ln L`) by the profile-likelihood
//! method, and detect parameters that are practically non-identifiable.
//!
//! Key behaviors
//! -------------
//! - [`profiler`]: endpoint searches (`CICO_ONE_PASS`, `LIN_EXTRAPOL`,
//!   `QUADR_EXTRAPOL`), the profile evaluator and the adaptive plotting
//!   grid.
//! - [`optimization`]: the Argmin-backed bounded local optimizer and the
//!   direct / log / logit scale transforms the searches run on.
//!
//! Downstream usage
//! ----------------
//! ```
//! use likelihood_profiler::prelude::*;
//! use ndarray::array;
//!
//! let loss = |x: &Theta| 5.0 + (x[0] - 3.0).powi(2) + (x[0] - x[1] - 1.0).powi(2);
//! let opts = IntervalOptions::new().loss_crit(9.0);
//! let interval = get_interval(&array![3.0, 2.0, 2.1], 0, loss, Method::cico(), &opts)?;
//! assert!(interval.is_identifiable());
//! # Ok::<(), ProfileError>(())
//! ```
//!
//! Testing notes
//! -------------
//! - Unit tests live next to the code they cover; `tests/` runs the
//!   end-to-end interval searches.

pub mod optimization;
pub mod profiler;

pub mod prelude {
    pub use crate::optimization::prelude::*;
    pub use crate::profiler::prelude::*;
}
