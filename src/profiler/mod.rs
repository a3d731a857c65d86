//! profiler — profile-likelihood confidence intervals.
//!
//! Purpose
//! -------
//! Given a scalar loss `Λ(θ)`, a starting point and a critical level, find
//! where the profile of `Λ` along one parameter crosses the critical level
//! on each side of the starting point, or report that it does not cross
//! inside the scan bounds (practical non-identifiability).
//!
//! Key behaviors
//! -------------
//! - `interval::{get_endpoint, get_interval, get_intervals}` are the entry
//!   points; `core::IntervalOptions` carries the options and
//!   `core::Method` selects the search.
//! - `methods::cico` solves one constrained optimization per endpoint;
//!   `methods::extrapolation` marches along the profile.
//! - `profile::profile` evaluates the profile on its own.
//! - `grid::adapted_grid` and `ParamInterval::update_profile_points` add
//!   profile points for plotting.
//!
//! Invariants & assumptions
//! ------------------------
//! - Configuration mistakes are `ProfileError`s raised before any search;
//!   budget exhaustion and loss failures during a search become an
//!   inconclusive `EndPointStatus`.
//! - The loss is only evaluated inside the parameter bounds.
//!
//! Conventions
//! -----------
//! - Parameter indices are 0-based.
//! - Searches run in the scaled space; results are reported in the declared
//!   scale.
//! - No subscriber is installed; events are emitted through `tracing`.

pub mod core;
pub mod errors;
pub mod grid;
pub mod interval;
pub mod methods;
pub mod profile;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    CicoOptions, Direction, EndPoint, EndPointStatus, ExtrapolOptions, FallibleLoss,
    IntervalConfig, IntervalOptions, LossFunction, Method, ParamInterval, ParamIntervalInput,
    ProfileOptions, ProfilePoint, critical_level,
};
pub use self::errors::{ProfileError, ProfileResult};
pub use self::grid::adapted_grid;
pub use self::interval::{get_endpoint, get_interval, get_intervals};
pub use self::profile::{Profile, profile};

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::errors::{ProfileError, ProfileResult};
    pub use super::grid::adapted_grid;
    pub use super::interval::{get_endpoint, get_interval, get_intervals};
    pub use super::profile::profile;
}
