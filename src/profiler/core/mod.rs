//! core — data model and configuration shared by every endpoint method.
//!
//! Purpose
//! -------
//! Define what an endpoint search consumes and produces: the loss interface,
//! the option builder and its resolved configuration, the search-space
//! mapping, and the result types.
//!
//! Key behaviors
//! -------------
//! - [`LossFunction`]: the profiled loss; plain `Fn(&Theta) -> f64` closures
//!   qualify, fallible ones go through [`FallibleLoss`].
//! - [`IntervalOptions`] resolves into an immutable [`IntervalConfig`];
//!   [`Method`] selects the search algorithm.
//! - [`ScanSpace`] scales, reflects, counts and budgets loss evaluations.
//! - [`ProfilePoint`], [`EndPoint`], [`EndPointStatus`], [`Direction`],
//!   [`ParamIntervalInput`] and [`ParamInterval`] carry results.
//! - [`critical_level`] turns a confidence level into a loss threshold.
//!
//! Conventions
//! -----------
//! - Indices are 0-based.
//! - Values exposed to callers are in the declared scale; the search space
//!   is internal.

pub mod critical;
pub mod interval;
pub mod loss;
pub mod options;
pub mod space;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::critical::critical_level;
pub use self::interval::{ParamInterval, ParamIntervalInput};
pub use self::loss::{FallibleLoss, LossFunction};
pub use self::options::{
    CicoOptions, ExtrapolOptions, IntervalConfig, IntervalOptions, Method, ProfileOptions,
};
pub use self::space::ScanSpace;
pub use self::types::{Direction, EndPoint, EndPointStatus, ProfilePoint};

pub mod prelude {
    pub use super::critical::critical_level;
    pub use super::interval::ParamInterval;
    pub use super::loss::{FallibleLoss, LossFunction};
    pub use super::options::{CicoOptions, ExtrapolOptions, IntervalOptions, Method};
    pub use super::types::{Direction, EndPoint, EndPointStatus, ProfilePoint};
}
