//! Frozen input and result of a two-sided interval search.
use std::fmt;

use crate::profiler::core::{
    options::{IntervalConfig, Method},
    types::{Direction, EndPoint},
};

/// Resolved configuration together with the loss it applies to.
#[derive(Clone)]
pub struct ParamIntervalInput<L> {
    pub config: IntervalConfig,
    pub loss: L,
}

impl<L> ParamIntervalInput<L> {
    pub fn new(config: IntervalConfig, loss: L) -> Self {
        Self { config, loss }
    }
}

impl<L> fmt::Debug for ParamIntervalInput<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamIntervalInput").field("config", &self.config).finish_non_exhaustive()
    }
}

/// Confidence interval of one parameter.
///
/// `result` holds the `(left, right)` endpoints. The only mutation after
/// construction is `update_profile_points`, which densifies the profile
/// points of both endpoints.
#[derive(Clone)]
pub struct ParamInterval<L> {
    pub input: ParamIntervalInput<L>,
    pub loss_init: f64,
    pub method: Method,
    pub result: (EndPoint, EndPoint),
}

impl<L> ParamInterval<L> {
    pub fn left(&self) -> &EndPoint {
        &self.result.0
    }

    pub fn right(&self) -> &EndPoint {
        &self.result.1
    }

    pub fn endpoint(&self, direction: Direction) -> &EndPoint {
        match direction {
            Direction::Left => &self.result.0,
            Direction::Right => &self.result.1,
        }
    }

    /// `(left, right)` endpoint values; see `EndPoint::value` for when they
    /// are `None`.
    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        (self.result.0.value, self.result.1.value)
    }

    /// `true` when a finite boundary was found on both sides.
    pub fn is_identifiable(&self) -> bool {
        self.result.0.status.is_border_found() && self.result.1.status.is_border_found()
    }
}

impl<L> fmt::Debug for ParamInterval<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamInterval")
            .field("input", &self.input)
            .field("loss_init", &self.loss_init)
            .field("method", &self.method)
            .field("result", &self.result)
            .finish()
    }
}
