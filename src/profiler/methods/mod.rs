//! methods — endpoint search algorithms.
//!
//! Every method searches towards `+∞` along the scanned axis of a
//! [`ScanSpace`](crate::profiler::core::ScanSpace); left endpoints come from
//! the reflected space. Configuration errors surface as `Err`, numerical
//! trouble (budget, failing loss) as an inconclusive [`EndPointStatus`].
//!
//! - [`cico`]: one augmented-Lagrangian pass maximizing the scanned
//!   coordinate under `Λ ≤ loss_crit`.
//! - [`extrapolation`]: marching profile evaluations with linear or
//!   quadratic prediction of the crossing, then bracket refinement.
use tracing::{debug, warn};

use crate::{
    optimization::errors::OptError,
    profiler::{
        core::{
            Direction, EndPoint, EndPointStatus, IntervalConfig, LossFunction, Method,
            ProfilePoint, ScanSpace,
        },
        errors::ProfileResult,
    },
};

pub mod cico;
pub mod extrapolation;

pub use self::extrapolation::Predictor;

/// Search one endpoint with `method`.
///
/// # Errors
/// Configuration errors only; see the individual methods.
pub(crate) fn find_endpoint<L: LossFunction + ?Sized>(
    config: &IntervalConfig, loss: &L, method: &Method, direction: Direction,
) -> ProfileResult<EndPoint> {
    match method {
        Method::CicoOnePass(opts) => cico::endpoint(config, loss, direction, opts),
        Method::LinExtrapol(opts) => {
            extrapolation::endpoint(config, loss, direction, opts, Predictor::Linear)
        }
        Method::QuadrExtrapol(opts) => {
            extrapolation::endpoint(config, loss, direction, opts, Predictor::Quadratic)
        }
    }
}

/// Status of a search interrupted by `err`.
///
/// A spent budget wins over the error itself: once the space refuses
/// evaluations the local optimizer may report a secondary error.
pub(crate) fn stop_status<L: LossFunction + ?Sized>(
    space: &ScanSpace<'_, L>, err: &OptError,
) -> EndPointStatus {
    if space.exhausted() || matches!(err, OptError::MaxEvalReached { .. }) {
        EndPointStatus::MaxIterStop
    } else {
        EndPointStatus::LossErrorStop
    }
}

/// Assemble the result of a search and log its outcome.
pub(crate) fn finish(
    direction: Direction, status: EndPointStatus, value: Option<f64>,
    profile_points: Vec<ProfilePoint>, counter: usize,
) -> EndPoint {
    let mut endpoint = EndPoint { value, profile_points, status, direction, counter };
    endpoint.sort_profile_points();
    if status.is_inconclusive() {
        warn!(%direction, %status, counter, "endpoint search inconclusive");
    } else {
        debug!(%direction, %status, ?value, counter, "endpoint search finished");
    }
    endpoint
}
