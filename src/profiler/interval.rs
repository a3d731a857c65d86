//! interval — entry points of the confidence-interval search.
//!
//! Purpose
//! -------
//! Validate a request once, then search the endpoints with the chosen
//! [`Method`]. Configuration problems are returned as errors before any
//! search starts; numerical trouble during a search is reported in the
//! endpoint's status.
//!
//! Key behaviors
//! -------------
//! - [`get_endpoint`]: one side of one parameter.
//! - [`get_interval`]: both sides of one parameter, packaged with the frozen
//!   input in a [`ParamInterval`].
//! - [`get_intervals`]: [`get_interval`] for several parameters sharing the
//!   same options.
//! - The loss at the initial point must lie strictly below `loss_crit`.
use tracing::debug;

use crate::{
    optimization::local_optimizer::Theta,
    profiler::{
        core::{
            Direction, EndPoint, IntervalConfig, IntervalOptions, LossFunction, Method,
            ParamInterval, ParamIntervalInput,
        },
        errors::{ProfileError, ProfileResult},
        methods::find_endpoint,
    },
};

/// Search the endpoint of parameter `theta_num` on the side of `direction`.
///
/// # Errors
/// - Every configuration error of `IntervalOptions::resolve`.
/// - `InvalidMethodOption` for out-of-range method options.
/// - `InitialAboveCritical` when `Λ(theta_init) ≥ loss_crit`.
/// - `Optimization` when the loss fails at `theta_init`.
pub fn get_endpoint<L: LossFunction + ?Sized>(
    theta_init: &Theta, theta_num: usize, loss: &L, method: &Method, direction: Direction,
    opts: &IntervalOptions,
) -> ProfileResult<EndPoint> {
    let config = opts.resolve(theta_init, theta_num)?;
    method.validate()?;
    check_initial_loss(&config, loss)?;
    find_endpoint(&config, loss, method, direction)
}

/// Search both endpoints of parameter `theta_num`.
///
/// # Errors
/// See [`get_endpoint`].
///
/// # Example
/// ```
/// use likelihood_profiler::optimization::local_optimizer::Theta;
/// use likelihood_profiler::profiler::{IntervalOptions, Method, get_interval};
/// use ndarray::array;
///
/// let loss = |theta: &Theta| theta[0].powi(2);
/// let opts = IntervalOptions::new().loss_crit(4.0);
/// let interval = get_interval(&array![0.0], 0, loss, Method::cico(), &opts)?;
/// let (left, right) = interval.bounds();
/// assert!((left.unwrap() + 2.0).abs() < 1e-2);
/// assert!((right.unwrap() - 2.0).abs() < 1e-2);
/// # Ok::<(), likelihood_profiler::profiler::ProfileError>(())
/// ```
pub fn get_interval<L: LossFunction>(
    theta_init: &Theta, theta_num: usize, loss: L, method: Method, opts: &IntervalOptions,
) -> ProfileResult<ParamInterval<L>> {
    let config = opts.resolve(theta_init, theta_num)?;
    method.validate()?;
    let loss_init = check_initial_loss(&config, &loss)?;
    let left = find_endpoint(&config, &loss, &method, Direction::Left)?;
    let right = find_endpoint(&config, &loss, &method, Direction::Right)?;
    debug!(
        theta_num,
        %method,
        left = ?left.value,
        right = ?right.value,
        left_status = %left.status,
        right_status = %right.status,
        "interval search finished"
    );
    Ok(ParamInterval {
        input: ParamIntervalInput::new(config, loss),
        loss_init,
        method,
        result: (left, right),
    })
}

/// Search the intervals of every parameter listed in `indices`.
///
/// # Errors
/// The first error of [`get_interval`], in the order of `indices`.
pub fn get_intervals<L: LossFunction + Clone>(
    theta_init: &Theta, indices: &[usize], loss: L, method: Method, opts: &IntervalOptions,
) -> ProfileResult<Vec<ParamInterval<L>>> {
    indices
        .iter()
        .map(|&theta_num| get_interval(theta_init, theta_num, loss.clone(), method, opts))
        .collect()
}

/// Loss at the initial point, which must be strictly below `loss_crit`.
fn check_initial_loss<L: LossFunction + ?Sized>(
    config: &IntervalConfig, loss: &L,
) -> ProfileResult<f64> {
    let loss_init = loss.loss(&config.theta_init)?;
    if loss_init.is_nan() || loss_init >= config.loss_crit {
        return Err(ProfileError::InitialAboveCritical { loss_init, loss_crit: config.loss_crit });
    }
    Ok(loss_init)
}
