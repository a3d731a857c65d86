//! profile — evaluate the profile of the loss along one parameter.
//!
//! Purpose
//! -------
//! For a scanned value `x` of parameter `theta_num`, find the minimum of the
//! loss over every other parameter with `theta_num` held at `x`. The result
//! is a [`ProfilePoint`]. Every endpoint method walks the profile through
//! this evaluator, and it is also exposed on its own via [`profile`].
//!
//! Key behaviors
//! -------------
//! - The free coordinates are optimized in the search space of a
//!   [`ScanSpace`] with the local optimizer, subject to their box bounds.
//! - With `skip_optim`, or with a single parameter, the loss is evaluated
//!   directly at the starting point (a marginal profile).
//! - Optimizer non-convergence is recorded in `ProfilePoint::ret`; loss
//!   failures propagate as errors.
//!
//! Conventions
//! -----------
//! - `ProfilePoint::value` and `params` are in the declared scale.
//! - `ProfilePoint::counter` counts the loss evaluations spent on the point.
use tracing::debug;

use crate::{
    optimization::{
        errors::{OptError, OptResult},
        local_optimizer::{
            LocalAlgorithm, LocalOptions, LocalStatus, Theta, Tolerances, minimize,
            types::DEFAULT_SIMPLEX_STEP, validation::project_onto_bounds,
        },
        scaling::Scale,
    },
    profiler::{
        core::{
            Direction, LossFunction, ProfileOptions, ProfilePoint, ScanSpace,
            validation::{default_theta_bounds, validate_scales, validate_theta_bounds},
        },
        errors::{ProfileError, ProfileResult},
    },
};

/// Profile of a loss along one parameter.
///
/// Holds a borrowed loss, the search space and the local optimizer
/// settings. Evaluations share the space's loss counter.
pub struct Profile<'a, L: LossFunction + ?Sized> {
    space: ScanSpace<'a, L>,
    theta_init: Theta,
    local_opts: LocalOptions,
    skip_optim: bool,
}

/// Build the profile of `loss` along parameter `theta_num`.
///
/// # Errors
/// - `EmptyTheta`, `ThetaNumOutOfRange`, `ScaleDimMismatch`,
///   `BoundsDimMismatch`, `InvalidThetaBounds`, `InitialOutsideBounds` for
///   an inconsistent configuration.
/// - `Optimization` for invalid local optimizer tolerances.
///
/// # Example
/// ```
/// use likelihood_profiler::optimization::local_optimizer::Theta;
/// use likelihood_profiler::profiler::{ProfileOptions, profile};
/// use ndarray::array;
///
/// let loss = |theta: &Theta| (theta[0] - 3.0).powi(2) + (theta[0] - theta[1] - 1.0).powi(2);
/// let prof = profile(&array![3.0, 2.0], 0, &loss, &ProfileOptions::default())?;
/// let point = prof.eval(4.0)?;
/// assert!((point.loss - 1.0).abs() < 5e-2);
/// # Ok::<(), likelihood_profiler::profiler::ProfileError>(())
/// ```
pub fn profile<'a, L: LossFunction + ?Sized>(
    theta_init: &Theta, theta_num: usize, loss: &'a L, opts: &ProfileOptions,
) -> ProfileResult<Profile<'a, L>> {
    let n = theta_init.len();
    if n == 0 {
        return Err(ProfileError::EmptyTheta);
    }
    if theta_num >= n {
        return Err(ProfileError::ThetaNumOutOfRange { theta_num, len: n });
    }
    let scales = opts.scale.clone().unwrap_or_else(|| vec![Scale::Direct; n]);
    validate_scales(&scales, n)?;
    let bounds = match &opts.theta_bounds {
        Some(bounds) => bounds.clone(),
        None => default_theta_bounds(&scales),
    };
    validate_theta_bounds(theta_init, &bounds, &scales)?;

    let local_opts = local_options(opts.local_alg, opts.ftol_abs, opts.maxeval)?;
    let space = ScanSpace::new(loss, theta_num, Direction::Right, &scales, &bounds, None)?;
    Profile::new(space, theta_init, local_opts, opts.skip_optim)
}

/// Local optimizer settings used for inner profile runs.
pub(crate) fn local_options(
    alg: LocalAlgorithm, ftol_abs: f64, max_eval: usize,
) -> OptResult<LocalOptions> {
    let tols = Tolerances::new(Some(ftol_abs), None, None, Some(max_eval))?;
    LocalOptions::new(alg, tols, DEFAULT_SIMPLEX_STEP, None, false)
}

impl<'a, L: LossFunction + ?Sized> Profile<'a, L> {
    /// Wrap an existing search space.
    ///
    /// # Errors
    /// `Optimization(OutOfScaleDomain)` if `theta_init` cannot be scaled.
    pub(crate) fn new(
        space: ScanSpace<'a, L>, theta_init: &Theta, local_opts: LocalOptions, skip_optim: bool,
    ) -> ProfileResult<Self> {
        space.to_search(theta_init)?;
        Ok(Self { space, theta_init: theta_init.clone(), local_opts, skip_optim })
    }

    /// Profile point at declared value `x`, warm-started from `theta_init`.
    ///
    /// # Errors
    /// See [`Profile::eval_from`].
    pub fn eval(&self, x: f64) -> ProfileResult<ProfilePoint> {
        self.eval_from(x, &self.theta_init)
    }

    /// Profile point at declared value `x`, warm-started from `start`
    /// (declared scale).
    ///
    /// # Errors
    /// - `ValueOutsideBounds` if `x` lies outside the bounds of the scanned
    ///   parameter.
    /// - `Optimization` for a `start` of the wrong length, scale-domain
    ///   errors and loss failures.
    pub fn eval_from(&self, x: f64, start: &Theta) -> ProfileResult<ProfilePoint> {
        let index = self.space.theta_num();
        let (lower, upper) = self.declared_bounds(index);
        if x.is_nan() || x < lower || x > upper {
            return Err(ProfileError::ValueOutsideBounds { index, value: x, lower, upper });
        }
        if start.len() != self.space.dim() {
            return Err(OptError::ThetaDimMismatch { expected: self.space.dim(), found: start.len() }
                .into());
        }
        let t = self.space.axis_to_search(x)?;
        let y0 = self.space.to_search(start)?;
        let (point, _) = self.eval_search(t, &y0)?;
        Ok(point)
    }

    /// Loss evaluations made through this profile so far.
    pub fn counter(&self) -> usize {
        self.space.count()
    }

    pub(crate) fn space(&self) -> &ScanSpace<'a, L> {
        &self.space
    }

    /// Starting point in the search space.
    pub(crate) fn start(&self) -> OptResult<Theta> {
        self.space.to_search(&self.theta_init)
    }

    fn declared_bounds(&self, index: usize) -> (f64, f64) {
        let (t_lower, t_upper) = self.space.bounds()[index];
        let a = self.space.axis_to_declared(t_lower);
        let b = self.space.axis_to_declared(t_upper);
        (a.min(b), a.max(b))
    }

    /// Profile point at search coordinate `t`, warm-started from `start_y`
    /// (search space). Also returns the optimized search-space vector.
    pub(crate) fn eval_search(&self, t: f64, start_y: &Theta) -> OptResult<(ProfilePoint, Theta)> {
        let k = self.space.theta_num();
        let bounds = self.space.bounds();
        let (t_lower, t_upper) = bounds[k];
        let t = t.clamp(t_lower, t_upper);
        let before = self.space.count();

        let free: Vec<usize> = (0..self.space.dim()).filter(|&i| i != k).collect();
        let (y, loss, ret) = if self.skip_optim || free.is_empty() {
            let mut y = project_onto_bounds(start_y, bounds);
            y[k] = t;
            let loss = self.space.loss(&y)?;
            (y, loss, LocalStatus::NotOptimized)
        } else {
            let embed = |z: &Theta| -> Theta {
                let mut y = Theta::zeros(free.len() + 1);
                y[k] = t;
                for (j, &i) in free.iter().enumerate() {
                    y[i] = z[j];
                }
                y
            };
            let z0: Theta = free.iter().map(|&i| start_y[i]).collect();
            let free_bounds: Vec<(f64, f64)> = free.iter().map(|&i| bounds[i]).collect();
            let objective = |z: &Theta| -> OptResult<f64> { self.space.loss(&embed(z)) };
            let outcome = minimize(&objective, &z0, &free_bounds, &self.local_opts)?;
            (embed(&outcome.theta_hat), outcome.value, outcome.status)
        };

        let point = ProfilePoint {
            value: self.space.axis_to_declared(t),
            loss,
            params: self.space.to_declared(&y),
            ret,
            counter: self.space.count() - before,
        };
        debug!(value = point.value, loss, ret = %point.ret, counter = point.counter, "profile point");
        Ok((point, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::core::FallibleLoss;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - re-optimization of the free parameters at a fixed scanned value,
    // - the marginal profile (`skip_optim`) and the single-parameter case,
    // - bounds and scales of the free parameters being honored,
    // - configuration and loss errors.
    // -------------------------------------------------------------------------

    fn two_param_loss(theta: &Theta) -> f64 {
        (theta[0] - 3.0).powi(2) + (theta[0] - theta[1] - 1.0).powi(2) + 5.0
    }

    fn tight() -> ProfileOptions {
        ProfileOptions { ftol_abs: 1e-10, ..ProfileOptions::default() }
    }

    #[test]
    // Purpose
    // -------
    // The free parameter is re-optimized at the scanned value.
    //
    // Given
    // -----
    // - Λ = (x0-3)² + (x0-x1-1)² + 5 profiled along x0 at x0 = 5.
    //
    // Expect
    // ------
    // - x1 ≈ 4, Λ ≈ 9, value and params[0] equal to 5.
    fn eval_reoptimizes_free_parameter() {
        // Arrange
        let prof = profile(&array![3.0, 2.0], 0, &two_param_loss, &tight()).unwrap();

        // Act
        let point = prof.eval(5.0).unwrap();

        // Assert
        assert_eq!(point.value, 5.0);
        assert_eq!(point.params[0], 5.0);
        assert_abs_diff_eq!(point.params[1], 4.0, epsilon = 1e-3);
        assert_abs_diff_eq!(point.loss, 9.0, epsilon = 1e-5);
        assert!(point.counter > 1);
        assert_eq!(prof.counter(), point.counter);
    }

    #[test]
    // Purpose
    // -------
    // `skip_optim` evaluates the loss at the starting point only.
    //
    // Given
    // -----
    // - The same loss with start [3, 2], profiled at x0 = 5.
    //
    // Expect
    // ------
    // - One evaluation at [5, 2], Λ = 4 + 4 + 5, status `NotOptimized`.
    fn eval_with_skip_optim_is_marginal() {
        // Arrange
        let opts = ProfileOptions { skip_optim: true, ..ProfileOptions::default() };
        let prof = profile(&array![3.0, 2.0], 0, &two_param_loss, &opts).unwrap();

        // Act
        let point = prof.eval(5.0).unwrap();

        // Assert
        assert_eq!(point.loss, 13.0);
        assert_eq!(point.params, array![5.0, 2.0]);
        assert_eq!(point.ret, LocalStatus::NotOptimized);
        assert_eq!(point.counter, 1);
    }

    #[test]
    // Purpose
    // -------
    // With a single parameter the loss is evaluated directly.
    //
    // Given
    // -----
    // - Λ(x) = x² on a log scale, profiled at x = 2.
    //
    // Expect
    // ------
    // - Λ = 4 after a single evaluation.
    fn eval_single_parameter_on_log_scale() {
        // Arrange
        let loss = |theta: &Theta| theta[0].powi(2);
        let opts = ProfileOptions { scale: Some(vec![Scale::Log]), ..ProfileOptions::default() };
        let prof = profile(&array![1.0], 0, &loss, &opts).unwrap();

        // Act
        let point = prof.eval(2.0).unwrap();

        // Assert
        assert_abs_diff_eq!(point.loss, 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(point.value, 2.0, epsilon = 1e-12);
        assert_eq!(point.counter, 1);
    }

    #[test]
    // Purpose
    // -------
    // Free parameters stay inside their declared bounds.
    //
    // Given
    // -----
    // - The two-parameter loss with x1 bounded to [0, 3], profiled at x0 = 6
    //   where the unconstrained optimum is x1 = 5.
    //
    // Expect
    // ------
    // - x1 = 3 (active bound) and Λ = 9 + 4 + 5.
    fn eval_respects_free_parameter_bounds() {
        // Arrange
        let opts = ProfileOptions {
            theta_bounds: Some(vec![(-10.0, 10.0), (0.0, 3.0)]),
            ..tight()
        };
        let prof = profile(&array![3.0, 2.0], 0, &two_param_loss, &opts).unwrap();

        // Act
        let point = prof.eval(6.0).unwrap();

        // Assert
        assert!(point.params[1] <= 3.0);
        assert_abs_diff_eq!(point.params[1], 3.0, epsilon = 1e-3);
        assert_abs_diff_eq!(point.loss, 18.0, epsilon = 1e-2);
    }

    #[test]
    // Purpose
    // -------
    // Invalid requests are configuration errors.
    //
    // Given
    // -----
    // - theta_num out of range; a value outside the parameter's bounds.
    //
    // Expect
    // ------
    // - `ThetaNumOutOfRange` and `ValueOutsideBounds`.
    fn profile_rejects_invalid_requests() {
        // Arrange
        let opts = ProfileOptions {
            theta_bounds: Some(vec![(0.0, 10.0), (-10.0, 10.0)]),
            ..ProfileOptions::default()
        };

        // Act
        let out_of_range = profile(&array![3.0, 2.0], 2, &two_param_loss, &opts);
        let prof = profile(&array![3.0, 2.0], 0, &two_param_loss, &opts).unwrap();
        let outside = prof.eval(-1.0);

        // Assert
        assert!(matches!(out_of_range, Err(ProfileError::ThetaNumOutOfRange { .. })));
        assert!(matches!(outside, Err(ProfileError::ValueOutsideBounds { index: 0, .. })));
    }

    #[test]
    // Purpose
    // -------
    // Loss failures propagate as errors.
    //
    // Given
    // -----
    // - A fallible loss that always fails.
    //
    // Expect
    // ------
    // - `ProfileError::Optimization(OptError::LossEvaluation)`.
    fn eval_propagates_loss_errors() {
        // Arrange
        let loss = FallibleLoss(|_: &Theta| -> OptResult<f64> {
            Err(OptError::LossEvaluation { text: "solver diverged".to_string() })
        });
        let prof = profile(&array![3.0, 2.0], 0, &loss, &ProfileOptions::default()).unwrap();

        // Act
        let result = prof.eval(4.0);

        // Assert
        assert!(matches!(
            result,
            Err(ProfileError::Optimization(OptError::LossEvaluation { .. }))
        ));
    }
}
