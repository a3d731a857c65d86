//! Marching endpoint searches with extrapolated steps.
//!
//! Starting from the initial value, the profile is evaluated at increasing
//! values of the scanned search coordinate `t`, each evaluation warm-started
//! from the previous optimum. The next `t` is predicted from the sub-critical
//! points seen so far:
//!
//! - [`Predictor::Linear`]: secant through the last two points.
//! - [`Predictor::Quadratic`]: parabola through the last three points,
//!   nearest crossing ahead of the last one; linear when there is none.
//!
//! The step is clamped to `[scan_tol, scan_hmax]` and doubles while no
//! crossing can be predicted. After three non-increasing steps the profile is
//! evaluated at the scan bound directly. Once a point above `loss_crit`
//! brackets the crossing, the bracket is refined with the same predictor,
//! falling back to bisection when one side of the bracket moves twice in a
//! row. A border within `loss_tol` is never accepted at the initial value.
use tracing::trace;

use crate::{
    optimization::local_optimizer::{LocalStatus, Theta},
    profiler::{
        core::{
            Direction, EndPoint, EndPointStatus, ExtrapolOptions, IntervalConfig, LossFunction,
            ProfilePoint, ScanSpace,
        },
        errors::ProfileResult,
        methods::{finish, stop_status},
        profile::{Profile, local_options},
    },
};

/// Consecutive non-increasing profile values after which the march jumps to
/// the scan bound.
const MAX_STALLED_STEPS: usize = 3;

/// Crossing predictor of the extrapolation searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predictor {
    Linear,
    Quadratic,
}

/// Profile sample `(t, Λ)` in search coordinates.
type Sample = (f64, f64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Below,
    Above,
}

/// Search the endpoint of `config` on the side of `direction`.
///
/// # Errors
/// Only configuration errors (scale domains, local optimizer options).
pub(crate) fn endpoint<L: LossFunction + ?Sized>(
    config: &IntervalConfig, loss: &L, direction: Direction, opts: &ExtrapolOptions,
    predictor: Predictor,
) -> ProfileResult<EndPoint> {
    let k = config.theta_num;
    let space = ScanSpace::new(
        loss,
        k,
        direction,
        &config.scale,
        &config.theta_bounds,
        Some(config.max_iter),
    )?;
    let scan_bound = config.scan_bound(direction);
    let target = space.axis_to_search(scan_bound)?;
    let local = local_options(config.local_alg, opts.ftol_abs, config.max_iter)?;
    let profile = Profile::new(space, &config.theta_init, local, false)?;
    let start = profile.start()?;
    let march = March { config, opts, predictor, profile: &profile, target, direction };
    Ok(march.run(start[k], start))
}

struct March<'p, 'a, L: LossFunction + ?Sized> {
    config: &'p IntervalConfig,
    opts: &'p ExtrapolOptions,
    predictor: Predictor,
    profile: &'p Profile<'a, L>,
    target: f64,
    direction: Direction,
}

/// Outcome of one profile evaluation inside the march.
enum Step {
    Point(ProfilePoint, Theta),
    Stop(EndPoint),
}

impl<'p, 'a, L: LossFunction + ?Sized> March<'p, 'a, L> {
    fn space(&self) -> &ScanSpace<'a, L> {
        self.profile.space()
    }

    fn run(&self, t0: f64, y0: Theta) -> EndPoint {
        let crit = self.config.loss_crit;
        let mut points = Vec::new();

        // No border is accepted at t0 itself, even within loss_tol.
        let (first, mut y) = match self.evaluate(t0, &y0, &mut points) {
            Step::Point(point, y) => (point, y),
            Step::Stop(endpoint) => return endpoint,
        };
        let mut below: Vec<Sample> = vec![(t0, first.loss)];
        let mut h = self.opts.scan_hini;
        let mut stalled = 0;

        // March until the critical level is bracketed.
        let above = loop {
            let last = below[below.len() - 1];
            let step = match predict(&below, crit, self.predictor, last.0) {
                Some(t) if t > last.0 => {
                    (t - last.0).max(self.config.scan_tol).min(self.opts.scan_hmax)
                }
                _ => {
                    if below.len() > 1 {
                        h = (2.0 * h).min(self.opts.scan_hmax);
                    }
                    h
                }
            };
            let t = (last.0 + step).min(self.target);
            trace!(t, step, "extrapolation step");
            let (point, y_new) = match self.evaluate(t, &y, &mut points) {
                Step::Point(point, y_new) => (point, y_new),
                Step::Stop(endpoint) => return endpoint,
            };
            if let Some(endpoint) = self.border_by_loss(&point, &points) {
                return endpoint;
            }
            if point.loss > crit {
                break (t, point.loss);
            }
            if t >= self.target {
                return self.scan_bound_reached(points);
            }
            stalled = if point.loss <= last.1 { stalled + 1 } else { 0 };
            below.push((t, point.loss));
            y = y_new;
            if stalled >= MAX_STALLED_STEPS {
                // The plateau may still rise before the scan bound.
                let point = match self.evaluate(self.target, &y, &mut points) {
                    Step::Point(point, _) => point,
                    Step::Stop(endpoint) => return endpoint,
                };
                if let Some(endpoint) = self.border_by_loss(&point, &points) {
                    return endpoint;
                }
                if point.loss > crit {
                    break (self.target, point.loss);
                }
                return self.scan_bound_reached(points);
            }
        };

        self.refine(below, above, y, points)
    }

    /// Shrink the bracket `[last below, above]` until it is narrower than
    /// `scan_tol` or a point within `loss_tol` of the critical level is hit.
    fn refine(
        &self, mut below: Vec<Sample>, mut above: Sample, mut y: Theta,
        mut points: Vec<ProfilePoint>,
    ) -> EndPoint {
        let crit = self.config.loss_crit;
        let tol = self.config.scan_tol;
        let mut last_side: Option<Side> = None;
        let mut repeats = 0;

        loop {
            let lower = below[below.len() - 1];
            if above.0 - lower.0 <= tol {
                let crossing = secant_root(lower, above, crit)
                    .map_or(0.5 * (lower.0 + above.0), |t| t.clamp(lower.0, above.0));
                let value = self.space().axis_to_declared(crossing);
                return finish(
                    self.direction,
                    EndPointStatus::BorderFoundByScanTol,
                    Some(value),
                    points,
                    self.profile.counter(),
                );
            }

            let mut samples = below.clone();
            samples.push(above);
            let predicted = predict(&samples, crit, self.predictor, lower.0)
                .filter(|&t| t > lower.0 && t < above.0);
            let t = match predicted {
                Some(t) if repeats < 2 => {
                    // Keep the new point at least tol/2 inside so the bracket
                    // closes even when the prediction sits on an end.
                    let margin = 0.5 * tol;
                    t.clamp(lower.0 + margin, above.0 - margin)
                }
                _ => 0.5 * (lower.0 + above.0),
            };
            trace!(t, lower = lower.0, upper = above.0, "extrapolation refinement");

            let (point, y_new) = match self.evaluate(t, &y, &mut points) {
                Step::Point(point, y_new) => (point, y_new),
                Step::Stop(endpoint) => return endpoint,
            };
            if let Some(endpoint) = self.border_by_loss(&point, &points) {
                return endpoint;
            }
            let side = if point.loss > crit { Side::Above } else { Side::Below };
            repeats = if last_side == Some(side) { repeats + 1 } else { 1 };
            last_side = Some(side);
            match side {
                Side::Above => above = (t, point.loss),
                Side::Below => {
                    below.push((t, point.loss));
                    y = y_new;
                }
            }
        }
    }

    /// Evaluate the profile at `t`, recording the point. Interruptions turn
    /// into an inconclusive endpoint.
    fn evaluate(&self, t: f64, y: &Theta, points: &mut Vec<ProfilePoint>) -> Step {
        match self.profile.eval_search(t, y) {
            Ok((point, y_new)) => {
                let starved = point.ret == LocalStatus::MaxEvalReached && self.space().exhausted();
                points.push(point.clone());
                if starved {
                    return Step::Stop(self.stopped(EndPointStatus::MaxIterStop, points.clone()));
                }
                Step::Point(point, y_new)
            }
            Err(err) => {
                trace!(t, error = %err, "extrapolation evaluation interrupted");
                let status = stop_status(self.space(), &err);
                Step::Stop(self.stopped(status, points.clone()))
            }
        }
    }

    fn border_by_loss(&self, point: &ProfilePoint, points: &[ProfilePoint]) -> Option<EndPoint> {
        if (point.loss - self.config.loss_crit).abs() > self.config.loss_tol {
            return None;
        }
        Some(finish(
            self.direction,
            EndPointStatus::BorderFoundByLossTol,
            Some(point.value),
            points.to_vec(),
            self.profile.counter(),
        ))
    }

    fn scan_bound_reached(&self, points: Vec<ProfilePoint>) -> EndPoint {
        finish(
            self.direction,
            EndPointStatus::ScanBoundReached,
            Some(self.config.scan_bound(self.direction)),
            points,
            self.profile.counter(),
        )
    }

    fn stopped(&self, status: EndPointStatus, points: Vec<ProfilePoint>) -> EndPoint {
        finish(self.direction, status, None, points, self.profile.counter())
    }
}

/// Predicted crossing of `level` beyond `after` from the trailing samples.
fn predict(samples: &[Sample], level: f64, predictor: Predictor, after: f64) -> Option<f64> {
    let n = samples.len();
    if n < 2 {
        return None;
    }
    let linear = || secant_root(samples[n - 2], samples[n - 1], level);
    match predictor {
        Predictor::Linear => linear(),
        Predictor::Quadratic if n >= 3 => {
            quadratic_root([samples[n - 3], samples[n - 2], samples[n - 1]], level, after)
                .or_else(linear)
        }
        Predictor::Quadratic => linear(),
    }
}

/// Crossing of `level` by the line through `a` and `b`, if that line is
/// increasing.
fn secant_root(a: Sample, b: Sample, level: f64) -> Option<f64> {
    let slope = (b.1 - a.1) / (b.0 - a.0);
    if !slope.is_finite() || slope <= 0.0 {
        return None;
    }
    Some(b.0 + (level - b.1) / slope)
}

/// Smallest crossing of `level` beyond `after` by the parabola through the
/// three samples.
fn quadratic_root(samples: [Sample; 3], level: f64, after: f64) -> Option<f64> {
    let [(t0, f0), (t1, f1), (t2, f2)] = samples;
    let d01 = (f1 - f0) / (t1 - t0);
    let d12 = (f2 - f1) / (t2 - t1);
    let a = (d12 - d01) / (t2 - t0);
    // q(t) = f0 + d01 (t - t0) + a (t - t0)(t - t1)
    let b = d01 - a * (t0 + t1);
    let c = f0 - d01 * t0 + a * t0 * t1 - level;
    if !(a.is_finite() && b.is_finite() && c.is_finite()) {
        return None;
    }
    if a.abs() <= f64::EPSILON * b.abs().max(1.0) {
        if b == 0.0 {
            return None;
        }
        let t = -c / b;
        return (t > after).then_some(t);
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let q = -0.5 * (b + b.signum() * sqrt_disc);
    let mut roots = [q / a, if q != 0.0 { c / q } else { f64::NAN }];
    roots.sort_by(f64::total_cmp);
    roots.into_iter().find(|&t| t.is_finite() && t > after)
}
