//! One-pass constrained endpoint search.
//!
//! The endpoint on the right of the search space is the largest value of
//! the scanned coordinate `t = y[k]` with `Λ(y) ≤ loss_crit` inside the box.
//! It is found with a Powell–Hestenes–Rockafellar augmented Lagrangian:
//! each outer iteration minimizes
//!
//! ```text
//! φ(y) = -y[k] + ρ/2 · max(0, g(y) + λ/ρ)² - λ²/(2ρ),   g = Λ - loss_crit
//! ```
//!
//! with the local optimizer, then updates `λ ← max(0, λ + ρ·g)` and grows
//! `ρ` when the violation did not shrink by a factor four.
//!
//! The upper bound of `t` is lowered to the scan bound. A feasible
//! evaluation at that bound ends the search with `ScanBoundReached`.
use std::cell::{Cell, RefCell};

use tracing::trace;

use crate::{
    optimization::{
        errors::{OptError, OptResult},
        local_optimizer::{LocalStatus, Theta, minimize},
    },
    profiler::{
        core::{
            CicoOptions, Direction, EndPoint, EndPointStatus, IntervalConfig, LossFunction,
            ProfilePoint, ScanSpace,
        },
        errors::ProfileResult,
        methods::{finish, stop_status},
        profile::local_options,
    },
};

/// Search the endpoint of `config` on the side of `direction`.
///
/// # Errors
/// Only configuration errors (scale domains, local optimizer options).
pub(crate) fn endpoint<L: LossFunction + ?Sized>(
    config: &IntervalConfig, loss: &L, direction: Direction, opts: &CicoOptions,
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
    let mut bounds = space.bounds().to_vec();
    bounds[k].1 = bounds[k].1.min(target);
    let local = local_options(config.local_alg, opts.ftol_abs, config.max_iter)?;
    let crit = config.loss_crit;

    // Largest t among feasible evaluations, over the whole search.
    let feasible: RefCell<Option<(Theta, f64)>> = RefCell::new(None);
    let hit = Cell::new(false);

    let mut y = space.to_search(&config.theta_init)?;
    let mut multiplier = 0.0;
    let mut penalty = opts.penalty_init;
    let mut previous: Option<(f64, f64)> = None;

    for outer in 0..opts.max_outer {
        // Lowest φ of this outer iteration with its loss.
        let iterate: RefCell<Option<(Theta, f64, f64)>> = RefCell::new(None);
        let (lambda, rho) = (multiplier, penalty);
        let objective = |z: &Theta| -> OptResult<f64> {
            let value = space.loss(z)?;
            let violation = value - crit;
            if violation <= 0.0 {
                offer_feasible(&feasible, z, value, k);
                if z[k] >= target {
                    hit.set(true);
                    return Err(OptError::ForcedStop { reason: "scan bound reached" });
                }
            }
            let shifted = (violation + lambda / rho).max(0.0);
            let phi = -z[k] + 0.5 * rho * shifted * shifted - lambda * lambda / (2.0 * rho);
            let mut best = iterate.borrow_mut();
            if best.as_ref().is_none_or(|(_, best_phi, _)| phi < *best_phi) {
                *best = Some((z.clone(), phi, value));
            }
            Ok(phi)
        };
        let run = minimize(&objective, &y, &bounds, &local);

        if hit.get() {
            let point = feasible_point(&space, &feasible, LocalStatus::ForcedStop)
                .map(|mut point| {
                    point.value = scan_bound;
                    point
                });
            return Ok(finish(
                direction,
                EndPointStatus::ScanBoundReached,
                Some(scan_bound),
                point.into_iter().collect(),
                space.count(),
            ));
        }
        let status = match run {
            Ok(outcome) => outcome.status,
            Err(err) => {
                trace!(outer, error = %err, "cico outer iteration interrupted");
                return Ok(stopped(&space, &feasible, stop_status(&space, &err), direction));
            }
        };
        let Some((y_new, _, value)) = iterate.into_inner() else {
            return Ok(stopped(&space, &feasible, EndPointStatus::MaxIterStop, direction));
        };

        let t = y_new[k];
        let violation = value - crit;
        trace!(outer, t, loss = value, multiplier, penalty, %status, "cico outer iteration");
        multiplier = (multiplier + penalty * violation).max(0.0);

        if let Some((t_prev, violation_prev)) = previous {
            if (t - t_prev).abs() <= config.scan_tol && violation.abs() <= opts.feasibility_tol {
                let point = ProfilePoint {
                    value: space.axis_to_declared(t),
                    loss: value,
                    params: space.to_declared(&y_new),
                    ret: status,
                    counter: space.count(),
                };
                let border = point.value;
                return Ok(finish(
                    direction,
                    EndPointStatus::BorderFoundByScanTol,
                    Some(border),
                    vec![point],
                    space.count(),
                ));
            }
            if violation.abs() > 0.25 * violation_prev.abs() {
                penalty = (penalty * opts.penalty_growth).min(opts.penalty_max);
            }
        }
        previous = Some((t, violation));
        y = y_new;
        if space.exhausted() {
            break;
        }
    }

    Ok(stopped(&space, &feasible, EndPointStatus::MaxIterStop, direction))
}

fn offer_feasible(record: &RefCell<Option<(Theta, f64)>>, z: &Theta, value: f64, k: usize) {
    let mut best = record.borrow_mut();
    if best.as_ref().is_none_or(|(y, _)| z[k] > y[k]) {
        *best = Some((z.clone(), value));
    }
}

fn feasible_point<L: LossFunction + ?Sized>(
    space: &ScanSpace<'_, L>, record: &RefCell<Option<(Theta, f64)>>, ret: LocalStatus,
) -> Option<ProfilePoint> {
    record.borrow().as_ref().map(|(y, value)| ProfilePoint {
        value: space.axis_to_declared(y[space.theta_num()]),
        loss: *value,
        params: space.to_declared(y),
        ret,
        counter: space.count(),
    })
}

/// Inconclusive result carrying the furthest feasible point seen.
fn stopped<L: LossFunction + ?Sized>(
    space: &ScanSpace<'_, L>, record: &RefCell<Option<(Theta, f64)>>, status: EndPointStatus,
    direction: Direction,
) -> EndPoint {
    let ret = match status {
        EndPointStatus::MaxIterStop => LocalStatus::MaxEvalReached,
        _ => LocalStatus::Failed(status.to_string()),
    };
    let points = feasible_point(space, record, ret).into_iter().collect();
    finish(direction, status, None, points, space.count())
}
