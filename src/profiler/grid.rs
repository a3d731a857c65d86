//! grid — adaptive sampling of a profile for smooth plots.
//!
//! Purpose
//! -------
//! Place profile evaluations where the profile bends. [`adapted_grid`]
//! starts from a jittered uniform grid and repeatedly splits the intervals
//! with the largest curvature indicator; [`ParamInterval::update_profile_points`]
//! uses it to densify the profile points of a finished interval search.
//!
//! Key behaviors
//! -------------
//! - The function is never evaluated exactly at the ends of the interval.
//! - Each interval is split at most `max_recursions` times, and at most half
//!   of the intervals are split per sweep.
//! - Non-finite values mark their interval for refinement.
//! - `update_profile_points` looks up already known coordinates, so calling
//!   it again with the same `max_recursions` adds nothing.
use std::collections::HashMap;

use crate::{
    optimization::local_optimizer::types::DEFAULT_FTOL_ABS,
    profiler::{
        core::{LossFunction, ParamInterval, ScanSpace},
        errors::{ProfileError, ProfileResult},
        profile::{Profile, local_options},
    },
};

/// Number of points of the initial grid.
const INITIAL_POINTS: usize = 21;

/// Curvature indicator above which an interval is split.
const MAX_CURVATURE: f64 = 0.05;

/// Relative distance of the outermost points from the interval ends.
const END_OFFSET: f64 = 1e-4;

/// Relative amplitude of the jitter applied to interior points.
const JITTER: f64 = 0.05;

/// Compute a grid on `[a, b]` on which `f` looks smooth, with the values of
/// `f` on it.
///
/// # Errors
/// - `ProfileError::InvalidGridInterval` when `a > b` or an end is not
///   finite.
/// - Any error returned by `f`.
pub fn adapted_grid<F>(
    mut f: F, (a, b): (f64, f64), max_recursions: usize,
) -> ProfileResult<(Vec<f64>, Vec<f64>)>
where
    F: FnMut(f64) -> ProfileResult<f64>,
{
    if !(a.is_finite() && b.is_finite()) || a > b {
        return Err(ProfileError::InvalidGridInterval { lower: a, upper: b });
    }
    if a == b {
        return Ok((vec![a], vec![f(a)?]));
    }

    let mut xs = initial_grid(a, b);
    let mut fs = xs.iter().map(|&x| f(x)).collect::<ProfileResult<Vec<f64>>>()?;
    // Interval j spans points 2j..=2j+2 and is centred on 2j+1.
    let mut refinements = vec![0usize; xs.len() / 2];

    loop {
        let n_intervals = refinements.len();
        let (mut curvatures, mut active) = curvature(&xs, &fs, &refinements, max_recursions);
        curvatures[0] = curvatures[1];
        active[0] = active[1];
        curvatures[n_intervals - 1] = curvatures[n_intervals - 2];
        active[n_intervals - 1] = active[n_intervals - 2];

        let mut candidates: Vec<usize> =
            (0..n_intervals).filter(|&j| active[j] && refinements[j] < max_recursions).collect();
        if candidates.is_empty() {
            break;
        }
        candidates.sort_by(|&i, &j| curvatures[j].total_cmp(&curvatures[i]));
        candidates.truncate(n_intervals / 2);
        let mut split = vec![false; n_intervals];
        for j in candidates {
            split[j] = true;
        }

        let mut new_xs = Vec::with_capacity(xs.len() + 2 * n_intervals);
        let mut new_fs = Vec::with_capacity(new_xs.capacity());
        let mut new_refinements = Vec::with_capacity(2 * n_intervals);
        for i in 0..xs.len() {
            let interval = (i % 2 == 1).then_some(i / 2);
            match interval {
                Some(j) if split[j] => {
                    let left = 0.5 * (xs[i - 1] + xs[i]);
                    let right = 0.5 * (xs[i] + xs[i + 1]);
                    new_xs.extend([left, xs[i], right]);
                    new_fs.extend([f(left)?, fs[i], f(right)?]);
                    new_refinements.extend([refinements[j] + 1, refinements[j] + 1]);
                }
                Some(j) => {
                    new_xs.push(xs[i]);
                    new_fs.push(fs[i]);
                    new_refinements.push(refinements[j]);
                }
                None => {
                    new_xs.push(xs[i]);
                    new_fs.push(fs[i]);
                }
            }
        }
        xs = new_xs;
        fs = new_fs;
        refinements = new_refinements;
    }

    Ok((xs, fs))
}

/// Uniform grid with the second and second-to-last points pulled towards
/// the ends, the ends nudged inside and interior points jittered.
fn initial_grid(a: f64, b: f64) -> Vec<f64> {
    let n = INITIAL_POINTS;
    let width = b - a;
    let mut xs: Vec<f64> = (0..n).map(|i| a + width * i as f64 / (n - 1) as f64).collect();
    xs[1] = xs[0] + 0.25 * (xs[1] - xs[0]);
    xs[n - 2] = xs[n - 1] - 0.25 * (xs[n - 1] - xs[n - 2]);
    xs[0] = a + END_OFFSET * width;
    xs[n - 1] = b - END_OFFSET * width;
    for i in 1..n - 1 {
        // Golden-ratio sequence in [-0.5, 0.5).
        let u = (i as f64 * 0.618_034).fract() - 0.5;
        xs[i] += 2.0 * u * JITTER * (xs[i + 1] - xs[i - 1]);
    }
    xs
}

/// Curvature indicator and refinement flag of every interval.
fn curvature(
    xs: &[f64], fs: &[f64], refinements: &[usize], max_recursions: usize,
) -> (Vec<f64>, Vec<bool>) {
    let n_intervals = refinements.len();
    let finite: Vec<f64> = fs.iter().copied().filter(|v| v.is_finite()).collect();
    let f_range = match (
        finite.iter().copied().reduce(f64::min),
        finite.iter().copied().reduce(f64::max),
    ) {
        (Some(lo), Some(hi)) if hi > lo && (hi - lo).is_finite() => hi - lo,
        _ => 1.0,
    };

    let mut curvatures = vec![0.0; n_intervals];
    let mut active = vec![false; n_intervals];
    for j in 0..n_intervals {
        let p = 2 * j + 1;
        if refinements[j] >= max_recursions {
            continue;
        }
        if !fs[p - 1..=p + 1].iter().all(|v| v.is_finite()) {
            active[j] = true;
            continue;
        }
        let mut total_weight = 0.0;
        for (q, w) in [(-1isize, 0.25), (0, 0.5), (1, 0.25)] {
            if (j == 0 && q == -1) || (j == n_intervals - 1 && q == 1) {
                continue;
            }
            total_weight += w;
            let i = (p as isize + q) as usize;
            let span = xs[i + 1] - xs[i - 1];
            let second = 2.0
                * ((fs[i + 1] - fs[i]) / ((xs[i + 1] - xs[i]) * span)
                    - (fs[i] - fs[i - 1]) / ((xs[i] - xs[i - 1]) * span));
            curvatures[j] += (second * span * span).abs() / f_range * w;
        }
        curvatures[j] /= total_weight;
        active[j] = curvatures[j] > MAX_CURVATURE;
    }
    (curvatures, active)
}

impl<L: LossFunction> ParamInterval<L> {
    /// Add profile points to both endpoints so that the profile plots
    /// smoothly.
    ///
    /// Each side is sampled with [`adapted_grid`] in the scaled coordinate,
    /// from the initial value to the endpoint value (or to the scan bound
    /// when there is none). Points whose value is already present are not
    /// evaluated again. New points are appended and each endpoint's points
    /// re-sorted along its direction.
    ///
    /// Returns the number of points added.
    ///
    /// # Errors
    /// Scale-domain and loss errors; the endpoint being refined when the
    /// error occurs is left unchanged.
    pub fn update_profile_points(&mut self, max_recursions: usize) -> ProfileResult<usize> {
        let ParamInterval { input, result, .. } = self;
        let config = &input.config;
        let k = config.theta_num;
        let mut added = 0;

        for endpoint in [&mut result.0, &mut result.1] {
            let direction = endpoint.direction;
            let space = ScanSpace::new(
                &input.loss,
                k,
                direction,
                &config.scale,
                &config.theta_bounds,
                None,
            )?;
            let t0 = space.axis_to_search(config.theta_init[k])?;
            let t1 = space
                .axis_to_search(endpoint.value.unwrap_or_else(|| config.scan_bound(direction)))?;
            if t1 <= t0 {
                continue;
            }
            let local = local_options(config.local_alg, DEFAULT_FTOL_ABS, config.max_iter)?;
            let profile = Profile::new(space, &config.theta_init, local, false)?;
            let start = profile.start()?;

            let mut known: HashMap<u64, f64> =
                endpoint.profile_points.iter().map(|p| (p.value.to_bits(), p.loss)).collect();
            let mut fresh = Vec::new();
            adapted_grid(
                |t| {
                    let key = profile.space().axis_to_declared(t).to_bits();
                    if let Some(&loss) = known.get(&key) {
                        return Ok(loss);
                    }
                    let (point, _) = profile.eval_search(t, &start)?;
                    known.insert(key, point.loss);
                    let loss = point.loss;
                    fresh.push(point);
                    Ok(loss)
                },
                (t0, t1),
                max_recursions,
            )?;

            added += fresh.len();
            endpoint.profile_points.extend(fresh);
            endpoint.sort_profile_points();
        }
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::local_optimizer::{LocalStatus, Theta};
    use crate::profiler::core::{
        Direction, EndPoint, EndPointStatus, IntervalOptions, Method, ParamIntervalInput,
        ProfilePoint,
    };
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - the shape of the grid (inside the interval, sorted, initial size),
    // - refinement where the function bends,
    // - degenerate and invalid intervals, error propagation,
    // - `update_profile_points` densifying both sides idempotently.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The grid stays strictly inside the interval and is sorted; without
    // refinement it has the initial 21 points.
    //
    // Given
    // -----
    // - f(x) = x² on [0, 1] with max_recursions = 0.
    //
    // Expect
    // ------
    // - 21 sorted points in (0, 1) with fs = xs².
    fn grid_without_refinement_has_initial_points() {
        // Act
        let (xs, fs) = adapted_grid(|x| Ok(x * x), (0.0, 1.0), 0).unwrap();

        // Assert
        assert_eq!(xs.len(), 21);
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
        assert!(xs[0] > 0.0 && xs[20] < 1.0);
        assert!(xs.iter().zip(&fs).all(|(x, f)| *f == x * x));
    }

    #[test]
    // Purpose
    // -------
    // Curved regions get refined, straight ones do not.
    //
    // Given
    // -----
    // - A straight line and a sharp peak on [-1, 1], max_recursions = 3.
    //
    // Expect
    // ------
    // - The line keeps 21 points; the peak gets more, densest near 0.
    fn grid_refines_where_function_bends() {
        // Arrange
        let peak = |x: f64| Ok(1.0 / (1.0 + 100.0 * x * x));

        // Act
        let (line_xs, _) = adapted_grid(|x| Ok(2.0 * x + 1.0), (-1.0, 1.0), 3).unwrap();
        let (peak_xs, _) = adapted_grid(peak, (-1.0, 1.0), 3).unwrap();

        // Assert
        assert_eq!(line_xs.len(), 21);
        assert!(peak_xs.len() > 21);
        assert!(peak_xs.windows(2).all(|w| w[0] < w[1]));
        let near_zero = peak_xs.iter().filter(|x| x.abs() < 0.25).count();
        let far = peak_xs.iter().filter(|x| x.abs() > 0.75).count();
        assert!(near_zero > far);
    }

    #[test]
    // Purpose
    // -------
    // Degenerate, invalid and failing cases.
    //
    // Given
    // -----
    // - a == b; a > b; a function failing everywhere.
    //
    // Expect
    // ------
    // - One point; `InvalidGridInterval`; the function's error.
    fn grid_edge_cases() {
        // Act
        let single = adapted_grid(|x| Ok(x), (2.0, 2.0), 2).unwrap();
        let reversed = adapted_grid(|x| Ok(x), (1.0, 0.0), 2);
        let failing = adapted_grid(|_| Err(ProfileError::EmptyTheta), (0.0, 1.0), 2);

        // Assert
        assert_eq!(single, (vec![2.0], vec![2.0]));
        assert!(matches!(reversed, Err(ProfileError::InvalidGridInterval { .. })));
        assert!(matches!(failing, Err(ProfileError::EmptyTheta)));
    }

    fn parabola(theta: &Theta) -> f64 {
        theta[0].powi(2)
    }

    fn endpoint(direction: Direction, value: f64) -> EndPoint {
        EndPoint {
            value: Some(value),
            profile_points: vec![ProfilePoint {
                value,
                loss: value * value,
                params: array![value],
                ret: LocalStatus::NotOptimized,
                counter: 1,
            }],
            status: EndPointStatus::BorderFoundByScanTol,
            direction,
            counter: 10,
        }
    }

    #[test]
    // Purpose
    // -------
    // Densification adds points on both sides, inside each side's range,
    // sorted along the direction, and a second call adds nothing.
    //
    // Given
    // -----
    // - Λ = x² with endpoints -2 and 2, loss_crit = 4.
    //
    // Expect
    // ------
    // - Points added on both sides with Λ = value², second call returns 0.
    fn update_profile_points_is_idempotent() {
        // Arrange
        let config = IntervalOptions::new().loss_crit(4.0).resolve(&array![0.0], 0).unwrap();
        let mut interval = ParamInterval {
            input: ParamIntervalInput::new(config, parabola),
            loss_init: 0.0,
            method: Method::cico(),
            result: (endpoint(Direction::Left, -2.0), endpoint(Direction::Right, 2.0)),
        };

        // Act
        let added = interval.update_profile_points(2).unwrap();
        let left_len = interval.left().profile_points.len();
        let right_len = interval.right().profile_points.len();
        let added_again = interval.update_profile_points(2).unwrap();

        // Assert
        assert!(added >= 2 * 20);
        assert_eq!(left_len + right_len, added + 2);
        assert_eq!(added_again, 0);
        assert_eq!(interval.left().profile_points.len(), left_len);
        let right = &interval.right().profile_points;
        assert!(right.windows(2).all(|w| w[0].value <= w[1].value));
        assert!(right.iter().all(|p| (0.0..=2.0).contains(&p.value)));
        assert!(right.iter().all(|p| (p.loss - p.value * p.value).abs() < 1e-12));
        let left = &interval.left().profile_points;
        assert!(left.windows(2).all(|w| w[0].value >= w[1].value));
        assert!(left.iter().all(|p| (-2.0..=0.0).contains(&p.value)));
    }
}
