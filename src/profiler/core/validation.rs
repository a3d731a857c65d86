//! Validation helpers used when resolving interval options.
//!
//! Every helper returns the dedicated [`ProfileError`] variant so that
//! configuration mistakes fail fast with a precise message.
use crate::{
    optimization::{
        local_optimizer::Theta,
        scaling::{Scale, scale, scale_bound},
    },
    profiler::errors::{ProfileError, ProfileResult},
};

/// Whole domain of each scale, used when no bounds are given.
pub fn default_theta_bounds(scales: &[Scale]) -> Vec<(f64, f64)> {
    scales
        .iter()
        .map(|kind| match kind {
            Scale::Direct => (f64::NEG_INFINITY, f64::INFINITY),
            Scale::Log => (0.0, f64::INFINITY),
            Scale::Logit => (0.0, 1.0),
        })
        .collect()
}

pub fn validate_scales(scales: &[Scale], n: usize) -> ProfileResult<()> {
    if scales.len() != n {
        return Err(ProfileError::ScaleDimMismatch { expected: n, found: scales.len() });
    }
    Ok(())
}

/// Validate bounds against the initial vector and the scales.
///
/// Checks, per component:
/// - the pair is ordered and not NaN, and lies within the closed domain of
///   its scale;
/// - the initial value lies within the pair *and* strictly inside the open
///   domain of its scale.
///
/// # Errors
/// `BoundsDimMismatch`, `InvalidThetaBounds` or `InitialOutsideBounds`.
pub fn validate_theta_bounds(
    theta_init: &Theta, bounds: &[(f64, f64)], scales: &[Scale],
) -> ProfileResult<()> {
    let n = theta_init.len();
    if bounds.len() != n {
        return Err(ProfileError::BoundsDimMismatch { expected: n, found: bounds.len() });
    }
    for (index, ((&value, &(lower, upper)), &kind)) in
        theta_init.iter().zip(bounds).zip(scales).enumerate()
    {
        let ordered = !lower.is_nan() && !upper.is_nan() && lower <= upper;
        if !ordered || scale_bound(lower, kind).is_err() || scale_bound(upper, kind).is_err() {
            return Err(ProfileError::InvalidThetaBounds { index, lower, upper });
        }
        if !(lower <= value && value <= upper) || scale(value, kind).is_err() {
            return Err(ProfileError::InitialOutsideBounds { index, value, lower, upper });
        }
    }
    Ok(())
}

/// Validate the scan bounds of the scanned parameter.
///
/// # Errors
/// - `InvalidScanBounds` if the pair is NaN, not finite in the scaled space,
///   or does not strictly contain `init`.
/// - `ScanBoundsOutsideThetaBounds` if the pair leaves the parameter bounds.
pub fn validate_scan_bounds(
    scan_bounds: (f64, f64), init: f64, theta_bounds: (f64, f64), kind: Scale,
) -> ProfileResult<()> {
    let (lower, upper) = scan_bounds;
    let (theta_lower, theta_upper) = theta_bounds;
    if lower.is_nan() || upper.is_nan() {
        return Err(ProfileError::InvalidScanBounds { lower, upper, reason: "Bounds are NaN." });
    }
    if lower < theta_lower || upper > theta_upper {
        return Err(ProfileError::ScanBoundsOutsideThetaBounds {
            lower,
            upper,
            theta_lower,
            theta_upper,
        });
    }
    let finite = |x: f64| scale(x, kind).is_ok_and(f64::is_finite);
    if !finite(lower) || !finite(upper) {
        return Err(ProfileError::InvalidScanBounds {
            lower,
            upper,
            reason: "Bounds must be finite in the scaled space.",
        });
    }
    if !(lower < init && init < upper) {
        return Err(ProfileError::InvalidScanBounds {
            lower,
            upper,
            reason: "Bounds must strictly contain the initial value.",
        });
    }
    Ok(())
}

pub fn validate_loss_crit(value: f64) -> ProfileResult<()> {
    if !value.is_finite() {
        return Err(ProfileError::InvalidLossCrit { value });
    }
    Ok(())
}

pub fn validate_scan_tol(tol: f64) -> ProfileResult<()> {
    if !tol.is_finite() {
        return Err(ProfileError::InvalidScanTol { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(ProfileError::InvalidScanTol { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

pub fn validate_loss_tol(tol: f64) -> ProfileResult<()> {
    if !tol.is_finite() {
        return Err(ProfileError::InvalidLossTol { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(ProfileError::InvalidLossTol { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

pub fn validate_max_iter(max_iter: usize) -> ProfileResult<()> {
    if max_iter == 0 {
        return Err(ProfileError::InvalidMaxIter { max_iter });
    }
    Ok(())
}

/// Method options that must be finite and strictly positive.
pub fn validate_positive(name: &'static str, value: f64) -> ProfileResult<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ProfileError::InvalidMethodOption {
            name,
            value,
            reason: "Must be finite and positive.",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Bounds outside a scale's closed domain are rejected even when ordered.
    //
    // Given
    // -----
    // - Logit bounds (0, 2) and log bounds (-1, 5).
    //
    // Expect
    // ------
    // - `InvalidThetaBounds` for both.
    fn validate_theta_bounds_checks_scale_domain() {
        assert!(matches!(
            validate_theta_bounds(&array![0.5], &[(0.0, 2.0)], &[Scale::Logit]),
            Err(ProfileError::InvalidThetaBounds { index: 0, .. })
        ));
        assert!(matches!(
            validate_theta_bounds(&array![1.0], &[(-1.0, 5.0)], &[Scale::Log]),
            Err(ProfileError::InvalidThetaBounds { index: 0, .. })
        ));
        assert!(validate_theta_bounds(&array![0.5], &[(0.0, 1.0)], &[Scale::Logit]).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Scan bounds on a log scale cannot sit on the domain boundary.
    //
    // Given
    // -----
    // - Log scale, scan bounds (0, 10), initial value 1.
    //
    // Expect
    // ------
    // - `InvalidScanBounds`.
    fn validate_scan_bounds_requires_finite_scaled_bounds() {
        assert!(matches!(
            validate_scan_bounds((0.0, 10.0), 1.0, (0.0, f64::INFINITY), Scale::Log),
            Err(ProfileError::InvalidScanBounds { .. })
        ));
        assert!(validate_scan_bounds((0.1, 10.0), 1.0, (0.0, f64::INFINITY), Scale::Log).is_ok());
    }
}
