//! Scale transforms between declared parameter scales and ℝ.
//!
//! # Provided items
//! - [`Scale`]: `Direct` (identity), `Log` (`(0, ∞) → ℝ`), `Logit`
//!   (`(0, 1) → ℝ`).
//! - [`scale`] / [`unscale`]: forward and inverse transform of one value.
//! - [`scale_bound`] / [`scale_bounds`]: forward transform for box bounds,
//!   accepting the closed domain.
//! - [`scale_vector`] / [`unscale_vector`]: component-wise transforms of a
//!   parameter vector.
//! - [`safe_logistic`]: overflow-free `1 / (1 + exp(-y))`.
use std::str::FromStr;

use crate::optimization::{
    errors::{OptError, OptResult},
    local_optimizer::Theta,
};

/// Parameter scale used to map a declared domain onto ℝ.
///
/// Parsing:
/// This enum implements `FromStr` and accepts case-insensitive names
/// (`"direct"`, `"log"`, `"logit"`). Unknown names return
/// `OptError::InvalidScale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scale {
    #[default]
    Direct,
    Log,
    Logit,
}

impl std::fmt::Display for Scale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scale::Direct => write!(f, "direct"),
            Scale::Log => write!(f, "log"),
            Scale::Logit => write!(f, "logit"),
        }
    }
}

impl FromStr for Scale {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(Scale::Direct),
            "log" => Ok(Scale::Log),
            "logit" => Ok(Scale::Logit),
            _ => Err(OptError::InvalidScale {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'direct', 'log' or 'logit'.",
            }),
        }
    }
}

/// Numerically stable logistic function `1 / (1 + exp(-y))`.
///
/// Splits on the sign of `y` so that `exp` is only ever evaluated at a
/// non-positive argument; `±∞` map to `1` and `0` exactly.
pub fn safe_logistic(y: f64) -> f64 {
    if y >= 0.0 {
        1.0 / (1.0 + (-y).exp())
    } else {
        let e = y.exp();
        e / (1.0 + e)
    }
}

/// Transform `x` from its declared scale into ℝ.
///
/// - `Direct`: identity; any non-NaN value is accepted.
/// - `Log`: `ln(x)`, requires `x > 0`.
/// - `Logit`: `ln(x / (1 - x))`, requires `0 < x < 1`.
///
/// # Errors
/// - [`OptError::OutOfScaleDomain`] when `x` is NaN or lies at or outside the
///   open domain of `kind`.
pub fn scale(x: f64, kind: Scale) -> OptResult<f64> {
    let inside = match kind {
        Scale::Direct => !x.is_nan(),
        Scale::Log => x > 0.0 && x.is_finite(),
        Scale::Logit => x > 0.0 && x < 1.0,
    };
    if !inside {
        return Err(OptError::OutOfScaleDomain { value: x, scale: kind });
    }
    Ok(match kind {
        Scale::Direct => x,
        Scale::Log => x.ln(),
        Scale::Logit => x.ln() - (-x).ln_1p(),
    })
}

/// Inverse of [`scale`]: map `y ∈ ℝ` back to the declared scale.
///
/// Infinite inputs map to the closed domain endpoints (`exp(-∞) = 0`,
/// `logistic(∞) = 1`), which keeps transformed bounds round-trippable.
pub fn unscale(y: f64, kind: Scale) -> f64 {
    match kind {
        Scale::Direct => y,
        Scale::Log => y.exp(),
        Scale::Logit => safe_logistic(y),
    }
}

/// Transform a bound value into ℝ, accepting the closed domain.
///
/// Identical to [`scale`] inside the open domain. The domain endpoints map
/// to infinities (`0 → -∞` for `Log`; `0 → -∞`, `1 → +∞` for `Logit`) and
/// `+∞` is accepted for `Log`.
///
/// # Errors
/// - [`OptError::OutOfScaleDomain`] for NaN or values outside the closed
///   domain.
pub fn scale_bound(x: f64, kind: Scale) -> OptResult<f64> {
    match kind {
        Scale::Direct if !x.is_nan() => Ok(x),
        Scale::Log if x == 0.0 => Ok(f64::NEG_INFINITY),
        Scale::Log if x == f64::INFINITY => Ok(f64::INFINITY),
        Scale::Logit if x == 0.0 => Ok(f64::NEG_INFINITY),
        Scale::Logit if x == 1.0 => Ok(f64::INFINITY),
        _ => scale(x, kind),
    }
}

/// Transform a vector of `(lower, upper)` bounds component-wise.
///
/// # Errors
/// - [`OptError::BoundsDimMismatch`] if `bounds.len() != scales.len()`.
/// - Any error from [`scale_bound`].
pub fn scale_bounds(bounds: &[(f64, f64)], scales: &[Scale]) -> OptResult<Vec<(f64, f64)>> {
    if bounds.len() != scales.len() {
        return Err(OptError::BoundsDimMismatch { expected: scales.len(), found: bounds.len() });
    }
    bounds
        .iter()
        .zip(scales)
        .map(|(&(lo, hi), &kind)| Ok((scale_bound(lo, kind)?, scale_bound(hi, kind)?)))
        .collect()
}

/// Transform a parameter vector component-wise into ℝ.
///
/// # Errors
/// - [`OptError::ThetaDimMismatch`] on a length mismatch.
/// - Any error from [`scale`].
pub fn scale_vector(theta: &Theta, scales: &[Scale]) -> OptResult<Theta> {
    if theta.len() != scales.len() {
        return Err(OptError::ThetaDimMismatch { expected: scales.len(), found: theta.len() });
    }
    let mut out = Theta::zeros(theta.len());
    for (i, (&x, &kind)) in theta.iter().zip(scales).enumerate() {
        out[i] = scale(x, kind)?;
    }
    Ok(out)
}

/// Inverse of [`scale_vector`]. `scales` must have the length of `y`.
pub fn unscale_vector(y: &Theta, scales: &[Scale]) -> Theta {
    let mut out = y.clone();
    out.iter_mut().zip(scales).for_each(|(v, &kind)| *v = unscale(*v, kind));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Round trips `unscale(scale(x))` inside every domain.
    // - Strict monotonicity of the forward transforms.
    // - Domain errors at and beyond the boundaries, and the closed-domain
    //   handling of `scale_bound`.
    // - String parsing of `Scale`.
    // -------------------------------------------------------------------------

    fn domain_grid(kind: Scale) -> Vec<f64> {
        match kind {
            Scale::Direct => (-20..=20).map(|i| i as f64 * 0.73).collect(),
            Scale::Log => (-12..=12).map(|i| 10f64.powi(i) * 1.7).collect(),
            Scale::Logit => (1..100).map(|i| i as f64 / 100.0).chain([1e-9, 1.0 - 1e-9]).collect(),
        }
    }

    #[test]
    // Purpose
    // -------
    // `unscale` inverts `scale` to within 1e-9 relative tolerance.
    //
    // Given
    // -----
    // - Value grids strictly inside the domain of each scale.
    //
    // Expect
    // ------
    // - `unscale(scale(x)) ≈ x` for every grid value.
    fn unscale_inverts_scale_inside_domain() {
        for kind in [Scale::Direct, Scale::Log, Scale::Logit] {
            for x in domain_grid(kind) {
                // Act
                let y = scale(x, kind).expect("x lies inside the domain");
                let back = unscale(y, kind);

                // Assert
                assert_relative_eq!(back, x, max_relative = 1e-9, epsilon = 1e-300);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Forward transforms are strictly increasing.
    //
    // Given
    // -----
    // - Sorted value grids inside each domain.
    //
    // Expect
    // ------
    // - Transformed grids are strictly increasing.
    fn scale_is_strictly_increasing() {
        for kind in [Scale::Direct, Scale::Log, Scale::Logit] {
            let mut grid = domain_grid(kind);
            grid.sort_by(|a, b| a.total_cmp(b));
            let ys: Vec<f64> = grid.iter().map(|&x| scale(x, kind).unwrap()).collect();
            assert!(ys.windows(2).all(|w| w[0] < w[1]), "{kind} must be increasing");
        }
    }

    #[test]
    // Purpose
    // -------
    // `scale` signals a domain error instead of returning ±∞.
    //
    // Given
    // -----
    // - Boundary and outside values for `Log` and `Logit`, plus NaN.
    //
    // Expect
    // ------
    // - `OptError::OutOfScaleDomain` in every case.
    fn scale_rejects_domain_boundaries() {
        let cases = [
            (0.0, Scale::Log),
            (-1.0, Scale::Log),
            (0.0, Scale::Logit),
            (1.0, Scale::Logit),
            (1.5, Scale::Logit),
            (f64::NAN, Scale::Direct),
        ];
        for (x, kind) in cases {
            let res = scale(x, kind);
            assert!(
                matches!(res, Err(OptError::OutOfScaleDomain { .. })),
                "{x} on {kind} must be rejected"
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // `scale_bound` maps closed-domain endpoints to infinities and still
    // rejects values outside the closed domain.
    //
    // Given
    // -----
    // - `(0, ∞)` on `Log`, `(0, 1)` on `Logit`, and `-1` on `Log`.
    //
    // Expect
    // ------
    // - Infinite transformed bounds for the endpoints; an error for `-1`.
    fn scale_bound_accepts_closed_domain() {
        assert_eq!(scale_bound(0.0, Scale::Log).unwrap(), f64::NEG_INFINITY);
        assert_eq!(scale_bound(f64::INFINITY, Scale::Log).unwrap(), f64::INFINITY);
        assert_eq!(scale_bound(0.0, Scale::Logit).unwrap(), f64::NEG_INFINITY);
        assert_eq!(scale_bound(1.0, Scale::Logit).unwrap(), f64::INFINITY);
        assert_eq!(scale_bound(f64::NEG_INFINITY, Scale::Direct).unwrap(), f64::NEG_INFINITY);
        assert!(scale_bound(-1.0, Scale::Log).is_err());

        // Unscaled infinities return to the closed-domain endpoints.
        assert_eq!(unscale(f64::NEG_INFINITY, Scale::Log), 0.0);
        assert_eq!(unscale(f64::INFINITY, Scale::Logit), 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Vector helpers apply per-component scales and check lengths.
    //
    // Given
    // -----
    // - θ = [2, e, 0.5] with scales [Direct, Log, Logit].
    //
    // Expect
    // ------
    // - Scaled vector [2, 1, 0] and an exact round trip; a length mismatch
    //   is rejected.
    fn scale_vector_round_trips_mixed_scales() {
        // Arrange
        let theta = array![2.0, std::f64::consts::E, 0.5];
        let scales = [Scale::Direct, Scale::Log, Scale::Logit];

        // Act
        let y = scale_vector(&theta, &scales).unwrap();
        let back = unscale_vector(&y, &scales);

        // Assert
        assert_relative_eq!(y[0], 2.0);
        assert_relative_eq!(y[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(y[2], 0.0, epsilon = 1e-12);
        for i in 0..3 {
            assert_relative_eq!(back[i], theta[i], max_relative = 1e-12);
        }
        assert!(matches!(
            scale_vector(&theta, &scales[..2]),
            Err(OptError::ThetaDimMismatch { expected: 2, found: 3 })
        ));
    }

    #[test]
    // Purpose
    // -------
    // `Scale` parses case-insensitively and rejects unknown names.
    fn scale_parses_from_str() {
        assert_eq!("LOG".parse::<Scale>().unwrap(), Scale::Log);
        assert_eq!("Logit".parse::<Scale>().unwrap(), Scale::Logit);
        assert_eq!("direct".parse::<Scale>().unwrap(), Scale::Direct);
        assert!(matches!("log10".parse::<Scale>(), Err(OptError::InvalidScale { .. })));
    }
}
