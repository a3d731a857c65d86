//! Critical level for likelihood-ratio confidence intervals.
use statrs::distribution::{ChiSquared, Continuous, ContinuousCDF};

use crate::profiler::errors::{ProfileError, ProfileResult};

/// Newton steps applied to the quantile returned by `statrs`.
const QUANTILE_NEWTON_STEPS: usize = 3;

/// `loss_opt + χ²_dof⁻¹(confidence)`.
///
/// For a loss measured as `-2 ln L`, the profile-likelihood confidence
/// region at level `confidence` is `{θ : Λ(θ) ≤ critical_level(..)}`.
///
/// The quantile from `ChiSquared::inverse_cdf` is only accurate to about
/// 1e-5; it is polished with Newton steps on the cdf.
///
/// # Errors
/// - `InvalidLossCrit` if `loss_opt` is not finite.
/// - `InvalidConfidence` unless `0 < confidence < 1`.
/// - `InvalidDof` if `dof == 0`.
pub fn critical_level(loss_opt: f64, confidence: f64, dof: usize) -> ProfileResult<f64> {
    if !loss_opt.is_finite() {
        return Err(ProfileError::InvalidLossCrit { value: loss_opt });
    }
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(ProfileError::InvalidConfidence { value: confidence });
    }
    if dof == 0 {
        return Err(ProfileError::InvalidDof { dof });
    }
    let chi2 = ChiSquared::new(dof as f64).map_err(|_| ProfileError::InvalidDof { dof })?;
    Ok(loss_opt + chi_square_quantile(&chi2, confidence))
}

fn chi_square_quantile(chi2: &ChiSquared, p: f64) -> f64 {
    let mut x = chi2.inverse_cdf(p);
    for _ in 0..QUANTILE_NEWTON_STEPS {
        let density = chi2.pdf(x);
        if !(density.is_finite() && density > 0.0) {
            break;
        }
        let next = x - (chi2.cdf(x) - p) / density;
        if !(next.is_finite() && next > 0.0) {
            break;
        }
        x = next;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    // Purpose
    // -------
    // The 95% one-parameter threshold is the familiar 3.841.
    //
    // Given
    // -----
    // - loss_opt = 10, confidence = 0.95, dof = 1.
    //
    // Expect
    // ------
    // - 13.841458820694124 to 1e-9.
    fn critical_level_matches_chi_square_quantile() {
        let level = critical_level(10.0, 0.95, 1).unwrap();
        assert_abs_diff_eq!(level, 13.841_458_820_694_124, epsilon = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Higher degrees of freedom and levels are just as precise.
    //
    // Given
    // -----
    // - loss_opt = 0 with (0.99, 2) and (0.95, 3).
    //
    // Expect
    // ------
    // - 9.210340371976184 (= -2 ln 0.01) and 7.814727903251178 to 1e-9.
    fn critical_level_is_precise_for_several_dof() {
        let two = critical_level(0.0, 0.99, 2).unwrap();
        let three = critical_level(0.0, 0.95, 3).unwrap();
        assert_abs_diff_eq!(two, -2.0 * 0.01_f64.ln(), epsilon = 1e-9);
        assert_abs_diff_eq!(three, 7.814_727_903_251_178, epsilon = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Invalid arguments are rejected.
    //
    // Given
    // -----
    // - confidence = 1, dof = 0, loss_opt = NaN.
    //
    // Expect
    // ------
    // - The matching error variant for each.
    fn critical_level_rejects_invalid_arguments() {
        assert!(matches!(critical_level(0.0, 1.0, 1), Err(ProfileError::InvalidConfidence { .. })));
        assert!(matches!(critical_level(0.0, 0.9, 0), Err(ProfileError::InvalidDof { dof: 0 })));
        assert!(matches!(
            critical_level(f64::NAN, 0.9, 1),
            Err(ProfileError::InvalidLossCrit { .. })
        ));
    }
}
