//! Validation helpers for the local optimizer.
//!
//! - **Option checks**: [`verify_ftol_abs`], [`verify_tol_grad`],
//!   [`verify_max_iter`], [`verify_max_eval`], [`verify_initial_step`],
//!   [`verify_lbfgs_mem`].
//! - **Problem checks**: [`validate_bounds`] enforces matching dimensions and
//!   ordered, non-NaN box bounds.
//! - **Result checks**: [`validate_grad`], [`validate_theta_hat`],
//!   [`validate_value`].
//!
//! [`project_onto_bounds`] is the single place where candidate points are
//! pulled back into the feasible box.
use crate::optimization::{
    errors::{OptError, OptResult},
    local_optimizer::{Grad, Theta},
};

/// Validate the optional absolute objective tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidFtolAbs`] if the value is non-finite or ≤ 0.0.
pub fn verify_ftol_abs(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidFtolAbs { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidFtolAbs { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional gradient-norm tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

pub fn verify_max_iter(max_iter: Option<usize>) -> OptResult<()> {
    if max_iter == Some(0) {
        return Err(OptError::InvalidMaxIter {
            max_iter: 0,
            reason: "Maximum iterations must be greater than zero.",
        });
    }
    Ok(())
}

pub fn verify_max_eval(max_eval: Option<usize>) -> OptResult<()> {
    if max_eval == Some(0) {
        return Err(OptError::InvalidMaxEval {
            max_eval: 0,
            reason: "Maximum evaluations must be greater than zero.",
        });
    }
    Ok(())
}

/// Validate the relative edge length of the initial simplex.
///
/// # Errors
/// Returns [`OptError::InvalidInitialStep`] if the step is non-finite or ≤ 0.0.
pub fn verify_initial_step(step: f64) -> OptResult<()> {
    if !step.is_finite() {
        return Err(OptError::InvalidInitialStep { step, reason: "Step must be finite." });
    }
    if step <= 0.0 {
        return Err(OptError::InvalidInitialStep { step, reason: "Step must be positive." });
    }
    Ok(())
}

pub fn verify_lbfgs_mem(mem: Option<usize>) -> OptResult<()> {
    if mem == Some(0) {
        return Err(OptError::InvalidLBFGSMem {
            mem: 0,
            reason: "L-BFGS memory must be greater than zero.",
        });
    }
    Ok(())
}

/// Validate box bounds against the dimension of the starting point.
///
/// Infinite bounds are allowed; NaN bounds and `lower > upper` are not.
///
/// # Errors
/// - [`OptError::BoundsDimMismatch`] if `bounds.len() != dim`.
/// - [`OptError::InvalidBounds`] for the first offending pair.
pub fn validate_bounds(bounds: &[(f64, f64)], dim: usize) -> OptResult<()> {
    if bounds.len() != dim {
        return Err(OptError::BoundsDimMismatch { expected: dim, found: bounds.len() });
    }
    for (index, &(lower, upper)) in bounds.iter().enumerate() {
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return Err(OptError::InvalidBounds { index, lower, upper });
        }
    }
    Ok(())
}

/// Clamp every coordinate of `theta` into its `(lower, upper)` pair.
///
/// `bounds` must already have passed [`validate_bounds`].
pub fn project_onto_bounds(theta: &Theta, bounds: &[(f64, f64)]) -> Theta {
    let mut projected = theta.clone();
    for (x, &(lower, upper)) in projected.iter_mut().zip(bounds) {
        *x = x.clamp(lower, upper);
    }
    projected
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] for the first non-finite element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
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
    // Bounds must match the problem dimension and be ordered.
    //
    // Given
    // -----
    // - One pair for a 2-d problem, then a reversed pair, then a NaN pair.
    //
    // Expect
    // ------
    // - `BoundsDimMismatch`, then `InvalidBounds` at the offending index.
    fn validate_bounds_rejects_bad_pairs() {
        assert_eq!(
            validate_bounds(&[(0.0, 1.0)], 2),
            Err(OptError::BoundsDimMismatch { expected: 2, found: 1 })
        );
        assert!(matches!(
            validate_bounds(&[(0.0, 1.0), (2.0, 1.0)], 2),
            Err(OptError::InvalidBounds { index: 1, .. })
        ));
        assert!(matches!(
            validate_bounds(&[(f64::NAN, 1.0)], 1),
            Err(OptError::InvalidBounds { index: 0, .. })
        ));
        assert!(validate_bounds(&[(f64::NEG_INFINITY, f64::INFINITY)], 1).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Projection clamps only the coordinates that leave the box.
    //
    // Given
    // -----
    // - theta = [-2, 0.5, 7] with bounds [(-1, 1), (0, 1), (-inf, 5)].
    //
    // Expect
    // ------
    // - [-1, 0.5, 5].
    fn project_onto_bounds_clamps_outside_coordinates() {
        // Arrange
        let theta = array![-2.0, 0.5, 7.0];
        let bounds = [(-1.0, 1.0), (0.0, 1.0), (f64::NEG_INFINITY, 5.0)];

        // Act
        let projected = project_onto_bounds(&theta, &bounds);

        // Assert
        assert_eq!(projected, array![-1.0, 0.5, 5.0]);
    }

    #[test]
    // Purpose
    // -------
    // Gradient validation checks length before finiteness.
    //
    // Given
    // -----
    // - A 2-element gradient for dim 3, then [1, inf].
    //
    // Expect
    // ------
    // - `GradientDimMismatch`, then `InvalidGradient { index: 1 }`.
    fn validate_grad_checks_dimension_and_finiteness() {
        assert_eq!(
            validate_grad(&array![1.0, 2.0], 3),
            Err(OptError::GradientDimMismatch { expected: 3, found: 2 })
        );
        assert!(matches!(
            validate_grad(&array![1.0, f64::INFINITY], 2),
            Err(OptError::InvalidGradient { index: 1, .. })
        ));
    }
}
