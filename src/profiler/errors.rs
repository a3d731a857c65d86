//! Errors for profile-likelihood interval estimation.
//!
//! [`ProfileError`] covers configuration mistakes, which are fatal and
//! raised before any search starts, and wraps [`OptError`] for failures
//! coming out of the optimization layer (loss-function errors, scale-domain
//! violations, invalid local options).
//!
//! ## Conventions
//! - **Indices are 0-based.**
//! - Numerical non-convergence and non-identifiability are *not* errors;
//!   they are reported through `EndPointStatus` and `LocalStatus`.
use crate::optimization::errors::OptError;

/// Result alias for profiler operations that may produce [`ProfileError`].
pub type ProfileResult<T> = Result<T, ProfileError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileError {
    // ---- Problem shape ----
    /// Parameter vector is empty.
    EmptyTheta,

    /// Scanned parameter index is out of range.
    ThetaNumOutOfRange { theta_num: usize, len: usize },

    /// Scale vector has the wrong length.
    ScaleDimMismatch { expected: usize, found: usize },

    /// Bounds vector has the wrong length.
    BoundsDimMismatch { expected: usize, found: usize },

    // ---- Bounds ----
    /// Lower bound exceeds upper bound or a bound is NaN.
    InvalidThetaBounds { index: usize, lower: f64, upper: f64 },

    /// Initial value lies outside its bounds.
    InitialOutsideBounds { index: usize, value: f64, lower: f64, upper: f64 },

    /// Requested profile value lies outside the bounds of the scanned parameter.
    ValueOutsideBounds { index: usize, value: f64, lower: f64, upper: f64 },

    /// Scan bounds must be ordered, non-NaN and strictly contain the initial value.
    InvalidScanBounds { lower: f64, upper: f64, reason: &'static str },

    /// Scan bounds must lie within the bounds of the scanned parameter.
    ScanBoundsOutsideThetaBounds { lower: f64, upper: f64, theta_lower: f64, theta_upper: f64 },

    // ---- Critical level ----
    /// Critical level must be finite.
    InvalidLossCrit { value: f64 },

    /// Loss at the initial point must be strictly below the critical level.
    InitialAboveCritical { loss_init: f64, loss_crit: f64 },

    /// Confidence level must lie in (0, 1).
    InvalidConfidence { value: f64 },

    /// Degrees of freedom must be at least 1.
    InvalidDof { dof: usize },

    // ---- Search options ----
    /// scan_tol must be finite and > 0.
    InvalidScanTol { tol: f64, reason: &'static str },

    /// loss_tol must be finite and > 0.
    InvalidLossTol { tol: f64, reason: &'static str },

    /// max_iter must be > 0.
    InvalidMaxIter { max_iter: usize },

    /// A method option is out of range.
    InvalidMethodOption { name: &'static str, value: f64, reason: &'static str },

    // ---- Grid ----
    /// Grid interval must be finite with lower ≤ upper.
    InvalidGridInterval { lower: f64, upper: f64 },

    // ---- Optimization layer ----
    /// Error raised by the loss function, a scale transform or the local optimizer.
    Optimization(OptError),
}

impl std::error::Error for ProfileError {}

impl std::fmt::Display for ProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Problem shape ----
            ProfileError::EmptyTheta => write!(f, "Parameter vector must not be empty."),
            ProfileError::ThetaNumOutOfRange { theta_num, len } => {
                write!(f, "Parameter index {theta_num} out of range for {len} parameters.")
            }
            ProfileError::ScaleDimMismatch { expected, found } => {
                write!(f, "Scale length mismatch: expected {expected}, found {found}.")
            }
            ProfileError::BoundsDimMismatch { expected, found } => {
                write!(f, "Bounds length mismatch: expected {expected}, found {found}.")
            }

            // ---- Bounds ----
            ProfileError::InvalidThetaBounds { index, lower, upper } => {
                write!(f, "Invalid bounds for parameter {index}: ({lower}, {upper}).")
            }
            ProfileError::InitialOutsideBounds { index, value, lower, upper } => {
                write!(
                    f,
                    "Initial value {value} of parameter {index} lies outside its bounds \
                     ({lower}, {upper})."
                )
            }
            ProfileError::ValueOutsideBounds { index, value, lower, upper } => {
                write!(
                    f,
                    "Profile value {value} of parameter {index} lies outside its bounds \
                     ({lower}, {upper})."
                )
            }
            ProfileError::InvalidScanBounds { lower, upper, reason } => {
                write!(f, "Invalid scan bounds ({lower}, {upper}): {reason}")
            }
            ProfileError::ScanBoundsOutsideThetaBounds { lower, upper, theta_lower, theta_upper } => {
                write!(
                    f,
                    "Scan bounds ({lower}, {upper}) lie outside the parameter bounds \
                     ({theta_lower}, {theta_upper})."
                )
            }

            // ---- Critical level ----
            ProfileError::InvalidLossCrit { value } => {
                write!(f, "Critical level must be finite, got {value}.")
            }
            ProfileError::InitialAboveCritical { loss_init, loss_crit } => {
                write!(
                    f,
                    "Loss at the initial point ({loss_init}) must be below the critical level \
                     ({loss_crit})."
                )
            }
            ProfileError::InvalidConfidence { value } => {
                write!(f, "Confidence level must lie in (0, 1), got {value}.")
            }
            ProfileError::InvalidDof { dof } => {
                write!(f, "Degrees of freedom must be at least 1, got {dof}.")
            }

            // ---- Search options ----
            ProfileError::InvalidScanTol { tol, reason } => {
                write!(f, "Invalid scan tolerance {tol}: {reason}")
            }
            ProfileError::InvalidLossTol { tol, reason } => {
                write!(f, "Invalid loss tolerance {tol}: {reason}")
            }
            ProfileError::InvalidMaxIter { max_iter } => {
                write!(f, "Maximum loss evaluations must be greater than zero, got {max_iter}.")
            }
            ProfileError::InvalidMethodOption { name, value, reason } => {
                write!(f, "Invalid method option {name} = {value}: {reason}")
            }

            // ---- Grid ----
            ProfileError::InvalidGridInterval { lower, upper } => {
                write!(f, "Invalid grid interval ({lower}, {upper}).")
            }

            // ---- Optimization layer ----
            ProfileError::Optimization(err) => write!(f, "{err}"),
        }
    }
}

impl From<OptError> for ProfileError {
    fn from(err: OptError) -> ProfileError {
        ProfileError::Optimization(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Optimization-layer errors convert into the wrapper variant and keep
    // their message.
    //
    // Given
    // -----
    // - `OptError::LossEvaluation { text: "boom" }`.
    //
    // Expect
    // ------
    // - `ProfileError::Optimization(..)` whose Display mentions "boom".
    fn from_opt_error_wraps_and_keeps_message() {
        // Act
        let err: ProfileError = OptError::LossEvaluation { text: "boom".to_string() }.into();

        // Assert
        assert!(matches!(err, ProfileError::Optimization(OptError::LossEvaluation { .. })));
        assert!(err.to_string().contains("boom"));
    }
}
