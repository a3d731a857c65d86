//! Unified error surface for the optimization layer.
//!
//! [`OptError`] covers option validation, objective failures, scale-domain
//! violations, the two internal stop signals used to interrupt a running
//! solver (`MaxEvalReached`, `ForcedStop`) and wrappers for backend `argmin`
//! errors. [`OptResult<T>`] is the matching result alias.
use argmin::core::{ArgminError, Error};

use crate::optimization::scaling::Scale;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch { expected: usize, found: usize },

    /// Gradient elements need to be finite
    InvalidGradient { index: usize, value: f64, reason: &'static str },

    // ---- LocalOptions ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad { tol: f64, reason: &'static str },
    /// Absolute objective tolerance needs to be positive and finite.
    InvalidFtolAbs { tol: f64, reason: &'static str },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter { max_iter: usize, reason: &'static str },
    /// Maximum objective evaluations needs to be positive.
    InvalidMaxEval { max_eval: usize, reason: &'static str },
    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// Invalid local algorithm name.
    InvalidLocalAlgorithm { name: String, reason: &'static str },

    /// lbfgs_mem needs to be at least 1.
    InvalidLBFGSMem { mem: usize, reason: &'static str },

    /// Initial simplex step needs to be positive and finite.
    InvalidInitialStep { step: f64, reason: &'static str },

    // ---- Objective ----
    /// Objective returned a non-finite value.
    NonFiniteCost { value: f64 },

    /// User loss function reported a failure.
    LossEvaluation { text: String },

    /// Starting point has the wrong length.
    ThetaDimMismatch { expected: usize, found: usize },

    /// Bounds have the wrong length.
    BoundsDimMismatch { expected: usize, found: usize },

    /// Lower bound exceeds upper bound or a bound is NaN.
    InvalidBounds { index: usize, lower: f64, upper: f64 },

    // ---- Scaling ----
    /// Value lies outside the open domain of a scale transform.
    OutOfScaleDomain { value: f64, scale: Scale },

    /// Unknown scale name.
    InvalidScale { name: String, reason: &'static str },

    // ---- Stop signals ----
    /// Objective evaluation budget exhausted.
    MaxEvalReached { max_eval: usize },

    /// Objective requested an early stop.
    ForcedStop { reason: &'static str },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },

    /// Theta hat is missing
    MissingThetaHat,

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter { text: String },
    /// Wrapper for argmin::NotImplemented
    NotImplemented { text: String },
    /// Wrapper for argmin::NotInitialized
    NotInitialized { text: String },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated { text: String },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound { text: String },
    /// Wrapper for argmin::PotentialBug
    PotentialBug { text: String },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError { text: String },
    /// Wrapper for other argmin::Error types
    BackendError { text: String },

    // ---- Fallback ----
    UnknownError,
}

impl OptError {
    /// `true` for the signals a running solver is interrupted with.
    pub fn is_stop_signal(&self) -> bool {
        matches!(self, OptError::MaxEvalReached { .. } | OptError::ForcedStop { .. })
    }
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- LocalOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidFtolAbs { tol, reason } => {
                write!(f, "Invalid absolute objective tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::InvalidMaxEval { max_eval, reason } => {
                write!(f, "Invalid maximum evaluations {max_eval}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            OptError::InvalidLocalAlgorithm { name, reason } => {
                write!(f, "Invalid local algorithm '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }
            OptError::InvalidInitialStep { step, reason } => {
                write!(f, "Invalid initial simplex step {step}: {reason}")
            }

            // ---- Objective ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }
            OptError::LossEvaluation { text } => {
                write!(f, "Loss function failed: {text}")
            }
            OptError::ThetaDimMismatch { expected, found } => {
                write!(f, "Parameter dimension mismatch: expected {expected}, found {found}")
            }
            OptError::BoundsDimMismatch { expected, found } => {
                write!(f, "Bounds dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidBounds { index, lower, upper } => {
                write!(f, "Invalid bounds at index {index}: ({lower}, {upper})")
            }

            // ---- Scaling ----
            OptError::OutOfScaleDomain { value, scale } => {
                write!(f, "Value {value} is outside the domain of the {scale} scale")
            }
            OptError::InvalidScale { name, reason } => {
                write!(f, "Invalid scale '{name}': {reason}")
            }

            // ---- Stop signals ----
            OptError::MaxEvalReached { max_eval } => {
                write!(f, "Maximum number of objective evaluations reached ({max_eval})")
            }
            OptError::ForcedStop { reason } => {
                write!(f, "Optimization stopped by the objective: {reason}")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        // Errors raised by our own objectives travel through argmin untouched.
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(opt_err) => match opt_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // An `OptError` raised inside an objective and boxed into an argmin
    // `Error` must convert back to the same variant.
    //
    // Given
    // -----
    // - `OptError::MaxEvalReached { max_eval: 5 }` wrapped into `Error`.
    //
    // Expect
    // ------
    // - `OptError::from` returns the original variant.
    fn from_argmin_error_recovers_wrapped_opt_error() {
        // Arrange
        let wrapped: Error = OptError::MaxEvalReached { max_eval: 5 }.into();

        // Act
        let recovered = OptError::from(wrapped);

        // Assert
        assert_eq!(recovered, OptError::MaxEvalReached { max_eval: 5 });
        assert!(recovered.is_stop_signal());
    }

    #[test]
    // Purpose
    // -------
    // Native argmin errors map onto their wrapper variants.
    //
    // Given
    // -----
    // - `ArgminError::InvalidParameter` wrapped into `Error`.
    //
    // Expect
    // ------
    // - `OptError::InvalidParameter` with the same text.
    fn from_argmin_error_maps_native_variants() {
        // Arrange
        let wrapped: Error = ArgminError::InvalidParameter { text: "bad".to_string() }.into();

        // Act
        let recovered = OptError::from(wrapped);

        // Assert
        assert_eq!(recovered, OptError::InvalidParameter { text: "bad".to_string() });
        assert!(!recovered.is_stop_signal());
    }
}
