//! The loss-function interface profiled by this crate.
//!
//! Any `Fn(&Theta) -> f64` is a [`LossFunction`]. Losses that can fail
//! either implement the trait directly or wrap a
//! `Fn(&Theta) -> OptResult<f64>` closure in [`FallibleLoss`].
use crate::optimization::{errors::OptResult, local_optimizer::Theta};

/// Scalar loss `Λ(θ)` evaluated on parameters in their declared scale.
///
/// Lower is better; a confidence interval is the region where
/// `Λ(θ) ≤ loss_crit`. An error aborts the endpoint search it occurs in with
/// `EndPointStatus::LossErrorStop`.
pub trait LossFunction {
    fn loss(&self, theta: &Theta) -> OptResult<f64>;
}

impl<F> LossFunction for F
where
    F: Fn(&Theta) -> f64,
{
    fn loss(&self, theta: &Theta) -> OptResult<f64> {
        Ok(self(theta))
    }
}

/// Adapter turning a fallible closure into a [`LossFunction`].
#[derive(Debug, Clone, Copy)]
pub struct FallibleLoss<F>(pub F);

impl<F> LossFunction for FallibleLoss<F>
where
    F: Fn(&Theta) -> OptResult<f64>,
{
    fn loss(&self, theta: &Theta) -> OptResult<f64> {
        (self.0)(theta)
    }
}
