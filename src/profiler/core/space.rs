//! Search space shared by every endpoint method.
//!
//! A [`ScanSpace`] maps parameters between their declared scale and the
//! *search space*: every component is scaled into ℝ, and for a left search
//! the scanned component is additionally negated. A left endpoint is then
//! found as the right endpoint of the reflected problem, so each method only
//! ever searches towards `+∞` along the scanned axis.
//!
//! The space also owns the loss-evaluation counter and the optional budget.
//! Once the budget is spent every further evaluation fails with
//! `OptError::MaxEvalReached`, which the local optimizer turns into a status.
use std::cell::Cell;

use crate::{
    optimization::{
        errors::{OptError, OptResult},
        local_optimizer::Theta,
        scaling::{Scale, scale, scale_bounds, scale_vector, unscale, unscale_vector},
    },
    profiler::core::{loss::LossFunction, types::Direction},
};

pub struct ScanSpace<'a, L: LossFunction + ?Sized> {
    loss: &'a L,
    theta_num: usize,
    sign: f64,
    scales: Vec<Scale>,
    declared_bounds: Vec<(f64, f64)>,
    bounds: Vec<(f64, f64)>,
    budget: Option<usize>,
    counter: Cell<usize>,
}

impl<'a, L: LossFunction + ?Sized> ScanSpace<'a, L> {
    /// Build the search space of one endpoint search.
    ///
    /// # Errors
    /// Scale-domain errors from transforming the bounds.
    pub fn new(
        loss: &'a L, theta_num: usize, direction: Direction, scales: &[Scale],
        declared_bounds: &[(f64, f64)], budget: Option<usize>,
    ) -> OptResult<Self> {
        let sign = direction.sign();
        let mut bounds = scale_bounds(declared_bounds, scales)?;
        if sign < 0.0 {
            let (lower, upper) = bounds[theta_num];
            bounds[theta_num] = (-upper, -lower);
        }
        Ok(Self {
            loss,
            theta_num,
            sign,
            scales: scales.to_vec(),
            declared_bounds: declared_bounds.to_vec(),
            bounds,
            budget,
            counter: Cell::new(0),
        })
    }

    pub fn theta_num(&self) -> usize {
        self.theta_num
    }

    pub fn dim(&self) -> usize {
        self.scales.len()
    }

    /// Box bounds in the search space.
    pub fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    /// Search coordinate of a declared value of the scanned parameter.
    ///
    /// # Errors
    /// `OptError::OutOfScaleDomain` outside the scale's open domain.
    pub fn axis_to_search(&self, x: f64) -> OptResult<f64> {
        Ok(self.sign * scale(x, self.scales[self.theta_num])?)
    }

    /// Declared value of the scanned parameter at search coordinate `t`,
    /// clamped into its declared bounds.
    pub fn axis_to_declared(&self, t: f64) -> f64 {
        let (lower, upper) = self.declared_bounds[self.theta_num];
        unscale(self.sign * t, self.scales[self.theta_num]).clamp(lower, upper)
    }

    /// Map a declared parameter vector into the search space.
    ///
    /// # Errors
    /// `OptError::OutOfScaleDomain` for a component outside its open domain.
    pub fn to_search(&self, theta: &Theta) -> OptResult<Theta> {
        let mut y = scale_vector(theta, &self.scales)?;
        y[self.theta_num] *= self.sign;
        Ok(y)
    }

    /// Map a search-space vector back to the declared scale.
    ///
    /// Components are clamped into their declared bounds so that round-off
    /// in `unscale` can never produce an out-of-bounds parameter.
    pub fn to_declared(&self, y: &Theta) -> Theta {
        let mut reflected = y.clone();
        reflected[self.theta_num] *= self.sign;
        let mut theta = unscale_vector(&reflected, &self.scales);
        theta.iter_mut().zip(&self.declared_bounds).for_each(|(x, &(lower, upper))| {
            *x = x.clamp(lower, upper);
        });
        theta
    }

    /// Loss at a search-space point, counted against the budget.
    ///
    /// # Errors
    /// - `OptError::MaxEvalReached` once the budget is spent.
    /// - `OptError::NonFiniteCost` for a NaN loss.
    /// - Any error of the loss function.
    pub fn loss(&self, y: &Theta) -> OptResult<f64> {
        if let Some(max_eval) = self.budget {
            if self.counter.get() >= max_eval {
                return Err(OptError::MaxEvalReached { max_eval });
            }
        }
        self.counter.set(self.counter.get() + 1);
        let value = self.loss.loss(&self.to_declared(y))?;
        if value.is_nan() {
            return Err(OptError::NonFiniteCost { value });
        }
        Ok(value)
    }

    /// Loss evaluations made through this space.
    pub fn count(&self) -> usize {
        self.counter.get()
    }

    /// `true` once the evaluation budget is spent.
    pub fn exhausted(&self) -> bool {
        self.budget.is_some_and(|max_eval| self.counter.get() >= max_eval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn sum(theta: &Theta) -> f64 {
        theta.sum()
    }

    #[test]
    // Purpose
    // -------
    // A left search reflects the scanned axis and its bounds.
    //
    // Given
    // -----
    // - theta = [2, 0.5], scales [Log, Logit], scanning index 0 to the left
    //   with bounds (1, 10) and (0, 1).
    //
    // Expect
    // ------
    // - Search coordinate of theta[0] is -ln 2, bounds become (-ln 10, 0)
    //   and (-∞, ∞); the round trip restores theta.
    fn left_space_reflects_scanned_axis() {
        // Arrange
        let bounds = [(1.0, 10.0), (0.0, 1.0)];
        let space = ScanSpace::new(
            &sum,
            0,
            Direction::Left,
            &[Scale::Log, Scale::Logit],
            &bounds,
            None,
        )
        .unwrap();
        let theta = array![2.0, 0.5];

        // Act
        let y = space.to_search(&theta).unwrap();
        let back = space.to_declared(&y);

        // Assert
        assert_relative_eq!(y[0], -(2.0f64.ln()));
        assert_relative_eq!(y[1], 0.0);
        assert_relative_eq!(space.bounds()[0].0, -(10.0f64.ln()));
        assert_relative_eq!(space.bounds()[0].1, 0.0);
        assert_eq!(space.bounds()[1], (f64::NEG_INFINITY, f64::INFINITY));
        assert_relative_eq!(back[0], 2.0, max_relative = 1e-12);
        assert_relative_eq!(back[1], 0.5, max_relative = 1e-12);
        assert_relative_eq!(space.axis_to_declared(y[0]), 2.0, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // The evaluation budget is enforced and counted.
    //
    // Given
    // -----
    // - A budget of 2 and three loss calls.
    //
    // Expect
    // ------
    // - Third call fails with `MaxEvalReached`; `exhausted()` is true.
    fn loss_enforces_budget() {
        // Arrange
        let space =
            ScanSpace::new(&sum, 0, Direction::Right, &[Scale::Direct], &[(-5.0, 5.0)], Some(2))
                .unwrap();
        let y = array![1.0];

        // Act
        let first = space.loss(&y);
        let second = space.loss(&y);
        let third = space.loss(&y);

        // Assert
        assert_eq!(first, Ok(1.0));
        assert_eq!(second, Ok(1.0));
        assert_eq!(third, Err(OptError::MaxEvalReached { max_eval: 2 }));
        assert!(space.exhausted());
        assert_eq!(space.count(), 2);
    }

    #[test]
    // Purpose
    // -------
    // Declared values never leave their bounds, even after round-off.
    //
    // Given
    // -----
    // - Log scale with bounds (0.5, 2) and a search point beyond ln 2.
    //
    // Expect
    // ------
    // - `to_declared` clamps the component to 2.
    fn to_declared_clamps_into_bounds() {
        let space =
            ScanSpace::new(&sum, 0, Direction::Right, &[Scale::Log], &[(0.5, 2.0)], None).unwrap();
        let theta = space.to_declared(&array![2.0f64.ln() + 1e-9]);
        assert_eq!(theta[0], 2.0);
    }
}
