//! Result types of a profile-likelihood search.
//!
//! - [`ProfilePoint`]: one evaluation of the profile at a scanned value.
//! - [`EndPoint`]: the outcome of searching one side of the interval.
//! - [`EndPointStatus`]: why an endpoint search ended.
//! - [`Direction`]: which side is searched.
use crate::optimization::local_optimizer::{LocalStatus, Theta};

/// Side of the confidence interval being searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// `-1` for `Left`, `+1` for `Right`.
    ///
    /// Multiplying a scaled coordinate by the sign turns a left search into
    /// a right search of the reflected problem.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// Why an endpoint search ended.
///
/// - `BorderFoundByScanTol`: the crossing was located to within `scan_tol`.
/// - `BorderFoundByLossTol`: a point with `|Λ - loss_crit| ≤ loss_tol` was
///   found.
/// - `ScanBoundReached`: no crossing inside the scan bounds (the parameter
///   is practically non-identifiable on this side).
/// - `MaxIterStop`: the loss-evaluation budget ran out; inconclusive.
/// - `LossErrorStop`: the loss function failed; inconclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndPointStatus {
    BorderFoundByScanTol,
    BorderFoundByLossTol,
    ScanBoundReached,
    MaxIterStop,
    LossErrorStop,
}

impl EndPointStatus {
    /// `true` when a finite confidence boundary was located.
    pub fn is_border_found(self) -> bool {
        matches!(self, EndPointStatus::BorderFoundByScanTol | EndPointStatus::BorderFoundByLossTol)
    }

    /// `true` for the statuses that carry no endpoint value.
    pub fn is_inconclusive(self) -> bool {
        matches!(self, EndPointStatus::MaxIterStop | EndPointStatus::LossErrorStop)
    }
}

impl std::fmt::Display for EndPointStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EndPointStatus::BorderFoundByScanTol => "BORDER_FOUND_BY_SCAN_TOL",
            EndPointStatus::BorderFoundByLossTol => "BORDER_FOUND_BY_LOSS_TOL",
            EndPointStatus::ScanBoundReached => "SCAN_BOUND_REACHED",
            EndPointStatus::MaxIterStop => "MAX_ITER_STOP",
            EndPointStatus::LossErrorStop => "LOSS_ERROR_STOP",
        };
        write!(f, "{name}")
    }
}

/// One evaluation of the profile.
///
/// - `value`: scanned parameter value (declared scale).
/// - `loss`: loss at `params`.
/// - `params`: full parameter vector (declared scale); `params[theta_num]`
///   equals `value`.
/// - `ret`: how the re-optimization of the other parameters ended.
/// - `counter`: loss evaluations spent on this point.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePoint {
    pub value: f64,
    pub loss: f64,
    pub params: Theta,
    pub ret: LocalStatus,
    pub counter: usize,
}

/// Outcome of one endpoint search.
///
/// `value` is `Some` for `BorderFoundByScanTol` / `BorderFoundByLossTol`
/// (the boundary) and for `ScanBoundReached` (the configured scan bound
/// itself, *not* a confidence boundary), and `None` for the inconclusive
/// statuses. Always check `status` before reading `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct EndPoint {
    pub value: Option<f64>,
    pub profile_points: Vec<ProfilePoint>,
    pub status: EndPointStatus,
    pub direction: Direction,
    pub counter: usize,
}

impl EndPoint {
    /// Sort `profile_points` along the search direction (increasing
    /// distance from the initial value).
    pub fn sort_profile_points(&mut self) {
        let direction = self.direction;
        self.profile_points.sort_by(|a, b| {
            let ord = a.value.total_cmp(&b.value);
            match direction {
                Direction::Right => ord,
                Direction::Left => ord.reverse(),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn point(value: f64) -> ProfilePoint {
        ProfilePoint {
            value,
            loss: 0.0,
            params: array![value],
            ret: LocalStatus::NotOptimized,
            counter: 1,
        }
    }

    #[test]
    // Purpose
    // -------
    // Profile points are ordered away from the initial value.
    //
    // Given
    // -----
    // - Points at 2, 0, 1 on a left and on a right endpoint.
    //
    // Expect
    // ------
    // - Left: 2, 1, 0. Right: 0, 1, 2.
    fn sort_profile_points_follows_direction() {
        // Arrange
        let mut left = EndPoint {
            value: Some(0.0),
            profile_points: vec![point(2.0), point(0.0), point(1.0)],
            status: EndPointStatus::BorderFoundByLossTol,
            direction: Direction::Left,
            counter: 3,
        };
        let mut right = left.clone();
        right.direction = Direction::Right;

        // Act
        left.sort_profile_points();
        right.sort_profile_points();

        // Assert
        let values = |e: &EndPoint| e.profile_points.iter().map(|p| p.value).collect::<Vec<_>>();
        assert_eq!(values(&left), vec![2.0, 1.0, 0.0]);
        assert_eq!(values(&right), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    // Purpose
    // -------
    // Status helpers split conclusive from inconclusive outcomes.
    //
    // Given
    // -----
    // - Every status variant.
    //
    // Expect
    // ------
    // - Only the two border statuses are "found"; only the two stop
    //   statuses are inconclusive.
    fn status_helpers_classify_variants() {
        assert!(EndPointStatus::BorderFoundByScanTol.is_border_found());
        assert!(EndPointStatus::BorderFoundByLossTol.is_border_found());
        assert!(!EndPointStatus::ScanBoundReached.is_border_found());
        assert!(!EndPointStatus::ScanBoundReached.is_inconclusive());
        assert!(EndPointStatus::MaxIterStop.is_inconclusive());
        assert!(EndPointStatus::LossErrorStop.is_inconclusive());
        assert_eq!(Direction::Left.sign(), -1.0);
    }
}
