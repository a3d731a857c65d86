//! Interval options — builder, resolved configuration and method selection.
//!
//! Purpose
//! -------
//! Collect every knob of an endpoint search in one place and resolve the
//! defaults that depend on other inputs (scale-dependent bounds, scan bounds
//! clipped to the parameter bounds) *before* any solver runs. Solvers only
//! ever see the immutable [`IntervalConfig`] and never branch on whether a
//! value was set by the caller.
//!
//! Key behaviors
//! -------------
//! - [`IntervalOptions`] is a by-value builder with documented defaults.
//! - [`IntervalOptions::resolve`] validates the builder against a starting
//!   point and produces an [`IntervalConfig`].
//! - [`Method`] is a closed set of search methods, each carrying its own
//!   option record ([`CicoOptions`], [`ExtrapolOptions`]).
//! - [`ProfileOptions`] configures the stand-alone profile evaluator.
//!
//! Invariants & assumptions
//! ------------------------
//! - A resolved config satisfies `lower ≤ θ₀ ≤ upper` component-wise,
//!   `scan_lower < θ₀[theta_num] < scan_upper`, and the scan bounds lie within
//!   the bounds of the scanned parameter.
//! - Every bound is representable in the scaled space (see
//!   `scaling::scale_bound`).
//!
//! Conventions
//! -----------
//! - Bounds and scan bounds are given in the *declared* scale.
//! - `max_iter` counts loss evaluations per endpoint search.
//!
//! Testing notes
//! -------------
//! - Unit tests cover default resolution per scale, explicit scan bounds,
//!   and each configuration error.
use crate::{
    optimization::{
        local_optimizer::{LocalAlgorithm, Theta},
        scaling::{Scale, unscale},
    },
    profiler::{
        core::{
            types::Direction,
            validation::{
                default_theta_bounds, validate_loss_crit, validate_loss_tol, validate_max_iter,
                validate_positive, validate_scales, validate_scan_bounds, validate_scan_tol,
                validate_theta_bounds,
            },
        },
        errors::{ProfileError, ProfileResult},
    },
};

/// Half-width of the default scan window in the scaled space.
pub const DEFAULT_SCAN_HALF_WIDTH: f64 = 9.0;

pub const DEFAULT_SCAN_TOL: f64 = 1e-3;
pub const DEFAULT_LOSS_TOL: f64 = 1e-3;
pub const DEFAULT_MAX_ITER: usize = 100_000;

/// Builder for endpoint-search options.
///
/// Defaults:
/// - `loss_crit`: `0.0`
/// - `scale`: `Direct` for every parameter
/// - `theta_bounds`: the whole domain of each scale (`(-∞, ∞)`, `(0, ∞)`,
///   `(0, 1)`)
/// - `scan_bounds`: `(unscale(-9), unscale(9))` in the scanned parameter's
///   scale, clipped to its bounds
/// - `scan_tol`: `1e-3`, `loss_tol`: `1e-3`
/// - `local_alg`: `NelderMead`
/// - `max_iter`: `100_000` loss evaluations
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalOptions {
    loss_crit: f64,
    scale: Option<Vec<Scale>>,
    theta_bounds: Option<Vec<(f64, f64)>>,
    scan_bounds: Option<(f64, f64)>,
    scan_tol: f64,
    loss_tol: f64,
    local_alg: LocalAlgorithm,
    max_iter: usize,
}

impl Default for IntervalOptions {
    fn default() -> Self {
        Self {
            loss_crit: 0.0,
            scale: None,
            theta_bounds: None,
            scan_bounds: None,
            scan_tol: DEFAULT_SCAN_TOL,
            loss_tol: DEFAULT_LOSS_TOL,
            local_alg: LocalAlgorithm::NelderMead,
            max_iter: DEFAULT_MAX_ITER,
        }
    }
}

impl IntervalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loss_crit(mut self, loss_crit: f64) -> Self {
        self.loss_crit = loss_crit;
        self
    }

    pub fn scale(mut self, scale: Vec<Scale>) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn theta_bounds(mut self, theta_bounds: Vec<(f64, f64)>) -> Self {
        self.theta_bounds = Some(theta_bounds);
        self
    }

    /// Scan bounds `(lower, upper)` of the scanned parameter.
    pub fn scan_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.scan_bounds = Some((lower, upper));
        self
    }

    pub fn scan_tol(mut self, scan_tol: f64) -> Self {
        self.scan_tol = scan_tol;
        self
    }

    pub fn loss_tol(mut self, loss_tol: f64) -> Self {
        self.loss_tol = loss_tol;
        self
    }

    pub fn local_alg(mut self, local_alg: LocalAlgorithm) -> Self {
        self.local_alg = local_alg;
        self
    }

    /// Budget of loss evaluations per endpoint search.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Resolve defaults and validate against a starting point.
    ///
    /// # Errors
    /// - `EmptyTheta`, `ThetaNumOutOfRange`, `ScaleDimMismatch`,
    ///   `BoundsDimMismatch` for shape problems.
    /// - `InvalidThetaBounds`, `InitialOutsideBounds` for bounds problems,
    ///   including bounds or initial values outside a scale's domain.
    /// - `InvalidScanBounds`, `ScanBoundsOutsideThetaBounds` for scan bounds.
    /// - `InvalidLossCrit`, `InvalidScanTol`, `InvalidLossTol`,
    ///   `InvalidMaxIter` for scalar options.
    pub fn resolve(&self, theta_init: &Theta, theta_num: usize) -> ProfileResult<IntervalConfig> {
        let n = theta_init.len();
        if n == 0 {
            return Err(ProfileError::EmptyTheta);
        }
        if theta_num >= n {
            return Err(ProfileError::ThetaNumOutOfRange { theta_num, len: n });
        }
        validate_loss_crit(self.loss_crit)?;
        validate_scan_tol(self.scan_tol)?;
        validate_loss_tol(self.loss_tol)?;
        validate_max_iter(self.max_iter)?;

        let scale = self.scale.clone().unwrap_or_else(|| vec![Scale::Direct; n]);
        validate_scales(&scale, n)?;
        let theta_bounds = match &self.theta_bounds {
            Some(bounds) => bounds.clone(),
            None => default_theta_bounds(&scale),
        };
        validate_theta_bounds(theta_init, &theta_bounds, &scale)?;

        let kind = scale[theta_num];
        let (theta_lower, theta_upper) = theta_bounds[theta_num];
        let scan_bounds = match self.scan_bounds {
            Some(bounds) => bounds,
            None => (
                unscale(-DEFAULT_SCAN_HALF_WIDTH, kind).max(theta_lower),
                unscale(DEFAULT_SCAN_HALF_WIDTH, kind).min(theta_upper),
            ),
        };
        validate_scan_bounds(scan_bounds, theta_init[theta_num], theta_bounds[theta_num], kind)?;

        Ok(IntervalConfig {
            theta_init: theta_init.clone(),
            theta_num,
            loss_crit: self.loss_crit,
            scale,
            theta_bounds,
            scan_bounds,
            scan_tol: self.scan_tol,
            loss_tol: self.loss_tol,
            local_alg: self.local_alg,
            max_iter: self.max_iter,
        })
    }
}

/// Fully resolved, immutable configuration of an endpoint search.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalConfig {
    pub theta_init: Theta,
    pub theta_num: usize,
    pub loss_crit: f64,
    pub scale: Vec<Scale>,
    pub theta_bounds: Vec<(f64, f64)>,
    pub scan_bounds: (f64, f64),
    pub scan_tol: f64,
    pub loss_tol: f64,
    pub local_alg: LocalAlgorithm,
    pub max_iter: usize,
}

impl IntervalConfig {
    /// Declared scan bound on the side of `direction`.
    pub fn scan_bound(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Left => self.scan_bounds.0,
            Direction::Right => self.scan_bounds.1,
        }
    }
}

/// Options of the one-pass augmented-Lagrangian search.
///
/// - `max_outer`: cap on outer (multiplier update) iterations.
/// - `penalty_init`, `penalty_growth`, `penalty_max`: penalty parameter `ρ`
///   schedule; `ρ` grows when the constraint violation does not shrink by
///   at least a factor four.
/// - `feasibility_tol`: `|Λ - loss_crit|` accepted at convergence.
/// - `ftol_abs`: objective tolerance of each inner local run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CicoOptions {
    pub max_outer: usize,
    pub penalty_init: f64,
    pub penalty_growth: f64,
    pub penalty_max: f64,
    pub feasibility_tol: f64,
    pub ftol_abs: f64,
}

impl Default for CicoOptions {
    fn default() -> Self {
        Self {
            max_outer: 50,
            penalty_init: 10.0,
            penalty_growth: 10.0,
            penalty_max: 1e8,
            feasibility_tol: 1e-3,
            ftol_abs: 1e-9,
        }
    }
}

impl CicoOptions {
    /// # Errors
    /// `InvalidMethodOption` naming the first field out of range.
    pub fn validate(&self) -> ProfileResult<()> {
        if self.max_outer == 0 {
            return Err(ProfileError::InvalidMethodOption {
                name: "max_outer",
                value: 0.0,
                reason: "Must be greater than zero.",
            });
        }
        validate_positive("penalty_init", self.penalty_init)?;
        validate_positive("penalty_max", self.penalty_max)?;
        validate_positive("feasibility_tol", self.feasibility_tol)?;
        validate_positive("ftol_abs", self.ftol_abs)?;
        if !(self.penalty_growth > 1.0 && self.penalty_growth.is_finite()) {
            return Err(ProfileError::InvalidMethodOption {
                name: "penalty_growth",
                value: self.penalty_growth,
                reason: "Must be finite and greater than one.",
            });
        }
        Ok(())
    }
}

/// Options of the extrapolation searches.
///
/// - `scan_hini`: first step from the initial value (scaled units).
/// - `scan_hmax`: largest step allowed (scaled units).
/// - `ftol_abs`: objective tolerance of each profile re-optimization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrapolOptions {
    pub scan_hini: f64,
    pub scan_hmax: f64,
    pub ftol_abs: f64,
}

impl Default for ExtrapolOptions {
    fn default() -> Self {
        Self { scan_hini: 1.0, scan_hmax: f64::INFINITY, ftol_abs: 1e-8 }
    }
}

impl ExtrapolOptions {
    /// # Errors
    /// `InvalidMethodOption` naming the first field out of range.
    pub fn validate(&self) -> ProfileResult<()> {
        validate_positive("scan_hini", self.scan_hini)?;
        validate_positive("ftol_abs", self.ftol_abs)?;
        if self.scan_hmax.is_nan() || self.scan_hmax < self.scan_hini {
            return Err(ProfileError::InvalidMethodOption {
                name: "scan_hmax",
                value: self.scan_hmax,
                reason: "Must not be smaller than scan_hini.",
            });
        }
        Ok(())
    }
}

/// Endpoint search method.
///
/// - `CicoOnePass`: one constrained optimization per endpoint.
/// - `LinExtrapol`: marching profile evaluations with linear prediction of
///   the crossing.
/// - `QuadrExtrapol`: the same with quadratic prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Method {
    CicoOnePass(CicoOptions),
    LinExtrapol(ExtrapolOptions),
    QuadrExtrapol(ExtrapolOptions),
}

impl Default for Method {
    fn default() -> Self {
        Method::CicoOnePass(CicoOptions::default())
    }
}

impl Method {
    pub fn cico() -> Self {
        Method::CicoOnePass(CicoOptions::default())
    }

    pub fn lin_extrapol() -> Self {
        Method::LinExtrapol(ExtrapolOptions::default())
    }

    pub fn quadr_extrapol() -> Self {
        Method::QuadrExtrapol(ExtrapolOptions::default())
    }

    pub fn validate(&self) -> ProfileResult<()> {
        match self {
            Method::CicoOnePass(opts) => opts.validate(),
            Method::LinExtrapol(opts) | Method::QuadrExtrapol(opts) => opts.validate(),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::CicoOnePass(_) => write!(f, "CICO_ONE_PASS"),
            Method::LinExtrapol(_) => write!(f, "LIN_EXTRAPOL"),
            Method::QuadrExtrapol(_) => write!(f, "QUADR_EXTRAPOL"),
        }
    }
}

/// Options of the stand-alone profile evaluator.
///
/// Defaults: `skip_optim = false`, all scales `Direct`, bounds spanning each
/// scale's domain, `local_alg = NelderMead`, `ftol_abs = 1e-3`,
/// `maxeval = 100_000`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileOptions {
    pub skip_optim: bool,
    pub scale: Option<Vec<Scale>>,
    pub theta_bounds: Option<Vec<(f64, f64)>>,
    pub local_alg: LocalAlgorithm,
    pub ftol_abs: f64,
    pub maxeval: usize,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            skip_optim: false,
            scale: None,
            theta_bounds: None,
            local_alg: LocalAlgorithm::NelderMead,
            ftol_abs: 1e-3,
            maxeval: DEFAULT_MAX_ITER,
        }
    }
}
