//! local_optimizer::builders — solver construction helpers.
//!
//! Purpose
//! -------
//! Hide Argmin's generic wiring behind small builders that apply crate-level
//! options ([`LocalOptions`]) and return a ready-to-run solver.
//!
//! Key behaviors
//! -------------
//! - [`build_simplex`] constructs the default Nelder–Mead solver from a
//!   bounds-aware initial simplex ([`initial_simplex`]) and wires
//!   `ftol_abs` as the simplex standard-deviation tolerance.
//! - [`build_lbfgs_more_thuente`] / [`build_lbfgs_hager_zhang`] construct
//!   L-BFGS with the requested line search; [`configure_lbfgs`] applies the
//!   gradient and cost tolerances.
//! - The simplex stops on the spread of its vertex costs only; restarts from
//!   the best vertex are driven by `api::minimize`.
//!
//! Conventions
//! -----------
//! - Builders never set `max_iters` or the starting parameter on the
//!   executor state; that is the runner's job.
//! - Invalid tolerances rejected by Argmin surface as [`OptError`] through
//!   the crate's `From<argmin::core::Error>` conversion.
//!
//! [`OptError`]: crate::optimization::errors::OptError
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    local_optimizer::{
        traits::LocalOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HAGER_ZHANG_MAX_STEP, HagerZhangLS, LbfgsHagerZhang,
            LbfgsMoreThuente, MoreThuenteLS, Simplex, Theta,
        },
    },
};

/// Initial Nelder–Mead simplex around `theta0`.
///
/// Vertex `0` is `theta0`; vertex `i + 1` moves coordinate `i` by
/// `step · |θ₀ᵢ|` (or by `step` when `θ₀ᵢ == 0`). The move goes towards the
/// upper bound unless that would leave the box, in which case it goes down
/// and is clamped at the lower bound.
pub fn initial_simplex(theta0: &Theta, bounds: &[(f64, f64)], step: f64) -> Vec<Theta> {
    let mut vertices = Vec::with_capacity(theta0.len() + 1);
    vertices.push(theta0.clone());
    for (i, (&x, &(lower, upper))) in theta0.iter().zip(bounds).enumerate() {
        let h = if x == 0.0 { step } else { step * x.abs() };
        let mut vertex = theta0.clone();
        vertex[i] = if x + h <= upper { x + h } else { (x - h).max(lower) };
        vertices.push(vertex);
    }
    vertices
}

/// Construct the Nelder–Mead solver for a run starting at `theta0`.
///
/// # Errors
/// Propagates Argmin's rejection of the standard-deviation tolerance.
pub fn build_simplex(
    theta0: &Theta, bounds: &[(f64, f64)], opts: &LocalOptions,
) -> OptResult<Simplex> {
    let vertices = initial_simplex(theta0, bounds, opts.initial_step);
    let mut solver = Simplex::new(vertices);
    if let Some(tol) = opts.tols.ftol_abs {
        solver = solver.with_sd_tolerance(tol)?;
    }
    Ok(solver)
}

/// Construct L-BFGS with Hager–Zhang line search.
///
/// The line search brackets steps in `[ε, HAGER_ZHANG_MAX_STEP]` instead of
/// Argmin's `[ε, 1e5]`, whose first trial step lands far outside any box.
pub fn build_lbfgs_hager_zhang(opts: &LocalOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new().with_bounds(f64::EPSILON, HAGER_ZHANG_MAX_STEP)?;
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Construct L-BFGS with More–Thuente line search.
pub fn build_lbfgs_more_thuente(opts: &LocalOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Apply `tol_grad` and `ftol_abs` (as the cost-change tolerance) to an
/// L-BFGS solver, whatever its line search.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &LocalOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.ftol_abs {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::local_optimizer::traits::{LocalAlgorithm, Tolerances};
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Geometry of the bounds-aware initial simplex.
    // - Construction of every solver variant from valid options.
    //
    // They intentionally DO NOT cover:
    // - Executor behavior, which is tested in the runner / api layer.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The simplex has `n + 1` vertices and each extra vertex moves a single
    // coordinate.
    //
    // Given
    // -----
    // - theta0 = [0, 2], unbounded, step 0.1.
    //
    // Expect
    // ------
    // - Vertices [0, 2], [0.1, 2], [0, 2.2].
    fn initial_simplex_moves_one_coordinate_per_vertex() {
        // Arrange
        let theta0 = array![0.0, 2.0];
        let bounds = [(f64::NEG_INFINITY, f64::INFINITY); 2];

        // Act
        let vertices = initial_simplex(&theta0, &bounds, 0.1);

        // Assert
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[0], theta0);
        assert_eq!(vertices[1], array![0.1, 2.0]);
        assert!((vertices[2][1] - 2.2).abs() < 1e-12);
        assert_eq!(vertices[2][0], 0.0);
    }

    #[test]
    // Purpose
    // -------
    // A vertex that would cross the upper bound moves down instead.
    //
    // Given
    // -----
    // - theta0 = [1] with bounds (0, 1) and step 0.5.
    //
    // Expect
    // ------
    // - The extra vertex is [0.5], inside the box.
    fn initial_simplex_stays_inside_bounds() {
        // Arrange
        let theta0 = array![1.0];
        let bounds = [(0.0, 1.0)];

        // Act
        let vertices = initial_simplex(&theta0, &bounds, 0.5);

        // Assert
        assert_eq!(vertices[1], array![0.5]);
    }

    #[test]
    // Purpose
    // -------
    // Every solver variant builds from default-valid options.
    //
    // Given
    // -----
    // - Tolerances with ftol_abs, tol_grad and max_iter set.
    //
    // Expect
    // ------
    // - All three builders return `Ok`.
    fn builders_succeed_with_valid_options() {
        // Arrange
        let tols = Tolerances::new(Some(1e-8), Some(1e-6), Some(100), None).unwrap();
        let opts = LocalOptions::new(LocalAlgorithm::NelderMead, tols, 0.1, Some(5), false).unwrap();

        // Act / Assert
        assert!(build_simplex(&array![1.0, 1.0], &[(-5.0, 5.0); 2], &opts).is_ok());
        assert!(build_lbfgs_hager_zhang(&opts).is_ok());
        assert!(build_lbfgs_more_thuente(&opts).is_ok());
    }
}
