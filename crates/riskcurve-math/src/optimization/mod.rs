//! Optimization algorithms.
//!
//! This module provides the bounded nonlinear least-squares solver used for
//! parametric curve fitting. The solver is a projected Levenberg-Marquardt
//! iteration: each damped Gauss-Newton step is clipped back into the box
//! defined by [`Bounds`].
//!
//! # Example
//!
//! ```rust
//! use riskcurve_math::optimization::{levenberg_marquardt, Bounds, LeastSquaresConfig};
//!
//! // Fit y = a * x + b to three points
//! let xs = [0.0, 1.0, 2.0];
//! let ys = [1.0, 3.0, 5.0];
//! let residuals = |p: &[f64]| -> Vec<f64> {
//!     xs.iter().zip(ys.iter()).map(|(x, y)| p[0] * x + p[1] - y).collect()
//! };
//!
//! let bounds = Bounds::unbounded(2);
//! let result =
//!     levenberg_marquardt(residuals, &[0.0, 0.0], &bounds, &LeastSquaresConfig::default())
//!         .unwrap();
//!
//! assert!(result.converged);
//! assert!((result.parameters[0] - 2.0).abs() < 1e-8);
//! assert!((result.parameters[1] - 1.0).abs() < 1e-8);
//! ```

use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};
use crate::linear_algebra::solve_linear_system;

/// Sum of squares below which a fit is treated as exact.
const EXACT_FIT_COST: f64 = 1e-30;

/// Floor applied to the Marquardt scaling diagonal so flat directions stay invertible.
const MIN_SCALING: f64 = 1e-12;

/// Configuration for the least-squares solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeastSquaresConfig {
    /// Maximum number of outer iterations (Jacobian evaluations).
    pub max_iterations: u32,
    /// Relative reduction of the sum of squares that counts as converged.
    pub ftol: f64,
    /// Relative step size that counts as converged.
    pub xtol: f64,
    /// Scaled gradient (cosine between the residuals and any free Jacobian
    /// column) that counts as a stationary point.
    pub gtol: f64,
    /// Number of iterations over which progress is measured; 0 disables the check.
    pub stall_window: u32,
    /// Relative cost reduction over a full window below which the run has stalled.
    pub stall_tol: f64,
    /// Initial damping parameter.
    pub initial_damping: f64,
    /// Damping adjustment factor.
    pub damping_factor: f64,
    /// Minimum damping value.
    pub min_damping: f64,
    /// Maximum damping value; exceeding it means no further progress is possible.
    pub max_damping: f64,
    /// Relative finite difference step for the Jacobian.
    pub jacobian_step: f64,
}

impl Default for LeastSquaresConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            ftol: 1e-10,
            xtol: 1e-10,
            gtol: 1e-10,
            stall_window: 50,
            stall_tol: 1e-6,
            initial_damping: 1e-3,
            damping_factor: 10.0,
            min_damping: 1e-12,
            max_damping: 1e12,
            jacobian_step: 1e-6,
        }
    }
}

impl LeastSquaresConfig {
    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the relative cost and step tolerances.
    #[must_use]
    pub fn with_tolerances(mut self, ftol: f64, xtol: f64) -> Self {
        self.ftol = ftol;
        self.xtol = xtol;
        self
    }
}

/// Box constraints on the parameter vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    /// Creates box constraints from lower and upper limits.
    ///
    /// # Errors
    ///
    /// Returns an error if the vectors differ in length or any lower limit
    /// exceeds its upper limit.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> MathResult<Self> {
        if lower.len() != upper.len() {
            return Err(MathError::invalid_input(format!(
                "bounds length mismatch: {} lower vs {} upper",
                lower.len(),
                upper.len()
            )));
        }
        let invalid = (0..lower.len())
            .find(|&i| lower[i].is_nan() || upper[i].is_nan() || lower[i] > upper[i]);
        if let Some(i) = invalid {
            return Err(MathError::invalid_input(format!(
                "invalid bound at index {i}: [{}, {}]",
                lower[i], upper[i]
            )));
        }
        Ok(Self { lower, upper })
    }

    /// Unconstrained bounds for `n` parameters.
    pub fn unbounded(n: usize) -> Self {
        Self {
            lower: vec![f64::NEG_INFINITY; n],
            upper: vec![f64::INFINITY; n],
        }
    }

    /// Number of constrained parameters.
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// Returns true if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Lower limit of parameter `i`.
    pub fn lower(&self, i: usize) -> f64 {
        self.lower[i]
    }

    /// Upper limit of parameter `i`.
    pub fn upper(&self, i: usize) -> f64 {
        self.upper[i]
    }

    /// Clips every parameter into its interval.
    pub fn project(&self, params: &mut [f64]) {
        for (i, p) in params.iter_mut().enumerate() {
            *p = p.clamp(self.lower[i], self.upper[i]);
        }
    }

    /// Returns true if every parameter lies inside its interval.
    pub fn contains(&self, params: &[f64]) -> bool {
        params.len() == self.len()
            && params
                .iter()
                .enumerate()
                .all(|(i, p)| *p >= self.lower[i] && *p <= self.upper[i])
    }
}

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Optimal parameters found.
    pub parameters: Vec<f64>,
    /// Final sum of squared residuals.
    pub objective_value: f64,
    /// Final residual vector.
    pub residuals: Vec<f64>,
    /// Number of iterations used.
    pub iterations: u32,
    /// Whether the optimization converged within the iteration budget.
    pub converged: bool,
}

/// Minimizes `Σ rᵢ(p)²` subject to box constraints.
///
/// `residuals` maps a parameter vector to the residual vector. The Jacobian
/// is computed by finite differences, switching to one-sided differences at
/// active bounds.
///
/// The run converges when the relative cost reduction of a step drops below
/// `ftol`, the step drops below `xtol`, the scaled gradient drops below
/// `gtol`, or the cost improves by less than `stall_tol` over `stall_window`
/// iterations. Parameters on an active bound are held fixed for the step.
///
/// Reaching the iteration budget is not an error: the returned result has
/// `converged == false` and the caller decides how to treat it.
///
/// # Errors
///
/// Returns an error if the initial point is empty, the bounds do not match
/// its dimension, or the residuals at the initial point are not finite.
pub fn levenberg_marquardt<F>(
    residuals: F,
    initial: &[f64],
    bounds: &Bounds,
    config: &LeastSquaresConfig,
) -> MathResult<OptimizationResult>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let n = initial.len();
    if n == 0 {
        return Err(MathError::insufficient_data(1, 0));
    }
    if bounds.len() != n {
        return Err(MathError::invalid_input(format!(
            "expected {n} bounds, got {}",
            bounds.len()
        )));
    }

    let mut params = initial.to_vec();
    bounds.project(&mut params);

    let mut r = residuals(&params);
    if r.is_empty() || r.iter().any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input(
            "residuals at the initial point are empty or not finite",
        ));
    }
    let mut cost = sum_of_squares(&r);
    let mut damping = config.initial_damping;
    let mut window_start_cost = cost;

    for iteration in 0..config.max_iterations {
        if cost < EXACT_FIT_COST {
            return finish(params, r, cost, iteration, true);
        }

        if config.stall_window > 0 && iteration > 0 && iteration % config.stall_window == 0 {
            if window_start_cost - cost <= config.stall_tol * window_start_cost {
                return finish(params, r, cost, iteration, true);
            }
            window_start_cost = cost;
        }

        let jacobian = numerical_jacobian(&residuals, &params, &r, bounds, config.jacobian_step);
        let jtj = jacobian.transpose() * &jacobian;
        let gradient = jacobian.transpose() * DVector::from_column_slice(&r);

        // Parameters sitting on a bound with the descent direction pointing out
        // of the box are held fixed for this iteration.
        let pinned: Vec<bool> = (0..n)
            .map(|j| pinned_at_bound(bounds, &params, j, gradient[j]))
            .collect();

        if scaled_gradient(&jacobian, &gradient, norm(r.iter().copied()), &pinned) <= config.gtol {
            return finish(params, r, cost, iteration, true);
        }

        loop {
            let mut system = jtj.clone();
            let mut descent = -gradient.clone();
            for i in 0..n {
                if pinned[i] {
                    for k in 0..n {
                        system[(i, k)] = 0.0;
                        system[(k, i)] = 0.0;
                    }
                    system[(i, i)] = 1.0;
                    descent[i] = 0.0;
                } else {
                    system[(i, i)] += damping * jtj[(i, i)].max(MIN_SCALING);
                }
            }

            let step = match solve_linear_system(&system, &descent) {
                Ok(step) => step,
                Err(_) => {
                    damping *= config.damping_factor;
                    if damping > config.max_damping {
                        return finish(params, r, cost, iteration + 1, true);
                    }
                    continue;
                }
            };

            let mut candidate: Vec<f64> =
                params.iter().zip(step.iter()).map(|(p, d)| p + d).collect();
            bounds.project(&mut candidate);

            let step_norm = norm(params.iter().zip(candidate.iter()).map(|(a, b)| b - a));
            let param_norm = norm(params.iter().copied());
            let small_step = step_norm <= config.xtol * (param_norm + config.xtol);

            let candidate_r = residuals(&candidate);
            let candidate_cost = sum_of_squares(&candidate_r);

            if candidate_cost.is_finite() && candidate_cost < cost {
                let reduction = cost - candidate_cost;
                let previous_cost = cost;
                params = candidate;
                r = candidate_r;
                cost = candidate_cost;
                damping = (damping / config.damping_factor).max(config.min_damping);

                if reduction <= config.ftol * previous_cost || small_step {
                    return finish(params, r, cost, iteration + 1, true);
                }
                break;
            }

            if small_step {
                return finish(params, r, cost, iteration + 1, true);
            }

            damping *= config.damping_factor;
            if damping > config.max_damping {
                // No damped step improves the fit: a (possibly constrained) minimum.
                return finish(params, r, cost, iteration + 1, true);
            }
        }
    }

    finish(params, r, cost, config.max_iterations, false)
}

fn pinned_at_bound(bounds: &Bounds, params: &[f64], j: usize, gradient: f64) -> bool {
    (params[j] <= bounds.lower(j) && gradient > 0.0)
        || (params[j] >= bounds.upper(j) && gradient < 0.0)
}

/// Largest cosine between the residual vector and a free Jacobian column.
fn scaled_gradient(
    jacobian: &DMatrix<f64>,
    gradient: &DVector<f64>,
    residual_norm: f64,
    pinned: &[bool],
) -> f64 {
    if residual_norm == 0.0 {
        return 0.0;
    }
    (0..gradient.len())
        .filter(|&j| !pinned[j])
        .map(|j| {
            let column_norm = jacobian.column(j).norm();
            if column_norm == 0.0 {
                0.0
            } else {
                gradient[j].abs() / (column_norm * residual_norm)
            }
        })
        .fold(0.0, f64::max)
}

fn finish(
    parameters: Vec<f64>,
    residuals: Vec<f64>,
    objective_value: f64,
    iterations: u32,
    converged: bool,
) -> MathResult<OptimizationResult> {
    Ok(OptimizationResult {
        parameters,
        objective_value,
        residuals,
        iterations,
        converged,
    })
}

fn numerical_jacobian<F>(
    residuals: &F,
    params: &[f64],
    base: &[f64],
    bounds: &Bounds,
    relative_step: f64,
) -> DMatrix<f64>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let m = base.len();
    let n = params.len();
    let mut jacobian = DMatrix::zeros(m, n);

    for j in 0..n {
        let h = relative_step * params[j].abs().max(1.0);
        let can_up = params[j] + h <= bounds.upper(j);
        let can_down = params[j] - h >= bounds.lower(j);

        let column: Vec<f64> = if can_up && can_down {
            let mut up = params.to_vec();
            let mut down = params.to_vec();
            up[j] += h;
            down[j] -= h;
            let r_up = residuals(&up);
            let r_down = residuals(&down);
            r_up.iter().zip(r_down.iter()).map(|(u, d)| (u - d) / (2.0 * h)).collect()
        } else if can_up {
            let mut up = params.to_vec();
            up[j] += h;
            residuals(&up).iter().zip(base.iter()).map(|(u, b)| (u - b) / h).collect()
        } else {
            let mut down = params.to_vec();
            down[j] -= h;
            residuals(&down).iter().zip(base.iter()).map(|(d, b)| (b - d) / h).collect()
        };

        for i in 0..m {
            let value = column.get(i).copied().unwrap_or(0.0);
            jacobian[(i, j)] = if value.is_finite() { value } else { 0.0 };
        }
    }

    jacobian
}

fn sum_of_squares(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum()
}

fn norm(values: impl Iterator<Item = f64>) -> f64 {
    values.map(|v| v * v).sum::<f64>().sqrt()
}
