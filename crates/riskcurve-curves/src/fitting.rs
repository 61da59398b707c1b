//! Least-squares calibration of parametric curve models.
//!
//! Fitting is a pure function of the observations and a [`FitConfig`]:
//! [`CurveModelKind::fit`] returns an immutable [`CurveFitResult`] that owns
//! the fitted parameters and diagnostics. Evaluation takes that result
//! explicitly, see [`predict`] and [`forward_rates`].
//!
//! # Example
//!
//! ```rust
//! use riskcurve_curves::prelude::*;
//!
//! let maturities = [0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0];
//! let yields = [0.015, 0.018, 0.022, 0.025, 0.028, 0.030, 0.032];
//!
//! let fit = CurveModelKind::NelsonSiegel
//!     .fit(&maturities, &yields, &FitConfig::default())
//!     .unwrap();
//!
//! assert!(fit.r_squared > 0.95);
//! let seven_year = predict(&fit, &[7.0]).unwrap()[0];
//! assert!(seven_year > 0.025 && seven_year < 0.031);
//! ```

use riskcurve_math::optimization::{levenberg_marquardt, Bounds, LeastSquaresConfig};
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};
use crate::model::{yield_from_slice, CurveModelKind, CurveParameters};
use crate::point::YieldCurvePoint;

/// Configuration for curve fitting.
///
/// Parameter bounds are `(lower, upper)` pairs. The level bound applies to
/// `β₀`, the factor bound to `β₁`, `β₂` and `β₃`, the decay bound to both
/// decay factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Starting decay factor for the first hump.
    pub initial_lambda: f64,
    /// Starting decay factor for the Svensson second hump.
    pub initial_lambda2: f64,
    /// Bounds on `β₀`.
    pub level_bounds: (f64, f64),
    /// Bounds on `β₁`, `β₂`, `β₃`.
    pub factor_bounds: (f64, f64),
    /// Bounds on the decay factors.
    pub decay_bounds: (f64, f64),
    /// Iteration budget for each optimizer run.
    pub max_iterations: u32,
    /// Relative reduction in the sum of squares that counts as converged.
    pub ftol: f64,
    /// Relative step size that counts as converged.
    pub xtol: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            initial_lambda: 2.0,
            initial_lambda2: 5.0,
            level_bounds: (-0.1, 0.2),
            factor_bounds: (-0.2, 0.2),
            decay_bounds: (0.1, 10.0),
            max_iterations: 2000,
            ftol: 1e-10,
            xtol: 1e-10,
        }
    }
}

impl FitConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the iteration budget.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the starting decay factor.
    #[must_use]
    pub fn with_initial_lambda(mut self, lambda: f64) -> Self {
        self.initial_lambda = lambda;
        self
    }

    /// Parameter box for a model, in model order.
    pub fn bounds(&self, kind: CurveModelKind) -> CurveResult<Bounds> {
        let (level, factor, decay) = (self.level_bounds, self.factor_bounds, self.decay_bounds);
        if decay.0 <= 0.0 {
            return Err(CurveError::invalid_input(format!(
                "decay factor lower bound must be positive, got {}",
                decay.0
            )));
        }

        let pairs: Vec<(f64, f64)> = match kind {
            CurveModelKind::NelsonSiegel => vec![level, factor, factor, decay],
            CurveModelKind::Svensson => vec![level, factor, factor, factor, decay, decay],
        };
        let (lower, upper): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        Ok(Bounds::new(lower, upper)?)
    }

    fn least_squares(&self) -> LeastSquaresConfig {
        LeastSquaresConfig::default()
            .with_max_iterations(self.max_iterations)
            .with_tolerances(self.ftol, self.xtol)
    }
}

/// Outcome of a successful curve fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveFitResult {
    /// Model family that was fitted.
    pub model_kind: CurveModelKind,
    /// Fitted parameters.
    pub parameters: CurveParameters,
    /// Root mean squared error of fitted vs observed yields.
    pub rmse: f64,
    /// Coefficient of determination of fitted vs observed yields.
    pub r_squared: f64,
    /// Optimizer iterations used (both stages for Svensson).
    pub iterations: u32,
    /// Number of observations fitted.
    pub observations: usize,
}

impl CurveFitResult {
    /// Long-term level `β₀`.
    #[must_use]
    pub fn beta0(&self) -> f64 {
        self.parameters.beta0()
    }

    /// Short-term component `β₁`.
    #[must_use]
    pub fn beta1(&self) -> f64 {
        self.parameters.beta1()
    }

    /// First hump `β₂`.
    #[must_use]
    pub fn beta2(&self) -> f64 {
        self.parameters.beta2()
    }

    /// Second hump `β₃`, `None` for Nelson-Siegel.
    #[must_use]
    pub fn beta3(&self) -> Option<f64> {
        self.parameters.beta3()
    }

    /// First decay factor.
    #[must_use]
    pub fn lambda1(&self) -> f64 {
        self.parameters.lambda1()
    }

    /// Second decay factor, `None` for Nelson-Siegel.
    #[must_use]
    pub fn lambda2(&self) -> Option<f64> {
        self.parameters.lambda2()
    }

    /// Fitted yields at the given maturities. See [`predict`].
    pub fn predict(&self, maturities: &[f64]) -> CurveResult<Vec<f64>> {
        predict(self, maturities)
    }

    /// Instantaneous forward rates. See [`forward_rates`].
    pub fn forward_rates(&self, maturities: &[f64]) -> CurveResult<Vec<f64>> {
        forward_rates(self, maturities)
    }

    /// Model curve sampled at the given (strictly positive) maturities.
    pub fn curve_points(&self, maturities: &[f64]) -> CurveResult<Vec<YieldCurvePoint>> {
        let yields = self.predict(maturities)?;
        YieldCurvePoint::from_pairs(maturities, &yields)
    }
}

impl CurveModelKind {
    /// Fits this model to observed yields.
    ///
    /// Nelson-Siegel starts from `β₀ = mean`, `β₁ = short − long`,
    /// `β₂ = max − min` and the configured decay factor. Svensson starts from
    /// the fitted Nelson-Siegel parameters with `β₃ = 0`. If the Svensson
    /// refinement does not converge, the result is that starting point, which
    /// reproduces the Nelson-Siegel curve.
    ///
    /// # Errors
    ///
    /// - validation errors for mismatched lengths, too few points, non-finite
    ///   values or negative maturities
    /// - [`CurveError::FitFailed`] if the observed yields have no variance or
    ///   the Nelson-Siegel stage does not converge within the budget
    pub fn fit(
        self,
        maturities: &[f64],
        yields: &[f64],
        config: &FitConfig,
    ) -> CurveResult<CurveFitResult> {
        validate_observations(self, maturities, yields)?;

        let mean = yields.iter().sum::<f64>() / yields.len() as f64;
        let total_ss: f64 = yields.iter().map(|y| (y - mean).powi(2)).sum();
        if total_ss <= 0.0 {
            return Err(CurveError::fit_failed(
                0,
                0.0,
                "observed yields have zero variance",
            ));
        }

        let ns = run_fit(
            CurveModelKind::NelsonSiegel,
            initial_guess(maturities, yields, config),
            maturities,
            yields,
            total_ss,
            config,
        )?;
        if self == CurveModelKind::NelsonSiegel {
            return Ok(ns);
        }

        let seed = vec![
            ns.beta0(),
            ns.beta1(),
            ns.beta2(),
            0.0,
            ns.lambda1(),
            config.initial_lambda2,
        ];
        match run_fit(self, seed.clone(), maturities, yields, total_ss, config) {
            Ok(mut sv) => {
                sv.iterations += ns.iterations;
                Ok(sv)
            }
            // The seed reproduces the converged Nelson-Siegel curve exactly.
            Err(CurveError::FitFailed { iterations, .. }) => summarize(
                self,
                &seed,
                ns.iterations + iterations,
                maturities,
                yields,
                total_ss,
            ),
            Err(e) => Err(e),
        }
    }
}

/// Fitted zero yields at the given maturities.
///
/// # Errors
///
/// Returns an error if any maturity is negative or not finite.
pub fn predict(result: &CurveFitResult, maturities: &[f64]) -> CurveResult<Vec<f64>> {
    validate_maturities(maturities)?;
    Ok(maturities
        .iter()
        .map(|&m| result.parameters.yield_at(m))
        .collect())
}

/// Instantaneous forward rates at the given maturities.
///
/// # Errors
///
/// Returns an error if any maturity is negative or not finite.
pub fn forward_rates(result: &CurveFitResult, maturities: &[f64]) -> CurveResult<Vec<f64>> {
    validate_maturities(maturities)?;
    Ok(maturities
        .iter()
        .map(|&m| result.parameters.forward_at(m))
        .collect())
}

fn run_fit(
    kind: CurveModelKind,
    initial: Vec<f64>,
    maturities: &[f64],
    yields: &[f64],
    total_ss: f64,
    config: &FitConfig,
) -> CurveResult<CurveFitResult> {
    let bounds = config.bounds(kind)?;
    let residuals = |p: &[f64]| -> Vec<f64> {
        maturities
            .iter()
            .zip(yields)
            .map(|(&m, &y)| yield_from_slice(kind, p, m) - y)
            .collect()
    };

    let outcome = levenberg_marquardt(residuals, &initial, &bounds, &config.least_squares())?;

    if !outcome.converged {
        return Err(CurveError::fit_failed(
            outcome.iterations,
            rmse_of(&outcome.residuals),
            format!("{kind} did not converge within the iteration budget"),
        ));
    }

    summarize(
        kind,
        &outcome.parameters,
        outcome.iterations,
        maturities,
        yields,
        total_ss,
    )
}

fn summarize(
    kind: CurveModelKind,
    params: &[f64],
    iterations: u32,
    maturities: &[f64],
    yields: &[f64],
    total_ss: f64,
) -> CurveResult<CurveFitResult> {
    let residuals: Vec<f64> = maturities
        .iter()
        .zip(yields)
        .map(|(&m, &y)| yield_from_slice(kind, params, m) - y)
        .collect();
    let residual_ss: f64 = residuals.iter().map(|r| r * r).sum();
    let rmse = rmse_of(&residuals);

    if !rmse.is_finite() {
        return Err(CurveError::fit_failed(
            iterations,
            rmse,
            "fitted yields are not finite",
        ));
    }

    let parameters = CurveParameters::from_slice(kind, params).map_err(|e| {
        CurveError::fit_failed(iterations, rmse, format!("invalid parameters: {e}"))
    })?;

    Ok(CurveFitResult {
        model_kind: kind,
        parameters,
        rmse,
        r_squared: 1.0 - residual_ss / total_ss,
        iterations,
        observations: yields.len(),
    })
}

fn rmse_of(residuals: &[f64]) -> f64 {
    (residuals.iter().map(|r| r * r).sum::<f64>() / residuals.len() as f64).sqrt()
}

fn initial_guess(maturities: &[f64], yields: &[f64], config: &FitConfig) -> Vec<f64> {
    let mean = yields.iter().sum::<f64>() / yields.len() as f64;
    let max = yields.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = yields.iter().copied().fold(f64::INFINITY, f64::min);

    let mut short = 0;
    let mut long = 0;
    for (i, &m) in maturities.iter().enumerate() {
        if m < maturities[short] {
            short = i;
        }
        if m > maturities[long] {
            long = i;
        }
    }

    vec![
        mean,
        yields[short] - yields[long],
        max - min,
        config.initial_lambda,
    ]
}

fn validate_observations(
    kind: CurveModelKind,
    maturities: &[f64],
    yields: &[f64],
) -> CurveResult<()> {
    if maturities.len() != yields.len() {
        return Err(CurveError::LengthMismatch {
            maturities: maturities.len(),
            yields: yields.len(),
        });
    }
    let required = kind.parameter_count();
    if yields.len() < required {
        return Err(CurveError::insufficient_points(required, yields.len()));
    }
    validate_maturities(maturities)?;
    if let Some(y) = yields.iter().find(|y| !y.is_finite()) {
        return Err(CurveError::invalid_input(format!(
            "yields must be finite, got {y}"
        )));
    }
    Ok(())
}

fn validate_maturities(maturities: &[f64]) -> CurveResult<()> {
    match maturities.iter().find(|m| !m.is_finite() || **m < 0.0) {
        Some(m) => Err(CurveError::invalid_input(format!(
            "maturities must be finite and non-negative, got {m}"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const MATURITIES: [f64; 10] = [0.25, 0.5, 1.0, 2.0, 3.0, 5.0, 7.0, 10.0, 20.0, 30.0];

    fn synthetic(params: &CurveParameters) -> Vec<f64> {
        MATURITIES.iter().map(|&m| params.yield_at(m)).collect()
    }

    #[test]
    fn test_nelson_siegel_recovers_parameters() {
        let truth = CurveParameters::nelson_siegel(0.05, -0.02, 0.01, 2.0).unwrap();
        let yields = synthetic(&truth);

        let fit = CurveModelKind::NelsonSiegel
            .fit(&MATURITIES, &yields, &FitConfig::default())
            .unwrap();

        assert!(fit.r_squared > 0.99);
        assert!(fit.rmse < 1e-5);
        assert_relative_eq!(fit.beta0(), 0.05, epsilon = 1e-3);
        assert_relative_eq!(fit.beta1(), -0.02, epsilon = 1e-3);
        assert_relative_eq!(fit.beta2(), 0.01, epsilon = 2e-3);
        assert_relative_eq!(fit.lambda1(), 2.0, epsilon = 0.2);
        assert_eq!(fit.observations, 10);
        assert_eq!(fit.beta3(), None);
    }

    #[test]
    fn test_svensson_fit() {
        let truth = CurveParameters::svensson(0.045, -0.015, 0.01, -0.01, 1.5, 6.0).unwrap();
        let yields = synthetic(&truth);

        let fit = CurveModelKind::Svensson
            .fit(&MATURITIES, &yields, &FitConfig::default())
            .unwrap();

        assert_eq!(fit.model_kind, CurveModelKind::Svensson);
        assert!(fit.r_squared > 0.99);
        assert!(fit.beta3().is_some());
        assert!(fit.lambda2().is_some());
    }

    #[test]
    fn test_round_trip_predict() {
        let truth = CurveParameters::nelson_siegel(0.04, -0.01, 0.02, 3.0).unwrap();
        let yields = synthetic(&truth);

        let fit = CurveModelKind::NelsonSiegel
            .fit(&MATURITIES, &yields, &FitConfig::default())
            .unwrap();
        let predicted = fit.predict(&MATURITIES).unwrap();

        for (p, y) in predicted.iter().zip(&yields) {
            assert_relative_eq!(*p, *y, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_fit_with_zero_maturity() {
        let maturities = [0.0, 1.0, 2.0, 5.0, 10.0];
        let yields = [0.01, 0.015, 0.02, 0.025, 0.03];

        let fit = CurveModelKind::NelsonSiegel
            .fit(&maturities, &yields, &FitConfig::default())
            .unwrap();

        assert!(fit.rmse.is_finite());
        assert!(predict(&fit, &[0.0]).unwrap()[0].is_finite());
    }

    #[test]
    fn test_validation_errors() {
        let config = FitConfig::default();

        assert!(matches!(
            CurveModelKind::NelsonSiegel.fit(&[1.0, 2.0], &[0.01], &config),
            Err(CurveError::LengthMismatch { .. })
        ));
        assert!(matches!(
            CurveModelKind::NelsonSiegel.fit(&[1.0, 2.0, 3.0], &[0.01, 0.02, 0.03], &config),
            Err(CurveError::InsufficientPoints { required: 4, got: 3 })
        ));
        assert!(matches!(
            CurveModelKind::Svensson.fit(&[1.0, 2.0, 3.0, 4.0], &[0.01, 0.02, 0.03, 0.04], &config),
            Err(CurveError::InsufficientPoints { required: 6, got: 4 })
        ));
        assert!(matches!(
            CurveModelKind::NelsonSiegel.fit(
                &[-1.0, 2.0, 3.0, 4.0],
                &[0.01, 0.02, 0.03, 0.04],
                &config
            ),
            Err(CurveError::InvalidInput { .. })
        ));
        assert!(matches!(
            CurveModelKind::NelsonSiegel.fit(
                &[1.0, 2.0, 3.0, 4.0],
                &[0.01, f64::NAN, 0.03, 0.04],
                &config
            ),
            Err(CurveError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_flat_yields_fail() {
        let err = CurveModelKind::NelsonSiegel
            .fit(&[1.0, 2.0, 3.0, 4.0], &[0.03; 4], &FitConfig::default())
            .unwrap_err();

        assert!(matches!(err, CurveError::FitFailed { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_iteration_budget_exhausted() {
        let yields = [0.01, 0.013, 0.02, 0.024, 0.026, 0.031, 0.033, 0.035, 0.036, 0.036];
        let config = FitConfig::default().with_max_iterations(1);

        let result = CurveModelKind::NelsonSiegel.fit(&MATURITIES, &yields, &config);

        assert!(matches!(result, Err(CurveError::FitFailed { .. })));
    }

    #[test]
    fn test_svensson_on_tight_budget_keeps_nelson_siegel_quality() {
        let yields = [0.01, 0.015, 0.02, 0.025, 0.03, 0.035, 0.04, 0.042, 0.045, 0.044];
        let ns = CurveModelKind::NelsonSiegel
            .fit(&MATURITIES, &yields, &FitConfig::default())
            .unwrap();

        // Enough for the Nelson-Siegel stage, possibly short for the refinement
        let config = FitConfig::default().with_max_iterations(ns.iterations + 1);
        let sv = CurveModelKind::Svensson.fit(&MATURITIES, &yields, &config).unwrap();

        assert_eq!(sv.model_kind, CurveModelKind::Svensson);
        assert!(sv.rmse <= ns.rmse + 1e-12);
        assert!(sv.iterations >= ns.iterations);
    }

    #[test]
    fn test_predict_rejects_negative_maturity() {
        let truth = CurveParameters::nelson_siegel(0.05, -0.02, 0.01, 2.0).unwrap();
        let fit = CurveModelKind::NelsonSiegel
            .fit(&MATURITIES, &synthetic(&truth), &FitConfig::default())
            .unwrap();

        assert!(predict(&fit, &[1.0, -0.5]).is_err());
        assert!(forward_rates(&fit, &[f64::NAN]).is_err());
    }

    #[test]
    fn test_bounds_layout() {
        let bounds = FitConfig::default().bounds(CurveModelKind::Svensson).unwrap();
        assert_eq!(bounds.len(), 6);
        assert_eq!(bounds.lower(0), -0.1);
        assert_eq!(bounds.upper(3), 0.2);
        assert_eq!(bounds.lower(5), 0.1);
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: FitConfig = serde_json::from_str(r#"{"initial_lambda": 1.5}"#).unwrap();
        assert_eq!(config.initial_lambda, 1.5);
        assert_eq!(config.decay_bounds, (0.1, 10.0));
    }
}
