//! The analytics facade.
//!
//! [`AnalyticsEngine`] owns a validated [`AnalyticsConfig`] and routes each
//! request to the curve, risk and factor components. It is the only layer
//! that logs: successful computations at `debug`, attached warnings and
//! recoverable failures at `warn`.

use riskcurve_config::{AnalyticsConfig, Validate};
use riskcurve_curves::{CurveFitResult, CurveModelKind, YieldCurvePoint};
use riskcurve_risk::bond::BondTerms;
use riskcurve_risk::calculator::{BondMetrics, BondRiskCalculator};
use riskcurve_risk::factors::{decompose_curve_changes, PcaResult};
use riskcurve_risk::var::{VaRMethod, VaRResult, ValueAtRiskEngine};
use tracing::{debug, warn};

use crate::batch::{BatchReport, BondPosition, CurveObservation};
use crate::error::{AnalyticsError, AnalyticsResult};

/// Entry point for all analytics.
#[derive(Debug)]
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
    calculator: BondRiskCalculator,
    reference_curve: Vec<YieldCurvePoint>,
    var_engine: ValueAtRiskEngine,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        let config = AnalyticsConfig::default();
        let reference_curve = config.risk.reference_curve_points().unwrap_or_default();
        let var_engine = config.var.engine();
        Self {
            config,
            calculator: BondRiskCalculator::new(),
            reference_curve,
            var_engine,
        }
    }
}

impl AnalyticsEngine {
    /// Creates an engine from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Config`] if the configuration fails
    /// validation.
    pub fn new(config: AnalyticsConfig) -> AnalyticsResult<Self> {
        config.validate_or_error()?;
        let calculator = BondRiskCalculator::with_key_rate_model(config.risk.key_rate_model()?);
        let reference_curve = config.risk.reference_curve_points()?;
        let var_engine = config.var.engine();
        debug!(
            "analytics engine ready: frequency={}, key rate tenors={}, var seed={}",
            config.risk.frequency,
            config.risk.key_rate_tenors.len(),
            config.var.seed
        );
        Ok(Self {
            config,
            calculator,
            reference_curve,
            var_engine,
        })
    }

    /// Creates an engine from a JSON configuration document.
    pub fn from_json(json: &str) -> AnalyticsResult<Self> {
        Self::new(AnalyticsConfig::from_json(json)?)
    }

    /// The configuration in use.
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    // =========================================================================
    // BOND RISK
    // =========================================================================

    /// Duration, convexity, DV01 and key rate durations for one bond, at the
    /// configured coupon frequency and against the configured reference curve.
    pub fn comprehensive_bond_analysis(
        &self,
        cusip: &str,
        price: f64,
        yield_rate: f64,
        coupon_rate: f64,
        maturity_years: f64,
    ) -> AnalyticsResult<BondMetrics> {
        self.analyze_bond(&BondPosition::new(
            cusip,
            price,
            yield_rate,
            coupon_rate,
            maturity_years,
        ))
    }

    /// Risk metrics for one position.
    pub fn analyze_bond(&self, position: &BondPosition) -> AnalyticsResult<BondMetrics> {
        let terms = BondTerms::new(
            position.price,
            position.yield_rate,
            position.coupon_rate,
            position.maturity_years,
        )
        .with_frequency(position.frequency.unwrap_or(self.config.risk.frequency));

        let metrics = self
            .calculator
            .analyze(position.cusip.as_str(), &terms, &self.reference_curve)
            .map_err(|e| log_failure("bond analysis", &position.cusip, e.into()))?;

        for warning in &metrics.warnings {
            warn!("{}: {}", position.cusip, warning);
        }
        debug!(
            "{}: modified duration {}, convexity {}, DV01 {}",
            metrics.cusip, metrics.modified_duration, metrics.convexity, metrics.dv01
        );
        Ok(metrics)
    }

    /// Risk metrics for many positions. Failures are reported per position.
    pub fn analyze_bonds(&self, positions: &[BondPosition]) -> BatchReport<BondMetrics> {
        let mut report = BatchReport::default();
        for position in positions {
            report.record(position.cusip.as_str(), self.analyze_bond(position));
        }
        log_batch("bond analysis", &report);
        report
    }

    // =========================================================================
    // CURVE FITTING
    // =========================================================================

    /// Fits a yield curve model with the configured fitting settings.
    pub fn fit_yield_curve(
        &self,
        maturities: &[f64],
        yields: &[f64],
        model: CurveModelKind,
    ) -> AnalyticsResult<CurveFitResult> {
        let fit = model
            .fit(maturities, yields, &self.config.curve_fit)
            .map_err(|e| log_failure("curve fit", model.name(), e.into()))?;

        debug!(
            "{} fit on {} points: rmse={:.2e}, r2={:.4}, iterations={}",
            model, fit.observations, fit.rmse, fit.r_squared, fit.iterations
        );
        Ok(fit)
    }

    /// Fits a model given by name, `"nelson_siegel"` or `"svensson"`.
    pub fn fit_yield_curve_by_name(
        &self,
        maturities: &[f64],
        yields: &[f64],
        model: &str,
    ) -> AnalyticsResult<CurveFitResult> {
        self.fit_yield_curve(maturities, yields, model.parse()?)
    }

    /// Fits many observed curves. Failures are reported per observation.
    pub fn fit_yield_curves(
        &self,
        observations: &[CurveObservation],
    ) -> BatchReport<CurveFitResult> {
        let mut report = BatchReport::default();
        for obs in observations {
            report.record(
                obs.id.as_str(),
                self.fit_yield_curve(&obs.maturities, &obs.yields, obs.model),
            );
        }
        log_batch("curve fitting", &report);
        report
    }

    // =========================================================================
    // VALUE AT RISK
    // =========================================================================

    /// VaR and expected shortfall of a return series.
    pub fn calculate_portfolio_var(
        &self,
        returns: &[f64],
        method: VaRMethod,
        confidence_level: f64,
    ) -> AnalyticsResult<VaRResult> {
        let result = self
            .var_engine
            .calculate(returns, method, confidence_level)
            .map_err(|e| log_failure("VaR", method.name(), e.into()))?;

        for warning in &result.warnings {
            warn!("{method} VaR: {warning}");
        }
        debug!("{result}");
        Ok(result)
    }

    /// VaR by method name: `"historical"`, `"parametric"` or `"monte_carlo"`.
    pub fn calculate_portfolio_var_by_name(
        &self,
        returns: &[f64],
        method: &str,
        confidence_level: f64,
    ) -> AnalyticsResult<VaRResult> {
        self.calculate_portfolio_var(returns, method.parse()?, confidence_level)
    }

    /// VaR at each configured confidence level.
    pub fn var_profile(&self, returns: &[f64], method: VaRMethod) -> AnalyticsResult<Vec<VaRResult>> {
        let results = self
            .var_engine
            .profile(returns, method, &self.config.var.confidence_levels)
            .map_err(|e| log_failure("VaR profile", method.name(), e.into()))?;

        if let Some(first) = results.first() {
            for warning in &first.warnings {
                warn!("{method} VaR profile: {warning}");
            }
        }
        debug!("{method} VaR profile at {} levels", results.len());
        Ok(results)
    }

    // =========================================================================
    // CURVE FACTORS
    // =========================================================================

    /// Principal components of yield curve changes, capped at the configured
    /// number of components.
    pub fn decompose_curve_moves(
        &self,
        yield_changes: &[Vec<f64>],
        feature_names: &[String],
    ) -> AnalyticsResult<PcaResult> {
        let mut result = decompose_curve_changes(yield_changes, feature_names)
            .map_err(|e| log_failure("curve decomposition", "pca", e.into()))?;

        if let Some(max) = self.config.pca.max_components {
            result = result.truncated(max);
        }

        debug!(
            "curve decomposition: {} components, first explains {:.1}%",
            result.n_components,
            result.variance_explained_by(1) * 100.0
        );
        Ok(result)
    }
}

fn log_failure(operation: &str, subject: &str, err: AnalyticsError) -> AnalyticsError {
    if err.is_recoverable() {
        warn!("{operation} failed for {subject}: {err}");
    } else {
        debug!("{operation} rejected for {subject}: {err}");
    }
    err
}

fn log_batch<T>(operation: &str, report: &BatchReport<T>) {
    if report.is_complete() {
        debug!("{operation}: {} items succeeded", report.total());
    } else {
        warn!(
            "{operation}: {} of {} items failed",
            report.failed.len(),
            report.total()
        );
    }
}
