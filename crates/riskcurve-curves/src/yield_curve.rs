//! Stateful wrapper around a fitted curve.

use crate::error::{CurveError, CurveResult};
use crate::fitting::{forward_rates, predict, CurveFitResult, FitConfig};
use crate::model::CurveModelKind;

/// A curve model that remembers its last successful fit.
///
/// Prefer [`CurveModelKind::fit`] when the fitted result can be passed
/// around directly. This type exists for callers that want a single object
/// which fails fast when evaluated before it has been fitted.
#[derive(Debug, Clone)]
pub struct YieldCurveModel {
    kind: CurveModelKind,
    config: FitConfig,
    fitted: Option<CurveFitResult>,
}

impl YieldCurveModel {
    /// Creates an unfitted model.
    #[must_use]
    pub fn new(kind: CurveModelKind) -> Self {
        Self {
            kind,
            config: FitConfig::default(),
            fitted: None,
        }
    }

    /// Unfitted Nelson-Siegel model.
    #[must_use]
    pub fn nelson_siegel() -> Self {
        Self::new(CurveModelKind::NelsonSiegel)
    }

    /// Unfitted Svensson model.
    #[must_use]
    pub fn svensson() -> Self {
        Self::new(CurveModelKind::Svensson)
    }

    /// Replaces the fitting configuration.
    #[must_use]
    pub fn with_config(mut self, config: FitConfig) -> Self {
        self.config = config;
        self
    }

    /// Model family.
    #[must_use]
    pub fn kind(&self) -> CurveModelKind {
        self.kind
    }

    /// Fits the model, replacing any previous fit.
    ///
    /// A failed fit leaves the model unfitted.
    pub fn fit(&mut self, maturities: &[f64], yields: &[f64]) -> CurveResult<&CurveFitResult> {
        self.fitted = None;
        let result = self.kind.fit(maturities, yields, &self.config)?;
        Ok(self.fitted.insert(result))
    }

    /// Whether a fit has succeeded.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// The last successful fit.
    #[must_use]
    pub fn result(&self) -> Option<&CurveFitResult> {
        self.fitted.as_ref()
    }

    /// Fitted yields at the given maturities.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::NotFitted`] before a successful fit.
    pub fn predict(&self, maturities: &[f64]) -> CurveResult<Vec<f64>> {
        predict(self.require_fit("predict")?, maturities)
    }

    /// Instantaneous forward rates at the given maturities.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::NotFitted`] before a successful fit.
    pub fn forward_rates(&self, maturities: &[f64]) -> CurveResult<Vec<f64>> {
        forward_rates(self.require_fit("forward_rates")?, maturities)
    }

    fn require_fit(&self, operation: &str) -> CurveResult<&CurveFitResult> {
        self.fitted
            .as_ref()
            .ok_or_else(|| CurveError::not_fitted(operation))
    }
}
