//! Top-level configuration for the analytics engine.

use riskcurve_curves::FitConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigResult, Validate, ValidationError};
use crate::pca::PcaConfig;
use crate::risk::RiskConfig;
use crate::var::VarConfig;

/// All settings used by the analytics engine.
///
/// Every section, and every field within a section, falls back to its
/// default when missing from the JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Yield curve fitting.
    #[serde(default)]
    pub curve_fit: FitConfig,

    /// Bond risk analysis.
    #[serde(default)]
    pub risk: RiskConfig,

    /// Value-at-Risk.
    #[serde(default)]
    pub var: VarConfig,

    /// Curve factor decomposition.
    #[serde(default)]
    pub pca: PcaConfig,
}

impl AnalyticsConfig {
    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builder method to replace the fitting section.
    #[must_use]
    pub fn with_curve_fit(mut self, curve_fit: FitConfig) -> Self {
        self.curve_fit = curve_fit;
        self
    }

    /// Builder method to replace the risk section.
    #[must_use]
    pub fn with_risk(mut self, risk: RiskConfig) -> Self {
        self.risk = risk;
        self
    }

    /// Builder method to replace the VaR section.
    #[must_use]
    pub fn with_var(mut self, var: VarConfig) -> Self {
        self.var = var;
        self
    }

    /// Builder method to replace the PCA section.
    #[must_use]
    pub fn with_pca(mut self, pca: PcaConfig) -> Self {
        self.pca = pca;
        self
    }
}

impl Validate for AnalyticsConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let sections = [
            ("curve_fit", self.curve_fit.validate()),
            ("risk", self.risk.validate()),
            ("var", self.var.validate()),
            ("pca", self.pca.validate()),
        ];

        sections
            .into_iter()
            .flat_map(|(name, errors)| errors.into_iter().map(move |e| e.nested(name)))
            .collect()
    }
}
