//! Bond risk settings.

use riskcurve_curves::YieldCurvePoint;
use riskcurve_risk::bond::DEFAULT_FREQUENCY;
use riskcurve_risk::duration::{
    DistanceWeightedKeyRates, DEFAULT_BASE_SENSITIVITY, STANDARD_KEY_RATE_TENORS,
};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigResult, Validate, ValidationError};

/// One `(maturity, yield)` node of the reference curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveNode {
    /// Maturity in years.
    pub maturity: f64,
    /// Yield as a decimal.
    pub yield_rate: f64,
}

impl CurveNode {
    /// Creates a node.
    pub fn new(maturity: f64, yield_rate: f64) -> Self {
        Self {
            maturity,
            yield_rate,
        }
    }
}

/// Settings for single-bond risk analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Coupon payments per year.
    #[serde(default = "default_frequency")]
    pub frequency: u32,

    /// Key rate tenors in years.
    #[serde(default = "default_key_rate_tenors")]
    pub key_rate_tenors: Vec<f64>,

    /// Sensitivity at the tenor nearest maturity for the key rate proxy.
    #[serde(default = "default_base_sensitivity")]
    pub key_rate_base_sensitivity: f64,

    /// Curve handed to the key rate model when the caller supplies none.
    #[serde(default = "default_reference_curve")]
    pub reference_curve: Vec<CurveNode>,
}

fn default_frequency() -> u32 {
    DEFAULT_FREQUENCY
}

fn default_key_rate_tenors() -> Vec<f64> {
    STANDARD_KEY_RATE_TENORS.to_vec()
}

fn default_base_sensitivity() -> f64 {
    DEFAULT_BASE_SENSITIVITY
}

fn default_reference_curve() -> Vec<CurveNode> {
    vec![
        CurveNode::new(0.25, 0.01),
        CurveNode::new(2.0, 0.02),
        CurveNode::new(10.0, 0.04),
    ]
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            frequency: default_frequency(),
            key_rate_tenors: default_key_rate_tenors(),
            key_rate_base_sensitivity: default_base_sensitivity(),
            reference_curve: default_reference_curve(),
        }
    }
}

impl RiskConfig {
    /// Builder method to set the coupon frequency.
    #[must_use]
    pub fn with_frequency(mut self, frequency: u32) -> Self {
        self.frequency = frequency;
        self
    }

    /// Builder method to set the key rate tenors.
    #[must_use]
    pub fn with_key_rate_tenors(mut self, tenors: Vec<f64>) -> Self {
        self.key_rate_tenors = tenors;
        self
    }

    /// Key rate proxy over the configured tenors.
    pub fn key_rate_model(&self) -> ConfigResult<DistanceWeightedKeyRates> {
        Ok(DistanceWeightedKeyRates::new(
            self.key_rate_tenors.clone(),
            self.key_rate_base_sensitivity,
        )?)
    }

    /// The reference curve as timestamped points.
    pub fn reference_curve_points(&self) -> ConfigResult<Vec<YieldCurvePoint>> {
        let points: Vec<YieldCurvePoint> = self
            .reference_curve
            .iter()
            .map(|node| YieldCurvePoint::new(node.maturity, node.yield_rate))
            .collect::<Result<_, _>>()?;
        Ok(points)
    }
}

impl Validate for RiskConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !matches!(self.frequency, 1 | 2 | 4 | 12) {
            errors.push(ValidationError::with_rule(
                "frequency",
                format!("Frequency {} is not one of 1, 2, 4, 12", self.frequency),
                "standard_frequency",
            ));
        }

        if self.key_rate_tenors.is_empty() {
            errors.push(ValidationError::with_rule(
                "key_rate_tenors",
                "At least one key rate tenor is required",
                "non_empty_tenors",
            ));
        } else if self
            .key_rate_tenors
            .iter()
            .any(|t| !t.is_finite() || *t <= 0.0)
        {
            errors.push(ValidationError::with_rule(
                "key_rate_tenors",
                "Key rate tenors must be positive",
                "positive_tenors",
            ));
        }

        if !self.key_rate_base_sensitivity.is_finite() || self.key_rate_base_sensitivity < 0.0 {
            errors.push(ValidationError::new(
                "key_rate_base_sensitivity",
                "Base sensitivity must be a non-negative number",
            ));
        }

        for (i, node) in self.reference_curve.iter().enumerate() {
            if !node.maturity.is_finite() || node.maturity <= 0.0 || !node.yield_rate.is_finite() {
                errors.push(ValidationError::new(
                    format!("reference_curve[{i}]"),
                    format!(
                        "Node ({}, {}) needs a positive maturity and a finite yield",
                        node.maturity, node.yield_rate
                    ),
                ));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RiskConfig::default();
        assert_eq!(config.frequency, 2);
        assert_eq!(config.key_rate_tenors.len(), 10);
        assert_eq!(config.reference_curve.len(), 3);
        assert!(config.is_valid());
    }

    #[test]
    fn test_reference_curve_points() {
        let points = RiskConfig::default().reference_curve_points().unwrap();
        assert_eq!(points[2].maturity(), 10.0);
        assert_eq!(points[2].yield_rate(), 0.04);
    }

    #[test]
    fn test_key_rate_model_uses_tenors() {
        let model = RiskConfig::default()
            .with_key_rate_tenors(vec![2.0, 5.0])
            .key_rate_model()
            .unwrap();
        assert_eq!(model.tenors(), &[2.0, 5.0]);
    }

    #[test]
    fn test_validation() {
        let config = RiskConfig::default()
            .with_frequency(3)
            .with_key_rate_tenors(vec![]);
        let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["frequency", "key_rate_tenors"]);
    }

    #[test]
    fn test_bad_reference_node() {
        let mut config = RiskConfig::default();
        config.reference_curve.push(CurveNode::new(0.0, 0.03));
        let errors = config.validate();
        assert_eq!(errors[0].field, "reference_curve[3]");
        assert!(config.reference_curve_points().is_err());
    }
}
