//! Value-at-Risk settings.

use riskcurve_risk::var::{
    VaRDistribution, ValueAtRiskEngine, DEFAULT_NUM_SIMULATIONS, DEFAULT_SEED,
    STANDARD_CONFIDENCE_LEVELS,
};
use serde::{Deserialize, Serialize};

use crate::error::{Validate, ValidationError};

/// Settings for the VaR engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarConfig {
    /// Distribution assumed by parametric VaR.
    #[serde(default)]
    pub distribution: VaRDistribution,

    /// Monte Carlo draws per estimate.
    #[serde(default = "default_num_simulations")]
    pub num_simulations: usize,

    /// Monte Carlo seed.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Levels reported by a VaR profile.
    #[serde(default = "default_confidence_levels")]
    pub confidence_levels: Vec<f64>,
}

fn default_num_simulations() -> usize {
    DEFAULT_NUM_SIMULATIONS
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_confidence_levels() -> Vec<f64> {
    STANDARD_CONFIDENCE_LEVELS.to_vec()
}

impl Default for VarConfig {
    fn default() -> Self {
        Self {
            distribution: VaRDistribution::default(),
            num_simulations: default_num_simulations(),
            seed: default_seed(),
            confidence_levels: default_confidence_levels(),
        }
    }
}

impl VarConfig {
    /// Builder method to set the parametric distribution.
    #[must_use]
    pub fn with_distribution(mut self, distribution: VaRDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// Builder method to set the Monte Carlo seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Engine carrying these settings.
    pub fn engine(&self) -> ValueAtRiskEngine {
        ValueAtRiskEngine::new()
            .with_distribution(self.distribution)
            .with_num_simulations(self.num_simulations)
            .with_seed(self.seed)
    }
}

impl Validate for VarConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.num_simulations < 100 || self.num_simulations > 10_000_000 {
            errors.push(ValidationError::with_rule(
                "num_simulations",
                "Monte Carlo simulations must be between 100 and 10,000,000",
                "valid_mc_paths",
            ));
        }

        if self.confidence_levels.is_empty() {
            errors.push(ValidationError::with_rule(
                "confidence_levels",
                "At least one confidence level is required",
                "non_empty_levels",
            ));
        }
        for (i, cl) in self.confidence_levels.iter().enumerate() {
            if !(*cl > 0.0 && *cl < 1.0) {
                errors.push(ValidationError::with_rule(
                    format!("confidence_levels[{i}]"),
                    format!("Confidence level {cl} must be in (0, 1)"),
                    "valid_confidence",
                ));
            }
        }

        errors
    }
}
