//! Value at Risk (VaR) calculations.
//!
//! VaR is reported as a return quantile: at a 95% confidence level the VaR
//! is the 5th percentile of returns, so losses are negative numbers.
//! Expected shortfall is the average return beyond that quantile.
//!
//! - **Historical**: empirical quantile of the observed returns
//! - **Parametric**: normal or Student-t quantile from sample moments
//! - **Monte Carlo**: historical VaR of a seeded normal simulation

mod engine;
mod historical;
mod monte_carlo;
mod parametric;

pub use engine::*;
pub use historical::*;
pub use monte_carlo::*;
pub use parametric::*;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult, RiskWarning};

/// Confidence levels reported by a VaR profile.
pub const STANDARD_CONFIDENCE_LEVELS: [f64; 3] = [0.95, 0.99, 0.999];

/// Fewer observations than this attach [`RiskWarning::InsufficientData`].
pub const MIN_RECOMMENDED_OBSERVATIONS: usize = 30;

/// Value at Risk result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaRResult {
    /// The VaR as a return quantile (negative for a loss)
    pub var: f64,
    /// Mean return at or beyond the VaR quantile
    pub expected_shortfall: f64,
    /// Confidence level (e.g., 0.95 for 95%)
    pub confidence_level: f64,
    /// Method used for calculation
    pub method: VaRMethod,
    /// Fitted distribution, for parametric and Monte Carlo VaR
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub distribution_params: Option<DistributionParams>,
    /// Number of simulated returns, for Monte Carlo VaR
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub num_simulations: Option<usize>,
    /// Number of observed returns used
    pub observations: usize,
    /// Non-fatal conditions
    #[serde(default)]
    pub warnings: Vec<RiskWarning>,
}

impl fmt::Display for VaRResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VaR({:.1}%, {}): {:.6}, ES: {:.6}",
            self.confidence_level * 100.0,
            self.method,
            self.var,
            self.expected_shortfall
        )
    }
}

/// Moments and shape of the distribution behind a parametric estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionParams {
    /// Distribution family
    pub distribution: VaRDistribution,
    /// Sample mean of the returns
    pub mean: f64,
    /// Sample standard deviation of the returns
    pub std: f64,
    /// Student-t degrees of freedom
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub degrees_of_freedom: Option<f64>,
}

/// VaR calculation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaRMethod {
    /// Historical simulation
    Historical,
    /// Parametric (variance-covariance)
    Parametric,
    /// Monte Carlo simulation
    MonteCarlo,
}

impl VaRMethod {
    /// Canonical name, as accepted by [`FromStr`]
    pub fn name(self) -> &'static str {
        match self {
            Self::Historical => "historical",
            Self::Parametric => "parametric",
            Self::MonteCarlo => "monte_carlo",
        }
    }
}

impl fmt::Display for VaRMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VaRMethod {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "historical" => Ok(Self::Historical),
            "parametric" => Ok(Self::Parametric),
            "monte_carlo" => Ok(Self::MonteCarlo),
            _ => Err(RiskError::UnknownMethod(s.to_string())),
        }
    }
}

/// Distribution assumed by parametric VaR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VaRDistribution {
    /// Normal distribution
    #[default]
    #[serde(rename = "normal")]
    Normal,
    /// Student-t with degrees of freedom estimated from kurtosis
    #[serde(rename = "t")]
    StudentT,
}

impl fmt::Display for VaRDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::StudentT => f.write_str("t"),
        }
    }
}

impl FromStr for VaRDistribution {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "t" | "student_t" => Ok(Self::StudentT),
            _ => Err(RiskError::UnknownMethod(format!("distribution {s}"))),
        }
    }
}

/// Checks `0 <= confidence_level < 1`.
pub fn validate_confidence(confidence_level: f64) -> RiskResult<()> {
    if confidence_level.is_finite() && (0.0..1.0).contains(&confidence_level) {
        Ok(())
    } else {
        Err(RiskError::invalid_input(format!(
            "confidence level must be in [0, 1), got {confidence_level}"
        )))
    }
}

fn validate_returns(returns: &[f64], required: usize) -> RiskResult<()> {
    if returns.len() < required {
        return Err(RiskError::insufficient_data(format!(
            "need at least {required} returns, got {}",
            returns.len()
        )));
    }
    if returns.iter().any(|r| !r.is_finite()) {
        return Err(RiskError::invalid_input("returns must be finite"));
    }
    Ok(())
}

fn sample_size_warnings(observations: usize) -> Vec<RiskWarning> {
    if observations < MIN_RECOMMENDED_OBSERVATIONS {
        vec![RiskWarning::InsufficientData {
            observations,
            recommended: MIN_RECOMMENDED_OBSERVATIONS,
        }]
    } else {
        Vec::new()
    }
}
