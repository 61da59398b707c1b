//! Method dispatch over the VaR estimators.

use super::{
    historical_var, monte_carlo_var_seeded, parametric_var, VaRDistribution, VaRMethod,
    VaRResult, DEFAULT_NUM_SIMULATIONS, DEFAULT_SEED, STANDARD_CONFIDENCE_LEVELS,
};
use crate::error::{RiskError, RiskResult};

/// Runs any [`VaRMethod`] with a fixed set of method options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueAtRiskEngine {
    distribution: VaRDistribution,
    num_simulations: usize,
    seed: u64,
}

impl Default for ValueAtRiskEngine {
    fn default() -> Self {
        Self {
            distribution: VaRDistribution::Normal,
            num_simulations: DEFAULT_NUM_SIMULATIONS,
            seed: DEFAULT_SEED,
        }
    }
}

impl ValueAtRiskEngine {
    /// Engine with the normal distribution, 10,000 simulations and seed 42.
    pub fn new() -> Self {
        Self::default()
    }

    /// Distribution used by parametric VaR.
    #[must_use]
    pub fn with_distribution(mut self, distribution: VaRDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// Number of Monte Carlo draws.
    #[must_use]
    pub fn with_num_simulations(mut self, num_simulations: usize) -> Self {
        self.num_simulations = num_simulations;
        self
    }

    /// Monte Carlo seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// VaR and expected shortfall by the given method.
    pub fn calculate(
        &self,
        returns: &[f64],
        method: VaRMethod,
        confidence_level: f64,
    ) -> RiskResult<VaRResult> {
        match method {
            VaRMethod::Historical => historical_var(returns, confidence_level),
            VaRMethod::Parametric => parametric_var(returns, confidence_level, self.distribution),
            VaRMethod::MonteCarlo => {
                monte_carlo_var_seeded(returns, confidence_level, self.num_simulations, self.seed)
            }
        }
    }

    /// One result per confidence level, in the order given.
    pub fn profile(
        &self,
        returns: &[f64],
        method: VaRMethod,
        confidence_levels: &[f64],
    ) -> RiskResult<Vec<VaRResult>> {
        if confidence_levels.is_empty() {
            return Err(RiskError::invalid_input(
                "at least one confidence level is required",
            ));
        }
        confidence_levels
            .iter()
            .map(|&cl| self.calculate(returns, method, cl))
            .collect()
    }
}

/// VaR at the standard confidence levels (95%, 99%, 99.9%) with default
/// method options.
pub fn var_profile(returns: &[f64], method: VaRMethod) -> RiskResult<Vec<VaRResult>> {
    ValueAtRiskEngine::default().profile(returns, method, &STANDARD_CONFIDENCE_LEVELS)
}
