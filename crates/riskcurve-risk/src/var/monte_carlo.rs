//! Monte Carlo VaR calculation.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use riskcurve_math::statistics::{mean, sample_std_dev};

use super::historical::empirical_tail;
use super::parametric::tail_probability;
use super::{
    sample_size_warnings, validate_confidence, validate_returns, DistributionParams,
    VaRDistribution, VaRMethod, VaRResult,
};
use crate::error::{RiskError, RiskResult};

/// Default number of simulated returns.
pub const DEFAULT_NUM_SIMULATIONS: usize = 10_000;

/// Default seed, fixed so repeated runs agree.
pub const DEFAULT_SEED: u64 = 42;

/// Monte Carlo VaR with the default seed.
///
/// See [`monte_carlo_var_seeded`].
pub fn monte_carlo_var(
    returns: &[f64],
    confidence_level: f64,
    num_simulations: usize,
) -> RiskResult<VaRResult> {
    monte_carlo_var_seeded(returns, confidence_level, num_simulations, DEFAULT_SEED)
}

/// Monte Carlo VaR.
///
/// Draws `num_simulations` returns from a normal distribution with the
/// sample mean and standard deviation of `returns`, then takes the
/// historical VaR of the simulated sample. A series with zero dispersion
/// simulates a constant.
///
/// # Errors
///
/// Returns an error for fewer than two returns, non-finite returns, zero
/// simulations, or a confidence level outside `(0, 1)`.
pub fn monte_carlo_var_seeded(
    returns: &[f64],
    confidence_level: f64,
    num_simulations: usize,
    seed: u64,
) -> RiskResult<VaRResult> {
    validate_returns(returns, 2)?;
    validate_confidence(confidence_level)?;
    tail_probability(confidence_level)?;
    if num_simulations == 0 {
        return Err(RiskError::invalid_input(
            "number of simulations must be at least 1",
        ));
    }

    let mu = mean(returns)?;
    let sigma = sample_std_dev(returns)?;

    let simulated = simulate_normal(mu, sigma, num_simulations, seed);
    let (var, expected_shortfall) = empirical_tail(&simulated, confidence_level);

    Ok(VaRResult {
        var,
        expected_shortfall,
        confidence_level,
        method: VaRMethod::MonteCarlo,
        distribution_params: Some(DistributionParams {
            distribution: VaRDistribution::Normal,
            mean: mu,
            std: sigma,
            degrees_of_freedom: None,
        }),
        num_simulations: Some(num_simulations),
        observations: returns.len(),
        warnings: sample_size_warnings(returns.len()),
    })
}

fn simulate_normal(mu: f64, sigma: f64, n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let z: f64 = StandardNormal.sample(&mut rng);
            mu + sigma * z
        })
        .collect()
}
