//! Parametric (variance-covariance) VaR calculation.

use riskcurve_math::statistics::{
    kurtosis, mean, normal_pdf, normal_quantile, sample_std_dev, student_t_quantile,
};

use super::{
    sample_size_warnings, validate_confidence, validate_returns, DistributionParams,
    VaRDistribution, VaRMethod, VaRResult,
};
use crate::error::{RiskError, RiskResult};

/// Degrees of freedom used when the returns show no excess kurtosis.
pub const DEFAULT_DEGREES_OF_FREEDOM: f64 = 30.0;

/// Lower bound on the estimated degrees of freedom.
pub const MIN_DEGREES_OF_FREEDOM: f64 = 3.0;

/// Expected shortfall multiple applied to the Student-t VaR.
pub const STUDENT_T_ES_MULTIPLIER: f64 = 1.2;

/// Calculate parametric VaR from sample moments of the returns.
///
/// # Formula
///
/// Normal:
/// ```text
/// VaR = μ + z(1-c) × σ
/// ES  = μ - φ(z) / (1-c) × σ
/// ```
///
/// Student-t, with `df = 6 / (k - 3) + 4` from the kurtosis `k` when `k > 3`
/// and 30 otherwise, floored at 3:
/// ```text
/// VaR = μ + t(1-c, df) × σ
/// ES  = 1.2 × VaR
/// ```
/// The Student-t shortfall is a fixed multiple, not an integral of the tail.
///
/// # Errors
///
/// Returns an error for fewer than two returns, non-finite returns, or a
/// confidence level outside `(0, 1)`.
pub fn parametric_var(
    returns: &[f64],
    confidence_level: f64,
    distribution: VaRDistribution,
) -> RiskResult<VaRResult> {
    validate_returns(returns, 2)?;
    validate_confidence(confidence_level)?;
    let tail = tail_probability(confidence_level)?;

    let mu = mean(returns)?;
    let sigma = sample_std_dev(returns)?;

    let (var, expected_shortfall, degrees_of_freedom) = match distribution {
        VaRDistribution::Normal => {
            let z = normal_quantile(tail)?;
            let var = mu + z * sigma;
            let es = mu - normal_pdf(z)? / tail * sigma;
            (var, es, None)
        }
        VaRDistribution::StudentT => {
            let df = degrees_of_freedom(returns)?;
            let var = mu + student_t_quantile(tail, df)? * sigma;
            (var, STUDENT_T_ES_MULTIPLIER * var, Some(df))
        }
    };

    Ok(VaRResult {
        var,
        expected_shortfall,
        confidence_level,
        method: VaRMethod::Parametric,
        distribution_params: Some(DistributionParams {
            distribution,
            mean: mu,
            std: sigma,
            degrees_of_freedom,
        }),
        num_simulations: None,
        observations: returns.len(),
        warnings: sample_size_warnings(returns.len()),
    })
}

/// Student-t degrees of freedom implied by the kurtosis of the returns.
pub fn degrees_of_freedom(returns: &[f64]) -> RiskResult<f64> {
    let df = match kurtosis(returns)? {
        Some(k) if k > 3.0 => 6.0 / (k - 3.0) + 4.0,
        _ => DEFAULT_DEGREES_OF_FREEDOM,
    };
    Ok(df.max(MIN_DEGREES_OF_FREEDOM))
}

/// `1 - confidence_level`, rejecting a zero confidence level which has no
/// finite quantile.
pub(crate) fn tail_probability(confidence_level: f64) -> RiskResult<f64> {
    if confidence_level <= 0.0 {
        return Err(RiskError::invalid_input(
            "confidence level 0 has no finite quantile",
        ));
    }
    Ok(1.0 - confidence_level)
}
