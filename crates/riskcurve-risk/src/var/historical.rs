//! Historical VaR calculation.

use super::{sample_size_warnings, validate_confidence, validate_returns, VaRMethod, VaRResult};
use crate::error::RiskResult;

/// Calculate historical VaR from a series of returns.
///
/// Returns are sorted ascending and the VaR is the return at index
/// `floor((1 - confidence_level) × n)`, clamped to the last observation.
/// Expected shortfall is the mean of the returns strictly below that index,
/// or the VaR itself when there are none.
///
/// # Arguments
///
/// * `returns` - Historical returns (as decimals, e.g., -0.01 for -1%)
/// * `confidence_level` - Confidence level (e.g., 0.95 for 95%)
///
/// # Errors
///
/// Returns an error for an empty series, non-finite returns, or a
/// confidence level outside `[0, 1)`.
pub fn historical_var(returns: &[f64], confidence_level: f64) -> RiskResult<VaRResult> {
    validate_returns(returns, 1)?;
    validate_confidence(confidence_level)?;

    let (var, expected_shortfall) = empirical_tail(returns, confidence_level);

    Ok(VaRResult {
        var,
        expected_shortfall,
        confidence_level,
        method: VaRMethod::Historical,
        distribution_params: None,
        num_simulations: None,
        observations: returns.len(),
        warnings: sample_size_warnings(returns.len()),
    })
}

/// `(quantile, tail mean)` of a non-empty, finite sample.
pub(crate) fn empirical_tail(returns: &[f64], confidence_level: f64) -> (f64, f64) {
    // Sort returns (ascending - worst returns first)
    let mut sorted = returns.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let index = (((1.0 - confidence_level) * n as f64).floor() as usize).min(n - 1);
    let var = sorted[index];

    let tail = &sorted[..index];
    let expected_shortfall = if tail.is_empty() {
        var
    } else {
        tail.iter().sum::<f64>() / tail.len() as f64
    };

    (var, expected_shortfall)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RiskError, RiskWarning};
    use approx::assert_relative_eq;

    fn hundred_returns() -> Vec<f64> {
        // -0.050, -0.049, ..., 0.049
        (0..100).map(|i| (f64::from(i) - 50.0) / 1000.0).collect()
    }

    #[test]
    fn test_historical_var() {
        let var = historical_var(&hundred_returns(), 0.95).unwrap();

        // Index 5 of the sorted series; tail is the five worst returns
        assert_relative_eq!(var.var, -0.045, epsilon = 1e-12);
        assert_relative_eq!(var.expected_shortfall, -0.048, epsilon = 1e-12);
        assert_eq!(var.observations, 100);
        assert!(var.warnings.is_empty());
    }

    #[test]
    fn test_order_does_not_matter() {
        let mut shuffled = hundred_returns();
        shuffled.reverse();
        shuffled.swap(3, 71);

        let a = historical_var(&hundred_returns(), 0.99).unwrap();
        let b = historical_var(&shuffled, 0.99).unwrap();
        assert_eq!(a.var, b.var);
        assert_eq!(a.expected_shortfall, b.expected_shortfall);
    }

    #[test]
    fn test_small_sample_warning() {
        let returns = [-0.02, -0.015, -0.01, -0.005, 0.0, 0.005, 0.01, 0.015, 0.02, 0.025];

        let var = historical_var(&returns, 0.95).unwrap();

        // floor(0.05 × 10) = 0: the worst return, no tail to average
        assert_relative_eq!(var.var, -0.02, epsilon = 1e-12);
        assert_relative_eq!(var.expected_shortfall, -0.02, epsilon = 1e-12);
        assert_eq!(
            var.warnings,
            vec![RiskWarning::InsufficientData {
                observations: 10,
                recommended: 30
            }]
        );
    }

    #[test]
    fn test_zero_confidence_clamps_index() {
        let var = historical_var(&[0.01, -0.01, 0.02], 0.0).unwrap();
        assert_relative_eq!(var.var, 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_historical_var_empty() {
        let result = historical_var(&[], 0.95);
        assert!(matches!(result, Err(RiskError::InsufficientData(_))));
    }

    #[test]
    fn test_invalid_confidence() {
        assert!(historical_var(&[0.01, -0.01], 1.0).is_err());
        assert!(historical_var(&[0.01, f64::NAN], 0.95).is_err());
    }
}
