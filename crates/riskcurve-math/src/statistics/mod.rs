//! Descriptive statistics and distribution quantiles.
//!
//! Sample moments follow the conventions used in risk reporting: the
//! standard deviation of a return series uses the `n - 1` denominator,
//! standardisation of factor inputs uses the population (`n`) denominator.

use crate::error::{MathError, MathResult};
use statrs::distribution::{Continuous, ContinuousCDF, Normal, StudentsT};

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> MathResult<f64> {
    if values.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (`n - 1` denominator).
pub fn sample_std_dev(values: &[f64]) -> MathResult<f64> {
    if values.len() < 2 {
        return Err(MathError::insufficient_data(2, values.len()));
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Ok((ss / (values.len() - 1) as f64).sqrt())
}

/// Population standard deviation (`n` denominator).
pub fn population_std_dev(values: &[f64]) -> MathResult<f64> {
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Ok((ss / values.len() as f64).sqrt())
}

/// Kurtosis as the mean fourth power of values standardised by the sample
/// standard deviation. A normal sample gives roughly 3.
///
/// Returns `None` when the series has zero dispersion and the statistic is
/// undefined.
pub fn kurtosis(values: &[f64]) -> MathResult<Option<f64>> {
    let m = mean(values)?;
    let sd = sample_std_dev(values)?;
    if sd == 0.0 {
        return Ok(None);
    }
    let k = values.iter().map(|v| ((v - m) / sd).powi(4)).sum::<f64>() / values.len() as f64;
    Ok(Some(k))
}

/// Inverse CDF of the standard normal distribution.
pub fn normal_quantile(p: f64) -> MathResult<f64> {
    check_probability(p)?;
    Ok(standard_normal()?.inverse_cdf(p))
}

/// Density of the standard normal distribution.
pub fn normal_pdf(x: f64) -> MathResult<f64> {
    Ok(standard_normal()?.pdf(x))
}

/// Inverse CDF of a standard Student-t distribution with `df` degrees of freedom.
pub fn student_t_quantile(p: f64, df: f64) -> MathResult<f64> {
    check_probability(p)?;
    let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| MathError::distribution(e.to_string()))?;
    Ok(dist.inverse_cdf(p))
}

fn standard_normal() -> MathResult<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| MathError::distribution(e.to_string()))
}

fn check_probability(p: f64) -> MathResult<()> {
    if p > 0.0 && p < 1.0 {
        Ok(())
    } else {
        Err(MathError::invalid_input(format!(
            "probability must be in (0, 1), got {p}"
        )))
    }
}
