//! Macaulay and modified duration.
//!
//! ## Formula
//!
//! ```text
//! D_mac = Σ(t_i × PV(CF_i)) / P
//! D_mod = D_mac / (1 + y/f)
//! ```
//!
//! where:
//! - t_i = time to cash flow i (in years)
//! - PV(CF_i) = CF_i / (1 + y/f)^(t_i × f)
//! - P = Σ PV(CF_i)

use super::Duration;
use crate::bond::BondTerms;
use crate::error::{RiskError, RiskResult};

/// Macaulay and modified duration of one bond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationPair {
    /// Weighted average time to the cash flows.
    pub macaulay: Duration,
    /// Macaulay duration divided by `1 + y/f`.
    pub modified: Duration,
}

/// Calculate Macaulay duration from cash flows and yield.
///
/// # Arguments
///
/// * `times` - Time to each cash flow in years
/// * `cash_flows` - Amount of each cash flow
/// * `ytm` - Yield to maturity (as decimal, e.g., 0.05 for 5%)
/// * `frequency` - Compounding frequency per year
///
/// # Example
///
/// ```rust
/// use riskcurve_risk::duration::macaulay_duration;
///
/// let times = vec![0.5, 1.0, 1.5, 2.0];
/// let cash_flows = vec![2.5, 2.5, 2.5, 102.5];
/// let duration = macaulay_duration(&times, &cash_flows, 0.05, 2).unwrap();
/// assert!(duration.years() < 2.0);
/// ```
pub fn macaulay_duration(
    times: &[f64],
    cash_flows: &[f64],
    ytm: f64,
    frequency: u32,
) -> RiskResult<Duration> {
    let (weighted_sum, price) = discounted_sums(times, cash_flows, ytm, frequency)?;

    if price.abs() < 1e-10 {
        return Err(RiskError::DivisionByZero {
            context: "price is zero in macaulay duration".to_string(),
        });
    }

    Ok(Duration::from(weighted_sum / price))
}

/// Convert Macaulay duration to modified duration.
pub fn modified_from_macaulay(macaulay: Duration, ytm: f64, frequency: u32) -> Duration {
    Duration::from(macaulay.as_f64() / (1.0 + ytm / f64::from(frequency)))
}

/// Calculate modified duration from cash flows and yield.
pub fn modified_duration(
    times: &[f64],
    cash_flows: &[f64],
    ytm: f64,
    frequency: u32,
) -> RiskResult<Duration> {
    let mac = macaulay_duration(times, cash_flows, ytm, frequency)?;
    Ok(modified_from_macaulay(mac, ytm, frequency))
}

/// Macaulay and modified duration of a bond.
///
/// # Errors
///
/// Returns an error if the terms fail [`BondTerms::validate`].
pub fn duration(terms: &BondTerms) -> RiskResult<DurationPair> {
    let schedule = terms.cash_flows()?;
    let macaulay = macaulay_duration(
        &schedule.times,
        &schedule.amounts,
        terms.yield_rate,
        terms.frequency,
    )?;
    Ok(DurationPair {
        macaulay,
        modified: modified_from_macaulay(macaulay, terms.yield_rate, terms.frequency),
    })
}

/// Returns `(Σ t·PV, Σ PV)`.
pub(crate) fn discounted_sums(
    times: &[f64],
    cash_flows: &[f64],
    ytm: f64,
    frequency: u32,
) -> RiskResult<(f64, f64)> {
    if times.len() != cash_flows.len() {
        return Err(RiskError::invalid_input(
            "times and cash_flows must have same length",
        ));
    }
    if times.is_empty() {
        return Err(RiskError::insufficient_data("no cash flows provided"));
    }
    if frequency == 0 {
        return Err(RiskError::invalid_input("frequency must be at least 1"));
    }

    let freq = f64::from(frequency);
    let base = 1.0 + ytm / freq;
    if base <= 0.0 {
        return Err(RiskError::invalid_input(format!(
            "yield {ytm} gives a non-positive discount base"
        )));
    }

    let mut weighted_sum = 0.0;
    let mut price = 0.0;
    for (t, cf) in times.iter().zip(cash_flows) {
        let pv = cf * base.powf(-t * freq);
        weighted_sum += t * pv;
        price += pv;
    }

    Ok((weighted_sum, price))
}
