//! Convexity calculations for fixed income instruments.
//!
//! Convexity measures the curvature of the price-yield relationship,
//! capturing the second-order effect that duration misses.
//!
//! ## Formula
//!
//! With `t` counted in coupon periods:
//!
//! ```text
//! C = Σ(t × (t + 1) × PV_t) / (P × (1 + y/f)² × f²)
//! ```

use serde::{Deserialize, Serialize};

use crate::bond::BondTerms;
use crate::error::{RiskError, RiskResult};

/// Convexity value
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Convexity(f64);

impl Convexity {
    /// Create a new Convexity value
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the convexity value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Get the convexity as f64
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Convexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

impl From<f64> for Convexity {
    fn from(f: f64) -> Self {
        Self(f)
    }
}

/// Analytical convexity from cash flow times (in years) and amounts.
pub fn analytical_convexity(
    times: &[f64],
    cash_flows: &[f64],
    ytm: f64,
    frequency: u32,
) -> RiskResult<Convexity> {
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

    let mut weighted = 0.0;
    let mut price = 0.0;
    for (t, cf) in times.iter().zip(cash_flows) {
        let periods = t * freq;
        let pv = cf * base.powf(-periods);
        weighted += periods * (periods + 1.0) * pv;
        price += pv;
    }

    if price.abs() < 1e-10 {
        return Err(RiskError::DivisionByZero {
            context: "price is zero in convexity".to_string(),
        });
    }

    Ok(Convexity::from(weighted / (price * base.powi(2) * freq.powi(2))))
}

/// Convexity of a bond.
///
/// # Errors
///
/// Returns an error if the terms fail [`BondTerms::validate`].
pub fn convexity(terms: &BondTerms) -> RiskResult<Convexity> {
    let schedule = terms.cash_flows()?;
    analytical_convexity(
        &schedule.times,
        &schedule.amounts,
        terms.yield_rate,
        terms.frequency,
    )
}

/// Calculate price change including both duration and convexity effects.
///
/// # Formula
///
/// ```text
/// ΔP ≈ -D_mod × P × Δy + (1/2) × C × P × (Δy)²
/// ```
pub fn price_change_with_convexity(
    mod_duration: f64,
    convexity: f64,
    price: f64,
    yield_change: f64,
) -> f64 {
    let duration_effect = -mod_duration * price * yield_change;
    let convexity_effect = 0.5 * convexity * price * yield_change.powi(2);
    duration_effect + convexity_effect
}
