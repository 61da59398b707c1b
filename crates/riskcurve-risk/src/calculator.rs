//! Integrated risk calculator for bonds.
//!
//! [`BondRiskCalculator`] computes all risk metrics (duration, convexity,
//! DV01, key rate durations) for a bond given its market terms.
//!
//! # Example
//!
//! ```rust
//! use riskcurve_risk::bond::BondTerms;
//! use riskcurve_risk::calculator::BondRiskCalculator;
//!
//! let calc = BondRiskCalculator::new();
//! let terms = BondTerms::new(98.5, 0.045, 0.04, 5.0);
//!
//! let metrics = calc.analyze("912828XG0", &terms, &[]).unwrap();
//!
//! println!("Modified Duration: {}", metrics.modified_duration);
//! println!("Convexity: {}", metrics.convexity);
//! println!("DV01: {}", metrics.dv01);
//! ```

use chrono::{DateTime, Utc};
use riskcurve_curves::YieldCurvePoint;
use serde::{Deserialize, Serialize};

use crate::bond::BondTerms;
use crate::convexity::{analytical_convexity, price_change_with_convexity, Convexity};
use crate::duration::{
    macaulay_duration, modified_from_macaulay, DistanceWeightedKeyRates, Duration,
    KeyRateDurations, KeyRateModel,
};
use crate::dv01::{dv01, DV01};
use crate::error::{RiskResult, RiskWarning};

/// Complete risk metrics for a bond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondMetrics {
    /// Instrument identifier.
    pub cusip: String,
    /// Price per 100 face.
    pub price: f64,
    /// Yield to maturity.
    pub yield_rate: f64,
    /// Macaulay duration (weighted average time to cash flows).
    pub macaulay_duration: Duration,
    /// Modified duration (price sensitivity to yield).
    pub modified_duration: Duration,
    /// Analytical convexity.
    pub convexity: Convexity,
    /// Price change per basis point, per 100 face.
    pub dv01: DV01,
    /// Sensitivities by key tenor, in tenor order.
    pub key_rate_durations: KeyRateDurations,
    /// Non-fatal conditions met during the calculation.
    pub warnings: Vec<RiskWarning>,
    /// When the metrics were computed.
    pub timestamp: DateTime<Utc>,
}

impl BondMetrics {
    /// Estimate price change for a given yield shift.
    ///
    /// Uses duration + convexity approximation:
    /// ΔP ≈ -D_mod × P × Δy + (1/2) × C × P × (Δy)²
    pub fn estimate_price_change(&self, yield_change: f64) -> f64 {
        price_change_with_convexity(
            self.modified_duration.as_f64(),
            self.convexity.as_f64(),
            self.price,
            yield_change,
        )
    }
}

/// Calculator for bond risk metrics.
pub struct BondRiskCalculator {
    key_rate_model: Box<dyn KeyRateModel>,
}

impl Default for BondRiskCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BondRiskCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BondRiskCalculator").finish_non_exhaustive()
    }
}

impl BondRiskCalculator {
    /// Calculator with the distance-decay key rate proxy.
    pub fn new() -> Self {
        Self::with_key_rate_model(DistanceWeightedKeyRates::default())
    }

    /// Calculator with a custom key rate model.
    pub fn with_key_rate_model(model: impl KeyRateModel + 'static) -> Self {
        Self {
            key_rate_model: Box::new(model),
        }
    }

    /// Calculates all risk metrics for one bond.
    ///
    /// `curve` is handed to the key rate model and may be empty for the
    /// default proxy.
    ///
    /// # Errors
    ///
    /// Returns an error if the terms fail [`BondTerms::validate`] or the key
    /// rate model fails.
    pub fn analyze(
        &self,
        cusip: impl Into<String>,
        terms: &BondTerms,
        curve: &[YieldCurvePoint],
    ) -> RiskResult<BondMetrics> {
        let schedule = terms.cash_flows()?;

        let macaulay = macaulay_duration(
            &schedule.times,
            &schedule.amounts,
            terms.yield_rate,
            terms.frequency,
        )?;
        let modified = modified_from_macaulay(macaulay, terms.yield_rate, terms.frequency);
        let convexity = analytical_convexity(
            &schedule.times,
            &schedule.amounts,
            terms.yield_rate,
            terms.frequency,
        )?;
        let dv01 = dv01(terms.price, modified)?;
        let key_rate_durations =
            self.key_rate_model
                .key_rate_durations(curve, terms.maturity_years, terms.yield_rate)?;

        Ok(BondMetrics {
            cusip: cusip.into(),
            price: terms.price,
            yield_rate: terms.yield_rate,
            macaulay_duration: macaulay,
            modified_duration: modified,
            convexity,
            dv01,
            key_rate_durations,
            warnings: schedule.warnings,
            timestamp: Utc::now(),
        })
    }

    /// Key rate durations from the configured model.
    pub fn key_rate_durations(
        &self,
        curve: &[YieldCurvePoint],
        maturity_years: f64,
        yield_rate: f64,
    ) -> RiskResult<KeyRateDurations> {
        self.key_rate_model
            .key_rate_durations(curve, maturity_years, yield_rate)
    }
}
