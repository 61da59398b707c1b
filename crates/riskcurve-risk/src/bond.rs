//! Plain fixed-coupon bond terms and their cash flow schedule.

use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult, RiskWarning};

/// Face value the schedule is quoted against.
pub const FACE_VALUE: f64 = 100.0;

/// Default coupon frequency (semi-annual).
pub const DEFAULT_FREQUENCY: u32 = 2;

/// Longest maturity accepted, in years.
pub const MAX_MATURITY_YEARS: f64 = 100.0;

/// Largest number of coupon periods a schedule may hold (daily coupons for 100 years).
pub const MAX_COUPON_PERIODS: f64 = 36_500.0;

/// Market terms of a fixed-coupon bond.
///
/// Rates are decimals: a 5% coupon is `0.05`. The price is per 100 face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BondTerms {
    /// Price per 100 face.
    pub price: f64,
    /// Yield to maturity.
    pub yield_rate: f64,
    /// Annual coupon rate.
    pub coupon_rate: f64,
    /// Time to maturity in years.
    pub maturity_years: f64,
    /// Coupon payments per year.
    #[serde(default = "default_frequency")]
    pub frequency: u32,
}

fn default_frequency() -> u32 {
    DEFAULT_FREQUENCY
}

/// Cash flow schedule discounted at the bond's yield.
#[derive(Debug, Clone, PartialEq)]
pub struct CashFlowSchedule {
    /// Time of each payment in years.
    pub times: Vec<f64>,
    /// Payment amounts per 100 face.
    pub amounts: Vec<f64>,
    /// Conditions met while building the schedule.
    pub warnings: Vec<RiskWarning>,
}

impl BondTerms {
    /// Creates terms with the default semi-annual frequency.
    #[must_use]
    pub fn new(price: f64, yield_rate: f64, coupon_rate: f64, maturity_years: f64) -> Self {
        Self {
            price,
            yield_rate,
            coupon_rate,
            maturity_years,
            frequency: DEFAULT_FREQUENCY,
        }
    }

    /// Sets the coupon frequency.
    #[must_use]
    pub fn with_frequency(mut self, frequency: u32) -> Self {
        self.frequency = frequency;
        self
    }

    /// Periodic discount rate `y / f`.
    #[must_use]
    pub fn periodic_yield(&self) -> f64 {
        self.yield_rate / f64::from(self.frequency)
    }

    /// Checks that the terms describe a bond that can be discounted.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::InvalidInput`] for a non-positive price or
    /// maturity, zero frequency, negative coupon, non-finite values, or a
    /// yield at or below `-frequency`. Maturities beyond
    /// [`MAX_MATURITY_YEARS`] and schedules longer than
    /// [`MAX_COUPON_PERIODS`] are rejected as well.
    pub fn validate(&self) -> RiskResult<()> {
        let values = [
            ("price", self.price),
            ("yield", self.yield_rate),
            ("coupon rate", self.coupon_rate),
            ("maturity", self.maturity_years),
        ];
        if let Some((name, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(RiskError::invalid_input(format!("{name} must be finite, got {value}")));
        }
        if self.price <= 0.0 {
            return Err(RiskError::invalid_input(format!(
                "price must be positive, got {}",
                self.price
            )));
        }
        if self.maturity_years <= 0.0 {
            return Err(RiskError::invalid_input(format!(
                "maturity must be positive, got {}",
                self.maturity_years
            )));
        }
        if self.maturity_years > MAX_MATURITY_YEARS {
            return Err(RiskError::invalid_input(format!(
                "maturity cannot exceed {MAX_MATURITY_YEARS} years, got {}",
                self.maturity_years
            )));
        }
        if self.coupon_rate < 0.0 {
            return Err(RiskError::invalid_input(format!(
                "coupon rate cannot be negative, got {}",
                self.coupon_rate
            )));
        }
        if self.frequency == 0 {
            return Err(RiskError::invalid_input("frequency must be at least 1"));
        }
        if self.maturity_years * f64::from(self.frequency) > MAX_COUPON_PERIODS {
            return Err(RiskError::invalid_input(format!(
                "{} years at frequency {} exceeds {MAX_COUPON_PERIODS} coupon periods",
                self.maturity_years, self.frequency
            )));
        }
        if 1.0 + self.periodic_yield() <= 0.0 {
            return Err(RiskError::invalid_input(format!(
                "yield {} gives a non-positive discount base at frequency {}",
                self.yield_rate, self.frequency
            )));
        }
        Ok(())
    }

    /// Builds the cash flow schedule.
    ///
    /// Coupons of `coupon / frequency × 100` are paid at each of the
    /// `floor(maturity × frequency)` whole periods, with the principal added
    /// to the last one. A bond shorter than one period pays only its
    /// principal, at maturity, and the schedule carries
    /// [`RiskWarning::NoCouponPeriods`].
    pub fn cash_flows(&self) -> RiskResult<CashFlowSchedule> {
        self.validate()?;

        let freq = f64::from(self.frequency);
        let periods = (self.maturity_years * freq).floor() as usize;

        if periods == 0 {
            return Ok(CashFlowSchedule {
                times: vec![self.maturity_years],
                amounts: vec![FACE_VALUE],
                warnings: vec![RiskWarning::NoCouponPeriods {
                    maturity_years: self.maturity_years,
                    frequency: self.frequency,
                }],
            });
        }

        let coupon = self.coupon_rate / freq * FACE_VALUE;
        let times = (1..=periods).map(|t| t as f64 / freq).collect();
        let mut amounts = vec![coupon; periods];
        amounts[periods - 1] += FACE_VALUE;

        Ok(CashFlowSchedule {
            times,
            amounts,
            warnings: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule() {
        let terms = BondTerms::new(100.0, 0.05, 0.05, 2.0);
        let schedule = terms.cash_flows().unwrap();

        assert_eq!(schedule.times, vec![0.5, 1.0, 1.5, 2.0]);
        assert_eq!(schedule.amounts, vec![2.5, 2.5, 2.5, 102.5]);
        assert!(schedule.warnings.is_empty());
    }

    #[test]
    fn test_partial_period_truncated() {
        // 2.3 years semi-annual: floor(4.6) = 4 periods
        let schedule = BondTerms::new(100.0, 0.05, 0.04, 2.3).cash_flows().unwrap();
        assert_eq!(schedule.times.len(), 4);
    }

    #[test]
    fn test_short_bond_single_payment() {
        let schedule = BondTerms::new(99.0, 0.04, 0.05, 0.25).cash_flows().unwrap();

        assert_eq!(schedule.times, vec![0.25]);
        assert_eq!(schedule.amounts, vec![100.0]);
        assert!(matches!(
            schedule.warnings[0],
            RiskWarning::NoCouponPeriods { frequency: 2, .. }
        ));
    }

    #[test]
    fn test_validation() {
        assert!(BondTerms::new(0.0, 0.05, 0.05, 5.0).validate().is_err());
        assert!(BondTerms::new(100.0, 0.05, 0.05, 0.0).validate().is_err());
        assert!(BondTerms::new(100.0, 0.05, -0.01, 5.0).validate().is_err());
        assert!(BondTerms::new(100.0, f64::NAN, 0.05, 5.0).validate().is_err());
        assert!(BondTerms::new(100.0, 0.05, 0.05, 5.0)
            .with_frequency(0)
            .validate()
            .is_err());
        assert!(BondTerms::new(100.0, -2.5, 0.05, 5.0).validate().is_err());
        assert!(BondTerms::new(100.0, 0.05, 0.05, 5.0).validate().is_ok());
    }

    #[test]
    fn test_maturity_ceiling() {
        assert!(BondTerms::new(100.0, 0.05, 0.05, MAX_MATURITY_YEARS).validate().is_ok());

        for maturity in [100.5, 1e9, 1e20, f64::MAX] {
            let err = BondTerms::new(100.0, 0.05, 0.05, maturity).cash_flows().unwrap_err();
            assert!(matches!(err, RiskError::InvalidInput(_)), "{err}");
        }
    }

    #[test]
    fn test_coupon_period_ceiling() {
        let terms = BondTerms::new(100.0, 0.05, 0.05, 30.0).with_frequency(u32::MAX);
        assert!(terms.cash_flows().is_err());

        let daily = BondTerms::new(100.0, 0.05, 0.05, 5.0).with_frequency(365);
        assert_eq!(daily.cash_flows().unwrap().times.len(), 1825);
    }

    #[test]
    fn test_default_frequency_deserialize() {
        let json = r#"{"price": 98.5, "yield_rate": 0.045, "coupon_rate": 0.04, "maturity_years": 5.0}"#;
        let terms: BondTerms = serde_json::from_str(json).unwrap();
        assert_eq!(terms.frequency, 2);
    }
}
