//! DV01 (Dollar Value of 01) calculations.
//!
//! DV01, also known as PV01 or PVBP (Price Value of a Basis Point),
//! measures the absolute price change for a 1 basis point change in yield.
//!
//! ## Formula
//!
//! ```text
//! DV01 = Modified Duration × Price × 0.0001
//! ```

use serde::{Deserialize, Serialize};

use crate::duration::Duration;
use crate::error::{RiskError, RiskResult};

/// DV01 value (price change per basis point)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[repr(transparent)]
pub struct DV01(f64);

impl DV01 {
    /// Create a new DV01 value
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the DV01 value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Get the DV01 as f64
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for DV01 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.4}", self.0)
    }
}

impl From<f64> for DV01 {
    fn from(f: f64) -> Self {
        Self(f)
    }
}

/// DV01 from price and modified duration.
///
/// # Errors
///
/// Returns an error if the price is not positive or either input is not finite.
pub fn dv01(price: f64, modified_duration: Duration) -> RiskResult<DV01> {
    if !price.is_finite() || price <= 0.0 {
        return Err(RiskError::invalid_input(format!(
            "price must be positive, got {price}"
        )));
    }
    if !modified_duration.as_f64().is_finite() {
        return Err(RiskError::invalid_input("modified duration must be finite"));
    }
    Ok(DV01::from(modified_duration.as_f64() * price / 10_000.0))
}

/// DV01 scaled to a position's face value (price quoted per 100).
pub fn dv01_for_position(dv01_per_100: DV01, face_value: f64) -> DV01 {
    DV01::from(dv01_per_100.as_f64() * face_value / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dv01() {
        let d = dv01(98.5, Duration::from(4.5)).unwrap();
        assert_relative_eq!(d.as_f64(), 4.5 * 98.5 / 10_000.0, epsilon = 1e-15);
    }

    #[test]
    fn test_dv01_position() {
        let per_100 = DV01::from(0.045);
        assert_relative_eq!(
            dv01_for_position(per_100, 1_000_000.0).as_f64(),
            450.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_dv01_invalid_price() {
        assert!(dv01(0.0, Duration::from(4.5)).is_err());
        assert!(dv01(f64::NAN, Duration::from(4.5)).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(DV01::from(0.04326).to_string(), "$0.0433");
    }
}
