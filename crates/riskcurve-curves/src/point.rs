//! Observed or modelled yield at a single maturity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// A single (maturity, yield) observation.
///
/// Yields are decimals (`0.045` is 4.5%), maturities are in years.
/// Deserialization applies the same checks as [`YieldCurvePoint::with_timestamp`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PointRecord")]
pub struct YieldCurvePoint {
    maturity: f64,
    yield_rate: f64,
    timestamp: DateTime<Utc>,
}

#[derive(Deserialize)]
struct PointRecord {
    maturity: f64,
    yield_rate: f64,
    timestamp: DateTime<Utc>,
}

impl TryFrom<PointRecord> for YieldCurvePoint {
    type Error = CurveError;

    fn try_from(record: PointRecord) -> CurveResult<Self> {
        Self::with_timestamp(record.maturity, record.yield_rate, record.timestamp)
    }
}

impl YieldCurvePoint {
    /// Creates a point stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the maturity is not strictly positive or either
    /// value is not finite.
    pub fn new(maturity: f64, yield_rate: f64) -> CurveResult<Self> {
        Self::with_timestamp(maturity, yield_rate, Utc::now())
    }

    /// Creates a point with an explicit observation time.
    pub fn with_timestamp(
        maturity: f64,
        yield_rate: f64,
        timestamp: DateTime<Utc>,
    ) -> CurveResult<Self> {
        if !maturity.is_finite() || maturity <= 0.0 {
            return Err(CurveError::invalid_input(format!(
                "maturity must be positive and finite, got {maturity}"
            )));
        }
        if !yield_rate.is_finite() {
            return Err(CurveError::invalid_input(format!(
                "yield must be finite, got {yield_rate}"
            )));
        }

        Ok(Self {
            maturity,
            yield_rate,
            timestamp,
        })
    }

    /// Builds points from parallel slices, all sharing one timestamp.
    pub fn from_pairs(maturities: &[f64], yields: &[f64]) -> CurveResult<Vec<Self>> {
        if maturities.len() != yields.len() {
            return Err(CurveError::LengthMismatch {
                maturities: maturities.len(),
                yields: yields.len(),
            });
        }
        let now = Utc::now();
        maturities
            .iter()
            .zip(yields)
            .map(|(&m, &y)| Self::with_timestamp(m, y, now))
            .collect()
    }

    /// Maturity in years.
    #[must_use]
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Yield as a decimal.
    #[must_use]
    pub fn yield_rate(&self) -> f64 {
        self.yield_rate
    }

    /// Observation time.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
