//! Inputs and reports for batch analysis.
//!
//! A batch never stops at the first bad item. Each item either lands in
//! [`BatchReport::succeeded`] or is recorded in [`BatchReport::failed`]
//! with its error.

use riskcurve_curves::CurveModelKind;
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// One bond to analyze.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondPosition {
    /// Identifier reported back with the result.
    pub cusip: String,
    /// Clean price per 100 face.
    pub price: f64,
    /// Yield to maturity as a decimal.
    pub yield_rate: f64,
    /// Annual coupon rate as a decimal.
    pub coupon_rate: f64,
    /// Years to maturity.
    pub maturity_years: f64,
    /// Coupon frequency; the configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u32>,
}

impl BondPosition {
    /// Creates a position using the configured coupon frequency.
    pub fn new(
        cusip: impl Into<String>,
        price: f64,
        yield_rate: f64,
        coupon_rate: f64,
        maturity_years: f64,
    ) -> Self {
        Self {
            cusip: cusip.into(),
            price,
            yield_rate,
            coupon_rate,
            maturity_years,
            frequency: None,
        }
    }

    /// Builder method to override the coupon frequency.
    #[must_use]
    pub fn with_frequency(mut self, frequency: u32) -> Self {
        self.frequency = Some(frequency);
        self
    }
}

/// One set of observed yields to fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveObservation {
    /// Identifier reported back with the result, e.g. a date.
    pub id: String,
    /// Maturities in years.
    pub maturities: Vec<f64>,
    /// Observed yields as decimals.
    pub yields: Vec<f64>,
    /// Model to fit.
    pub model: CurveModelKind,
}

impl CurveObservation {
    /// Creates an observation.
    pub fn new(
        id: impl Into<String>,
        maturities: Vec<f64>,
        yields: Vec<f64>,
        model: CurveModelKind,
    ) -> Self {
        Self {
            id: id.into(),
            maturities,
            yields,
            model,
        }
    }
}

/// A successful item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem<T> {
    /// Identifier of the input.
    pub id: String,
    /// Computed result.
    pub result: T,
}

/// A failed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// Identifier of the input.
    pub id: String,
    /// Error message.
    pub error: String,
    /// Whether the failure came from the data rather than invalid input.
    pub recoverable: bool,
}

impl BatchFailure {
    /// Records an error against an input.
    pub fn new(id: impl Into<String>, error: &AnalyticsError) -> Self {
        Self {
            id: id.into(),
            error: error.to_string(),
            recoverable: error.is_recoverable(),
        }
    }
}

/// Outcome of a batch, in input order within each list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport<T> {
    /// Items that completed.
    pub succeeded: Vec<BatchItem<T>>,
    /// Items that failed.
    pub failed: Vec<BatchFailure>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    /// Records the outcome of one item.
    pub fn record(&mut self, id: impl Into<String>, outcome: Result<T, AnalyticsError>) {
        let id = id.into();
        match outcome {
            Ok(result) => self.succeeded.push(BatchItem { id, result }),
            Err(e) => self.failed.push(BatchFailure::new(id, &e)),
        }
    }

    /// Number of items processed.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// True when no item failed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Share of items that succeeded, 0 for an empty batch.
    pub fn success_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            n => self.succeeded.len() as f64 / n as f64,
        }
    }

    /// Result for an identifier, if it succeeded.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.succeeded
            .iter()
            .find(|item| item.id == id)
            .map(|item| &item.result)
    }

    /// Iterates over successful results.
    pub fn results(&self) -> impl Iterator<Item = &T> {
        self.succeeded.iter().map(|item| &item.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskcurve_curves::CurveError;
    use riskcurve_risk::RiskError;

    #[test]
    fn test_record_partial_success() {
        let mut report = BatchReport::default();
        report.record("a", Ok(1.0));
        report.record(
            "b",
            Err(CurveError::fit_failed(5, 0.1, "stalled").into()),
        );
        report.record("c", Err(RiskError::invalid_input("price must be positive").into()));
        report.record("d", Ok(4.0));

        assert_eq!(report.total(), 4);
        assert!(!report.is_complete());
        assert_eq!(report.success_rate(), 0.5);
        assert_eq!(report.get("d"), Some(&4.0));
        assert_eq!(report.get("b"), None);
        assert_eq!(report.results().copied().collect::<Vec<f64>>(), vec![1.0, 4.0]);

        assert!(report.failed[0].recoverable);
        assert!(!report.failed[1].recoverable);
        assert!(report.failed[1].error.contains("price must be positive"));
    }

    #[test]
    fn test_empty_report() {
        let report: BatchReport<f64> = BatchReport::default();
        assert!(report.is_complete());
        assert_eq!(report.success_rate(), 0.0);
    }

    #[test]
    fn test_position_serde_defaults() {
        let json = r#"{"cusip":"X","price":99.0,"yield_rate":0.05,"coupon_rate":0.04,"maturity_years":5.0}"#;
        let position: BondPosition = serde_json::from_str(json).unwrap();
        assert_eq!(position, BondPosition::new("X", 99.0, 0.05, 0.04, 5.0));
        assert!(!serde_json::to_string(&position).unwrap().contains("frequency"));
    }
}
