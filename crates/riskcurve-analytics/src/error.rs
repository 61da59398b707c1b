//! Unified error type for the analytics engine.
//!
//! Errors from curve fitting, risk calculations and configuration loading
//! are carried unchanged so callers can still match on the source.

use riskcurve_config::ConfigError;
use riskcurve_curves::CurveError;
use riskcurve_risk::RiskError;
use thiserror::Error;

/// Unified error type for all analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Curve fitting or evaluation failed
    #[error("curve error: {0}")]
    Curve(#[from] CurveError),

    /// Risk calculation failed
    #[error("risk error: {0}")]
    Risk(#[from] RiskError),

    /// Configuration could not be loaded or is invalid
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

impl AnalyticsError {
    /// Returns true for failures caused by the data, such as a fit that does
    /// not converge or a degenerate factor matrix. Retrying with other data
    /// or settings may succeed; validation and precondition errors return
    /// false.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Curve(e) => e.is_recoverable(),
            Self::Risk(e) => e.is_recoverable(),
            Self::Config(_) => false,
        }
    }

    /// Returns true when a stateful model was used before fitting.
    #[must_use]
    pub fn is_not_fitted(&self) -> bool {
        matches!(
            self,
            Self::Curve(CurveError::NotFitted { .. }) | Self::Risk(RiskError::NotFitted(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err: AnalyticsError = CurveError::fit_failed(12, 0.01, "no progress").into();
        assert!(err.to_string().starts_with("curve error:"));

        let err: AnalyticsError = RiskError::invalid_input("empty returns").into();
        assert_eq!(err.to_string(), "risk error: invalid input: empty returns");
    }

    #[test]
    fn test_recoverable() {
        let fit: AnalyticsError = CurveError::fit_failed(12, 0.01, "no progress").into();
        assert!(fit.is_recoverable());

        let degenerate: AnalyticsError = RiskError::Degenerate("flat".to_string()).into();
        assert!(degenerate.is_recoverable());

        let invalid: AnalyticsError = CurveError::invalid_input("negative maturity").into();
        assert!(!invalid.is_recoverable());

        let config: AnalyticsError = ConfigError::Deserialization("bad".to_string()).into();
        assert!(!config.is_recoverable());
    }

    #[test]
    fn test_not_fitted() {
        let err: AnalyticsError = CurveError::not_fitted("predict").into();
        assert!(err.is_not_fitted());
        assert!(!err.is_recoverable());

        let err: AnalyticsError = RiskError::NotFitted("transform".to_string()).into();
        assert!(err.is_not_fitted());
    }
}
