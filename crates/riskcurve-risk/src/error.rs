//! Error and warning types for risk calculations.

use std::fmt;

use riskcurve_math::MathError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A specialized Result type for risk calculations.
pub type RiskResult<T> = Result<T, RiskError>;

/// Errors that can occur during risk calculations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    /// Invalid input parameters
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for calculation
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Method or distribution name that is not supported
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// Input is well formed but carries no information to decompose
    #[error("degenerate input: {0}")]
    Degenerate(String),

    /// Division by zero
    #[error("division by zero in {context}")]
    DivisionByZero {
        /// Where the division happened.
        context: String,
    },

    /// A stateful model was used before fitting
    #[error("model not fitted: call fit() before {0}")]
    NotFitted(String),

    /// Numerical routine failed
    #[error("math error: {0}")]
    Math(#[from] MathError),
}

impl RiskError {
    /// Creates an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Creates an insufficient data error.
    pub fn insufficient_data(msg: impl Into<String>) -> Self {
        Self::InsufficientData(msg.into())
    }

    /// Returns true when the failure comes from the data rather than
    /// from misuse of the API.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Degenerate(_) | Self::DivisionByZero { .. } | Self::Math(_)
        )
    }
}

/// Non-fatal conditions attached to a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskWarning {
    /// Fewer observations than recommended for a stable estimate.
    InsufficientData {
        /// Observations supplied.
        observations: usize,
        /// Recommended minimum.
        recommended: usize,
    },
    /// The bond has no whole coupon period before maturity; it was treated
    /// as a single payment at maturity.
    NoCouponPeriods {
        /// Maturity in years.
        maturity_years: f64,
        /// Coupon frequency.
        frequency: u32,
    },
}

impl fmt::Display for RiskWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientData {
                observations,
                recommended,
            } => write!(
                f,
                "only {observations} observations, at least {recommended} recommended"
            ),
            Self::NoCouponPeriods {
                maturity_years,
                frequency,
            } => write!(
                f,
                "maturity {maturity_years}y is shorter than one coupon period at frequency {frequency}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RiskError::invalid_input("price must be positive");
        assert_eq!(err.to_string(), "invalid input: price must be positive");

        let err = RiskError::NotFitted("transform".into());
        assert!(err.to_string().contains("transform"));
    }

    #[test]
    fn test_recoverable() {
        assert!(RiskError::Degenerate("zero variance".into()).is_recoverable());
        assert!(!RiskError::UnknownMethod("garch".into()).is_recoverable());
    }

    #[test]
    fn test_warning_display() {
        let w = RiskWarning::InsufficientData {
            observations: 10,
            recommended: 30,
        };
        assert_eq!(w.to_string(), "only 10 observations, at least 30 recommended");
    }
}
