//! Error types for yield curve operations.

use riskcurve_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Invalid input value.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },

    /// Maturities and yields have different lengths.
    #[error("Length mismatch: {maturities} maturities vs {yields} yields")]
    LengthMismatch {
        /// Number of maturities supplied.
        maturities: usize,
        /// Number of yields supplied.
        yields: usize,
    },

    /// Not enough observations to identify the model parameters.
    #[error("Insufficient points: need at least {required}, got {got}")]
    InsufficientPoints {
        /// Minimum required points.
        required: usize,
        /// Actual number of points provided.
        got: usize,
    },

    /// Model name could not be parsed.
    #[error("Unknown curve model: {name}")]
    UnknownModel {
        /// The name that was supplied.
        name: String,
    },

    /// The optimizer did not produce a usable fit.
    #[error("Curve fit failed after {iterations} iterations (rmse: {rmse:.2e}): {reason}")]
    FitFailed {
        /// Number of iterations attempted.
        iterations: u32,
        /// RMSE at the last iterate.
        rmse: f64,
        /// Description of failure.
        reason: String,
    },

    /// A model was evaluated before it was fitted.
    #[error("Model not fitted: call fit() before {operation}")]
    NotFitted {
        /// The operation that was attempted.
        operation: String,
    },

    /// Underlying numerical routine failed.
    #[error(transparent)]
    Math(#[from] MathError),
}

impl CurveError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an insufficient points error.
    #[must_use]
    pub fn insufficient_points(required: usize, got: usize) -> Self {
        Self::InsufficientPoints { required, got }
    }

    /// Creates a fit failure error.
    #[must_use]
    pub fn fit_failed(iterations: u32, rmse: f64, reason: impl Into<String>) -> Self {
        Self::FitFailed {
            iterations,
            rmse,
            reason: reason.into(),
        }
    }

    /// Creates a not-fitted error.
    #[must_use]
    pub fn not_fitted(operation: impl Into<String>) -> Self {
        Self::NotFitted {
            operation: operation.into(),
        }
    }

    /// Returns true for failures that depend on the data rather than on
    /// how the library was called. The caller may retry with other data or
    /// another model.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::FitFailed { .. } | Self::Math(_))
    }
}
