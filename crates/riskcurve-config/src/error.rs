//! Configuration error types.

use riskcurve_curves::CurveError;
use riskcurve_risk::RiskError;
use thiserror::Error;

/// Configuration operation result type.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Validation error.
    #[error("Validation error: {field}: {message}")]
    Validation {
        /// Field that failed validation.
        field: String,
        /// Validation error message.
        message: String,
    },

    /// Multiple validation errors.
    #[error("Multiple validation errors: {}", join(.0))]
    MultipleValidationErrors(Vec<ValidationError>),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// A setting was rejected while building a curve component.
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// A setting was rejected while building a risk component.
    #[error(transparent)]
    Risk(#[from] RiskError),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field that failed validation, dotted for nested sections.
    pub field: String,
    /// Validation error message.
    pub message: String,
    /// Validation rule that was violated.
    pub rule: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Creates a validation error with a rule name.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }

    /// Prefixes the field with the name of the enclosing section.
    #[must_use]
    pub fn nested(mut self, section: &str) -> Self {
        self.field = format!("{section}.{}", self.field);
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref rule) = self.rule {
            write!(f, "{}: {} (rule: {})", self.field, self.message, rule)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            ConfigError::Deserialization(err.to_string())
        } else {
            ConfigError::Serialization(err.to_string())
        }
    }
}

/// Trait for validatable configurations.
pub trait Validate {
    /// Validates the configuration.
    ///
    /// Returns a list of validation errors, or an empty vector if valid.
    fn validate(&self) -> Vec<ValidationError>;

    /// Returns true if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Validates and returns an error if invalid.
    fn validate_or_error(&self) -> ConfigResult<()> {
        let mut errors = self.validate();
        match errors.len() {
            0 => Ok(()),
            1 => {
                let err = errors.remove(0);
                Err(ConfigError::Validation {
                    field: err.field,
                    message: err.message,
                })
            }
            _ => Err(ConfigError::MultipleValidationErrors(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Limits {
        low: f64,
        high: f64,
    }

    impl Validate for Limits {
        fn validate(&self) -> Vec<ValidationError> {
            let mut errors = Vec::new();
            if self.low < 0.0 {
                errors.push(ValidationError::new("low", "must be non-negative"));
            }
            if self.high <= self.low {
                errors.push(ValidationError::with_rule(
                    "high",
                    "must exceed low",
                    "ordered_bounds",
                ));
            }
            errors
        }
    }

    #[test]
    fn test_validate_or_error_single() {
        let err = Limits { low: 0.0, high: 0.0 }.validate_or_error().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "high"));
    }

    #[test]
    fn test_validate_or_error_multiple() {
        let limits = Limits {
            low: -1.0,
            high: -2.0,
        };
        assert!(!limits.is_valid());
        match limits.validate_or_error().unwrap_err() {
            ConfigError::MultipleValidationErrors(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_display() {
        let err = ValidationError::with_rule("seed", "bad", "rule_x").nested("var");
        assert_eq!(err.to_string(), "var.seed: bad (rule: rule_x)");
        assert_eq!(ValidationError::new("a", "b").to_string(), "a: b");
    }

    #[test]
    fn test_json_error_maps_to_deserialization() {
        let err: ConfigError = serde_json::from_str::<f64>("not json").unwrap_err().into();
        assert!(matches!(err, ConfigError::Deserialization(_)));
    }
}
