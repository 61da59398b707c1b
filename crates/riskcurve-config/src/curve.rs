//! Validation of curve fitting settings.
//!
//! [`FitConfig`] lives with the fitter in `riskcurve-curves`; this module
//! adds the field-level checks applied when it is loaded as part of an
//! [`AnalyticsConfig`](crate::AnalyticsConfig).

use riskcurve_curves::FitConfig;

use crate::error::{Validate, ValidationError};

impl Validate for FitConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for (field, (low, high)) in [
            ("level_bounds", self.level_bounds),
            ("factor_bounds", self.factor_bounds),
            ("decay_bounds", self.decay_bounds),
        ] {
            if !(low.is_finite() && high.is_finite()) || low >= high {
                errors.push(ValidationError::with_rule(
                    field,
                    format!("Lower bound {low} must be below upper bound {high}"),
                    "ordered_bounds",
                ));
            }
        }

        if self.decay_bounds.0 <= 0.0 {
            errors.push(ValidationError::with_rule(
                "decay_bounds",
                "Decay factors must stay positive",
                "positive_decay",
            ));
        }

        let (low, high) = self.decay_bounds;
        for (field, lambda) in [
            ("initial_lambda", self.initial_lambda),
            ("initial_lambda2", self.initial_lambda2),
        ] {
            if !(lambda >= low && lambda <= high) {
                errors.push(ValidationError::with_rule(
                    field,
                    format!("Starting decay {lambda} is outside [{low}, {high}]"),
                    "within_bounds",
                ));
            }
        }

        if self.max_iterations == 0 {
            errors.push(ValidationError::new(
                "max_iterations",
                "At least one iteration is required",
            ));
        }

        for (field, tol) in [("ftol", self.ftol), ("xtol", self.xtol)] {
            if !(tol > 0.0 && tol < 1.0) {
                errors.push(ValidationError::with_rule(
                    field,
                    format!("Tolerance {tol} must be in (0, 1)"),
                    "valid_tolerance",
                ));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fit_config_is_valid() {
        assert!(FitConfig::default().is_valid());
    }

    #[test]
    fn test_inverted_bounds() {
        let config = FitConfig {
            level_bounds: (0.2, -0.1),
            ..FitConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "level_bounds");
    }

    #[test]
    fn test_starting_decay_outside_bounds() {
        let config = FitConfig::default().with_initial_lambda(25.0);
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.field == "initial_lambda"));
    }

    #[test]
    fn test_zero_iterations_and_bad_tolerance() {
        let config = FitConfig {
            max_iterations: 0,
            ftol: 0.0,
            ..FitConfig::default()
        };
        let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["max_iterations", "ftol"]);
    }

    #[test]
    fn test_non_positive_decay() {
        let config = FitConfig {
            decay_bounds: (0.0, 10.0),
            ..FitConfig::default()
        };
        assert!(config
            .validate()
            .iter()
            .any(|e| e.rule.as_deref() == Some("positive_decay")));
    }
}
