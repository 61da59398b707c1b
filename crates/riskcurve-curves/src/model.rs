//! Parametric yield curve models.
//!
//! Both models share the same loading factors:
//!
//! ```text
//! L1(x) = (1 - e^(-x)) / x
//! L2(x) = L1(x) - e^(-x)
//! ```
//!
//! Nelson-Siegel: `y(τ) = β₀ + β₁·L1(τ/λ) + β₂·L2(τ/λ)`.
//! Svensson adds a second hump `β₃·L2(τ/λ₂)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// Maturity substituted for `τ = 0` before evaluating the loading factors.
pub const ZERO_MATURITY_EPSILON: f64 = 1e-6;

/// Replaces a zero maturity with [`ZERO_MATURITY_EPSILON`].
///
/// Any other value is returned unchanged.
#[inline]
#[must_use]
pub fn guard_maturity(tau: f64) -> f64 {
    if tau == 0.0 {
        ZERO_MATURITY_EPSILON
    } else {
        tau
    }
}

/// `(1 - e^(-x)) / x`
#[inline]
fn loading_factor_1(x: f64) -> f64 {
    -(-x).exp_m1() / x
}

/// `(1 - e^(-x)) / x - e^(-x)`
#[inline]
fn loading_factor_2(x: f64) -> f64 {
    loading_factor_1(x) - (-x).exp()
}

/// Supported curve model families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveModelKind {
    /// Four-parameter Nelson-Siegel.
    NelsonSiegel,
    /// Six-parameter Svensson extension.
    Svensson,
}

impl CurveModelKind {
    /// Number of free parameters, which is also the minimum number of
    /// observations a fit needs.
    #[must_use]
    pub fn parameter_count(self) -> usize {
        match self {
            Self::NelsonSiegel => 4,
            Self::Svensson => 6,
        }
    }

    /// Canonical name, as accepted by [`FromStr`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::NelsonSiegel => "nelson_siegel",
            Self::Svensson => "svensson",
        }
    }
}

impl fmt::Display for CurveModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CurveModelKind {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nelson_siegel" => Ok(Self::NelsonSiegel),
            "svensson" => Ok(Self::Svensson),
            _ => Err(CurveError::UnknownModel {
                name: s.to_string(),
            }),
        }
    }
}

/// Fitted parameters of a curve model.
///
/// - `beta0`: long-term level
/// - `beta1`: short-term component (`beta0 + beta1` is the short rate)
/// - `beta2`, `beta3`: medium-term humps
/// - `lambda`, `lambda1`, `lambda2`: decay factors in years
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum CurveParameters {
    /// Nelson-Siegel parameters.
    NelsonSiegel {
        /// Level.
        beta0: f64,
        /// Slope.
        beta1: f64,
        /// Curvature.
        beta2: f64,
        /// Decay factor.
        lambda: f64,
    },
    /// Svensson parameters.
    Svensson {
        /// Level.
        beta0: f64,
        /// Slope.
        beta1: f64,
        /// First hump.
        beta2: f64,
        /// Second hump.
        beta3: f64,
        /// First decay factor.
        lambda1: f64,
        /// Second decay factor.
        lambda2: f64,
    },
}

impl CurveParameters {
    /// Creates Nelson-Siegel parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if `lambda` is not positive or any value is not finite.
    pub fn nelson_siegel(beta0: f64, beta1: f64, beta2: f64, lambda: f64) -> CurveResult<Self> {
        check_finite(&[beta0, beta1, beta2, lambda])?;
        check_decay("lambda", lambda)?;
        Ok(Self::NelsonSiegel {
            beta0,
            beta1,
            beta2,
            lambda,
        })
    }

    /// Creates Svensson parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if either decay factor is not positive or any value
    /// is not finite.
    pub fn svensson(
        beta0: f64,
        beta1: f64,
        beta2: f64,
        beta3: f64,
        lambda1: f64,
        lambda2: f64,
    ) -> CurveResult<Self> {
        check_finite(&[beta0, beta1, beta2, beta3, lambda1, lambda2])?;
        check_decay("lambda1", lambda1)?;
        check_decay("lambda2", lambda2)?;
        Ok(Self::Svensson {
            beta0,
            beta1,
            beta2,
            beta3,
            lambda1,
            lambda2,
        })
    }

    /// Rebuilds parameters from an optimizer vector in model order.
    pub(crate) fn from_slice(kind: CurveModelKind, p: &[f64]) -> CurveResult<Self> {
        if p.len() != kind.parameter_count() {
            return Err(CurveError::invalid_input(format!(
                "{kind} expects {} parameters, got {}",
                kind.parameter_count(),
                p.len()
            )));
        }
        match kind {
            CurveModelKind::NelsonSiegel => Self::nelson_siegel(p[0], p[1], p[2], p[3]),
            CurveModelKind::Svensson => Self::svensson(p[0], p[1], p[2], p[3], p[4], p[5]),
        }
    }

    /// The model family these parameters belong to.
    #[must_use]
    pub fn kind(&self) -> CurveModelKind {
        match self {
            Self::NelsonSiegel { .. } => CurveModelKind::NelsonSiegel,
            Self::Svensson { .. } => CurveModelKind::Svensson,
        }
    }

    /// Parameters in model order (`β₀, β₁, β₂, [β₃,] λ₁, [λ₂]`).
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        match *self {
            Self::NelsonSiegel {
                beta0,
                beta1,
                beta2,
                lambda,
            } => vec![beta0, beta1, beta2, lambda],
            Self::Svensson {
                beta0,
                beta1,
                beta2,
                beta3,
                lambda1,
                lambda2,
            } => vec![beta0, beta1, beta2, beta3, lambda1, lambda2],
        }
    }

    /// Zero yield at maturity `tau` (years).
    ///
    /// A zero maturity is evaluated at [`ZERO_MATURITY_EPSILON`].
    #[must_use]
    pub fn yield_at(&self, tau: f64) -> f64 {
        yield_from_slice(self.kind(), &self.to_vec(), tau)
    }

    /// Instantaneous forward rate at maturity `tau` (years).
    ///
    /// ```text
    /// f(τ) = β₀ + β₁·e^(-τ/λ) + β₂·(τ/λ)·e^(-τ/λ) [+ β₃·(τ/λ₂)·e^(-τ/λ₂)]
    /// ```
    #[must_use]
    pub fn forward_at(&self, tau: f64) -> f64 {
        match *self {
            Self::NelsonSiegel {
                beta0,
                beta1,
                beta2,
                lambda,
            } => {
                let x = tau / lambda;
                let exp_x = (-x).exp();
                beta0 + beta1 * exp_x + beta2 * x * exp_x
            }
            Self::Svensson {
                beta0,
                beta1,
                beta2,
                beta3,
                lambda1,
                lambda2,
            } => {
                let x1 = tau / lambda1;
                let x2 = tau / lambda2;
                let exp_x1 = (-x1).exp();
                let exp_x2 = (-x2).exp();
                beta0 + beta1 * exp_x1 + beta2 * x1 * exp_x1 + beta3 * x2 * exp_x2
            }
        }
    }

    /// Long-term level `β₀`.
    #[must_use]
    pub fn beta0(&self) -> f64 {
        match *self {
            Self::NelsonSiegel { beta0, .. } | Self::Svensson { beta0, .. } => beta0,
        }
    }

    /// Short-term component `β₁`.
    #[must_use]
    pub fn beta1(&self) -> f64 {
        match *self {
            Self::NelsonSiegel { beta1, .. } | Self::Svensson { beta1, .. } => beta1,
        }
    }

    /// First hump `β₂`.
    #[must_use]
    pub fn beta2(&self) -> f64 {
        match *self {
            Self::NelsonSiegel { beta2, .. } | Self::Svensson { beta2, .. } => beta2,
        }
    }

    /// Second hump `β₃` (Svensson only).
    #[must_use]
    pub fn beta3(&self) -> Option<f64> {
        match *self {
            Self::NelsonSiegel { .. } => None,
            Self::Svensson { beta3, .. } => Some(beta3),
        }
    }

    /// First decay factor.
    #[must_use]
    pub fn lambda1(&self) -> f64 {
        match *self {
            Self::NelsonSiegel { lambda, .. } => lambda,
            Self::Svensson { lambda1, .. } => lambda1,
        }
    }

    /// Second decay factor (Svensson only).
    #[must_use]
    pub fn lambda2(&self) -> Option<f64> {
        match *self {
            Self::NelsonSiegel { .. } => None,
            Self::Svensson { lambda2, .. } => Some(lambda2),
        }
    }
}

/// Model yield for a raw parameter vector. Used by the fitter so the
/// optimizer can evaluate trial points without validating them.
pub(crate) fn yield_from_slice(kind: CurveModelKind, p: &[f64], tau: f64) -> f64 {
    let tau = guard_maturity(tau);
    match kind {
        CurveModelKind::NelsonSiegel => {
            let x = tau / p[3];
            p[0] + p[1] * loading_factor_1(x) + p[2] * loading_factor_2(x)
        }
        CurveModelKind::Svensson => {
            let x1 = tau / p[4];
            let x2 = tau / p[5];
            p[0] + p[1] * loading_factor_1(x1)
                + p[2] * loading_factor_2(x1)
                + p[3] * loading_factor_2(x2)
        }
    }
}

fn check_finite(values: &[f64]) -> CurveResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(CurveError::invalid_input("curve parameters must be finite"))
    }
}

fn check_decay(name: &str, value: f64) -> CurveResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(CurveError::invalid_input(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_ns() -> CurveParameters {
        CurveParameters::nelson_siegel(0.05, -0.02, 0.01, 2.0).unwrap()
    }

    #[test]
    fn test_model_kind_parse() {
        assert_eq!(
            "nelson_siegel".parse::<CurveModelKind>().unwrap(),
            CurveModelKind::NelsonSiegel
        );
        assert_eq!(
            "Svensson".parse::<CurveModelKind>().unwrap(),
            CurveModelKind::Svensson
        );
        assert!(matches!(
            "cubic".parse::<CurveModelKind>(),
            Err(CurveError::UnknownModel { .. })
        ));
    }

    #[test]
    fn test_nelson_siegel_limits() {
        let p = sample_ns();

        // Short end approaches β₀ + β₁, long end approaches β₀
        assert_relative_eq!(p.yield_at(1e-8), 0.03, epsilon = 1e-8);
        assert_relative_eq!(p.yield_at(1000.0), 0.05, epsilon = 1e-4);
    }

    #[test]
    fn test_known_value() {
        let p = sample_ns();
        let x: f64 = 5.0 / 2.0;
        let l1 = (1.0 - (-x).exp()) / x;
        let expected = 0.05 - 0.02 * l1 + 0.01 * (l1 - (-x).exp());

        assert_relative_eq!(p.yield_at(5.0), expected, epsilon = 1e-14);
    }

    #[test]
    fn test_zero_maturity_guard() {
        let p = sample_ns();
        let y0 = p.yield_at(0.0);

        assert!(y0.is_finite());
        assert_eq!(y0, p.yield_at(ZERO_MATURITY_EPSILON));
        assert_eq!(guard_maturity(0.5), 0.5);
    }

    #[test]
    fn test_forward_rate() {
        let p = sample_ns();

        assert_relative_eq!(p.forward_at(0.0), 0.03, epsilon = 1e-14);
        let x: f64 = 2.0 / 2.0;
        let expected = 0.05 - 0.02 * (-x).exp() + 0.01 * x * (-x).exp();
        assert_relative_eq!(p.forward_at(2.0), expected, epsilon = 1e-14);
    }

    #[test]
    fn test_svensson_reduces_to_nelson_siegel() {
        let ns = sample_ns();
        let sv = CurveParameters::svensson(0.05, -0.02, 0.01, 0.0, 2.0, 5.0).unwrap();

        for tau in [0.0, 0.25, 1.0, 7.0, 30.0] {
            assert_relative_eq!(sv.yield_at(tau), ns.yield_at(tau), epsilon = 1e-14);
            assert_relative_eq!(sv.forward_at(tau), ns.forward_at(tau), epsilon = 1e-14);
        }
    }

    #[test]
    fn test_svensson_second_hump_in_forward() {
        let sv = CurveParameters::svensson(0.05, -0.02, 0.01, 0.02, 2.0, 5.0).unwrap();
        let base = CurveParameters::svensson(0.05, -0.02, 0.01, 0.0, 2.0, 5.0).unwrap();
        let x: f64 = 5.0 / 5.0;

        assert_relative_eq!(
            sv.forward_at(5.0) - base.forward_at(5.0),
            0.02 * x * (-x).exp(),
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_invalid_decay() {
        assert!(CurveParameters::nelson_siegel(0.05, -0.02, 0.01, 0.0).is_err());
        assert!(CurveParameters::svensson(0.05, -0.02, 0.01, 0.0, 2.0, -1.0).is_err());
        assert!(CurveParameters::nelson_siegel(f64::NAN, -0.02, 0.01, 2.0).is_err());
    }

    #[test]
    fn test_accessors() {
        let sv = CurveParameters::svensson(0.05, -0.02, 0.01, 0.003, 2.0, 5.0).unwrap();
        assert_eq!(sv.kind(), CurveModelKind::Svensson);
        assert_eq!(sv.beta3(), Some(0.003));
        assert_eq!(sv.lambda2(), Some(5.0));
        assert_eq!(sample_ns().beta3(), None);
        assert_eq!(sv.to_vec().len(), 6);
    }

    #[test]
    fn test_serde_tagged() {
        let json = serde_json::to_string(&sample_ns()).unwrap();
        assert!(json.contains("\"model\":\"nelson_siegel\""));
        let back: CurveParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample_ns());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn svensson_strategy() -> impl Strategy<Value = CurveParameters> {
            (
                0.0f64..0.1,
                -0.1f64..0.1,
                -0.1f64..0.1,
                -0.1f64..0.1,
                0.2f64..10.0,
                0.2f64..10.0,
            )
                .prop_map(|(b0, b1, b2, b3, l1, l2)| {
                    CurveParameters::svensson(b0, b1, b2, b3, l1, l2).unwrap()
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(500))]

            #[test]
            fn forward_is_derivative_of_yield_times_maturity(
                params in svensson_strategy(),
                tau in 0.1f64..30.0,
            ) {
                // f(τ) = d(τ·y(τ))/dτ
                let h = 1e-5;
                let up = (tau + h) * params.yield_at(tau + h);
                let down = (tau - h) * params.yield_at(tau - h);
                let numeric = (up - down) / (2.0 * h);
                prop_assert!((numeric - params.forward_at(tau)).abs() < 1e-6);
            }

            #[test]
            fn short_end_tends_to_level_plus_slope(params in svensson_strategy()) {
                let short = params.yield_at(0.0);
                prop_assert!(short.is_finite());
                prop_assert!((short - (params.beta0() + params.beta1())).abs() < 1e-5);
            }
        }
    }
}
