//! Key rate duration calculations.
//!
//! Key rate durations measure sensitivity to specific points on the yield curve,
//! allowing for more granular risk management than parallel shift measures.
//!
//! The built-in [`DistanceWeightedKeyRates`] is a distance-decay proxy, not a
//! bump-and-revalue measure: each tenor up to the bond's maturity receives
//! `exp(-|maturity - tenor|) × base_sensitivity`. Callers that reprice bonds
//! off a curve can supply their own [`KeyRateModel`].

use std::collections::BTreeMap;

use riskcurve_curves::YieldCurvePoint;
use serde::{Deserialize, Serialize, Serializer};

use super::Duration;
use crate::error::{RiskError, RiskResult};

/// Standard key rate tenors
pub const STANDARD_KEY_RATE_TENORS: &[f64] = &[
    0.25, // 3 months
    0.5,  // 6 months
    1.0,  // 1 year
    2.0,  // 2 years
    3.0,  // 3 years
    5.0,  // 5 years
    7.0,  // 7 years
    10.0, // 10 years
    20.0, // 20 years
    30.0, // 30 years
];

/// Default sensitivity assigned at the tenor nearest the bond's maturity.
pub const DEFAULT_BASE_SENSITIVITY: f64 = 0.1;

/// Key rate duration for a specific tenor point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyRateDuration {
    /// The tenor point (in years)
    pub tenor: f64,
    /// Display label such as `"0.25Y"` or `"10Y"`
    pub label: String,
    /// The duration at this tenor
    pub duration: Duration,
}

impl KeyRateDuration {
    /// Creates a key rate duration labelled from its tenor.
    pub fn new(tenor: f64, duration: Duration) -> Self {
        Self {
            tenor,
            label: tenor_label(tenor),
            duration,
        }
    }
}

/// Label for a tenor in years: `0.25` → `"0.25Y"`, `10.0` → `"10Y"`.
pub fn tenor_label(tenor: f64) -> String {
    format!("{tenor}Y")
}

/// Tenor in years from a label produced by [`tenor_label`].
pub fn parse_tenor_label(label: &str) -> RiskResult<f64> {
    label
        .strip_suffix('Y')
        .and_then(|t| t.parse::<f64>().ok())
        .filter(|t| t.is_finite() && *t > 0.0)
        .ok_or_else(|| RiskError::invalid_input(format!("invalid tenor label {label:?}")))
}

/// Collection of key rate durations, ordered by tenor.
///
/// Serializes as a label to duration map in tenor order, for example
/// `{"0.25Y": 0.0067, "0.5Y": 0.0082, "1Y": 0.011}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>")]
pub struct KeyRateDurations {
    /// Individual key rate durations
    pub durations: Vec<KeyRateDuration>,
}

impl KeyRateDurations {
    /// Create new key rate durations
    pub fn new(mut durations: Vec<KeyRateDuration>) -> Self {
        durations.sort_by(|a, b| a.tenor.total_cmp(&b.tenor));
        Self { durations }
    }

    /// Get the total parallel duration (sum of all key rate durations)
    pub fn total_duration(&self) -> Duration {
        let total: f64 = self.durations.iter().map(|krd| krd.duration.as_f64()).sum();
        Duration::from(total)
    }

    /// Get duration at a specific tenor
    pub fn at_tenor(&self, tenor: f64) -> Option<&KeyRateDuration> {
        self.durations
            .iter()
            .find(|krd| (krd.tenor - tenor).abs() < 0.001)
    }

    /// Get duration by label, e.g. `"5Y"`
    pub fn get(&self, label: &str) -> Option<&KeyRateDuration> {
        self.durations.iter().find(|krd| krd.label == label)
    }

    /// Number of tenors
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    /// True when no tenor applies
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Iterate in tenor order
    pub fn iter(&self) -> impl Iterator<Item = &KeyRateDuration> {
        self.durations.iter()
    }

    /// `(label, duration)` pairs in tenor order.
    pub fn to_pairs(&self) -> Vec<(String, f64)> {
        self.durations
            .iter()
            .map(|krd| (krd.label.clone(), krd.duration.as_f64()))
            .collect()
    }
}

impl Serialize for KeyRateDurations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.durations
                .iter()
                .map(|krd| (krd.label.as_str(), krd.duration.as_f64())),
        )
    }
}

impl TryFrom<BTreeMap<String, f64>> for KeyRateDurations {
    type Error = RiskError;

    fn try_from(map: BTreeMap<String, f64>) -> RiskResult<Self> {
        let durations = map
            .into_iter()
            .map(|(label, value)| {
                Ok(KeyRateDuration {
                    tenor: parse_tenor_label(&label)?,
                    label,
                    duration: Duration::from(value),
                })
            })
            .collect::<RiskResult<Vec<_>>>()?;
        Ok(Self::new(durations))
    }
}

/// Source of key rate sensitivities.
pub trait KeyRateModel: Send + Sync {
    /// Key rate durations for a bond priced off `curve`.
    fn key_rate_durations(
        &self,
        curve: &[YieldCurvePoint],
        maturity_years: f64,
        yield_rate: f64,
    ) -> RiskResult<KeyRateDurations>;
}

/// Distance-decay key rate proxy.
///
/// The curve and yield are accepted for interface compatibility and do not
/// affect the result.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceWeightedKeyRates {
    tenors: Vec<f64>,
    base_sensitivity: f64,
}

impl Default for DistanceWeightedKeyRates {
    fn default() -> Self {
        Self {
            tenors: STANDARD_KEY_RATE_TENORS.to_vec(),
            base_sensitivity: DEFAULT_BASE_SENSITIVITY,
        }
    }
}

impl DistanceWeightedKeyRates {
    /// Creates a proxy over custom tenors.
    pub fn new(tenors: Vec<f64>, base_sensitivity: f64) -> RiskResult<Self> {
        if tenors.is_empty() {
            return Err(RiskError::invalid_input("at least one key rate tenor is required"));
        }
        if tenors.iter().any(|t| !t.is_finite() || *t <= 0.0) {
            return Err(RiskError::invalid_input("key rate tenors must be positive"));
        }
        if !base_sensitivity.is_finite() {
            return Err(RiskError::invalid_input("base sensitivity must be finite"));
        }
        Ok(Self {
            tenors,
            base_sensitivity,
        })
    }

    /// Tenors in use.
    pub fn tenors(&self) -> &[f64] {
        &self.tenors
    }
}

impl KeyRateModel for DistanceWeightedKeyRates {
    fn key_rate_durations(
        &self,
        _curve: &[YieldCurvePoint],
        maturity_years: f64,
        _yield_rate: f64,
    ) -> RiskResult<KeyRateDurations> {
        if !maturity_years.is_finite() || maturity_years <= 0.0 {
            return Err(RiskError::invalid_input(format!(
                "maturity must be positive, got {maturity_years}"
            )));
        }

        let durations = self
            .tenors
            .iter()
            .filter(|&&tenor| tenor <= maturity_years)
            .map(|&tenor| {
                let sensitivity = (-(maturity_years - tenor).abs()).exp() * self.base_sensitivity;
                KeyRateDuration::new(tenor, Duration::from(sensitivity))
            })
            .collect();

        Ok(KeyRateDurations::new(durations))
    }
}

/// Key rate durations with the default distance-decay proxy.
pub fn key_rate_durations(
    curve: &[YieldCurvePoint],
    maturity_years: f64,
    yield_rate: f64,
) -> RiskResult<KeyRateDurations> {
    DistanceWeightedKeyRates::default().key_rate_durations(curve, maturity_years, yield_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_labels() {
        assert_eq!(tenor_label(0.25), "0.25Y");
        assert_eq!(tenor_label(1.0), "1Y");
        assert_eq!(tenor_label(30.0), "30Y");
    }

    #[test]
    fn test_proxy_values() {
        let krds = key_rate_durations(&[], 5.0, 0.045).unwrap();

        // 0.25, 0.5, 1, 2, 3, 5
        assert_eq!(krds.len(), 6);
        assert_relative_eq!(krds.get("5Y").unwrap().duration.as_f64(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(
            krds.get("3Y").unwrap().duration.as_f64(),
            (-2.0_f64).exp() * 0.1,
            epsilon = 1e-12
        );
        assert!(krds.get("7Y").is_none());
    }

    #[test]
    fn test_short_maturity_has_no_tenors() {
        let krds = key_rate_durations(&[], 0.2, 0.03).unwrap();
        assert!(krds.is_empty());
    }

    #[test]
    fn test_ordering_and_total() {
        let krds = KeyRateDurations::new(vec![
            KeyRateDuration::new(10.0, Duration::from(1.5)),
            KeyRateDuration::new(2.0, Duration::from(1.5)),
            KeyRateDuration::new(5.0, Duration::from(2.0)),
        ]);

        let tenors: Vec<f64> = krds.iter().map(|k| k.tenor).collect();
        assert_eq!(tenors, vec![2.0, 5.0, 10.0]);
        assert_relative_eq!(krds.total_duration().as_f64(), 5.0, epsilon = 1e-12);
        assert!(krds.at_tenor(5.0).is_some());
    }

    #[test]
    fn test_serializes_as_label_map_in_tenor_order() {
        let krds = key_rate_durations(&[], 10.0, 0.04).unwrap();
        let json = serde_json::to_string(&krds).unwrap();

        assert!(json.starts_with("{\"0.25Y\":"), "{json}");
        assert!(!json.contains("durations"));
        let ten = json.find("\"10Y\"").unwrap();
        let two = json.find("\"2Y\"").unwrap();
        assert!(two < ten);

        let back: KeyRateDurations = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), krds.len());
        let pairs = back.to_pairs();
        for ((label, value), (expected_label, expected)) in pairs.iter().zip(krds.to_pairs()) {
            assert_eq!(*label, expected_label);
            assert_relative_eq!(*value, expected, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_rejects_bad_labels() {
        assert_eq!(parse_tenor_label("0.25Y").unwrap(), 0.25);
        assert!(parse_tenor_label("5").is_err());
        assert!(parse_tenor_label("-2Y").is_err());
        assert!(serde_json::from_str::<KeyRateDurations>(r#"{"tenY": 0.1}"#).is_err());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(key_rate_durations(&[], 0.0, 0.03).is_err());
        assert!(DistanceWeightedKeyRates::new(vec![], 0.1).is_err());
        assert!(DistanceWeightedKeyRates::new(vec![-1.0], 0.1).is_err());
    }
}
