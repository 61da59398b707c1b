//! Integration test: fit parametric curves to Treasury yields.
//!
//! Market Data: November 28, 2025
//!
//! | Tenor | Yield   |
//! |-------|---------|
//! | 1M    | 3.936%  |
//! | 3M    | 3.806%  |
//! | 6M    | 3.774%  |
//! | 1Y    | 3.591%  |
//! | 2Y    | 3.502%  |
//! | 3Y    | 3.493%  |
//! | 5Y    | 3.603%  |
//! | 7Y    | 3.788%  |
//! | 10Y   | 4.018%  |
//! | 20Y   | 4.628%  |
//! | 30Y   | 4.667%  |

use approx::assert_relative_eq;
use riskcurve_curves::prelude::*;

const TREASURY_MATURITIES: [f64; 11] = [
    1.0 / 12.0,
    0.25,
    0.5,
    1.0,
    2.0,
    3.0,
    5.0,
    7.0,
    10.0,
    20.0,
    30.0,
];

const TREASURY_YIELDS: [f64; 11] = [
    0.03936, 0.03806, 0.03774, 0.03591, 0.03502, 0.03493, 0.03603, 0.03788, 0.04018, 0.04628,
    0.04667,
];

const STANDARD_MATURITIES: [f64; 10] = [0.25, 0.5, 1.0, 2.0, 3.0, 5.0, 7.0, 10.0, 20.0, 30.0];

const SAMPLE_YIELDS: [f64; 10] = [0.01, 0.015, 0.02, 0.025, 0.03, 0.035, 0.04, 0.042, 0.045, 0.044];

const INVERTED_YIELDS: [f64; 10] = [0.05, 0.049, 0.047, 0.045, 0.043, 0.041, 0.04, 0.039, 0.038, 0.037];

/// Hump near the 2-5Y sector with a few basis points of noise.
fn humped_yields() -> Vec<f64> {
    let shape = CurveParameters::nelson_siegel(0.04, -0.015, 0.045, 1.5).unwrap();
    STANDARD_MATURITIES
        .iter()
        .enumerate()
        .map(|(i, &m)| shape.yield_at(m) + if i % 2 == 0 { 0.0002 } else { -0.0002 })
        .collect()
}

#[test]
fn test_sample_scenario_fit() {
    let fit = CurveModelKind::NelsonSiegel
        .fit(&STANDARD_MATURITIES, &SAMPLE_YIELDS, &FitConfig::default())
        .unwrap();

    println!(
        "NS fit: b0={:.5} b1={:.5} b2={:.5} lambda={:.4} rmse={:.2e} r2={:.4}",
        fit.beta0(),
        fit.beta1(),
        fit.beta2(),
        fit.lambda1(),
        fit.rmse,
        fit.r_squared
    );
    assert!(fit.r_squared > 0.95);
}

#[test]
fn test_sample_scenario_svensson_fit() {
    let config = FitConfig::default();
    let ns = CurveModelKind::NelsonSiegel
        .fit(&STANDARD_MATURITIES, &SAMPLE_YIELDS, &config)
        .unwrap();
    let sv = CurveModelKind::Svensson
        .fit(&STANDARD_MATURITIES, &SAMPLE_YIELDS, &config)
        .unwrap();

    assert_eq!(sv.model_kind, CurveModelKind::Svensson);
    assert!(sv.r_squared > 0.95, "r2 {}", sv.r_squared);
    assert!(sv.rmse <= ns.rmse + 1e-12, "svensson {} vs ns {}", sv.rmse, ns.rmse);
    assert!(sv.iterations <= 2 * config.max_iterations);
}

#[test]
fn test_svensson_fits_inverted_and_humped_curves() {
    let config = FitConfig::default();
    let curves = [("inverted", INVERTED_YIELDS.to_vec()), ("humped", humped_yields())];

    for (name, yields) in &curves {
        let ns = CurveModelKind::NelsonSiegel
            .fit(&STANDARD_MATURITIES, yields, &config)
            .unwrap_or_else(|e| panic!("{name} nelson-siegel: {e}"));
        let sv = CurveModelKind::Svensson
            .fit(&STANDARD_MATURITIES, yields, &config)
            .unwrap_or_else(|e| panic!("{name} svensson: {e}"));

        assert!(ns.r_squared > 0.95, "{name} ns r2 {}", ns.r_squared);
        assert!(sv.r_squared > 0.95, "{name} svensson r2 {}", sv.r_squared);
        assert!(sv.rmse <= ns.rmse + 1e-12, "{name}: {} vs {}", sv.rmse, ns.rmse);
    }
}

#[test]
fn test_synthetic_curve_recovery() {
    let truth = CurveParameters::nelson_siegel(0.05, -0.02, 0.01, 2.0).unwrap();
    let yields: Vec<f64> = STANDARD_MATURITIES.iter().map(|&m| truth.yield_at(m)).collect();

    let mut model = YieldCurveModel::nelson_siegel();
    let fit = model.fit(&STANDARD_MATURITIES, &yields).unwrap();

    assert!(fit.r_squared > 0.99);
    assert_relative_eq!(fit.beta0(), 0.05, epsilon = 1e-3);
    assert_relative_eq!(fit.beta1(), -0.02, epsilon = 1e-3);
    assert_relative_eq!(fit.beta2(), 0.01, epsilon = 2e-3);
    assert_relative_eq!(fit.lambda1(), 2.0, epsilon = 0.2);
}

#[test]
fn test_treasury_nelson_siegel() {
    let fit = CurveModelKind::NelsonSiegel
        .fit(&TREASURY_MATURITIES, &TREASURY_YIELDS, &FitConfig::default())
        .unwrap();

    // Within 20bp across the curve
    assert!(fit.rmse < 0.002, "rmse {}", fit.rmse);
    assert!(fit.r_squared > 0.8, "r2 {}", fit.r_squared);

    let fitted = fit.predict(&TREASURY_MATURITIES).unwrap();
    for (f, y) in fitted.iter().zip(&TREASURY_YIELDS) {
        assert!((f - y).abs() < 0.005, "fitted {f} vs observed {y}");
    }
}

#[test]
fn test_treasury_svensson_not_worse_than_nelson_siegel() {
    let config = FitConfig::default();
    let ns = CurveModelKind::NelsonSiegel
        .fit(&TREASURY_MATURITIES, &TREASURY_YIELDS, &config)
        .unwrap();
    let sv = CurveModelKind::Svensson
        .fit(&TREASURY_MATURITIES, &TREASURY_YIELDS, &config)
        .unwrap();

    assert_eq!(sv.model_kind, CurveModelKind::Svensson);
    assert!(sv.rmse <= ns.rmse + 1e-12);
    assert!(sv.r_squared >= ns.r_squared - 1e-9);
    assert!(sv.iterations >= ns.iterations);
}

#[test]
fn test_fitted_parameters_within_bounds() {
    let config = FitConfig::default();
    let fit = CurveModelKind::Svensson
        .fit(&TREASURY_MATURITIES, &TREASURY_YIELDS, &config)
        .unwrap();

    let bounds = config.bounds(CurveModelKind::Svensson).unwrap();
    assert!(bounds.contains(&fit.parameters.to_vec()));
}

#[test]
fn test_forward_curve_consistency() {
    let fit = CurveModelKind::NelsonSiegel
        .fit(&TREASURY_MATURITIES, &TREASURY_YIELDS, &FitConfig::default())
        .unwrap();

    // Forward and zero curves meet at the short end, the forward curve reaches the level first
    let zero = fit.predict(&[0.0, 200.0]).unwrap();
    let fwd = fit.forward_rates(&[0.0, 200.0]).unwrap();

    assert_relative_eq!(zero[0], fwd[0], epsilon = 1e-6);
    assert_relative_eq!(fwd[1], fit.beta0(), epsilon = 1e-6);
}

#[test]
fn test_curve_points_for_downstream_use() {
    let fit = CurveModelKind::NelsonSiegel
        .fit(&TREASURY_MATURITIES, &TREASURY_YIELDS, &FitConfig::default())
        .unwrap();

    let points = fit.curve_points(&[0.25, 2.0, 10.0]).unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!(points[1].maturity(), 2.0);
    assert!(fit.curve_points(&[0.0]).is_err());
}

#[test]
fn test_fit_result_serialization() {
    let fit = CurveModelKind::NelsonSiegel
        .fit(&TREASURY_MATURITIES, &TREASURY_YIELDS, &FitConfig::default())
        .unwrap();

    let json = serde_json::to_string(&fit).unwrap();
    assert!(json.contains("\"model_kind\":\"nelson_siegel\""));

    let back: CurveFitResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.model_kind, fit.model_kind);
    assert_eq!(back.observations, fit.observations);
    assert_relative_eq!(back.beta0(), fit.beta0(), epsilon = 1e-12);
    assert_relative_eq!(back.rmse, fit.rmse, epsilon = 1e-12);
}
