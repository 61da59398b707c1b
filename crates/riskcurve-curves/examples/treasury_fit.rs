//! Treasury Curve Fitting Example
//!
//! Fits Nelson-Siegel and Svensson models to the Treasury curve and prints
//! the parameters, fit quality, residuals and forward rates.
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
//!
//! Run with: cargo run -p riskcurve-curves --example treasury_fit

use riskcurve_curves::prelude::*;

const TENORS: [&str; 11] = [
    "1M", "3M", "6M", "1Y", "2Y", "3Y", "5Y", "7Y", "10Y", "20Y", "30Y",
];
const MATURITIES: [f64; 11] = [
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
const YIELDS: [f64; 11] = [
    0.03936, 0.03806, 0.03774, 0.03591, 0.03502, 0.03493, 0.03603, 0.03788, 0.04018, 0.04628,
    0.04667,
];

fn main() -> Result<(), CurveError> {
    println!("===========================================");
    println!("  Treasury Curve Fitting Example");
    println!("  Market Data: November 28, 2025");
    println!("===========================================\n");

    let config = FitConfig::default();

    for kind in [CurveModelKind::NelsonSiegel, CurveModelKind::Svensson] {
        let fit = kind.fit(&MATURITIES, &YIELDS, &config)?;
        print_fit(&fit)?;
    }

    println!("Stateful model:");
    let mut model = YieldCurveModel::svensson();
    match model.predict(&[10.0]) {
        Err(e) => println!("  before fit: {e}"),
        Ok(_) => println!("  before fit: unexpected prediction"),
    }
    model.fit(&MATURITIES, &YIELDS)?;
    let ten = model.predict(&[10.0])?;
    println!("  after fit:  10Y = {:.3}%", ten[0] * 100.0);

    Ok(())
}

fn print_fit(fit: &CurveFitResult) -> Result<(), CurveError> {
    println!("{} ({} iterations)", fit.model_kind, fit.iterations);
    println!("-------------------------------------------");
    println!("  beta0   = {:>9.5}", fit.beta0());
    println!("  beta1   = {:>9.5}", fit.beta1());
    println!("  beta2   = {:>9.5}", fit.beta2());
    if let Some(beta3) = fit.beta3() {
        println!("  beta3   = {beta3:>9.5}");
    }
    println!("  lambda1 = {:>9.4}", fit.lambda1());
    if let Some(lambda2) = fit.lambda2() {
        println!("  lambda2 = {lambda2:>9.4}");
    }
    println!("  RMSE    = {:.2} bp", fit.rmse * 10_000.0);
    println!("  R^2     = {:.4}\n", fit.r_squared);

    let fitted = fit.predict(&MATURITIES)?;
    let forwards = fit.forward_rates(&MATURITIES)?;

    println!("  Tenor   Market   Fitted   Resid(bp)  Forward");
    for (i, tenor) in TENORS.iter().enumerate() {
        println!(
            "  {:<5} {:>7.3}% {:>7.3}% {:>9.2} {:>8.3}%",
            tenor,
            YIELDS[i] * 100.0,
            fitted[i] * 100.0,
            (fitted[i] - YIELDS[i]) * 10_000.0,
            forwards[i] * 100.0
        );
    }
    println!();
    Ok(())
}
