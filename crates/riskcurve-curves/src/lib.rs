//! # RiskCurve Curves
//!
//! Parametric yield curve models for the RiskCurve fixed income analytics library.
//!
//! This crate provides:
//!
//! - **Models**: Nelson-Siegel and Svensson zero curves with forward rates
//! - **Fitting**: Bounded least-squares calibration to observed yields
//! - **Diagnostics**: RMSE and R² of every fit
//!
//! ## Quick Start
//!
//! ```rust
//! use riskcurve_curves::prelude::*;
//!
//! let maturities = [0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0];
//! let yields = [0.015, 0.018, 0.022, 0.025, 0.028, 0.030, 0.032];
//!
//! let mut model = YieldCurveModel::nelson_siegel();
//! model.fit(&maturities, &yields).unwrap();
//!
//! let fitted = model.predict(&[3.0, 7.0]).unwrap();
//! let forwards = model.forward_rates(&[3.0, 7.0]).unwrap();
//! assert_eq!(fitted.len(), forwards.len());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]

pub mod error;
pub mod fitting;
pub mod model;
pub mod point;
pub mod yield_curve;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::fitting::{forward_rates, predict, CurveFitResult, FitConfig};
    pub use crate::model::{CurveModelKind, CurveParameters};
    pub use crate::point::YieldCurvePoint;
    pub use crate::yield_curve::YieldCurveModel;
}

pub use error::{CurveError, CurveResult};
pub use fitting::{CurveFitResult, FitConfig};
pub use model::{CurveModelKind, CurveParameters};
pub use point::YieldCurvePoint;
pub use yield_curve::YieldCurveModel;
