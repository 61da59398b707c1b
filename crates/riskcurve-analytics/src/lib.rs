//! # RiskCurve Analytics
//!
//! One facade over the RiskCurve components:
//!
//! - **Curves**: Nelson-Siegel and Svensson fits to observed yields
//! - **Bond risk**: Macaulay and modified duration, convexity, DV01, key rate durations
//! - **VaR**: Historical, parametric and Monte Carlo VaR with expected shortfall
//! - **Factors**: Principal components of yield curve moves
//! - **Batches**: Many bonds or curves at once, with per-item failures
//!
//! ## Architecture
//!
//! The numerical crates return values and errors and never log.
//! [`AnalyticsEngine`] applies the configuration, emits `tracing` events
//! and folds every component error into [`AnalyticsError`].
//!
//! ## Usage
//!
//! ```rust
//! use riskcurve_analytics::prelude::*;
//!
//! let engine = AnalyticsEngine::default();
//!
//! let metrics = engine
//!     .comprehensive_bond_analysis("912828XG0", 98.5, 0.045, 0.04, 5.0)
//!     .unwrap();
//! assert!(metrics.dv01.as_f64() > 0.0);
//!
//! let maturities = [0.25, 0.5, 1.0, 2.0, 3.0, 5.0, 7.0, 10.0, 20.0, 30.0];
//! let yields = [0.01, 0.015, 0.02, 0.025, 0.03, 0.035, 0.04, 0.042, 0.045, 0.044];
//! let fit = engine
//!     .fit_yield_curve(&maturities, &yields, CurveModelKind::NelsonSiegel)
//!     .unwrap();
//! assert!(fit.r_squared > 0.95);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod batch;
pub mod engine;
pub mod error;

pub use batch::{BatchFailure, BatchItem, BatchReport, BondPosition, CurveObservation};
pub use engine::AnalyticsEngine;
pub use error::{AnalyticsError, AnalyticsResult};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::batch::{BatchReport, BondPosition, CurveObservation};
    pub use crate::engine::AnalyticsEngine;
    pub use crate::error::{AnalyticsError, AnalyticsResult};
    pub use riskcurve_config::{AnalyticsConfig, Validate};
    pub use riskcurve_curves::{CurveFitResult, CurveModelKind};
    pub use riskcurve_risk::calculator::BondMetrics;
    pub use riskcurve_risk::factors::PcaResult;
    pub use riskcurve_risk::var::{VaRDistribution, VaRMethod, VaRResult};
}
