//! RiskCurve Configuration Layer
//!
//! Serde-backed settings for the RiskCurve analytics engine, with per-field
//! defaults and field-level validation.
//!
//! # Sections
//!
//! - **Curve fitting** ([`FitConfig`]): starting decay factors, parameter bounds, optimizer budget
//! - **Risk** ([`RiskConfig`]): coupon frequency, key rate tenors, reference curve
//! - **VaR** ([`VarConfig`]): parametric distribution, Monte Carlo draws and seed, profile levels
//! - **PCA** ([`PcaConfig`]): number of components kept
//!
//! # Example
//!
//! ```rust
//! use riskcurve_config::{AnalyticsConfig, Validate};
//!
//! let config = AnalyticsConfig::from_json(r#"{ "var": { "seed": 7 } }"#).unwrap();
//! assert_eq!(config.var.seed, 7);
//! assert_eq!(config.risk.frequency, 2);
//! assert!(config.is_valid());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod analytics;
mod curve;
mod error;
mod pca;
mod risk;
mod var;

// Re-export core types
pub use analytics::AnalyticsConfig;
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use pca::PcaConfig;
pub use risk::{CurveNode, RiskConfig};
pub use riskcurve_curves::FitConfig;
pub use var::VarConfig;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::analytics::AnalyticsConfig;
    pub use crate::error::{ConfigError, ConfigResult, Validate};
    pub use crate::pca::PcaConfig;
    pub use crate::risk::RiskConfig;
    pub use crate::var::VarConfig;
    pub use riskcurve_curves::FitConfig;
}
