//! # riskcurve-risk
//!
//! Risk analytics for fixed income instruments and portfolios.
//!
//! This crate provides:
//!
//! - **Duration**: Macaulay, Modified, Key Rate
//! - **Convexity**: Analytical, with duration + convexity price estimates
//! - **DV01**: Price value of a basis point
//! - **VaR**: Historical, Parametric (normal / Student-t), Monte Carlo
//! - **Factors**: Principal components of yield curve changes
//!
//! ## Example
//!
//! ```rust
//! use riskcurve_risk::prelude::*;
//!
//! let terms = BondTerms::new(98.5, 0.045, 0.04, 5.0);
//! let pair = duration(&terms).unwrap();
//! let dv01 = dv01(terms.price, pair.modified).unwrap();
//! assert!(dv01.as_f64() > 0.0);
//!
//! let returns = [-0.012, 0.004, 0.009, -0.003, 0.011, -0.007, 0.002];
//! let var = historical_var(&returns, 0.95).unwrap();
//! assert!(!var.warnings.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bond;
pub mod calculator;
pub mod convexity;
pub mod duration;
pub mod dv01;
mod error;
pub mod factors;
pub mod var;

pub use error::{RiskError, RiskResult, RiskWarning};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::bond::*;
    pub use crate::calculator::*;
    pub use crate::convexity::*;
    pub use crate::duration::*;
    pub use crate::dv01::*;
    pub use crate::factors::*;
    pub use crate::var::*;
    pub use crate::{RiskError, RiskResult, RiskWarning};
}
