//! # RiskCurve Math
//!
//! Numerical building blocks for the RiskCurve fixed income analytics library.
//!
//! This crate provides:
//!
//! - **Optimization**: Bounded nonlinear least squares (projected Levenberg-Marquardt)
//! - **Linear Algebra**: Linear solves and symmetric eigen-decomposition
//! - **Statistics**: Sample moments and normal / Student-t quantiles
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: No global state, no I/O
//! - **Numerical Stability**: Careful handling of edge cases
//! - **Explicit failure**: Non-convergence is reported, never hidden

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::needless_range_loop)]

pub mod error;
pub mod linear_algebra;
pub mod optimization;
pub mod statistics;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::linear_algebra::{solve_linear_system, symmetric_eigen_sorted, EigenPairs};
    pub use crate::optimization::{
        levenberg_marquardt, Bounds, LeastSquaresConfig, OptimizationResult,
    };
    pub use crate::statistics::{
        kurtosis, mean, normal_pdf, normal_quantile, population_std_dev, sample_std_dev,
        student_t_quantile,
    };
}

pub use error::{MathError, MathResult};
