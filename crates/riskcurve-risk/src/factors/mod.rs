//! Principal component analysis of yield curve changes.
//!
//! Rows of the input are observation dates, columns are maturities. Each
//! column is standardised (population standard deviation, constant columns
//! left unscaled) before the covariance matrix is decomposed, so the factors
//! describe co-movement rather than raw volatility.
//!
//! # Example
//!
//! ```rust
//! use riskcurve_risk::factors::YieldCurvePca;
//!
//! // Daily changes at 2y, 5y, 10y
//! let changes = vec![
//!     vec![0.010, 0.012, 0.011],
//!     vec![-0.020, -0.018, -0.015],
//!     vec![0.005, 0.007, 0.010],
//!     vec![-0.004, -0.001, 0.002],
//! ];
//! let names = vec!["2Y".to_string(), "5Y".to_string(), "10Y".to_string()];
//!
//! let mut pca = YieldCurvePca::new();
//! let result = pca.fit(&changes, &names).unwrap();
//! assert!(result.explained_variance_ratio[0] > 0.5);
//!
//! let scores = pca.transform(&changes).unwrap();
//! assert_eq!(scores.len(), 4);
//! ```

mod interpretation;

pub use interpretation::{interpret_components, FACTOR_NAMES};

use std::collections::BTreeMap;

use nalgebra::DMatrix;
use riskcurve_math::linear_algebra::{covariance_matrix, symmetric_eigen_sorted};
use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};

/// Decomposition of yield curve changes into orthogonal factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcaResult {
    /// Share of total variance per component, descending.
    pub explained_variance_ratio: Vec<f64>,
    /// Running total of `explained_variance_ratio`, capped at 1.
    pub cumulative_variance: Vec<f64>,
    /// Loadings, one row per component, one column per maturity.
    pub components: Vec<Vec<f64>>,
    /// Column labels of the input.
    pub feature_names: Vec<String>,
    /// Number of components retained.
    pub n_components: usize,
    /// Label for each of the leading named factors.
    pub interpretation: BTreeMap<String, String>,
}

impl PcaResult {
    /// Keeps only the leading `max_components` components.
    ///
    /// Ratios are still relative to the total variance of all components, so
    /// the last cumulative value may stay below 1.
    #[must_use]
    pub fn truncated(mut self, max_components: usize) -> Self {
        if max_components >= self.n_components {
            return self;
        }
        self.explained_variance_ratio.truncate(max_components);
        self.cumulative_variance.truncate(max_components);
        self.components.truncate(max_components);
        self.n_components = max_components;
        let kept = &FACTOR_NAMES[..max_components.min(FACTOR_NAMES.len())];
        self.interpretation
            .retain(|name, _| kept.contains(&name.as_str()));
        self
    }

    /// Share of variance explained by the first `k` components.
    pub fn variance_explained_by(&self, k: usize) -> f64 {
        match k {
            0 => 0.0,
            k => self
                .cumulative_variance
                .get(k - 1)
                .or(self.cumulative_variance.last())
                .copied()
                .unwrap_or(0.0),
        }
    }
}

/// Standardisation and loadings learned from one data set.
#[derive(Debug, Clone, PartialEq)]
pub struct PcaModel {
    means: Vec<f64>,
    scales: Vec<f64>,
    components: Vec<Vec<f64>>,
}

impl PcaModel {
    /// Learns factors from yield changes.
    ///
    /// Non-finite cells are treated as zero change. Components are signed so
    /// that their largest loading is positive.
    ///
    /// # Errors
    ///
    /// - fewer than two rows, no columns, ragged rows, or a name count that
    ///   does not match the column count
    /// - [`RiskError::Degenerate`] if every column is constant
    pub fn fit(
        yield_changes: &[Vec<f64>],
        feature_names: &[String],
    ) -> RiskResult<(Self, PcaResult)> {
        let n = yield_changes.len();
        if n < 2 {
            return Err(RiskError::insufficient_data(format!(
                "PCA needs at least 2 observations, got {n}"
            )));
        }
        let p = check_shape(yield_changes, None)?;
        if feature_names.len() != p {
            return Err(RiskError::invalid_input(format!(
                "{} feature names for {p} columns",
                feature_names.len()
            )));
        }

        let data = to_matrix(yield_changes, p);
        let mut means = Vec::with_capacity(p);
        let mut scales = Vec::with_capacity(p);
        for column in data.column_iter() {
            let mean = column.mean();
            let variance = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
            let std = variance.sqrt();
            means.push(mean);
            scales.push(if std > 0.0 { std } else { 1.0 });
        }

        let standardized = standardize(&data, &means, &scales);
        let covariance = covariance_matrix(&standardized)?;
        let eigen = symmetric_eigen_sorted(&covariance)?;

        let eigenvalues: Vec<f64> = eigen.values.iter().map(|v| v.max(0.0)).collect();
        let total: f64 = eigenvalues.iter().sum();
        if total <= 0.0 {
            return Err(RiskError::Degenerate(
                "yield changes have zero variance in every column".to_string(),
            ));
        }

        let n_components = n.min(p);
        let explained_variance_ratio: Vec<f64> = eigenvalues
            .iter()
            .take(n_components)
            .map(|v| v / total)
            .collect();
        let cumulative_variance = explained_variance_ratio
            .iter()
            .scan(0.0, |acc, r| {
                *acc += r;
                Some(f64::min(*acc, 1.0))
            })
            .collect();

        let components: Vec<Vec<f64>> = eigen
            .vectors
            .into_iter()
            .take(n_components)
            .map(orient)
            .collect();

        let result = PcaResult {
            explained_variance_ratio,
            cumulative_variance,
            interpretation: interpret_components(&components),
            components: components.clone(),
            feature_names: feature_names.to_vec(),
            n_components,
        };
        let model = Self {
            means,
            scales,
            components,
        };

        Ok((model, result))
    }

    /// Projects yield changes onto the learned components.
    ///
    /// Returns one row of scores per input row.
    pub fn transform(&self, yield_changes: &[Vec<f64>]) -> RiskResult<Vec<Vec<f64>>> {
        let p = self.means.len();
        if yield_changes.is_empty() {
            return Ok(Vec::new());
        }
        check_shape(yield_changes, Some(p))?;

        let standardized = standardize(&to_matrix(yield_changes, p), &self.means, &self.scales);

        Ok(standardized
            .row_iter()
            .map(|row| {
                self.components
                    .iter()
                    .map(|loadings| row.iter().zip(loadings).map(|(x, w)| x * w).sum())
                    .collect()
            })
            .collect())
    }

    /// Loadings, one row per component.
    pub fn components(&self) -> &[Vec<f64>] {
        &self.components
    }
}

/// Stateful factor decomposer.
///
/// [`YieldCurvePca::transform`] fails with [`RiskError::NotFitted`] until
/// [`YieldCurvePca::fit`] succeeds.
#[derive(Debug, Clone, Default)]
pub struct YieldCurvePca {
    model: Option<PcaModel>,
}

impl YieldCurvePca {
    /// Creates an unfitted decomposer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fits the decomposer, replacing any previous fit.
    pub fn fit(
        &mut self,
        yield_changes: &[Vec<f64>],
        feature_names: &[String],
    ) -> RiskResult<PcaResult> {
        self.model = None;
        let (model, result) = PcaModel::fit(yield_changes, feature_names)?;
        self.model = Some(model);
        Ok(result)
    }

    /// Projects yield changes onto the fitted components.
    pub fn transform(&self, yield_changes: &[Vec<f64>]) -> RiskResult<Vec<Vec<f64>>> {
        self.model
            .as_ref()
            .ok_or_else(|| RiskError::NotFitted("transform".to_string()))?
            .transform(yield_changes)
    }

    /// Whether a fit has succeeded.
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }
}

/// Stateless factor decomposition.
pub fn decompose_curve_changes(
    yield_changes: &[Vec<f64>],
    feature_names: &[String],
) -> RiskResult<PcaResult> {
    PcaModel::fit(yield_changes, feature_names).map(|(_, result)| result)
}

fn check_shape(rows: &[Vec<f64>], expected: Option<usize>) -> RiskResult<usize> {
    let p = expected.unwrap_or_else(|| rows.first().map_or(0, Vec::len));
    if p == 0 {
        return Err(RiskError::invalid_input("yield changes have no columns"));
    }
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != p) {
        return Err(RiskError::invalid_input(format!(
            "row {i} has {} columns, expected {p}",
            row.len()
        )));
    }
    Ok(p)
}

fn to_matrix(rows: &[Vec<f64>], p: usize) -> DMatrix<f64> {
    DMatrix::from_fn(rows.len(), p, |i, j| {
        let v = rows[i][j];
        if v.is_finite() {
            v
        } else {
            0.0
        }
    })
}

fn standardize(data: &DMatrix<f64>, means: &[f64], scales: &[f64]) -> DMatrix<f64> {
    DMatrix::from_fn(data.nrows(), data.ncols(), |i, j| {
        (data[(i, j)] - means[j]) / scales[j]
    })
}

fn orient(mut loadings: Vec<f64>) -> Vec<f64> {
    let dominant = loadings
        .iter()
        .copied()
        .max_by(|a, b| a.abs().total_cmp(&b.abs()))
        .unwrap_or(0.0);
    if dominant < 0.0 {
        loadings.iter_mut().for_each(|v| *v = -*v);
    }
    loadings
}
