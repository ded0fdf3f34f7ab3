//! Standard (z-score) feature scaling

use crate::error::{RideDemandError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Fitted parameters for one feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: f64,
    /// Population standard deviation, 1.0 for constant features
    pub scale: f64,
}

/// Standard scaler: `(x - mean) / std`, fitted column-wise.
///
/// Parameters are stored in feature order together with the feature names
/// so the same transform can be replayed on a single inference row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    feature_names: Vec<String>,
    params: Vec<ScalerParams>,
    is_fitted: bool,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit per-column mean and standard deviation
    pub fn fit(&mut self, x: &Array2<f64>, feature_names: &[&str]) -> Result<&mut Self> {
        if x.ncols() != feature_names.len() {
            return Err(RideDemandError::ShapeError {
                expected: format!("{} columns", feature_names.len()),
                actual: x.ncols().to_string(),
            });
        }
        if x.nrows() == 0 {
            return Err(RideDemandError::DataError(
                "cannot fit scaler on zero rows".to_string(),
            ));
        }

        self.params = x
            .axis_iter(Axis(1))
            .map(|col| {
                let mean = col.mean().unwrap_or(0.0);
                let std = col.var(0.0).sqrt();
                ScalerParams {
                    mean,
                    scale: if std == 0.0 || !std.is_finite() { 1.0 } else { std },
                }
            })
            .collect();
        self.feature_names = feature_names.iter().map(|s| s.to_string()).collect();
        self.is_fitted = true;
        Ok(self)
    }

    /// Scale every row of `x`
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_width(x.ncols())?;
        let mut out = x.to_owned();
        for (mut col, p) in out.axis_iter_mut(Axis(1)).zip(&self.params) {
            col.mapv_inplace(|v| (v - p.mean) / p.scale);
        }
        Ok(out)
    }

    /// Scale a single row
    pub fn transform_row(&self, row: &[f64]) -> Result<Array1<f64>> {
        self.check_width(row.len())?;
        Ok(row
            .iter()
            .zip(&self.params)
            .map(|(v, p)| (v - p.mean) / p.scale)
            .collect())
    }

    pub fn fit_transform(&mut self, x: &Array2<f64>, feature_names: &[&str]) -> Result<Array2<f64>> {
        self.fit(x, feature_names)?;
        self.transform(x)
    }

    pub fn inverse_transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_width(x.ncols())?;
        let mut out = x.to_owned();
        for (mut col, p) in out.axis_iter_mut(Axis(1)).zip(&self.params) {
            col.mapv_inplace(|v| v * p.scale + p.mean);
        }
        Ok(out)
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn params(&self) -> &[ScalerParams] {
        &self.params
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    fn check_width(&self, width: usize) -> Result<()> {
        if !self.is_fitted {
            return Err(RideDemandError::ModelNotFitted);
        }
        if width != self.params.len() {
            return Err(RideDemandError::ShapeError {
                expected: format!("{} features", self.params.len()),
                actual: width.to_string(),
            });
        }
        Ok(())
    }
}
