//! Regression evaluation metrics

use crate::error::{RideDemandError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Metrics for a regression model on held-out data
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// R-squared
    pub r2: f64,
    /// Number of evaluated samples
    pub n_samples: usize,
}

impl RegressionMetrics {
    /// Compute regression metrics.
    ///
    /// R² for a constant `y_true` is 1.0 on a perfect fit and 0.0 otherwise.
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(RideDemandError::ShapeError {
                expected: format!("{} predictions", y_true.len()),
                actual: y_pred.len().to_string(),
            });
        }
        if y_true.is_empty() {
            return Err(RideDemandError::DataError(
                "cannot evaluate on zero samples".to_string(),
            ));
        }

        let n = y_true.len() as f64;
        let errors: Array1<f64> = y_true - y_pred;

        let mse = errors.mapv(|e| e * e).sum() / n;
        let mae = errors.mapv(f64::abs).sum() / n;

        let y_mean = y_true.sum() / n;
        let ss_tot: f64 = y_true.iter().map(|y| (y - y_mean).powi(2)).sum();
        let ss_res: f64 = errors.iter().map(|e| e.powi(2)).sum();
        let r2 = if ss_tot > 0.0 {
            1.0 - ss_res / ss_tot
        } else if ss_res == 0.0 {
            1.0
        } else {
            0.0
        };

        Ok(Self {
            mae,
            mse,
            rmse: mse.sqrt(),
            r2,
            n_samples: y_true.len(),
        })
    }
}
