//! Predictor over a loaded model/scaler pair

use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{RideDemandError, Result};
use crate::export::ModelArtifacts;
use crate::features::FeatureVector;

/// Read-only predictor; cheap to share behind an `Arc`
#[derive(Debug, Clone)]
pub struct Predictor {
    artifacts: ModelArtifacts,
}

impl Predictor {
    /// Load artifacts written by a training run
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let artifacts = ModelArtifacts::load(dir)?;
        info!(
            dir = %dir.display(),
            run_id = %artifacts.run_id,
            n_trees = artifacts.model.n_trees(),
            "Predictor loaded"
        );
        Ok(Self { artifacts })
    }

    pub fn from_artifacts(artifacts: ModelArtifacts) -> Self {
        Self { artifacts }
    }

    pub fn run_id(&self) -> Uuid {
        self.artifacts.run_id
    }

    pub fn artifacts(&self) -> &ModelArtifacts {
        &self.artifacts
    }

    /// Scale, predict and round to 2 decimal places
    pub fn predict(&self, features: &FeatureVector) -> Result<f64> {
        if !features.is_finite() {
            return Err(RideDemandError::InferenceError(
                "input features must be finite numbers".to_string(),
            ));
        }

        let scaled = self.artifacts.scaler.transform_row(&features.to_array())?;
        let raw = self.artifacts.model.predict_row(scaled.view())?;
        if !raw.is_finite() {
            return Err(RideDemandError::InferenceError(format!(
                "model produced a non-finite prediction ({})",
                raw
            )));
        }

        let rounded = round_prediction(raw);
        debug!(raw, rounded, "Prediction");
        Ok(rounded)
    }

    /// Predict many inputs in parallel; output order follows input order
    pub fn predict_batch(&self, batch: &[FeatureVector]) -> Result<Vec<f64>> {
        batch.par_iter().map(|f| self.predict(f)).collect()
    }
}

/// Round half away from zero to 2 decimal places
pub fn round_prediction(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render with exactly two decimals
pub fn format_prediction(value: f64) -> String {
    format!("{:.2}", value)
}

/// Text shown to a user for the outcome of one request
pub fn render_outcome(outcome: &Result<f64>) -> String {
    match outcome {
        Ok(value) => format!("Predicted Ride Demand: {} rides/hour", format_prediction(*value)),
        Err(e) => format!("Error: {}", e),
    }
}
