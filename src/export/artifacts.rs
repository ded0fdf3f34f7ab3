//! Model and scaler persistence
//!
//! A training run writes two JSON files that share a run id. Loading
//! refuses pairs whose run ids or feature names disagree.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use crate::error::{RideDemandError, Result};
use crate::features::FEATURE_NAMES;
use crate::preprocessing::StandardScaler;
use crate::training::GradientBoostedRegressor;

pub const MODEL_FILE: &str = "ride_demand_model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const REPORT_FILE: &str = "metrics.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ModelFile {
    run_id: Uuid,
    feature_names: Vec<String>,
    model: GradientBoostedRegressor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScalerFile {
    run_id: Uuid,
    scaler: StandardScaler,
}

/// Fitted model and scaler from a single training run
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub run_id: Uuid,
    pub model: GradientBoostedRegressor,
    pub scaler: StandardScaler,
}

impl ModelArtifacts {
    pub fn new(run_id: Uuid, model: GradientBoostedRegressor, scaler: StandardScaler) -> Self {
        Self { run_id, model, scaler }
    }

    /// Write both files into `dir`, creating it if needed
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        write_json(
            &dir.join(MODEL_FILE),
            &ModelFile {
                run_id: self.run_id,
                feature_names: self.scaler.feature_names().to_vec(),
                model: self.model.clone(),
            },
        )?;
        write_json(
            &dir.join(SCALER_FILE),
            &ScalerFile {
                run_id: self.run_id,
                scaler: self.scaler.clone(),
            },
        )?;

        info!(dir = %dir.display(), run_id = %self.run_id, "Saved model and scaler");
        Ok(())
    }

    /// Load and cross-check the pair stored in `dir`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let model_file: ModelFile = read_json(&dir.join(MODEL_FILE))?;
        let scaler_file: ScalerFile = read_json(&dir.join(SCALER_FILE))?;

        if model_file.run_id != scaler_file.run_id {
            return Err(RideDemandError::ArtifactMismatch(format!(
                "model run {} does not match scaler run {}",
                model_file.run_id, scaler_file.run_id
            )));
        }

        let expected: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
        if model_file.feature_names != expected || scaler_file.scaler.feature_names() != expected.as_slice() {
            return Err(RideDemandError::ArtifactMismatch(format!(
                "artifacts were trained on features {:?}, expected {:?}",
                model_file.feature_names, expected
            )));
        }
        if !scaler_file.scaler.is_fitted() || !model_file.model.is_fitted() {
            return Err(RideDemandError::ModelNotFitted);
        }
        if model_file.model.n_features() != expected.len() {
            return Err(RideDemandError::ShapeError {
                expected: format!("{} model inputs", expected.len()),
                actual: model_file.model.n_features().to_string(),
            });
        }

        info!(dir = %dir.display(), run_id = %model_file.run_id, trees = model_file.model.n_trees(), "Loaded model and scaler");
        Ok(Self {
            run_id: model_file.run_id,
            model: model_file.model,
            scaler: scaler_file.scaler,
        })
    }
}

/// Pretty-print `value` as JSON into `path`
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        RideDemandError::DataError(format!("Failed to create {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| {
        RideDemandError::DataError(format!("Failed to open {}: {}", path.display(), e))
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        RideDemandError::SerializationError(format!("Failed to read {}: {}", path.display(), e))
    })
}
