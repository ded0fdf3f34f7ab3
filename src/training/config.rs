//! Training run configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::BoosterConfig;
use crate::error::{RideDemandError, Result};
use crate::features::FeatureConfig;

/// Configuration for one training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Input table (CSV or JSON)
    pub data_path: PathBuf,
    /// Directory receiving the model, scaler and report files
    pub model_dir: PathBuf,
    /// Fraction of rows held out for evaluation
    pub test_size: f64,
    /// Seed for the train/test shuffle
    pub split_seed: u64,
    pub features: FeatureConfig,
    pub booster: BoosterConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data").join("uber_fares.csv"),
            model_dir: PathBuf::from("model"),
            test_size: 0.2,
            split_seed: 42,
            features: FeatureConfig::default(),
            booster: BoosterConfig::default(),
        }
    }
}

impl TrainingConfig {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            ..Default::default()
        }
    }

    pub fn with_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_dir = dir.into();
        self
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    /// Use one seed for synthesis, splitting and boosting
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.split_seed = seed;
        self.features.random_seed = seed;
        self.booster.random_state = seed;
        self
    }

    pub fn with_features(mut self, features: FeatureConfig) -> Self {
        self.features = features;
        self
    }

    pub fn with_booster(mut self, booster: BoosterConfig) -> Self {
        self.booster = booster;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(RideDemandError::ConfigError(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if self.features.target_columns.iter().any(|c| c.is_empty())
            || self.features.timestamp_column.is_empty()
        {
            return Err(RideDemandError::ConfigError(
                "column names must not be empty".to_string(),
            ));
        }
        self.booster.validate()
    }
}
