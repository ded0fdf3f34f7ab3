//! Training pipeline: plan → build features → split → scale → fit → evaluate → persist

use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

use super::booster::{BoosterConfig, GradientBoostedRegressor};
use super::metrics::RegressionMetrics;
use super::split::train_test_split;
use super::TrainingConfig;
use crate::error::{RideDemandError, Result};
use crate::export::{write_json, ModelArtifacts, REPORT_FILE};
use crate::features::{FeatureBuilder, FeaturePlan, FEATURE_NAMES, TARGET_COLUMN};
use crate::preprocessing::StandardScaler;
use crate::utils::DataLoader;

/// Relative importance of one input feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Summary of a training run, written next to the artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub run_id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub n_rows: usize,
    pub n_train: usize,
    pub n_test: usize,
    /// Held-out metrics
    pub metrics: RegressionMetrics,
    pub training_time_secs: f64,
    pub feature_importances: Vec<FeatureImportance>,
    pub plan: FeaturePlan,
    pub booster: BoosterConfig,
}

impl TrainingReport {
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        write_json(&dir.join(REPORT_FILE), self)
    }
}

/// Everything a training run produces
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub artifacts: ModelArtifacts,
    pub report: TrainingReport,
}

/// Runs the offline training pipeline
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Load the configured file, train, and write artifacts to the model directory
    pub fn run(&self) -> Result<TrainingOutcome> {
        self.config.validate()?;
        let raw = DataLoader::new().load_auto(&self.config.data_path)?;
        let outcome = self.fit_frame(&raw)?;
        self.persist(&outcome)?;
        Ok(outcome)
    }

    /// Train on an already loaded record set without touching the filesystem
    pub fn fit_frame(&self, raw: &DataFrame) -> Result<TrainingOutcome> {
        self.config.validate()?;
        let start = Instant::now();

        let builder = FeatureBuilder::for_frame(raw, &self.config.features);
        builder.plan().log();
        let table = builder.build(raw)?;
        let (x, y) = table_to_arrays(&table)?;

        let split = train_test_split(&x, &y, self.config.test_size, self.config.split_seed)?;
        info!(
            train_rows = split.x_train.nrows(),
            test_rows = split.x_test.nrows(),
            "Data split complete"
        );

        // Fit on the training split only
        let mut scaler = StandardScaler::new();
        let x_train = scaler.fit_transform(&split.x_train, &FEATURE_NAMES)?;
        let x_test = scaler.transform(&split.x_test)?;

        let booster = &self.config.booster;
        info!(
            n_estimators = booster.n_estimators,
            max_depth = booster.max_depth,
            learning_rate = booster.learning_rate,
            "Training gradient-boosted model"
        );
        let mut model = GradientBoostedRegressor::new(booster.clone());
        model.fit(&x_train, &split.y_train)?;

        let preds = model.predict(&x_test)?;
        let metrics = RegressionMetrics::compute(&split.y_test, &preds)?;
        let training_time_secs = start.elapsed().as_secs_f64();
        info!(
            mae = metrics.mae,
            rmse = metrics.rmse,
            r2 = metrics.r2,
            elapsed_secs = training_time_secs,
            "Model evaluation complete"
        );

        let feature_importances = model
            .feature_importances()
            .map(|imp| {
                FEATURE_NAMES
                    .iter()
                    .zip(imp.iter())
                    .map(|(name, &importance)| FeatureImportance {
                        feature: name.to_string(),
                        importance,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let run_id = Uuid::new_v4();
        let report = TrainingReport {
            run_id,
            trained_at: Utc::now(),
            n_rows: x.nrows(),
            n_train: split.x_train.nrows(),
            n_test: split.x_test.nrows(),
            metrics,
            training_time_secs,
            feature_importances,
            plan: builder.plan().clone(),
            booster: booster.clone(),
        };

        Ok(TrainingOutcome {
            artifacts: ModelArtifacts::new(run_id, model, scaler),
            report,
        })
    }

    /// Write model, scaler and report into the configured model directory
    pub fn persist(&self, outcome: &TrainingOutcome) -> Result<()> {
        outcome.artifacts.save(&self.config.model_dir)?;
        outcome.report.save(&self.config.model_dir)?;
        info!(dir = %self.config.model_dir.display(), "Model, scaler and report saved");
        Ok(())
    }
}

/// Extract the feature matrix (in [`FEATURE_NAMES`] order) and target vector
pub fn table_to_arrays(df: &DataFrame) -> Result<(Array2<f64>, Array1<f64>)> {
    let n_rows = df.height();

    let col_data: Vec<Vec<f64>> = FEATURE_NAMES
        .iter()
        .map(|name| column_values(df, name))
        .collect::<Result<Vec<_>>>()?;
    let y = Array1::from_vec(column_values(df, TARGET_COLUMN)?);

    let x = Array2::from_shape_fn((n_rows, FEATURE_NAMES.len()), |(r, c)| col_data[c][r]);
    Ok((x, y))
}

fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| RideDemandError::ColumnNotFound(name.to_string()))?;
    let cast = column.cast(&DataType::Float64)?;
    cast.f64()?
        .into_iter()
        .map(|v| {
            v.ok_or_else(|| RideDemandError::DataError(format!("null value in column '{}'", name)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trips(n: usize) -> DataFrame {
        let timestamps: Vec<String> = (0..n)
            .map(|i| format!("2024-{:02}-{:02} {:02}:00:00 UTC", i % 12 + 1, i % 28 + 1, i % 24))
            .collect();
        let fares: Vec<f64> = (0..n).map(|i| 5.0 + (i % 24) as f64 * 1.5).collect();
        df!("pickup_datetime" => timestamps, "fare_amount" => fares).unwrap()
    }

    fn small_config() -> TrainingConfig {
        TrainingConfig::default().with_booster(BoosterConfig {
            n_estimators: 20,
            ..Default::default()
        })
    }

    #[test]
    fn test_fit_frame_produces_report() {
        let outcome = Trainer::new(small_config()).fit_frame(&trips(100)).unwrap();
        let report = &outcome.report;

        assert_eq!(report.n_rows, 100);
        assert_eq!(report.n_test, 20);
        assert_eq!(report.n_train, 80);
        assert_eq!(report.feature_importances.len(), 8);
        assert_eq!(report.run_id, outcome.artifacts.run_id);
        assert!(report.metrics.mae.is_finite());
        // Fare follows the hour exactly
        assert!(report.metrics.r2 > 0.5, "r2 = {}", report.metrics.r2);
    }

    #[test]
    fn test_table_to_arrays_order() {
        let table = df!(
            "year" => &[2024.0], "month" => &[2.0], "day_of_week" => &[3.0], "hour" => &[4.0],
            "temperature" => &[5.0], "humidity" => &[6.0], "wind_speed" => &[7.0],
            "weather_condition" => &[8.0], "target" => &[9.0]
        )
        .unwrap();
        let (x, y) = table_to_arrays(&table).unwrap();
        assert_eq!(x.row(0).to_vec(), vec![2024.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(y.to_vec(), vec![9.0]);
    }

    #[test]
    fn test_too_few_rows() {
        let result = Trainer::new(small_config()).fit_frame(&trips(1));
        assert!(matches!(result, Err(RideDemandError::DataError(_))));
    }
}
