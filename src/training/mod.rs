//! Model training module
//!
//! Provides the offline training pipeline:
//! - Reproducible train/test split
//! - Gradient-boosted regression trees (second-order, exact greedy splits)
//! - Regression metrics (MAE, RMSE, R²)
//! - Training reports persisted next to the model artifacts

mod booster;
mod config;
mod engine;
mod metrics;
mod split;

pub use booster::{BoosterConfig, GradientBoostedRegressor};
pub use config::TrainingConfig;
pub use engine::{table_to_arrays, FeatureImportance, Trainer, TrainingOutcome, TrainingReport};
pub use metrics::RegressionMetrics;
pub use split::{split_indices, train_test_split, SplitIndices, TrainTestSplit};
