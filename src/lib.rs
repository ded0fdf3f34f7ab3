//! Ride demand prediction
//!
//! Trains a gradient-boosted regressor that estimates ride demand from
//! calendar and weather features, and serves it behind a small HTML form.
//!
//! # Modules
//!
//! ## Pipeline
//! - [`features`] - Feature plan and table builder (timestamp parsing, synthetic fills)
//! - [`preprocessing`] - Standard scaling
//! - [`training`] - Train/test split, gradient boosting, metrics, training runs
//! - [`inference`] - Predictor over a loaded model/scaler pair
//! - [`export`] - Artifact persistence
//!
//! ## Services
//! - [`server`] - HTTP form server
//! - [`cli`] - Command-line interface
//!
//! ## Utilities
//! - [`utils`] - Data loading

// Core error handling
pub mod error;

// Pipeline
pub mod features;
pub mod preprocessing;
pub mod training;
pub mod inference;
pub mod export;

// Utilities
pub mod utils;

// Services
pub mod server;
pub mod cli;

pub use error::{RideDemandError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{RideDemandError, Result};

    // Features
    pub use crate::features::{FeatureBuilder, FeatureConfig, FeaturePlan, FeatureVector, FEATURE_NAMES};

    // Preprocessing
    pub use crate::preprocessing::StandardScaler;

    // Training
    pub use crate::training::{
        BoosterConfig, GradientBoostedRegressor, RegressionMetrics, Trainer, TrainingConfig,
        TrainingReport,
    };

    // Inference
    pub use crate::inference::Predictor;

    // Export
    pub use crate::export::ModelArtifacts;

    // Data loading
    pub use crate::utils::DataLoader;
}
