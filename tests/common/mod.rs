//! Shared fixtures for integration tests

use polars::prelude::*;
use ride_demand::training::{BoosterConfig, Trainer, TrainingConfig};
use std::path::Path;

/// Train a small model and write its artifacts into `dir`
pub fn train_into(dir: &Path) {
    let n = 96;
    let timestamps: Vec<String> = (0..n)
        .map(|i| format!("2014-{:02}-{:02} {:02}:30:00 UTC", i % 12 + 1, i % 28 + 1, i % 24))
        .collect();
    let fares: Vec<f64> = (0..n).map(|i| 6.0 + (i % 24) as f64).collect();
    let raw = df!("pickup_datetime" => timestamps, "fare_amount" => fares).unwrap();

    let config = TrainingConfig::default()
        .with_model_dir(dir)
        .with_booster(BoosterConfig {
            n_estimators: 15,
            ..Default::default()
        });
    let trainer = Trainer::new(config);
    let outcome = trainer.fit_frame(&raw).unwrap();
    trainer.persist(&outcome).unwrap();
}
