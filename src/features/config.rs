//! Feature engineering configuration

use serde::{Deserialize, Serialize};

/// Configuration for the feature plan and builder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Column holding the trip timestamp
    pub timestamp_column: String,
    /// Candidate target columns, first present wins
    pub target_columns: Vec<String>,
    /// Year used when no timestamp column exists
    pub synthetic_year: i32,
    /// Seed for every synthetic draw
    pub random_seed: u64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            timestamp_column: "pickup_datetime".to_string(),
            target_columns: vec![
                "fare_amount".to_string(),
                "fare".to_string(),
                "price".to_string(),
            ],
            synthetic_year: 2025,
            random_seed: 42,
        }
    }
}

impl FeatureConfig {
    pub fn with_timestamp_column(mut self, column: impl Into<String>) -> Self {
        self.timestamp_column = column.into();
        self
    }

    pub fn with_target_columns(mut self, columns: Vec<String>) -> Self {
        self.target_columns = columns;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }
}
