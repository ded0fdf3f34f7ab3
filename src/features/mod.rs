//! Feature engineering for ride demand records
//!
//! Turns raw trip records into the fixed 8-column feature table:
//! - Calendar features derived from a timestamp column (or synthesized)
//! - Weather features read from input (or synthesized)
//! - A regression target taken from a fare/price column (or synthesized)
//!
//! Column-presence decisions are made once by [`FeaturePlan`] and then
//! consumed by [`FeatureBuilder`].

mod builder;
mod config;
mod plan;
pub mod timestamp;

pub use builder::FeatureBuilder;
pub use config::FeatureConfig;
pub use plan::{CalendarPart, ColumnDecision, ColumnSource, FeaturePlan, TargetSource};
pub use timestamp::{parse_timestamp, CalendarParts};

use crate::error::{RideDemandError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of model input features
pub const N_FEATURES: usize = 8;

/// Feature column names, in model input order
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "year",
    "month",
    "day_of_week",
    "hour",
    "temperature",
    "humidity",
    "wind_speed",
    "weather_condition",
];

/// Name of the target column emitted by the feature builder
pub const TARGET_COLUMN: &str = "target";

/// A single model input row
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    pub year: f64,
    pub month: f64,
    pub day_of_week: f64,
    pub hour: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub weather_condition: f64,
}

impl FeatureVector {
    /// Values in [`FEATURE_NAMES`] order
    pub fn to_array(&self) -> [f64; N_FEATURES] {
        [
            self.year,
            self.month,
            self.day_of_week,
            self.hour,
            self.temperature,
            self.humidity,
            self.wind_speed,
            self.weather_condition,
        ]
    }

    /// Build from values in [`FEATURE_NAMES`] order
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        if values.len() != N_FEATURES {
            return Err(RideDemandError::ShapeError {
                expected: format!("{} features", N_FEATURES),
                actual: values.len().to_string(),
            });
        }
        let mut array = [0.0; N_FEATURES];
        array.copy_from_slice(values);
        Ok(Self::from_array(array))
    }

    /// Build from an array in [`FEATURE_NAMES`] order
    pub fn from_array(values: [f64; N_FEATURES]) -> Self {
        Self {
            year: values[0],
            month: values[1],
            day_of_week: values[2],
            hour: values[3],
            temperature: values[4],
            humidity: values[5],
            wind_speed: values[6],
            weather_condition: values[7],
        }
    }

    /// Build from loosely typed form fields.
    ///
    /// Missing, empty or non-numeric fields become `0.0`.
    pub fn from_form(fields: &HashMap<String, String>) -> Self {
        Self::from_pairs(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Like [`FeatureVector::from_form`] over raw key/value pairs; the first
    /// occurrence of a repeated key wins.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut values: [Option<f64>; N_FEATURES] = [None; N_FEATURES];
        for (key, raw) in pairs {
            let Some(idx) = FEATURE_NAMES.iter().position(|name| *name == key) else {
                continue;
            };
            if values[idx].is_none() {
                values[idx] = Some(raw.trim().parse::<f64>().unwrap_or(0.0));
            }
        }
        Self::from_array(values.map(|v| v.unwrap_or(0.0)))
    }

    /// Whether every value is finite
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_order() {
        let v = FeatureVector {
            year: 2025.0,
            month: 3.0,
            day_of_week: 0.0,
            hour: 8.0,
            temperature: 25.5,
            humidity: 60.0,
            wind_speed: 4.0,
            weather_condition: 1.0,
        };
        assert_eq!(v.to_array(), [2025.0, 3.0, 0.0, 8.0, 25.5, 60.0, 4.0, 1.0]);
        assert_eq!(FeatureVector::from_slice(&v.to_array()).unwrap(), v);
    }

    #[test]
    fn test_from_slice_wrong_length() {
        let err = FeatureVector::from_slice(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, RideDemandError::ShapeError { .. }));
    }

    #[test]
    fn test_from_form_defaults_to_zero() {
        let mut fields = HashMap::new();
        fields.insert("year".to_string(), "2024".to_string());
        fields.insert("hour".to_string(), " 17 ".to_string());
        fields.insert("humidity".to_string(), "wet".to_string());
        fields.insert("temperature".to_string(), String::new());

        let v = FeatureVector::from_form(&fields);
        assert_eq!(v.year, 2024.0);
        assert_eq!(v.hour, 17.0);
        assert_eq!(v.humidity, 0.0);
        assert_eq!(v.temperature, 0.0);
        assert_eq!(v.month, 0.0);
        assert!(v.is_finite());
    }

    #[test]
    fn test_from_pairs_first_value_wins() {
        let pairs = [("hour", "7"), ("month", "x"), ("hour", "21"), ("month", "3"), ("other", "9")];
        let v = FeatureVector::from_pairs(pairs);
        assert_eq!(v.hour, 7.0);
        // A non-numeric first value still shadows later ones
        assert_eq!(v.month, 0.0);
        assert_eq!(v.year, 0.0);
    }

    #[test]
    fn test_non_finite_detected() {
        let mut fields = HashMap::new();
        fields.insert("wind_speed".to_string(), "NaN".to_string());
        assert!(!FeatureVector::from_form(&fields).is_finite());
    }
}
