//! Per-column source decisions made once before feature building

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{FeatureConfig, FEATURE_NAMES};

/// Calendar component taken from the timestamp column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalendarPart {
    Year,
    Month,
    DayOfWeek,
    Hour,
}

/// Where the values of one feature column come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnSource {
    /// Read from an input column and cast to float
    Input(String),
    /// Derived from the timestamp column
    Timestamp { column: String, part: CalendarPart },
    /// The same value for every row
    Constant(f64),
    /// Uniform integer draw in `[low, high)`
    UniformInt { low: i64, high: i64 },
    /// Uniform float draw in `[low, high)`
    UniformFloat { low: f64, high: f64 },
}

impl ColumnSource {
    pub fn is_synthetic(&self) -> bool {
        !matches!(self, ColumnSource::Input(_) | ColumnSource::Timestamp { .. })
    }
}

/// Where the regression target comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TargetSource {
    /// Input column; rows with a null or non-positive value are dropped
    Input(String),
    /// Uniform float draw in `[low, high)`
    UniformFloat { low: f64, high: f64 },
}

/// Decision for a single output feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDecision {
    pub feature: String,
    pub source: ColumnSource,
}

/// Resolved sources for every feature column and the target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturePlan {
    features: Vec<ColumnDecision>,
    target: TargetSource,
}

impl FeaturePlan {
    /// Decide each column's source from the available input columns.
    pub fn inspect<S: AsRef<str>>(columns: &[S], config: &FeatureConfig) -> Self {
        let has = |name: &str| columns.iter().any(|c| c.as_ref() == name);
        let has_timestamp = has(config.timestamp_column.as_str());

        let time_source = |part: CalendarPart, synthetic: ColumnSource| {
            if has_timestamp {
                ColumnSource::Timestamp {
                    column: config.timestamp_column.clone(),
                    part,
                }
            } else {
                synthetic
            }
        };
        let weather_source = |name: &str, synthetic: ColumnSource| {
            if has(name) {
                ColumnSource::Input(name.to_string())
            } else {
                synthetic
            }
        };

        let sources = [
            time_source(
                CalendarPart::Year,
                ColumnSource::Constant(f64::from(config.synthetic_year)),
            ),
            time_source(CalendarPart::Month, ColumnSource::UniformInt { low: 1, high: 13 }),
            time_source(CalendarPart::DayOfWeek, ColumnSource::UniformInt { low: 0, high: 7 }),
            time_source(CalendarPart::Hour, ColumnSource::UniformInt { low: 0, high: 24 }),
            weather_source("temperature", ColumnSource::UniformFloat { low: 20.0, high: 35.0 }),
            weather_source("humidity", ColumnSource::UniformFloat { low: 40.0, high: 90.0 }),
            weather_source("wind_speed", ColumnSource::UniformFloat { low: 0.0, high: 20.0 }),
            weather_source("weather_condition", ColumnSource::UniformInt { low: 0, high: 5 }),
        ];

        let features = FEATURE_NAMES
            .iter()
            .zip(sources)
            .map(|(name, source)| ColumnDecision {
                feature: name.to_string(),
                source,
            })
            .collect();

        let target = config
            .target_columns
            .iter()
            .find(|c| has(c.as_str()))
            .map(|c| TargetSource::Input(c.clone()))
            .unwrap_or(TargetSource::UniformFloat { low: 50.0, high: 300.0 });

        Self { features, target }
    }

    /// Feature decisions in model input order
    pub fn features(&self) -> &[ColumnDecision] {
        &self.features
    }

    pub fn target(&self) -> &TargetSource {
        &self.target
    }

    /// Timestamp column, if any feature is derived from one
    pub fn timestamp_column(&self) -> Option<&str> {
        self.features.iter().find_map(|d| match &d.source {
            ColumnSource::Timestamp { column, .. } => Some(column.as_str()),
            _ => None,
        })
    }

    /// Names of features that will be synthesized
    pub fn synthetic_features(&self) -> Vec<&str> {
        self.features
            .iter()
            .filter(|d| d.source.is_synthetic())
            .map(|d| d.feature.as_str())
            .collect()
    }

    /// Emit one log event per decision
    pub fn log(&self) {
        for decision in &self.features {
            match &decision.source {
                ColumnSource::Input(column) => {
                    info!(feature = %decision.feature, column = %column, "Feature read from input");
                }
                ColumnSource::Timestamp { column, part } => {
                    info!(feature = %decision.feature, column = %column, part = ?part, "Feature derived from timestamp");
                }
                source => {
                    warn!(feature = %decision.feature, source = ?source, "Feature missing from input, synthesizing");
                }
            }
        }
        match &self.target {
            TargetSource::Input(column) => {
                info!(column = %column, "Target read from input, keeping strictly positive rows");
            }
            TargetSource::UniformFloat { low, high } => {
                warn!(low = low, high = high, "No target column found, synthesizing random target");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_with_timestamp_and_fare() {
        let columns = ["key", "fare_amount", "pickup_datetime", "passenger_count"];
        let plan = FeaturePlan::inspect(&columns, &FeatureConfig::default());

        assert_eq!(plan.timestamp_column(), Some("pickup_datetime"));
        assert_eq!(plan.target(), &TargetSource::Input("fare_amount".to_string()));
        assert_eq!(
            plan.synthetic_features(),
            vec!["temperature", "humidity", "wind_speed", "weather_condition"]
        );
    }

    #[test]
    fn test_plan_without_anything() {
        let columns: [&str; 0] = [];
        let plan = FeaturePlan::inspect(&columns, &FeatureConfig::default());

        assert_eq!(plan.timestamp_column(), None);
        assert_eq!(plan.features()[0].source, ColumnSource::Constant(2025.0));
        assert_eq!(plan.synthetic_features().len(), 8);
        assert!(matches!(plan.target(), TargetSource::UniformFloat { .. }));
    }

    #[test]
    fn test_plan_keeps_feature_order() {
        let columns = ["humidity", "temperature"];
        let plan = FeaturePlan::inspect(&columns, &FeatureConfig::default());
        let names: Vec<&str> = plan.features().iter().map(|d| d.feature.as_str()).collect();
        assert_eq!(names, FEATURE_NAMES.to_vec());
        assert_eq!(plan.features()[4].source, ColumnSource::Input("temperature".to_string()));
        assert_eq!(plan.features()[5].source, ColumnSource::Input("humidity".to_string()));
    }

    #[test]
    fn test_target_candidate_priority() {
        let columns = ["price", "fare"];
        let plan = FeaturePlan::inspect(&columns, &FeatureConfig::default());
        assert_eq!(plan.target(), &TargetSource::Input("fare".to_string()));
    }
}
