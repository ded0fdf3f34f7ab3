//! Feature table construction from raw trip records

use polars::prelude::*;
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, info};

use super::plan::{CalendarPart, ColumnSource, FeaturePlan, TargetSource};
use super::timestamp::{parse_timestamp, CalendarParts};
use super::{FeatureConfig, FEATURE_NAMES, N_FEATURES, TARGET_COLUMN};
use crate::error::{RideDemandError, Result};

/// Builds the fixed feature table according to a [`FeaturePlan`]
#[derive(Debug, Clone)]
pub struct FeatureBuilder {
    plan: FeaturePlan,
    seed: u64,
}

impl FeatureBuilder {
    pub fn new(plan: FeaturePlan, seed: u64) -> Self {
        Self { plan, seed }
    }

    /// Inspect the frame's columns and build a plan for it
    pub fn for_frame(df: &DataFrame, config: &FeatureConfig) -> Self {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self::new(FeaturePlan::inspect(&columns, config), config.random_seed)
    }

    pub fn plan(&self) -> &FeaturePlan {
        &self.plan
    }

    /// Produce the 8 feature columns in model order followed by `target`.
    ///
    /// All synthetic draws share one generator seeded from `seed`, so the
    /// same input and seed always yield the same table.
    pub fn build(&self, df: &DataFrame) -> Result<DataFrame> {
        let n_rows = df.height();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.seed);

        let calendar = match self.plan.timestamp_column() {
            Some(column) => Some(read_calendar(df, column)?),
            None => None,
        };

        let mut feature_values: Vec<Vec<f64>> = Vec::with_capacity(N_FEATURES);
        for decision in self.plan.features() {
            let values = match &decision.source {
                ColumnSource::Input(column) => read_required_f64(df, column)?,
                ColumnSource::Timestamp { column, part } => {
                    let parts = calendar
                        .as_ref()
                        .ok_or_else(|| RideDemandError::ColumnNotFound(column.clone()))?;
                    parts.iter().map(|p| calendar_value(p, *part)).collect()
                }
                ColumnSource::Constant(value) => vec![*value; n_rows],
                ColumnSource::UniformInt { low, high } => {
                    (0..n_rows).map(|_| rng.gen_range(*low..*high) as f64).collect()
                }
                ColumnSource::UniformFloat { low, high } => {
                    (0..n_rows).map(|_| rng.gen_range(*low..*high)).collect()
                }
            };
            debug!(feature = %decision.feature, rows = values.len(), "Built feature column");
            feature_values.push(values);
        }

        let (target, keep): (Vec<f64>, Vec<bool>) = match self.plan.target() {
            TargetSource::Input(column) => {
                let raw = read_f64(df, column)?;
                let keep = raw.iter().map(|v| matches!(v, Some(x) if *x > 0.0)).collect();
                (raw.into_iter().map(|v| v.unwrap_or(0.0)).collect(), keep)
            }
            TargetSource::UniformFloat { low, high } => (
                (0..n_rows).map(|_| rng.gen_range(*low..*high)).collect(),
                vec![true; n_rows],
            ),
        };

        let kept = keep.iter().filter(|k| **k).count();
        if kept < n_rows {
            info!(dropped = n_rows - kept, kept = kept, "Dropped rows without a positive target");
        }
        if kept == 0 {
            return Err(RideDemandError::DataError(
                "no rows left after target filtering".to_string(),
            ));
        }

        let mut columns: Vec<Column> = FEATURE_NAMES
            .iter()
            .zip(feature_values)
            .map(|(name, values)| Column::new((*name).into(), retain(values, &keep)))
            .collect();
        columns.push(Column::new(TARGET_COLUMN.into(), retain(target, &keep)));

        Ok(DataFrame::new(columns)?)
    }
}

fn calendar_value(parts: &CalendarParts, part: CalendarPart) -> f64 {
    match part {
        CalendarPart::Year => f64::from(parts.year),
        CalendarPart::Month => f64::from(parts.month),
        CalendarPart::DayOfWeek => f64::from(parts.day_of_week),
        CalendarPart::Hour => f64::from(parts.hour),
    }
}

fn retain(values: Vec<f64>, keep: &[bool]) -> Vec<f64> {
    values
        .into_iter()
        .zip(keep)
        .filter_map(|(v, k)| k.then_some(v))
        .collect()
}

fn read_f64(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
    let raw = df
        .column(column)
        .map_err(|_| RideDemandError::ColumnNotFound(column.to_string()))?;
    let cast = raw.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().collect())
}

/// Numeric input column where every row must hold a value
fn read_required_f64(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    read_f64(df, column)?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| {
                RideDemandError::FeatureError(format!(
                    "column '{}' has a missing or non-numeric value at row {}",
                    column, row
                ))
            })
        })
        .collect()
}

fn read_calendar(df: &DataFrame, column: &str) -> Result<Vec<CalendarParts>> {
    let raw = df
        .column(column)
        .map_err(|_| RideDemandError::ColumnNotFound(column.to_string()))?;
    let as_text = raw.cast(&DataType::String)?;
    let ca = as_text.as_materialized_series().str()?;

    ca.into_iter()
        .enumerate()
        .map(|(row, value)| {
            let value = value.ok_or_else(|| {
                RideDemandError::FeatureError(format!(
                    "missing timestamp in column '{}' at row {}",
                    column, row
                ))
            })?;
            parse_timestamp(value).map(CalendarParts::from).ok_or_else(|| {
                RideDemandError::FeatureError(format!(
                    "unparseable timestamp '{}' in column '{}' at row {}",
                    value, column, row
                ))
            })
        })
        .collect()
}
