//! Seeded random train/test partitioning

use crate::error::{RideDemandError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Row indices of a train/test partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Materialized train/test data
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
}

/// Shuffle `0..n_rows` with a seeded generator; the first
/// `ceil(test_size * n_rows)` indices become the test split.
pub fn split_indices(n_rows: usize, test_size: f64, seed: u64) -> Result<SplitIndices> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(RideDemandError::ConfigError(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }
    let n_test = (n_rows as f64 * test_size).ceil() as usize;
    if n_test == 0 || n_test >= n_rows {
        return Err(RideDemandError::DataError(format!(
            "{} rows cannot be split into non-empty train and test sets",
            n_rows
        )));
    }

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let train = indices.split_off(n_test);

    Ok(SplitIndices { train, test: indices })
}

/// Split features and target row-wise
pub fn train_test_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    test_size: f64,
    seed: u64,
) -> Result<TrainTestSplit> {
    if x.nrows() != y.len() {
        return Err(RideDemandError::ShapeError {
            expected: format!("{} targets", x.nrows()),
            actual: y.len().to_string(),
        });
    }
    let idx = split_indices(x.nrows(), test_size, seed)?;
    Ok(TrainTestSplit {
        x_train: x.select(Axis(0), &idx.train),
        x_test: x.select(Axis(0), &idx.test),
        y_train: y.select(Axis(0), &idx.train),
        y_test: y.select(Axis(0), &idx.test),
    })
}
