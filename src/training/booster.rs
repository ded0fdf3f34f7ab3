//! Gradient-boosted regression trees with second-order split scoring
//!
//! - Squared error loss: gradient `pred - y`, unit hessian
//! - Regularized leaf weights: w* = -G / (H + lambda), soft-thresholded by alpha
//! - Gain = 0.5 * [GL²/(HL+λ) + GR²/(HR+λ) - (GL+GR)²/(HL+HR+λ)], split when gain > γ
//! - Row subsampling per round and column subsampling per tree
//! - Minimum child hessian constraint

use crate::error::{RideDemandError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Booster hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoosterConfig {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    pub min_child_weight: f64,
    /// L2 regularization on leaf weights
    pub reg_lambda: f64,
    /// L1 regularization on leaf weights
    pub reg_alpha: f64,
    /// Minimum loss reduction to make a split
    pub gamma: f64,
    /// Fraction of rows sampled per round
    pub subsample: f64,
    /// Fraction of features sampled per tree
    pub colsample_bytree: f64,
    pub random_state: u64,
}

impl Default for BoosterConfig {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            learning_rate: 0.1,
            max_depth: 6,
            min_child_weight: 1.0,
            reg_lambda: 1.0,
            reg_alpha: 0.0,
            gamma: 0.0,
            subsample: 0.8,
            colsample_bytree: 0.8,
            random_state: 42,
        }
    }
}

impl BoosterConfig {
    pub fn validate(&self) -> Result<()> {
        let fraction = |name: &str, v: f64| {
            if v > 0.0 && v <= 1.0 {
                Ok(())
            } else {
                Err(RideDemandError::ConfigError(format!(
                    "{} must be in (0, 1], got {}",
                    name, v
                )))
            }
        };
        if self.n_estimators == 0 {
            return Err(RideDemandError::ConfigError(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if !(self.learning_rate > 0.0) {
            return Err(RideDemandError::ConfigError(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.reg_lambda < 0.0 || self.reg_alpha < 0.0 || self.gamma < 0.0 {
            return Err(RideDemandError::ConfigError(
                "reg_lambda, reg_alpha and gamma must be non-negative".to_string(),
            ));
        }
        fraction("subsample", self.subsample)?;
        fraction("colsample_bytree", self.colsample_bytree)
    }
}

/// A single node in a regression tree
#[derive(Debug, Clone, Serialize, Deserialize)]
enum TreeNode {
    Leaf { weight: f64 },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn predict(&self, sample: ArrayView1<f64>) -> f64 {
        match self {
            TreeNode::Leaf { weight } => *weight,
            TreeNode::Split { feature, threshold, left, right } => {
                if sample[*feature] <= *threshold {
                    left.predict(sample)
                } else {
                    right.predict(sample)
                }
            }
        }
    }

    fn count_splits(&self, counts: &mut [f64]) {
        if let TreeNode::Split { feature, left, right, .. } = self {
            if *feature < counts.len() {
                counts[*feature] += 1.0;
            }
            left.count_splits(counts);
            right.count_splits(counts);
        }
    }
}

/// Best split candidate for one feature
#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

impl SplitCandidate {
    /// Higher gain wins; ties go to the lower feature index
    fn better_than(&self, other: &Self) -> Ordering {
        self.gain
            .partial_cmp(&other.gain)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.feature.cmp(&self.feature))
    }
}

struct TreeContext<'a> {
    x: &'a Array2<f64>,
    grad: &'a Array1<f64>,
    hess: &'a Array1<f64>,
    feature_indices: &'a [usize],
    config: &'a BoosterConfig,
}

/// Grow a tree using exact greedy split finding
fn build_tree(ctx: &TreeContext<'_>, indices: &[usize], depth: usize) -> TreeNode {
    let g_sum: f64 = indices.iter().map(|&i| ctx.grad[i]).sum();
    let h_sum: f64 = indices.iter().map(|&i| ctx.hess[i]).sum();
    let leaf_weight = compute_leaf_weight(g_sum, h_sum, ctx.config.reg_lambda, ctx.config.reg_alpha);

    if depth >= ctx.config.max_depth || indices.len() < 2 || h_sum < ctx.config.min_child_weight {
        return TreeNode::Leaf { weight: leaf_weight };
    }

    let best = ctx
        .feature_indices
        .par_iter()
        .filter_map(|&f| find_best_split(ctx, indices, f))
        .max_by(|a, b| a.better_than(b));

    match best {
        Some(split) if split.gain > ctx.config.gamma => {
            let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .partition(|&&i| ctx.x[[i, split.feature]] <= split.threshold);

            if left_idx.is_empty() || right_idx.is_empty() {
                return TreeNode::Leaf { weight: leaf_weight };
            }

            TreeNode::Split {
                feature: split.feature,
                threshold: split.threshold,
                left: Box::new(build_tree(ctx, &left_idx, depth + 1)),
                right: Box::new(build_tree(ctx, &right_idx, depth + 1)),
            }
        }
        _ => TreeNode::Leaf { weight: leaf_weight },
    }
}

/// Optimal leaf weight with L1 (alpha) and L2 (lambda) regularization
fn compute_leaf_weight(g_sum: f64, h_sum: f64, lambda: f64, alpha: f64) -> f64 {
    let g_adj = if g_sum > alpha {
        g_sum - alpha
    } else if g_sum < -alpha {
        g_sum + alpha
    } else {
        return 0.0;
    };
    -g_adj / (h_sum + lambda)
}

fn find_best_split(ctx: &TreeContext<'_>, indices: &[usize], feature: usize) -> Option<SplitCandidate> {
    let x = ctx.x;
    let mut sorted: Vec<usize> = indices.to_vec();
    sorted.sort_by(|&a, &b| {
        x[[a, feature]]
            .partial_cmp(&x[[b, feature]])
            .unwrap_or(Ordering::Equal)
    });

    let g_total: f64 = sorted.iter().map(|&i| ctx.grad[i]).sum();
    let h_total: f64 = sorted.iter().map(|&i| ctx.hess[i]).sum();
    let lambda = ctx.config.reg_lambda;
    let parent_score = (g_total * g_total) / (h_total + lambda);

    let mut g_left = 0.0;
    let mut h_left = 0.0;
    let mut best: Option<SplitCandidate> = None;

    for (pos, &idx) in sorted.iter().enumerate() {
        g_left += ctx.grad[idx];
        h_left += ctx.hess[idx];

        // Only split between distinct values
        let Some(&next_idx) = sorted.get(pos + 1) else {
            break;
        };
        let (value, next_value) = (x[[idx, feature]], x[[next_idx, feature]]);
        if (next_value - value).abs() < 1e-12 {
            continue;
        }

        let g_right = g_total - g_left;
        let h_right = h_total - h_left;
        if h_left < ctx.config.min_child_weight || h_right < ctx.config.min_child_weight {
            continue;
        }

        let gain = 0.5
            * ((g_left * g_left) / (h_left + lambda) + (g_right * g_right) / (h_right + lambda)
                - parent_score);

        if best.map_or(true, |b| gain > b.gain) {
            best = Some(SplitCandidate {
                feature,
                threshold: (value + next_value) / 2.0,
                gain,
            });
        }
    }

    best
}

/// Sample `ratio * n` distinct indices (rounded up), returned sorted
fn subsample(rng: &mut Xoshiro256PlusPlus, n: usize, ratio: f64) -> Vec<usize> {
    if ratio >= 1.0 {
        return (0..n).collect();
    }
    let k = ((n as f64) * ratio).ceil().max(1.0) as usize;
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    indices.truncate(k);
    indices.sort_unstable();
    indices
}

/// Gradient-boosted tree regressor (squared error loss)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostedRegressor {
    config: BoosterConfig,
    trees: Vec<TreeNode>,
    base_score: f64,
    n_features: usize,
}

impl GradientBoostedRegressor {
    pub fn new(config: BoosterConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            base_score: 0.0,
            n_features: 0,
        }
    }

    pub fn config(&self) -> &BoosterConfig {
        &self.config
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn is_fitted(&self) -> bool {
        self.n_features > 0
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        self.config.validate()?;
        let n_samples = x.nrows();
        let n_features = x.ncols();
        if n_samples == 0 || n_features == 0 {
            return Err(RideDemandError::TrainingError(
                "cannot fit on an empty matrix".to_string(),
            ));
        }
        if y.len() != n_samples {
            return Err(RideDemandError::ShapeError {
                expected: format!("{} targets", n_samples),
                actual: y.len().to_string(),
            });
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(RideDemandError::TrainingError(
                "training data contains non-finite values".to_string(),
            ));
        }

        self.n_features = n_features;
        self.base_score = y.mean().unwrap_or(0.0);
        self.trees.clear();

        let mut preds = Array1::from_elem(n_samples, self.base_score);
        let hess = Array1::from_elem(n_samples, 1.0);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.config.random_state);

        for round in 0..self.config.n_estimators {
            let grad: Array1<f64> = &preds - y;

            let row_indices = subsample(&mut rng, n_samples, self.config.subsample);
            let col_indices = subsample(&mut rng, n_features, self.config.colsample_bytree);

            let ctx = TreeContext {
                x,
                grad: &grad,
                hess: &hess,
                feature_indices: &col_indices,
                config: &self.config,
            };
            let tree = build_tree(&ctx, &row_indices, 0);

            for (i, row) in x.rows().into_iter().enumerate() {
                preds[i] += self.config.learning_rate * tree.predict(row);
            }
            self.trees.push(tree);

            if (round + 1) % 50 == 0 {
                let mse = (&preds - y).mapv(|v| v * v).mean().unwrap_or(0.0);
                debug!(round = round + 1, train_rmse = mse.sqrt(), "Boosting progress");
            }
        }

        Ok(())
    }

    /// Predict a single row
    pub fn predict_row(&self, row: ArrayView1<f64>) -> Result<f64> {
        if !self.is_fitted() {
            return Err(RideDemandError::ModelNotFitted);
        }
        if row.len() != self.n_features {
            return Err(RideDemandError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: row.len().to_string(),
            });
        }
        let lr = self.config.learning_rate;
        Ok(self.base_score + self.trees.iter().map(|t| lr * t.predict(row)).sum::<f64>())
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        x.rows()
            .into_iter()
            .map(|row| self.predict_row(row))
            .collect::<Result<Vec<f64>>>()
            .map(Array1::from_vec)
    }

    /// R² on the given data
    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        let p = self.predict(x)?;
        let ym = y.mean().unwrap_or(0.0);
        let ss_res = (&p - y).mapv(|v| v * v).sum();
        let ss_tot = y.mapv(|v| (v - ym).powi(2)).sum();
        Ok(if ss_tot == 0.0 { 1.0 } else { 1.0 - ss_res / ss_tot })
    }

    /// Split-count importances, normalized to sum to 1
    pub fn feature_importances(&self) -> Option<Array1<f64>> {
        if !self.is_fitted() {
            return None;
        }
        let mut counts = vec![0.0f64; self.n_features];
        for tree in &self.trees {
            tree.count_splits(&mut counts);
        }
        let total: f64 = counts.iter().sum();
        if total > 0.0 {
            for c in counts.iter_mut() {
                *c /= total;
            }
        }
        Some(Array1::from_vec(counts))
    }
}
