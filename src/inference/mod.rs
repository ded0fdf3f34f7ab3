//! Inference module
//!
//! Loads a persisted (model, scaler) pair once and answers single or batched
//! prediction requests against it.

mod predictor;

pub use predictor::{format_prediction, render_outcome, round_prediction, Predictor};
