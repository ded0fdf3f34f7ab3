//! Data preprocessing
//!
//! Feature scaling applied identically at training and inference time.

mod scaler;

pub use scaler::{ScalerParams, StandardScaler};
