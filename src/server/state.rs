//! Application state shared across handlers

use crate::inference::Predictor;

/// Read-only state; handlers receive it as `State<Arc<AppState>>`
#[derive(Debug)]
pub struct AppState {
    pub predictor: Predictor,
}

impl AppState {
    pub fn new(predictor: Predictor) -> Self {
        Self { predictor }
    }
}
