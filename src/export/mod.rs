//! Artifact serialization

mod artifacts;

pub use artifacts::{read_json, write_json, ModelArtifacts, MODEL_FILE, REPORT_FILE, SCALER_FILE};
