//! Integration test: predictor over persisted artifacts

mod common;

use ride_demand::features::FeatureVector;
use ride_demand::inference::{render_outcome, Predictor};
use std::collections::HashMap;

fn loaded() -> (tempfile::TempDir, Predictor) {
    let dir = tempfile::tempdir().unwrap();
    common::train_into(dir.path());
    let predictor = Predictor::load(dir.path()).unwrap();
    (dir, predictor)
}

fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn test_prediction_has_two_decimals() {
    let (_dir, predictor) = loaded();
    let fields = form(&[
        ("year", "2025"),
        ("month", "6"),
        ("day_of_week", "4"),
        ("hour", "18"),
        ("temperature", "27.5"),
        ("humidity", "60"),
        ("wind_speed", "5.2"),
        ("weather_condition", "1"),
    ]);
    let value = predictor.predict(&FeatureVector::from_form(&fields)).unwrap();
    assert_eq!((value * 100.0).round() / 100.0, value);

    let text = render_outcome(&Ok(value));
    let number = text
        .strip_prefix("Predicted Ride Demand: ")
        .and_then(|s| s.strip_suffix(" rides/hour"))
        .unwrap();
    assert_eq!(number.split('.').nth(1).map(str::len), Some(2));
}

#[test]
fn test_missing_and_garbage_fields_default_to_zero() {
    let (_dir, predictor) = loaded();
    let partial = FeatureVector::from_form(&form(&[("hour", "12"), ("humidity", "wet")]));
    assert_eq!(partial.humidity, 0.0);
    assert_eq!(partial.year, 0.0);

    let explicit = FeatureVector {
        hour: 12.0,
        ..Default::default()
    };
    assert_eq!(
        predictor.predict(&partial).unwrap(),
        predictor.predict(&explicit).unwrap()
    );
}

#[test]
fn test_non_finite_field_renders_error() {
    let (_dir, predictor) = loaded();
    let features = FeatureVector::from_form(&form(&[("temperature", "NaN")]));
    let text = render_outcome(&predictor.predict(&features));
    assert!(text.starts_with("Error: "), "{}", text);
}

#[test]
fn test_load_from_empty_dir_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Predictor::load(dir.path()).is_err());
}
