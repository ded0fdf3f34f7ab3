//! Integration test: feature plan and table building

use polars::prelude::*;
use ride_demand::features::{
    ColumnSource, FeatureBuilder, FeatureConfig, FeaturePlan, TargetSource, FEATURE_NAMES,
    TARGET_COLUMN,
};
use ride_demand::RideDemandError;

fn column(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .unwrap()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect()
}

#[test]
fn test_uber_style_table() {
    let raw = df!(
        "key" => &["a", "b", "c"],
        "fare_amount" => &[7.5, 0.0, 12.5],
        "pickup_datetime" => &[
            "2015-05-07 19:52:06 UTC",
            "2009-07-17 20:04:56 UTC",
            "2012-01-01 00:15:00 UTC",
        ]
    )
    .unwrap();

    let builder = FeatureBuilder::for_frame(&raw, &FeatureConfig::default());
    assert_eq!(
        builder.plan().target(),
        &TargetSource::Input("fare_amount".to_string())
    );
    let table = builder.build(&raw).unwrap();

    // Zero fare dropped
    assert_eq!(table.height(), 2);
    assert_eq!(column(&table, "year"), vec![2015.0, 2012.0]);
    assert_eq!(column(&table, "month"), vec![5.0, 1.0]);
    // Thursday and Sunday
    assert_eq!(column(&table, "day_of_week"), vec![3.0, 6.0]);
    assert_eq!(column(&table, "hour"), vec![19.0, 0.0]);
    assert_eq!(column(&table, TARGET_COLUMN), vec![7.5, 12.5]);

    let names: Vec<&str> = table.get_column_names().iter().map(|s| s.as_str()).collect();
    let mut expected: Vec<&str> = FEATURE_NAMES.to_vec();
    expected.push(TARGET_COLUMN);
    assert_eq!(names, expected);
}

#[test]
fn test_weather_synthesized_in_range() {
    let timestamps: Vec<String> = (0..200)
        .map(|i| format!("2024-03-{:02} {:02}:00:00", i % 28 + 1, i % 24))
        .collect();
    let fares: Vec<f64> = (0..200).map(|i| 3.0 + i as f64).collect();
    let raw = df!("pickup_datetime" => timestamps, "price" => fares).unwrap();

    let builder = FeatureBuilder::for_frame(&raw, &FeatureConfig::default());
    assert_eq!(
        builder.plan().synthetic_features(),
        vec!["temperature", "humidity", "wind_speed", "weather_condition"]
    );
    let table = builder.build(&raw).unwrap();

    assert!(column(&table, "temperature").iter().all(|v| (20.0..35.0).contains(v)));
    assert!(column(&table, "humidity").iter().all(|v| (40.0..90.0).contains(v)));
    assert!(column(&table, "wind_speed").iter().all(|v| (0.0..20.0).contains(v)));
    assert!(column(&table, "weather_condition")
        .iter()
        .all(|v| v.fract() == 0.0 && (0.0..=4.0).contains(v)));
}

#[test]
fn test_no_timestamp_no_target() {
    let raw = df!("passenger_count" => &[1i64, 2, 3, 4, 5]).unwrap();
    let config = FeatureConfig::default();
    let plan = FeaturePlan::inspect(&["passenger_count"], &config);

    assert_eq!(plan.timestamp_column(), None);
    assert!(matches!(plan.target(), TargetSource::UniformFloat { .. }));
    assert_eq!(plan.features()[0].source, ColumnSource::Constant(2025.0));

    let table = FeatureBuilder::new(plan, config.random_seed).build(&raw).unwrap();
    assert_eq!(table.height(), 5);
    assert!(column(&table, "year").iter().all(|&y| y == 2025.0));
    assert!(column(&table, "month").iter().all(|m| (1.0..=12.0).contains(m)));
    assert!(column(&table, "day_of_week").iter().all(|d| (0.0..=6.0).contains(d)));
    assert!(column(&table, "hour").iter().all(|h| (0.0..=23.0).contains(h)));
    assert!(column(&table, TARGET_COLUMN).iter().all(|t| (50.0..300.0).contains(t)));
}

#[test]
fn test_seed_controls_synthesis() {
    let raw = df!("fare" => &[10.0, 20.0, 30.0, 40.0]).unwrap();
    let build = |seed: u64| {
        let config = FeatureConfig::default().with_seed(seed);
        FeatureBuilder::for_frame(&raw, &config).build(&raw).unwrap()
    };

    assert!(build(42).equals(&build(42)));
    assert!(!build(42).equals(&build(43)));
}

#[test]
fn test_unparseable_timestamp_is_fatal() {
    let raw = df!(
        "pickup_datetime" => &["2015-05-07 19:52:06 UTC", "yesterday"],
        "fare_amount" => &[5.0, 6.0]
    )
    .unwrap();
    let result = FeatureBuilder::for_frame(&raw, &FeatureConfig::default()).build(&raw);
    assert!(matches!(result, Err(RideDemandError::FeatureError(_))));
}
