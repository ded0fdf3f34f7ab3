//! Ride demand CLI
//!
//! Command-line interface for training, one-off predictions and serving.

use clap::{Args, Parser, Subcommand};
use colored::*;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use crate::features::{FeatureConfig, FeatureVector, FEATURE_NAMES};
use crate::inference::{render_outcome, Predictor};
use crate::training::{BoosterConfig, Trainer, TrainingConfig};

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let total_pad = W.saturating_sub(strip_ansi(content).chars().count());
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "ride-demand")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train and serve a ride demand regression model")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train a model from a trip file
    Train(TrainArgs),

    /// Predict demand for a single set of inputs
    Predict(PredictArgs),

    /// Start the prediction form server
    Serve {
        /// Directory holding the trained artifacts
        #[arg(long, default_value = "model")]
        model_dir: PathBuf,

        /// Server host
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Server port
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// Input data file (CSV, TSV, JSON or JSON lines)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Output directory for model, scaler and report
    #[arg(long, default_value = "model")]
    pub model_dir: PathBuf,

    /// Seed for the split, synthetic columns and the booster
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value = "0.2")]
    pub test_size: f64,

    #[arg(long, default_value = "pickup_datetime")]
    pub timestamp_column: String,

    /// Target column candidates, first present wins (repeatable)
    #[arg(long = "target-column")]
    pub target_columns: Vec<String>,

    #[arg(long, default_value = "200")]
    pub n_estimators: usize,

    #[arg(long, default_value = "6")]
    pub max_depth: usize,

    #[arg(long, default_value = "0.1")]
    pub learning_rate: f64,
}

impl TrainArgs {
    pub fn to_config(&self) -> TrainingConfig {
        let mut features = FeatureConfig::default().with_timestamp_column(&self.timestamp_column);
        if !self.target_columns.is_empty() {
            features = features.with_target_columns(self.target_columns.clone());
        }
        let booster = BoosterConfig {
            n_estimators: self.n_estimators,
            max_depth: self.max_depth,
            learning_rate: self.learning_rate,
            ..Default::default()
        };

        TrainingConfig::new(&self.data)
            .with_model_dir(&self.model_dir)
            .with_test_size(self.test_size)
            .with_features(features)
            .with_booster(booster)
            .with_seed(self.seed)
    }
}

/// Raw values are kept as text so that non-numeric input falls back to 0 like the form
#[derive(Args, Debug, Clone, Default)]
pub struct PredictArgs {
    #[arg(long, default_value = "model")]
    pub model_dir: PathBuf,

    #[arg(long)]
    pub year: Option<String>,
    #[arg(long)]
    pub month: Option<String>,
    #[arg(long)]
    pub day_of_week: Option<String>,
    #[arg(long)]
    pub hour: Option<String>,
    #[arg(long)]
    pub temperature: Option<String>,
    #[arg(long)]
    pub humidity: Option<String>,
    #[arg(long)]
    pub wind_speed: Option<String>,
    #[arg(long)]
    pub weather_condition: Option<String>,
}

impl PredictArgs {
    pub fn fields(&self) -> HashMap<String, String> {
        let values = [
            &self.year,
            &self.month,
            &self.day_of_week,
            &self.hour,
            &self.temperature,
            &self.humidity,
            &self.wind_speed,
            &self.weather_condition,
        ];
        FEATURE_NAMES
            .iter()
            .zip(values)
            .filter_map(|(name, value)| value.as_ref().map(|v| (name.to_string(), v.clone())))
            .collect()
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(args: &TrainArgs) -> anyhow::Result<()> {
    section("Train");
    let config = args.to_config();

    step_run(&format!("Training on {}", args.data.display().to_string().cyan()));
    let start = Instant::now();
    let outcome = Trainer::new(config).run()?;
    step_done(&format!("{:?}", start.elapsed()));

    let report = &outcome.report;
    println!();
    println!("  {:<16} {}", muted("Rows"), format!("{} ({} train / {} test)", report.n_rows, report.n_train, report.n_test).white());
    println!("  {:<16} {}", muted("MAE"), format!("{:.4}", report.metrics.mae).white().bold());
    println!("  {:<16} {}", muted("R²"), format!("{:.4}", report.metrics.r2).white().bold());
    println!("  {:<16} {}", muted("Time"), format!("{:.3}s", report.training_time_secs).white());
    println!("  {:<16} {}", muted("Run"), dim(&report.run_id.to_string()));
    println!("  {:<16} {}", muted("Saved to"), args.model_dir.display().to_string().white());

    let synthetic = report.plan.synthetic_features();
    if !synthetic.is_empty() {
        println!();
        println!("  {} {}", "synthetic:".yellow(), dim(&synthetic.join(", ")));
    }
    println!();

    Ok(())
}

pub fn cmd_predict(args: &PredictArgs) -> anyhow::Result<()> {
    section("Predict");

    let predictor = Predictor::load(&args.model_dir)?;
    let features = FeatureVector::from_form(&args.fields());
    let outcome = predictor.predict(&features);
    let text = render_outcome(&outcome);

    match outcome {
        Ok(_) => println!("  {} {}", ok("✓"), text.white().bold()),
        Err(_) => println!("  {} {}", "✗".red(), text.red()),
    }
    println!();
    Ok(())
}

pub async fn cmd_serve(model_dir: PathBuf, host: &str, port: u16) -> anyhow::Result<()> {
    use crate::server::{run_server, ServerConfig};

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "Ride Demand Predictor".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box(&kv("Form   ", &format!("http://{}:{}", host, port)));
    line_box(&kv("Health ", &format!("http://{}:{}/api/health", host, port)));
    line_box(&kv("Model  ", &model_dir.display().to_string()));
    line_box_empty();
    line_box_center(&format!("{}", dim("ctrl+c to stop")));
    line_box_empty();
    line_box_bottom();
    println!();

    let config = ServerConfig {
        host: host.to_string(),
        port,
        model_dir,
    };

    run_server(config).await
}
