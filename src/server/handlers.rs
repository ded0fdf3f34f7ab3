//! Request handlers

use axum::{
    extract::{rejection::FormRejection, Form, State},
    response::Html,
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

use super::state::AppState;
use crate::features::FeatureVector;
use crate::inference::render_outcome;

pub async fn serve_index() -> Html<String> {
    Html(render_page(None))
}

/// Always answers with the form; failures are rendered into the page.
///
/// A body that is not urlencoded form data is treated as an empty form, so
/// every field falls back to `0.0`.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Html<String> {
    let fields = match form {
        Ok(Form(fields)) => fields,
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable form body, using defaults");
            Vec::new()
        }
    };
    let features = FeatureVector::from_pairs(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    let outcome = state.predictor.predict(&features);
    match &outcome {
        Ok(value) => info!(prediction = *value, "Prediction served"),
        Err(e) => warn!(error = %e, "Prediction failed"),
    }
    Html(render_page(Some(&render_outcome(&outcome))))
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "run_id": state.predictor.run_id().to_string(),
    }))
}

fn render_page(result: Option<&str>) -> String {
    let result_block = result
        .map(|text| format!(r#"<div class="result">{}</div>"#, escape_html(text)))
        .unwrap_or_default();
    INDEX_HTML.replace("{{result}}", &result_block)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Ride Demand Predictor</title>
    <style>
        body{font-family:system-ui,sans-serif;max-width:32rem;margin:2rem auto;padding:0 1rem;color:#1f2937}
        label{display:block;margin-top:.75rem;font-size:.9rem}
        input{width:100%;padding:.4rem;box-sizing:border-box}
        button{margin-top:1.25rem;padding:.5rem 1.25rem}
        .result{margin-top:1.5rem;padding:.75rem;background:#f3f4f6;border-radius:.375rem;font-weight:600}
    </style>
</head>
<body>
    <h1>Ride Demand Predictor</h1>
    <form action="/predict" method="post">
        <label>Year <input type="number" name="year" step="1" placeholder="2025"></label>
        <label>Month (1-12) <input type="number" name="month" step="1" min="1" max="12"></label>
        <label>Day of week (0 = Monday) <input type="number" name="day_of_week" step="1" min="0" max="6"></label>
        <label>Hour (0-23) <input type="number" name="hour" step="1" min="0" max="23"></label>
        <label>Temperature (&deg;C) <input type="number" name="temperature" step="any"></label>
        <label>Humidity (%) <input type="number" name="humidity" step="any"></label>
        <label>Wind speed <input type="number" name="wind_speed" step="any"></label>
        <label>Weather condition (0-4) <input type="number" name="weather_condition" step="1" min="0" max="4"></label>
        <button type="submit">Predict</button>
    </form>
    {{result}}
</body>
</html>
"#;
