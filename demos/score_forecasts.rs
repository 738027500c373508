//! Forecast Scoring Example
//!
//! Loads a handful of forecasts, resolves one, and prints each record's status
//! or Brier score followed by the batch summary.
//!
//! Run with: cargo run --example score_forecasts
//! Set RUST_LOG=debug to see model fits.

use chrono::NaiveDate;
use forecast_score::batch::ForecastFilter;
use forecast_score::forecast::ForecastStatus;
use forecast_score::{ForecastBatch, ScoringConfig};

const FORECASTS: &str = r#"[
    {"scenario": "Quarterly revenue above target", "end_date": "2025-03-31",
     "type": "pert", "tags": ["work"], "min": 80, "mode": 100, "max": 150, "outcome": 112},
    {"scenario": "Flat rent next year", "end_date": "2025-12-31",
     "type": "lognormal", "tags": ["home"], "p5": 1200, "p50": 1400, "p95": 1900},
    {"scenario": "Next release ships on time", "end_date": "2025-02-14",
     "type": "choice", "tags": ["work"], "options": {"on time": 0.6, "late": 0.4},
     "outcome": "late"},
    {"scenario": "Biggest outage this year (minutes)", "end_date": "2025-01-31",
     "type": "pareto", "tags": ["work", "ops"], "p90": 30, "p99": 240},
    {"scenario": "Marathon time under 4h", "end_date": "2025-04-20",
     "type": "interval", "tags": ["sport"], "min": 200, "max": 240, "confidence": 0.7,
     "outcome": 233}
]"#;

fn main() -> forecast_score::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== Forecast Scoring ===\n");

    let mut batch = ForecastBatch::from_json_str(FORECASTS)?;
    println!("Loaded {} forecasts", batch.len());

    // -------------------------------------------------------------------------
    // 1. Resolve the outage forecast
    // -------------------------------------------------------------------------
    if let Some(outage) = batch.get_mut(3) {
        outage.resolve(45.0)?;
        println!("Resolved '{}'\n", outage.scenario());
    }

    // -------------------------------------------------------------------------
    // 2. Per-record status, sorted by end date
    // -------------------------------------------------------------------------
    let config = ScoringConfig::default();
    let today = NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date");

    for record in batch.filtered(&ForecastFilter::new()) {
        let line = match record.status(today) {
            ForecastStatus::Closed => match record.calc_with(&config) {
                Ok(score) => format!("Brier {score:.4}"),
                Err(error) => format!("error: {error}"),
            },
            ForecastStatus::Overdue { days } => format!("overdue by {days} days"),
            ForecastStatus::ClosesIn { days } => format!("closes in {days} days"),
        };
        println!(
            "{}  {:<10} {:<40} {}",
            record.end_date(),
            record.forecast_type(),
            record.scenario(),
            line
        );
    }

    // -------------------------------------------------------------------------
    // 3. Only work forecasts
    // -------------------------------------------------------------------------
    let work = batch.filtered(&ForecastFilter::new().tag("work"));
    println!("\n{} forecasts tagged 'work'", work.len());

    // -------------------------------------------------------------------------
    // 4. Summary
    // -------------------------------------------------------------------------
    let summary = batch.summary(&config);
    println!("\nSummary:\n{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
