//! # forecast-score: Probabilistic Forecast Scoring
//!
//! Score personal forecasts with the Brier score once their outcome is known.
//! Each forecast has a scenario, an end date, optional tags, and one of five
//! shapes:
//!
//! - **interval**: confidence that the outcome lands in `[min, max]`
//! - **choice**: a probability per named option
//! - **pert**: a PERT (scaled Beta) distribution fitted from min / mode / max
//! - **lognormal**: a log-normal fitted from the 5th / 50th / 95th percentiles
//! - **pareto**: a Pareto fitted from the 90th / 99th percentiles
//!
//! Continuous forecasts are scored by turning the density around the outcome
//! into a probability over a small window (see [`ScoringConfig`]) and treating
//! it as a yes/no forecast.
//!
//! ## Example Usage
//!
//! ```rust
//! use forecast_score::{ForecastRecord, ScoringConfig};
//!
//! let mut record = ForecastRecord::from_json_str(r#"{
//!     "scenario": "Commute takes under an hour",
//!     "end_date": "2025-02-01",
//!     "type": "interval",
//!     "min": 20, "max": 60, "confidence": 0.9
//! }"#)?;
//!
//! record.resolve(45.0)?;
//! let score = record.calc_with(&ScoringConfig::default())?;
//! assert!((score - 0.02).abs() < 1e-12);
//! # Ok::<(), forecast_score::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod batch;
pub mod config;
pub mod distribution;
pub mod error;
pub mod forecast;
pub mod scoring;
pub mod special;

pub use batch::{ForecastBatch, ForecastFilter, ScoreSummary};
pub use config::ScoringConfig;
pub use distribution::{Distribution, LogNormal, Pareto, Pert};
pub use error::{Error, Result};
pub use forecast::{ForecastParams, ForecastRecord, ForecastType, Outcome};
pub use scoring::brier_score;
