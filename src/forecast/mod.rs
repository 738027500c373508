//! Forecast records
//!
//! A [`ForecastRecord`] owns the fields every forecast shares (scenario, end
//! date, tags) and exactly one variant-specific model:
//!
//! ```text
//! ForecastRecord ── ForecastKind
//!                      ├── Interval   (min, max, confidence)
//!                      ├── Choice     (option -> probability)
//!                      ├── Pert       (min, mode, max)       ─┐
//!                      ├── LogNormal  (p5, p50, p95)          ├─ fitted Distribution
//!                      └── Pareto     (p90, p99)             ─┘
//! ```
//!
//! A record is **open** until its outcome arrives and **closed** afterwards;
//! only closed records can be scored.
//!
//! ## Usage
//!
//! ```rust
//! use forecast_score::forecast::{ForecastParams, ForecastRecord};
//!
//! let params = ForecastParams::from_json_str(r#"{
//!     "scenario": "Team ships v2 this quarter",
//!     "end_date": "2025-03-31",
//!     "type": "choice",
//!     "tags": ["work"],
//!     "options": {"yes": 0.7, "no": 0.3},
//!     "outcome": "yes"
//! }"#)?;
//!
//! let record = ForecastRecord::from_params(&params)?;
//! assert!(record.is_closed());
//! assert!((record.calc()? - 0.18).abs() < 1e-12);
//! # Ok::<(), forecast_score::Error>(())
//! ```

mod choice;
mod continuous;
mod interval;
mod params;

pub use choice::ChoiceForecast;
pub use continuous::{ContinuousForecast, LogNormalForecast, ParetoForecast, PertForecast};
pub use interval::IntervalForecast;
pub use params::ForecastParams;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ScoringConfig;
use crate::{Error, Result};

/// The closed set of forecast types, keyed by their lowercase tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastType {
    /// Confidence that the outcome lands in an interval.
    Interval,
    /// Probabilities over named options.
    Choice,
    /// PERT (Beta) distribution from min / mode / max.
    Pert,
    /// Log-normal distribution from p5 / p50 / p95.
    LogNormal,
    /// Pareto distribution from p90 / p99.
    Pareto,
}

impl ForecastType {
    /// Every forecast type.
    pub const ALL: [Self; 5] = [
        Self::Interval,
        Self::Choice,
        Self::Pert,
        Self::LogNormal,
        Self::Pareto,
    ];

    /// The tag used in parameter sets.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Interval => "interval",
            Self::Choice => "choice",
            Self::Pert => "pert",
            Self::LogNormal => "lognormal",
            Self::Pareto => "pareto",
        }
    }
}

impl fmt::Display for ForecastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ForecastType {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == tag)
            .ok_or_else(|| Error::UnknownForecastType(tag.to_string()))
    }
}

/// An observed outcome: a number for interval and continuous forecasts, an
/// option name for choice forecasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    /// Numeric outcome.
    Value(f64),
    /// Name of the option that happened.
    Choice(String),
}

impl From<f64> for Outcome {
    fn from(value: f64) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for Outcome {
    fn from(name: &str) -> Self {
        Self::Choice(name.to_string())
    }
}

impl From<String> for Outcome {
    fn from(name: String) -> Self {
        Self::Choice(name)
    }
}

/// Whether a record's outcome is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForecastState {
    /// Waiting for the outcome.
    Open,
    /// Outcome known; the record can be scored.
    Closed,
}

/// Where an open or closed record stands relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForecastStatus {
    /// The outcome is known.
    Closed,
    /// Open, and the end date has passed by `days`.
    Overdue {
        /// Days since the end date.
        days: i64,
    },
    /// Open, closing in `days` (0 means today).
    ClosesIn {
        /// Days until the end date.
        days: i64,
    },
}

/// Variant-specific part of a forecast record.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastKind {
    /// Interval forecast.
    Interval(IntervalForecast),
    /// Choice forecast.
    Choice(ChoiceForecast),
    /// PERT forecast.
    Pert(PertForecast),
    /// Log-normal forecast.
    LogNormal(LogNormalForecast),
    /// Pareto forecast.
    Pareto(ParetoForecast),
}

impl ForecastKind {
    /// Type tag of this variant.
    #[must_use]
    pub const fn forecast_type(&self) -> ForecastType {
        match self {
            Self::Interval(_) => ForecastType::Interval,
            Self::Choice(_) => ForecastType::Choice,
            Self::Pert(_) => ForecastType::Pert,
            Self::LogNormal(_) => ForecastType::LogNormal,
            Self::Pareto(_) => ForecastType::Pareto,
        }
    }

    /// Build the variant selected by `forecast_type` from `params`.
    ///
    /// # Errors
    ///
    /// Propagates the variant's parameter errors.
    pub fn from_params(forecast_type: ForecastType, params: &ForecastParams) -> Result<Self> {
        Ok(match forecast_type {
            ForecastType::Interval => Self::Interval(IntervalForecast::from_params(params)?),
            ForecastType::Choice => Self::Choice(ChoiceForecast::from_params(params)?),
            ForecastType::Pert => Self::Pert(PertForecast::from_params(params)?),
            ForecastType::LogNormal => Self::LogNormal(LogNormalForecast::from_params(params)?),
            ForecastType::Pareto => Self::Pareto(ParetoForecast::from_params(params)?),
        })
    }

    fn is_closed(&self) -> bool {
        match self {
            Self::Interval(f) => f.outcome().is_some(),
            Self::Choice(f) => f.outcome().is_some(),
            Self::Pert(f) => f.outcome().is_some(),
            Self::LogNormal(f) => f.outcome().is_some(),
            Self::Pareto(f) => f.outcome().is_some(),
        }
    }
}

/// One forecast: shared metadata plus a variant model.
///
/// Records are validated on construction and immutable afterwards, except
/// for the one-time arrival of the outcome via [`ForecastRecord::resolve`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ForecastParams")]
pub struct ForecastRecord {
    scenario: String,
    end_date: NaiveDate,
    tags: BTreeSet<String>,
    kind: ForecastKind,
}

impl ForecastRecord {
    /// Assemble a record from an already-validated variant.
    #[must_use]
    pub fn new(scenario: impl Into<String>, end_date: NaiveDate, kind: ForecastKind) -> Self {
        Self {
            scenario: scenario.into(),
            end_date,
            tags: BTreeSet::new(),
            kind,
        }
    }

    /// Replace the tag set.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Build a record from its parameter set.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingParameter`] if a required key is absent
    /// - [`Error::UnknownForecastType`] if the `type` tag is not recognized
    /// - [`Error::InvalidParameter`] if a value violates the variant's constraints
    pub fn from_params(params: &ForecastParams) -> Result<Self> {
        let forecast_type = params.forecast_type()?;
        let scenario = params.require_text("scenario", forecast_type)?;
        let end_date = params.end_date(forecast_type)?;
        let tags = params.tags()?;
        let kind = ForecastKind::from_params(forecast_type, params)?;
        debug!(%scenario, %forecast_type, %end_date, "loaded forecast");

        Ok(Self {
            scenario,
            end_date,
            tags,
            kind,
        })
    }

    /// Parse and build a record from a JSON object.
    ///
    /// # Errors
    ///
    /// Same as [`ForecastRecord::from_params`], plus [`Error::Json`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_params(&ForecastParams::from_json_str(json)?)
    }

    /// Free-text scenario identifier.
    #[must_use]
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// Date the forecast resolves.
    #[must_use]
    pub const fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Type tag.
    #[must_use]
    pub const fn forecast_type(&self) -> ForecastType {
        self.kind.forecast_type()
    }

    /// Labels attached to the forecast.
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Whether the record carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Variant model.
    #[must_use]
    pub const fn kind(&self) -> &ForecastKind {
        &self.kind
    }

    /// Open or closed.
    #[must_use]
    pub fn state(&self) -> ForecastState {
        if self.kind.is_closed() {
            ForecastState::Closed
        } else {
            ForecastState::Open
        }
    }

    /// Whether the outcome is known.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.kind.is_closed()
    }

    /// Status relative to `today`.
    #[must_use]
    pub fn status(&self, today: NaiveDate) -> ForecastStatus {
        if self.is_closed() {
            return ForecastStatus::Closed;
        }
        let days = (self.end_date - today).num_days();
        if days < 0 {
            ForecastStatus::Overdue { days: -days }
        } else {
            ForecastStatus::ClosesIn { days }
        }
    }

    /// Record the outcome, closing the forecast.
    ///
    /// # Errors
    ///
    /// - [`Error::OutcomeAlreadyProvided`] if the record is already closed
    /// - [`Error::InvalidOutcome`] if the outcome has the wrong shape for the
    ///   variant (an option name for a numeric forecast or vice versa) or is
    ///   not a finite number
    pub fn resolve(&mut self, outcome: impl Into<Outcome>) -> Result<()> {
        if self.is_closed() {
            return Err(Error::OutcomeAlreadyProvided(self.scenario.clone()));
        }
        let forecast_type = self.forecast_type();
        match (&mut self.kind, outcome.into()) {
            (ForecastKind::Choice(f), Outcome::Choice(name)) => f.set_outcome(name),
            (ForecastKind::Choice(_), Outcome::Value(value)) => {
                return Err(Error::InvalidOutcome(format!(
                    "choice forecast needs an option name, got {value}"
                )));
            }
            (_, Outcome::Choice(name)) => {
                return Err(Error::InvalidOutcome(format!(
                    "{forecast_type} forecast needs a numeric outcome, got '{name}'"
                )));
            }
            (_, Outcome::Value(value)) if !value.is_finite() => {
                return Err(Error::InvalidOutcome(format!(
                    "outcome must be a finite number, got {value}"
                )));
            }
            (ForecastKind::Interval(f), Outcome::Value(value)) => f.set_outcome(value),
            (ForecastKind::Pert(f), Outcome::Value(value)) => f.set_outcome(value),
            (ForecastKind::LogNormal(f), Outcome::Value(value)) => f.set_outcome(value),
            (ForecastKind::Pareto(f), Outcome::Value(value)) => f.set_outcome(value),
        }
        debug!(scenario = %self.scenario, "forecast resolved");
        Ok(())
    }

    /// Brier score with the default [`ScoringConfig`].
    ///
    /// # Errors
    ///
    /// - [`Error::OutcomeNotProvided`] if the record is open
    /// - [`Error::InvalidOutcome`] if a choice outcome is not among the options
    pub fn calc(&self) -> Result<f64> {
        self.calc_with(&ScoringConfig::default())
    }

    /// Brier score under `config`.
    ///
    /// # Errors
    ///
    /// Same as [`ForecastRecord::calc`].
    pub fn calc_with(&self, config: &ScoringConfig) -> Result<f64> {
        match &self.kind {
            ForecastKind::Interval(f) => f.score(self.require_outcome(f.outcome())?),
            ForecastKind::Choice(f) => f.score(self.require_outcome(f.outcome())?),
            ForecastKind::Pert(f) => f.score(self.require_outcome(f.outcome())?, config),
            ForecastKind::LogNormal(f) => f.score(self.require_outcome(f.outcome())?, config),
            ForecastKind::Pareto(f) => f.score(self.require_outcome(f.outcome())?, config),
        }
    }

    fn require_outcome<T>(&self, outcome: Option<T>) -> Result<T> {
        outcome.ok_or_else(|| Error::OutcomeNotProvided(self.scenario.clone()))
    }
}

impl TryFrom<ForecastParams> for ForecastRecord {
    type Error = Error;

    fn try_from(params: ForecastParams) -> Result<Self> {
        Self::from_params(&params)
    }
}

impl FromStr for ForecastRecord {
    type Err = Error;

    fn from_str(json: &str) -> Result<Self> {
        Self::from_json_str(json)
    }
}
