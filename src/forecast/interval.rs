//! Interval forecast - "the outcome lands in [min, max] with this confidence"

use super::{ForecastParams, ForecastType};
use crate::scoring::binary_brier_score;
use crate::{Error, Result};

/// A stated interval and the probability that the outcome falls inside it.
///
/// No distribution is fitted: scoring is a direct yes/no encoding of
/// whether the outcome landed inside the (inclusive) interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalForecast {
    min: f64,
    max: f64,
    confidence: f64,
    outcome: Option<f64>,
}

impl IntervalForecast {
    /// Create an open interval forecast.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] unless `min <= max` and
    /// `confidence` is in [0, 1].
    pub fn new(min: f64, max: f64, confidence: f64) -> Result<Self> {
        if !(min.is_finite() && max.is_finite() && min <= max) {
            return Err(Error::InvalidParameter(format!(
                "interval requires finite min <= max, got min={min}, max={max}"
            )));
        }
        if !(0.0..=1.0).contains(&confidence) {
            return Err(Error::InvalidParameter(format!(
                "confidence must be in [0, 1], got {confidence}"
            )));
        }
        Ok(Self {
            min,
            max,
            confidence,
            outcome: None,
        })
    }

    pub(crate) fn from_params(params: &ForecastParams) -> Result<Self> {
        let ty = ForecastType::Interval;
        let forecast = Self::new(
            params.require_f64("min", ty)?,
            params.require_f64("max", ty)?,
            params.require_f64("confidence", ty)?,
        )?;
        Ok(match params.optional_f64("outcome")? {
            Some(outcome) => forecast.with_outcome(outcome),
            None => forecast,
        })
    }

    /// Attach the observed outcome.
    #[must_use]
    pub const fn with_outcome(mut self, outcome: f64) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Lower bound of the interval.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound of the interval.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Probability that the outcome falls inside the interval.
    #[must_use]
    pub const fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Observed outcome, if known.
    #[must_use]
    pub const fn outcome(&self) -> Option<f64> {
        self.outcome
    }

    /// Whether `value` lies inside the interval (bounds included).
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub(crate) fn set_outcome(&mut self, outcome: f64) {
        self.outcome = Some(outcome);
    }

    /// Brier score of this forecast against `outcome`.
    ///
    /// # Errors
    ///
    /// Propagates scoring errors.
    pub fn score(&self, outcome: f64) -> Result<f64> {
        binary_brier_score(self.contains(outcome), self.confidence)
    }
}
