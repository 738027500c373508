//! Choice forecast - a probability for each of several named options

use tracing::warn;

use super::{ForecastParams, ForecastType};
use crate::scoring::brier_score;
use crate::{Error, Result};

/// Probabilities are expected to sum to one; larger gaps are logged.
const SUM_TOLERANCE: f64 = 0.01;

/// Discrete forecast over named options.
///
/// Options keep the order they were given in; the outcome vector used for
/// scoring follows the same order. A numeric outcome in a parameter set is
/// matched by its text, with integral floats written without a fraction, so
/// `"outcome": 1.0` selects the option named `"1"`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceForecast {
    options: Vec<(String, f64)>,
    outcome: Option<String>,
}

impl ChoiceForecast {
    /// Create an open choice forecast.
    ///
    /// Probabilities that do not sum to one are accepted but logged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if there are no options, an option
    /// name repeats, or a probability is outside [0, 1].
    pub fn new<I, S>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut collected: Vec<(String, f64)> = Vec::new();
        for (name, probability) in options {
            let name = name.into();
            if !(0.0..=1.0).contains(&probability) {
                return Err(Error::InvalidParameter(format!(
                    "probability for option '{name}' must be in [0, 1], got {probability}"
                )));
            }
            if collected.iter().any(|(existing, _)| *existing == name) {
                return Err(Error::InvalidParameter(format!("duplicate option '{name}'")));
            }
            collected.push((name, probability));
        }
        if collected.is_empty() {
            return Err(Error::InvalidParameter(
                "choice forecast needs at least one option".to_string(),
            ));
        }

        let total: f64 = collected.iter().map(|(_, p)| p).sum();
        if (total - 1.0).abs() > SUM_TOLERANCE {
            warn!(total, "choice probabilities do not sum to 1");
        }

        Ok(Self {
            options: collected,
            outcome: None,
        })
    }

    pub(crate) fn from_params(params: &ForecastParams) -> Result<Self> {
        let forecast = Self::new(params.require_weights("options", ForecastType::Choice)?)?;
        Ok(match params.optional_text("outcome")? {
            Some(outcome) => forecast.with_outcome(outcome),
            None => forecast,
        })
    }

    /// Attach the observed option.
    #[must_use]
    pub fn with_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.outcome = Some(outcome.into());
        self
    }

    /// Options and their probabilities, in the given order.
    #[must_use]
    pub fn options(&self) -> &[(String, f64)] {
        &self.options
    }

    /// Probability assigned to `name`, if it is an option.
    #[must_use]
    pub fn probability(&self, name: &str) -> Option<f64> {
        self.options
            .iter()
            .find(|(option, _)| option == name)
            .map(|(_, p)| *p)
    }

    /// Observed option, if known.
    #[must_use]
    pub fn outcome(&self) -> Option<&str> {
        self.outcome.as_deref()
    }

    pub(crate) fn set_outcome(&mut self, outcome: String) {
        self.outcome = Some(outcome);
    }

    /// Brier score of this forecast when `outcome` is the option that happened.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOutcome`] if `outcome` is not one of the options.
    pub fn score(&self, outcome: &str) -> Result<f64> {
        if self.probability(outcome).is_none() {
            return Err(Error::InvalidOutcome(format!(
                "'{outcome}' is not one of the options"
            )));
        }
        let indicators: Vec<f64> = self
            .options
            .iter()
            .map(|(name, _)| if name == outcome { 1.0 } else { 0.0 })
            .collect();
        let probabilities: Vec<f64> = self.options.iter().map(|(_, p)| *p).collect();
        brier_score(&indicators, &probabilities)
    }
}
