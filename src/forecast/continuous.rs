//! Forecasts backed by a fitted continuous distribution

use super::{ForecastParams, ForecastType};
use crate::config::ScoringConfig;
use crate::distribution::{Distribution, LogNormal, Pareto, Pert};
use crate::scoring::binary_brier_score;
use crate::Result;

/// A fitted distribution plus the observed outcome, once known.
///
/// Scoring turns the outcome into a probability with the model's
/// `pdf_to_probability` window and scores it as a yes/no forecast that the
/// outcome would land right there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuousForecast<D> {
    model: D,
    outcome: Option<f64>,
}

/// PERT forecast (`min`, `mode`, `max`).
pub type PertForecast = ContinuousForecast<Pert>;

/// Log-normal forecast (`p5`, `p50`, `p95`).
pub type LogNormalForecast = ContinuousForecast<LogNormal>;

/// Pareto forecast (`p90`, `p99`).
pub type ParetoForecast = ContinuousForecast<Pareto>;

impl<D: Distribution> ContinuousForecast<D> {
    /// Create an open forecast around a fitted model.
    #[must_use]
    pub fn new(model: D) -> Self {
        Self {
            model,
            outcome: None,
        }
    }

    /// Attach the observed outcome.
    #[must_use]
    pub fn with_outcome(mut self, outcome: f64) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// The fitted distribution.
    #[must_use]
    pub const fn model(&self) -> &D {
        &self.model
    }

    /// Observed outcome, if known.
    #[must_use]
    pub const fn outcome(&self) -> Option<f64> {
        self.outcome
    }

    pub(crate) fn set_outcome(&mut self, outcome: f64) {
        self.outcome = Some(outcome);
    }

    /// Probability mass the model puts "right around" `outcome`.
    #[must_use]
    pub fn outcome_probability(&self, outcome: f64, config: &ScoringConfig) -> f64 {
        let epsilon = config.window_fraction() * self.model.window_scale();
        self.model.pdf_to_probability(outcome, Some(epsilon))
    }

    /// Brier score of this forecast against `outcome`.
    ///
    /// # Errors
    ///
    /// Propagates scoring errors.
    pub fn score(&self, outcome: f64, config: &ScoringConfig) -> Result<f64> {
        binary_brier_score(true, self.outcome_probability(outcome, config))
    }

    fn from_model(model: D, params: &ForecastParams) -> Result<Self> {
        let forecast = Self::new(model);
        Ok(match params.optional_f64("outcome")? {
            Some(outcome) => forecast.with_outcome(outcome),
            None => forecast,
        })
    }
}

impl PertForecast {
    pub(crate) fn from_params(params: &ForecastParams) -> Result<Self> {
        let ty = ForecastType::Pert;
        let model = Pert::new(
            params.require_f64("min", ty)?,
            params.require_f64("mode", ty)?,
            params.require_f64("max", ty)?,
        )?;
        Self::from_model(model, params)
    }
}

impl LogNormalForecast {
    pub(crate) fn from_params(params: &ForecastParams) -> Result<Self> {
        let ty = ForecastType::LogNormal;
        let model = LogNormal::new(
            params.require_f64("p5", ty)?,
            params.require_f64("p50", ty)?,
            params.require_f64("p95", ty)?,
        )?;
        Self::from_model(model, params)
    }
}

impl ParetoForecast {
    pub(crate) fn from_params(params: &ForecastParams) -> Result<Self> {
        let ty = ForecastType::Pareto;
        let model = Pareto::new(params.require_f64("p90", ty)?, params.require_f64("p99", ty)?)?;
        Self::from_model(model, params)
    }
}
