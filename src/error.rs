//! Error types for forecast-score
//!
//! Every failure the scoring core can report is one variant of [`Error`].
//! Construction errors mean the forecast record never exists; scoring errors
//! are local to one `calc()` call.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// forecast-score error types
#[derive(Error, Debug)]
pub enum Error {
    /// A parameter violates its domain constraints (ordering, positivity, range)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A required parameter key is absent
    #[error("Missing parameter '{key}' for {forecast_type} forecast")]
    MissingParameter {
        /// Name of the missing key
        key: String,
        /// Forecast type tag the key was required for
        forecast_type: String,
    },

    /// The type tag is not one of the supported forecast types
    #[error("Unknown forecast type: '{0}'\nExpected one of: interval, choice, pert, lognormal, pareto")]
    UnknownForecastType(String),

    /// Out-of-domain argument to a quantile or special function
    #[error("Domain error: {0}")]
    DomainError(String),

    /// `calc()` was called on a forecast that has no outcome yet
    #[error("Outcome not provided for scenario '{0}'")]
    OutcomeNotProvided(String),

    /// An outcome was supplied to a forecast that is already closed
    #[error("Outcome already provided for scenario '{0}'")]
    OutcomeAlreadyProvided(String),

    /// The outcome is not valid for this forecast (unknown choice, wrong shape)
    #[error("Invalid outcome: {0}")]
    InvalidOutcome(String),

    /// Outcome and forecast vectors differ in length
    #[error("Length mismatch: {outcomes} outcomes vs {forecasts} forecasts")]
    LengthMismatch {
        /// Number of outcome indicators
        outcomes: usize,
        /// Number of forecast probabilities
        forecasts: usize,
    },

    /// JSON parameter set could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
