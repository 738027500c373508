//! Brier scoring
//!
//! Sum of squared differences between outcome indicators and forecast
//! probabilities (the unnormalized, multi-category form used by Good
//! Judgment Open). Lower is better; 0 is a perfect forecast and 2 the worst
//! possible score for any categorical forecast.

use crate::{Error, Result};

/// Brier score of `forecasts` against `outcomes`.
///
/// For a two-outcome encoding `([1, 0], [p, 1 - p])` this equals `2 (1 - p)^2`.
///
/// # Errors
///
/// Returns [`Error::LengthMismatch`] if the two slices differ in length.
///
/// # Examples
///
/// ```rust
/// use forecast_score::scoring::brier_score;
///
/// let score = brier_score(&[1.0, 0.0], &[0.7, 0.3])?;
/// assert!((score - 0.18).abs() < 1e-12);
/// # Ok::<(), forecast_score::Error>(())
/// ```
pub fn brier_score(outcomes: &[f64], forecasts: &[f64]) -> Result<f64> {
    if outcomes.len() != forecasts.len() {
        return Err(Error::LengthMismatch {
            outcomes: outcomes.len(),
            forecasts: forecasts.len(),
        });
    }

    Ok(outcomes
        .iter()
        .zip(forecasts)
        .map(|(outcome, forecast)| (outcome - forecast).powi(2))
        .sum())
}

/// Score a single yes/no forecast: `p` is the probability given to "yes".
pub(crate) fn binary_brier_score(happened: bool, p: f64) -> Result<f64> {
    let outcomes = if happened { [1.0, 0.0] } else { [0.0, 1.0] };
    brier_score(&outcomes, &[p, 1.0 - p])
}
