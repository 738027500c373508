//! Continuous distributions fitted from elicited quantiles
//!
//! Each model is built once from two or three stated quantiles (not from
//! sample data) and is immutable afterwards.
//!
//! | Model | Elicited inputs | Window scale |
//! |---|---|---|
//! | [`Pert`] | min, mode, max | max − min |
//! | [`LogNormal`] | p5, p50, p95 | p50 |
//! | [`Pareto`] | p90, p99 | xmin |
//!
//! ## Usage
//!
//! ```rust
//! use forecast_score::distribution::{Distribution, Pert};
//!
//! let pert = Pert::new(1.0, 10.0, 100.0)?;
//! assert_eq!(pert.cdf(1.0), 0.0);
//! assert_eq!(pert.cdf(100.0), 1.0);
//!
//! // Probability mass within 1% of the range around the observed outcome
//! let p = pert.pdf_to_probability(15.0, None);
//! assert!(p > 0.0 && p < 1.0);
//! # Ok::<(), forecast_score::Error>(())
//! ```

mod lognormal;
mod pareto;
mod pert;

pub use lognormal::LogNormal;
pub use pareto::Pareto;
pub use pert::Pert;

use crate::{Error, Result};

/// Default half-width of the `pdf_to_probability` window, as a fraction of
/// the model's [`Distribution::window_scale`].
pub const DEFAULT_WINDOW_FRACTION: f64 = 0.01;

/// Common interface of the fitted continuous models.
pub trait Distribution {
    /// Probability density at `x` (0 outside the support).
    fn pdf(&self, x: f64) -> f64;

    /// Cumulative probability at `x`.
    fn cdf(&self, x: f64) -> f64;

    /// Quantile function (inverse CDF).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DomainError`] if `p` is not strictly inside (0, 1).
    fn ppf(&self, p: f64) -> Result<f64>;

    /// Distribution mean (may be `f64::INFINITY`).
    fn mean(&self) -> f64;

    /// Distribution variance (may be `f64::INFINITY`).
    fn variance(&self) -> f64;

    /// Lower and upper bounds of the support.
    fn support(&self) -> (f64, f64);

    /// Reference magnitude the default window is a fraction of.
    fn window_scale(&self) -> f64;

    /// Probability mass in `[x - epsilon, x + epsilon]`, clipped to the support.
    ///
    /// A point outcome has zero probability under a continuous model, so
    /// scoring uses the mass "right around" the outcome instead. `epsilon`
    /// defaults to [`DEFAULT_WINDOW_FRACTION`] of [`Self::window_scale`].
    /// Returns 0 when the clipped window is empty or `x` is not finite.
    fn pdf_to_probability(&self, x: f64, epsilon: Option<f64>) -> f64 {
        if !x.is_finite() {
            return 0.0;
        }
        let epsilon = epsilon.unwrap_or_else(|| DEFAULT_WINDOW_FRACTION * self.window_scale());
        let (lower, upper) = self.support();
        let a = (x - epsilon).max(lower);
        let b = (x + epsilon).min(upper);
        if b <= a {
            return 0.0;
        }
        (self.cdf(b) - self.cdf(a)).max(0.0)
    }
}

/// Reject probabilities outside the open unit interval.
pub(crate) fn check_open_probability(p: f64) -> Result<()> {
    if p > 0.0 && p < 1.0 {
        Ok(())
    } else {
        Err(Error::DomainError(format!(
            "probability must be in (0, 1), got {p}"
        )))
    }
}

/// Reject non-finite elicited quantiles.
pub(crate) fn check_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!("{name} must be finite, got {value}")))
    }
}
