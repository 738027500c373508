//! Pareto (power-law tail) distribution fitted from the 90th and 99th percentiles

use tracing::debug;

use super::{check_finite, check_open_probability, Distribution};
use crate::{Error, Result};

const Q90: f64 = 0.90;
const Q99: f64 = 0.99;

/// Pareto distribution with tail index `alpha` and scale `xmin`.
///
/// Fitted from the inverse-CDF relation `x = xmin / (1 - q)^(1/alpha)`
/// evaluated at the two elicited quantiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pareto {
    p90: f64,
    p99: f64,
    alpha: f64,
    xmin: f64,
}

impl Pareto {
    /// Fit from the elicited 90th and 99th percentiles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] unless both are positive, finite
    /// and `p99 > p90`.
    pub fn new(p90: f64, p99: f64) -> Result<Self> {
        check_finite("p90", p90)?;
        check_finite("p99", p99)?;
        if p90 <= 0.0 || p99 <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "Pareto percentiles must be positive, got p90={p90}, p99={p99}"
            )));
        }
        if p99 <= p90 {
            return Err(Error::InvalidParameter(format!(
                "Pareto requires p99 > p90, got p90={p90}, p99={p99}"
            )));
        }

        let alpha = ((1.0 - Q90) / (1.0 - Q99)).ln() / (p99 / p90).ln();
        let xmin = p90 * (1.0 - Q90).powf(1.0 / alpha);
        debug!(p90, p99, alpha, xmin, "fitted Pareto distribution");

        Ok(Self {
            p90,
            p99,
            alpha,
            xmin,
        })
    }

    /// Elicited 90th percentile.
    #[must_use]
    pub const fn p90(&self) -> f64 {
        self.p90
    }

    /// Elicited 99th percentile.
    #[must_use]
    pub const fn p99(&self) -> f64 {
        self.p99
    }

    /// Tail index.
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Scale (lower bound of the support).
    #[must_use]
    pub const fn xmin(&self) -> f64 {
        self.xmin
    }
}

impl Distribution for Pareto {
    fn pdf(&self, x: f64) -> f64 {
        if x < self.xmin {
            return 0.0;
        }
        // Ratio form: xmin^alpha and x^(alpha + 1) overflow separately for large alpha
        self.alpha / x * (self.xmin / x).powf(self.alpha)
    }

    fn cdf(&self, x: f64) -> f64 {
        if x < self.xmin {
            return 0.0;
        }
        1.0 - (self.xmin / x).powf(self.alpha)
    }

    fn ppf(&self, p: f64) -> Result<f64> {
        check_open_probability(p)?;
        Ok(self.xmin / (1.0 - p).powf(1.0 / self.alpha))
    }

    fn mean(&self) -> f64 {
        if self.alpha <= 1.0 {
            return f64::INFINITY;
        }
        self.alpha * self.xmin / (self.alpha - 1.0)
    }

    fn variance(&self) -> f64 {
        if self.alpha <= 2.0 {
            return f64::INFINITY;
        }
        self.xmin.powi(2) * self.alpha / ((self.alpha - 1.0).powi(2) * (self.alpha - 2.0))
    }

    fn support(&self) -> (f64, f64) {
        (self.xmin, f64::INFINITY)
    }

    fn window_scale(&self) -> f64 {
        self.xmin
    }
}
