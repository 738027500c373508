//! Log-normal distribution fitted from the 5th, 50th and 95th percentiles

use std::f64::consts::{PI, SQRT_2};

use tracing::debug;

use super::{check_finite, check_open_probability, Distribution};
use crate::special::{erfc, erfcinv};
use crate::{Error, Result};

/// Standard-normal 95th percentile (the 5th is its negation).
const Z95: f64 = 1.64485;

/// Log-normal distribution parameterized by `mu = ln(p50)` and
/// `sigma = (ln(p95) - ln(p5)) / (z95 - z5)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNormal {
    p5: f64,
    p50: f64,
    p95: f64,
    mu: f64,
    sigma: f64,
}

impl LogNormal {
    /// Fit from three elicited percentiles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] unless all three are positive,
    /// finite and strictly increasing (`p5 < p50 < p95`).
    pub fn new(p5: f64, p50: f64, p95: f64) -> Result<Self> {
        check_finite("p5", p5)?;
        check_finite("p50", p50)?;
        check_finite("p95", p95)?;
        if p5 <= 0.0 || p50 <= 0.0 || p95 <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "log-normal percentiles must be positive, got p5={p5}, p50={p50}, p95={p95}"
            )));
        }
        if !(p5 < p50 && p50 < p95) {
            return Err(Error::InvalidParameter(format!(
                "log-normal requires p5 < p50 < p95, got p5={p5}, p50={p50}, p95={p95}"
            )));
        }

        let mu = p50.ln();
        let sigma = (p95.ln() - p5.ln()) / (2.0 * Z95);
        debug!(p5, p50, p95, mu, sigma, "fitted log-normal distribution");

        Ok(Self {
            p5,
            p50,
            p95,
            mu,
            sigma,
        })
    }

    /// Elicited 5th percentile.
    #[must_use]
    pub const fn p5(&self) -> f64 {
        self.p5
    }

    /// Elicited median.
    #[must_use]
    pub const fn p50(&self) -> f64 {
        self.p50
    }

    /// Elicited 95th percentile.
    #[must_use]
    pub const fn p95(&self) -> f64 {
        self.p95
    }

    /// Location of the underlying normal.
    #[must_use]
    pub const fn mu(&self) -> f64 {
        self.mu
    }

    /// Scale of the underlying normal.
    #[must_use]
    pub const fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Distribution for LogNormal {
    fn pdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        let z = (x.ln() - self.mu) / self.sigma;
        (-0.5 * z * z).exp() / (x * self.sigma * (2.0 * PI).sqrt())
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        // 0.5 * (1 + erf(z)) written through erfc to keep the lower tail precise
        let z = (x.ln() - self.mu) / (self.sigma * SQRT_2);
        0.5 * erfc(-z)
    }

    fn ppf(&self, p: f64) -> Result<f64> {
        check_open_probability(p)?;
        // Phi^-1(p) = -sqrt(2) * erfcinv(2p); 2p is exact, so both tails stay precise
        let z = -erfcinv(2.0 * p)?;
        Ok((self.sigma * SQRT_2).mul_add(z, self.mu).exp())
    }

    fn mean(&self) -> f64 {
        (0.5 * self.sigma).mul_add(self.sigma, self.mu).exp()
    }

    fn variance(&self) -> f64 {
        let s2 = self.sigma * self.sigma;
        s2.exp_m1() * 2.0f64.mul_add(self.mu, s2).exp()
    }

    fn support(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }

    fn window_scale(&self) -> f64 {
        self.p50
    }
}
