//! PERT distribution - a Beta distribution reparameterized by (min, mode, max)

use tracing::debug;

use super::{check_finite, check_open_probability, Distribution};
use crate::special::{incomplete_beta, ln_beta};
use crate::{Error, Result};

/// Weight given to the mode in the PERT shape parameters.
const MODE_WEIGHT: f64 = 4.0;

/// Bisection budget for [`Pert::ppf`].
const PPF_MAX_ITERATIONS: usize = 100;

/// Bisection stops once `|cdf(mid) - p|` falls below this.
const PPF_TOLERANCE: f64 = 1e-9;

/// PERT (Beta) distribution on `[min, max]` with the given most-likely value.
///
/// Shape parameters:
/// - `alpha = 1 + 4 (mode - min) / range`
/// - `beta  = 1 + 4 (max - mode) / range`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pert {
    min: f64,
    mode: f64,
    max: f64,
    alpha: f64,
    beta: f64,
    ln_norm: f64,
}

impl Pert {
    /// Fit a PERT distribution from its three elicited points.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] unless `min <= mode <= max`,
    /// `min != max`, all three values are finite and `max - min` does not overflow.
    pub fn new(min: f64, mode: f64, max: f64) -> Result<Self> {
        check_finite("min", min)?;
        check_finite("mode", mode)?;
        check_finite("max", max)?;
        if !(min <= mode && mode <= max) {
            return Err(Error::InvalidParameter(format!(
                "PERT requires min <= mode <= max, got min={min}, mode={mode}, max={max}"
            )));
        }
        if min == max {
            return Err(Error::InvalidParameter(format!(
                "PERT requires min != max, got {min} for both"
            )));
        }

        let range = max - min;
        if !range.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "PERT range overflows, got min={min}, max={max}"
            )));
        }
        let alpha = MODE_WEIGHT.mul_add((mode - min) / range, 1.0);
        let beta = MODE_WEIGHT.mul_add((max - mode) / range, 1.0);
        debug!(min, mode, max, alpha, beta, "fitted PERT distribution");

        Ok(Self {
            min,
            mode,
            max,
            alpha,
            beta,
            ln_norm: ln_beta(alpha, beta),
        })
    }

    /// Lower bound.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Most likely value.
    #[must_use]
    pub const fn mode(&self) -> f64 {
        self.mode
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// `max - min`.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Beta shape parameter alpha.
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Beta shape parameter beta.
    #[must_use]
    pub const fn beta(&self) -> f64 {
        self.beta
    }

    /// Beta(alpha, beta) density on the unit interval.
    fn unit_pdf(&self, u: f64) -> f64 {
        if !(0.0..=1.0).contains(&u) {
            return 0.0;
        }
        let ln_density =
            power_ln(self.alpha - 1.0, u) + power_ln(self.beta - 1.0, 1.0 - u) - self.ln_norm;
        ln_density.exp()
    }
}

/// `power * ln(base)`, with `0 * ln(0)` taken as 0 so flat edges keep their density.
fn power_ln(power: f64, base: f64) -> f64 {
    if power == 0.0 {
        0.0
    } else {
        power * base.ln()
    }
}

impl Distribution for Pert {
    fn pdf(&self, x: f64) -> f64 {
        if x < self.min || x > self.max {
            return 0.0;
        }
        let range = self.range();
        self.unit_pdf((x - self.min) / range) / range
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= self.min {
            return 0.0;
        }
        if x >= self.max {
            return 1.0;
        }
        incomplete_beta((x - self.min) / self.range(), self.alpha, self.beta)
    }

    fn ppf(&self, p: f64) -> Result<f64> {
        check_open_probability(p)?;
        let mut low = self.min;
        let mut high = self.max;
        for _ in 0..PPF_MAX_ITERATIONS {
            let mid = (low + high) / 2.0;
            let cdf = self.cdf(mid);
            if (cdf - p).abs() < PPF_TOLERANCE {
                return Ok(mid);
            }
            if cdf < p {
                low = mid;
            } else {
                high = mid;
            }
        }
        Ok((low + high) / 2.0)
    }

    fn mean(&self) -> f64 {
        MODE_WEIGHT.mul_add(self.mode, self.min + self.max) / 6.0
    }

    /// Classic PERT shortcut: one sixth of the range, squared.
    fn variance(&self) -> f64 {
        self.range().powi(2) / 36.0
    }

    fn support(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    fn window_scale(&self) -> f64 {
        self.range()
    }
}
