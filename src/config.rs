//! Scoring configuration

use crate::distribution::DEFAULT_WINDOW_FRACTION;
use crate::{Error, Result};

/// Upper bound for the window fraction; wider windows stop meaning "right around x".
const MAX_WINDOW_FRACTION: f64 = 0.5;

/// Options that affect how closed forecasts are scored.
///
/// The default scores with a window of 1% of each model's scale and allows
/// parallel batch scoring.
///
/// ```rust
/// use forecast_score::ScoringConfig;
///
/// let config = ScoringConfig::builder()
///     .window_fraction(0.05)
///     .parallel(false)
///     .build()?;
/// assert!((config.window_fraction() - 0.05).abs() < f64::EPSILON);
/// # Ok::<(), forecast_score::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    window_fraction: f64,
    parallel: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            window_fraction: DEFAULT_WINDOW_FRACTION,
            parallel: true,
        }
    }
}

impl ScoringConfig {
    /// Create a builder starting from the defaults.
    #[must_use]
    pub fn builder() -> ScoringConfigBuilder {
        ScoringConfigBuilder::default()
    }

    /// Half-width of the `pdf_to_probability` window as a fraction of the model scale.
    #[must_use]
    pub const fn window_fraction(&self) -> f64 {
        self.window_fraction
    }

    /// Whether batch scoring may use the rayon thread pool.
    #[must_use]
    pub const fn parallel(&self) -> bool {
        self.parallel
    }
}

/// Builder for `ScoringConfig`.
#[derive(Debug, Default)]
pub struct ScoringConfigBuilder {
    config: ScoringConfig,
}

impl ScoringConfigBuilder {
    /// Set the window half-width as a fraction of the model scale.
    #[must_use]
    pub const fn window_fraction(mut self, fraction: f64) -> Self {
        self.config.window_fraction = fraction;
        self
    }

    /// Enable or disable parallel batch scoring.
    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Build the `ScoringConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the window fraction is not in (0, 0.5].
    pub fn build(self) -> Result<ScoringConfig> {
        let fraction = self.config.window_fraction;
        if !(fraction > 0.0 && fraction <= MAX_WINDOW_FRACTION) {
            return Err(Error::InvalidParameter(format!(
                "window fraction must be in (0, {MAX_WINDOW_FRACTION}], got {fraction}"
            )));
        }
        Ok(self.config)
    }
}
