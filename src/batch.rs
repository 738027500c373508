//! Batch scoring over many forecast records
//!
//! Records are scored independently: a record that fails to score is
//! reported alongside the others and never aborts the batch.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ScoringConfig;
use crate::forecast::{ForecastParams, ForecastRecord, ForecastType};
use crate::{Error, Result};

/// Selects records by tag and/or type. An empty filter matches everything.
///
/// ```rust
/// use forecast_score::batch::ForecastFilter;
/// use forecast_score::forecast::{ForecastRecord, ForecastType};
///
/// let record = ForecastRecord::from_json_str(r#"{
///     "scenario": "Launch slips", "end_date": "2025-06-30", "type": "pert",
///     "tags": ["work"], "min": 1, "mode": 5, "max": 20
/// }"#)?;
///
/// let filter = ForecastFilter::new().tag("work").forecast_type(ForecastType::Pert);
/// assert!(filter.matches(&record));
/// assert!(!ForecastFilter::new().tag("home").matches(&record));
/// # Ok::<(), forecast_score::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForecastFilter {
    tag: Option<String>,
    forecast_type: Option<ForecastType>,
}

impl ForecastFilter {
    /// Filter that matches every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only records carrying `tag`.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Keep only records of `forecast_type`.
    #[must_use]
    pub fn forecast_type(mut self, forecast_type: ForecastType) -> Self {
        self.forecast_type = Some(forecast_type);
        self
    }

    /// Whether `record` passes the filter.
    #[must_use]
    pub fn matches(&self, record: &ForecastRecord) -> bool {
        self.tag.as_deref().map_or(true, |tag| record.has_tag(tag))
            && self
                .forecast_type
                .map_or(true, |ty| record.forecast_type() == ty)
    }
}

/// Score of one closed record, or the reason it could not be scored.
#[derive(Debug)]
pub struct ScoredForecast<'a> {
    /// The scored record.
    pub record: &'a ForecastRecord,
    /// Brier score, or the scoring error.
    pub score: Result<f64>,
}

/// Mean Brier score of the records carrying one tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TagSummary {
    /// Scored records with the tag.
    pub count: usize,
    /// Mean Brier score over those records.
    pub mean: f64,
}

/// Aggregate view of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    /// Records still waiting for an outcome.
    pub open: usize,
    /// Closed records that scored successfully.
    pub scored: usize,
    /// Closed records whose scoring failed.
    pub failed: usize,
    /// Mean Brier score over scored records, `None` when nothing scored.
    pub mean_brier: Option<f64>,
    /// Per-tag means over scored records.
    pub by_tag: BTreeMap<String, TagSummary>,
}

/// An owned collection of forecast records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastBatch {
    records: Vec<ForecastRecord>,
}

impl ForecastBatch {
    /// Create an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every record from its parameter set.
    ///
    /// # Errors
    ///
    /// Returns the first construction error encountered.
    pub fn from_params<I>(params: I) -> Result<Self>
    where
        I: IntoIterator<Item = ForecastParams>,
    {
        params
            .into_iter()
            .map(|params| ForecastRecord::from_params(&params))
            .collect()
    }

    /// Build a batch from a JSON array of forecast objects.
    ///
    /// # Errors
    ///
    /// [`Error::Json`] on malformed JSON, [`Error::InvalidParameter`] if the
    /// document is not an array, otherwise as [`ForecastBatch::from_params`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        match serde_json::from_str::<serde_json::Value>(json)? {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(ForecastParams::from_value)
                .collect::<Result<Vec<_>>>()
                .and_then(Self::from_params),
            other => Err(Error::InvalidParameter(format!(
                "forecast batch must be an array, got {other}"
            ))),
        }
    }

    /// Append a record.
    pub fn push(&mut self, record: ForecastRecord) {
        self.records.push(record);
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the batch has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[ForecastRecord] {
        &self.records
    }

    /// Mutable access to one record, e.g. to resolve it.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut ForecastRecord> {
        self.records.get_mut(index)
    }

    /// Records passing `filter`, ordered by end date (ties keep insertion order).
    #[must_use]
    pub fn filtered(&self, filter: &ForecastFilter) -> Vec<&ForecastRecord> {
        let mut selected: Vec<&ForecastRecord> = self
            .records
            .iter()
            .filter(|record| filter.matches(record))
            .collect();
        selected.sort_by_key(|record| record.end_date());
        selected
    }

    /// Score every closed record, in insertion order.
    #[must_use]
    pub fn score_all(&self, config: &ScoringConfig) -> Vec<ScoredForecast<'_>> {
        let scored = score_closed(&self.records, config);
        debug!(
            records = self.records.len(),
            scored = scored.len(),
            "scored forecast batch"
        );
        scored
    }

    /// Counts and mean Brier scores, overall and per tag.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn summary(&self, config: &ScoringConfig) -> ScoreSummary {
        let open = self.records.iter().filter(|r| !r.is_closed()).count();
        let mut failed = 0;
        let mut scores = Vec::new();
        let mut tag_totals: BTreeMap<String, (usize, f64)> = BTreeMap::new();

        for entry in self.score_all(config) {
            match entry.score {
                Ok(score) => {
                    scores.push(score);
                    for tag in entry.record.tags() {
                        let total = tag_totals.entry(tag.clone()).or_insert((0, 0.0));
                        total.0 += 1;
                        total.1 += score;
                    }
                }
                Err(_) => failed += 1,
            }
        }

        ScoreSummary {
            open,
            scored: scores.len(),
            failed,
            mean_brier: mean(&scores),
            by_tag: tag_totals
                .into_iter()
                .map(|(tag, (count, sum))| (tag, TagSummary { count, mean: sum / count as f64 }))
                .collect(),
        }
    }
}

impl FromIterator<ForecastRecord> for ForecastBatch {
    fn from_iter<I: IntoIterator<Item = ForecastRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl Extend<ForecastRecord> for ForecastBatch {
    fn extend<I: IntoIterator<Item = ForecastRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

fn score_record<'a>(record: &'a ForecastRecord, config: &ScoringConfig) -> ScoredForecast<'a> {
    let score = record.calc_with(config);
    if let Err(error) = &score {
        warn!(scenario = record.scenario(), %error, "failed to score forecast");
    }
    ScoredForecast { record, score }
}

fn score_sequential<'a>(
    records: &'a [ForecastRecord],
    config: &ScoringConfig,
) -> Vec<ScoredForecast<'a>> {
    records
        .iter()
        .filter(|record| record.is_closed())
        .map(|record| score_record(record, config))
        .collect()
}

#[cfg(feature = "rayon")]
fn score_closed<'a>(records: &'a [ForecastRecord], config: &ScoringConfig) -> Vec<ScoredForecast<'a>> {
    use rayon::prelude::*;

    if !config.parallel() {
        return score_sequential(records, config);
    }
    records
        .par_iter()
        .filter(|record| record.is_closed())
        .map(|record| score_record(record, config))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn score_closed<'a>(records: &'a [ForecastRecord], config: &ScoringConfig) -> Vec<ScoredForecast<'a>> {
    score_sequential(records, config)
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
