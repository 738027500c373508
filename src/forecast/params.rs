//! Inbound key/value parameter sets
//!
//! A forecast arrives as a flat map of keys (`scenario`, `end_date`, `type`,
//! `tags`, the variant's quantile inputs and an optional `outcome`). The map
//! keeps insertion order so choice options score in the order they were
//! written.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ForecastType;
use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Key/value parameters describing one forecast.
///
/// ```rust
/// use forecast_score::forecast::{ForecastParams, ForecastType};
///
/// let params = ForecastParams::new()
///     .with("scenario", "Rain tomorrow")
///     .with("end_date", "2025-01-01")
///     .with("type", "interval")
///     .with("min", 1.0)
///     .with("max", 10.0)
///     .with("confidence", 0.8);
/// assert_eq!(params.forecast_type()?, ForecastType::Interval);
/// # Ok::<(), forecast_score::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastParams(Map<String, Value>);

impl ForecastParams {
    /// Create an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a parameter set from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] on malformed JSON and
    /// [`Error::InvalidParameter`] if the document is not an object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Wrap a JSON value, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::InvalidParameter(format!(
                "forecast parameters must be an object, got {other}"
            ))),
        }
    }

    /// Add or replace a key, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Whether `key` is present with a non-null value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.present(key).is_some()
    }

    /// The `type` tag.
    ///
    /// # Errors
    ///
    /// [`Error::MissingParameter`] if absent, [`Error::UnknownForecastType`]
    /// if the tag is not recognized.
    pub fn forecast_type(&self) -> Result<ForecastType> {
        match self.present("type") {
            None => Err(Error::MissingParameter {
                key: "type".to_string(),
                forecast_type: "unspecified".to_string(),
            }),
            Some(Value::String(tag)) => tag.parse(),
            Some(other) => Err(Error::UnknownForecastType(other.to_string())),
        }
    }

    /// Value for `key`, treating an explicit `null` as absent.
    fn present(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    fn require(&self, key: &str, forecast_type: ForecastType) -> Result<&Value> {
        self.present(key).ok_or_else(|| Error::MissingParameter {
            key: key.to_string(),
            forecast_type: forecast_type.to_string(),
        })
    }

    pub(crate) fn require_text(&self, key: &str, forecast_type: ForecastType) -> Result<String> {
        text_value(key, self.require(key, forecast_type)?)
    }

    pub(crate) fn optional_text(&self, key: &str) -> Result<Option<String>> {
        self.present(key).map(|value| text_value(key, value)).transpose()
    }

    pub(crate) fn require_f64(&self, key: &str, forecast_type: ForecastType) -> Result<f64> {
        number_value(key, self.require(key, forecast_type)?)
    }

    pub(crate) fn optional_f64(&self, key: &str) -> Result<Option<f64>> {
        self.present(key).map(|value| number_value(key, value)).transpose()
    }

    /// A nested name -> number mapping, in insertion order.
    pub(crate) fn require_weights(
        &self,
        key: &str,
        forecast_type: ForecastType,
    ) -> Result<Vec<(String, f64)>> {
        match self.require(key, forecast_type)? {
            Value::Object(map) => map
                .iter()
                .map(|(name, value)| Ok((name.clone(), number_value(name, value)?)))
                .collect(),
            other => Err(Error::InvalidParameter(format!(
                "'{key}' must be a mapping of name to probability, got {other}"
            ))),
        }
    }

    pub(crate) fn end_date(&self, forecast_type: ForecastType) -> Result<NaiveDate> {
        let raw = self.require_text("end_date", forecast_type)?;
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
            Error::InvalidParameter(format!(
                "end_date '{raw}' is not a valid YYYY-MM-DD date"
            ))
        })
    }

    /// `tags` as a list of strings or a single string; absent means no tags.
    pub(crate) fn tags(&self) -> Result<BTreeSet<String>> {
        match self.present("tags") {
            None => Ok(BTreeSet::new()),
            Some(Value::String(tag)) => Ok(BTreeSet::from([tag.clone()])),
            Some(Value::Array(items)) => items.iter().map(|item| text_value("tags", item)).collect(),
            Some(other) => Err(Error::InvalidParameter(format!(
                "'tags' must be a list of strings, got {other}"
            ))),
        }
    }
}

impl From<Map<String, Value>> for ForecastParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for ForecastParams {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

/// Strings pass through; numbers and booleans use their literal form, with
/// integral floats written without a fraction (`1.0` -> `"1"`).
fn text_value(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(match number.as_f64() {
            Some(float) if number.is_f64() && float.fract() == 0.0 => format!("{float:.0}"),
            _ => number.to_string(),
        }),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(Error::InvalidParameter(format!(
            "'{key}' must be text, got {other}"
        ))),
    }
}

/// Numbers, or strings holding a number. Non-finite values are rejected.
fn number_value(key: &str, value: &Value) -> Result<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(number) if number.is_finite() => Ok(number),
        _ => Err(Error::InvalidParameter(format!(
            "'{key}' must be a finite number, got {value}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_requires_object() {
        assert!(ForecastParams::from_json_str(r#"{"type": "pert"}"#).is_ok());
        assert!(matches!(
            ForecastParams::from_json_str("[1, 2]"),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(ForecastParams::from_json_str("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_forecast_type() {
        let params = ForecastParams::new().with("type", "lognormal");
        assert_eq!(params.forecast_type().unwrap(), ForecastType::LogNormal);

        let params = ForecastParams::new().with("type", "beta");
        assert!(matches!(params.forecast_type(), Err(Error::UnknownForecastType(_))));

        assert!(matches!(
            ForecastParams::new().forecast_type(),
            Err(Error::MissingParameter { .. })
        ));
    }

    #[test]
    fn test_numbers_accept_numeric_strings() {
        let params = ForecastParams::new().with("min", "2.5").with("max", 7);
        assert!((params.require_f64("min", ForecastType::Pert).unwrap() - 2.5).abs() < 1e-12);
        assert!((params.require_f64("max", ForecastType::Pert).unwrap() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_numbers_reject_garbage() {
        let params = ForecastParams::new()
            .with("min", "abc")
            .with("max", "inf")
            .with("mode", json!([1]));
        for key in ["min", "max", "mode"] {
            assert!(matches!(
                params.require_f64(key, ForecastType::Pert),
                Err(Error::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_missing_names_key_and_type() {
        let err = ForecastParams::new()
            .require_f64("p50", ForecastType::LogNormal)
            .unwrap_err();
        match err {
            Error::MissingParameter { key, forecast_type } => {
                assert_eq!(key, "p50");
                assert_eq!(forecast_type, "lognormal");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_null_is_absent() {
        let params = ForecastParams::new().with("outcome", Value::Null);
        assert!(!params.contains_key("outcome"));
        assert_eq!(params.optional_f64("outcome").unwrap(), None);
    }

    #[test]
    fn test_end_date() {
        let params = ForecastParams::new().with("end_date", "2025-03-09");
        assert_eq!(
            params.end_date(ForecastType::Choice).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
        );

        let params = ForecastParams::new().with("end_date", "09/03/2025");
        assert!(matches!(
            params.end_date(ForecastType::Choice),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_tags() {
        assert!(ForecastParams::new().tags().unwrap().is_empty());

        let params = ForecastParams::new().with("tags", json!(["work", "ai", "work"]));
        let tags = params.tags().unwrap();
        assert_eq!(tags.len(), 2);
        assert!(tags.contains("ai"));

        let params = ForecastParams::new().with("tags", "solo");
        assert!(params.tags().unwrap().contains("solo"));

        let params = ForecastParams::new().with("tags", json!({"a": 1}));
        assert!(matches!(params.tags(), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_weights_keep_order() {
        let params = ForecastParams::from_value(json!({
            "options": {"zeta": 0.2, "alpha": 0.5, "mid": "0.3"}
        }))
        .unwrap();
        let weights = params.require_weights("options", ForecastType::Choice).unwrap();
        let names: Vec<&str> = weights.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
        assert!((weights[2].1 - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_text_from_number() {
        let params = ForecastParams::new().with("outcome", 3);
        assert_eq!(params.optional_text("outcome").unwrap().as_deref(), Some("3"));
    }

    #[test]
    fn test_text_from_integral_float() {
        let params = ForecastParams::from_json_str(r#"{"a": 1.0, "b": 2.5, "c": -4.0}"#).unwrap();
        assert_eq!(params.optional_text("a").unwrap().as_deref(), Some("1"));
        assert_eq!(params.optional_text("b").unwrap().as_deref(), Some("2.5"));
        assert_eq!(params.optional_text("c").unwrap().as_deref(), Some("-4"));
    }
}
