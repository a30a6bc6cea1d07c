//! Query identities and result decoding.
//!
//! A [`QueryKey`] pairs a contract read method with its concrete argument
//! list. It is the cache identity: two reads with the same key share one
//! cached result.

use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use archive_core::{methods, Error, ImageRecord, Rarity, Result};

/// A contract read method plus its canonical arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    method: String,
    args: Vec<String>,
}

impl QueryKey {
    pub fn new(method: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }

    pub fn count() -> Self {
        Self::new(methods::COUNT_IMAGES, Vec::new())
    }

    /// Baseline feed of the `count` most recent records.
    pub fn recent(count: usize) -> Self {
        Self::new(methods::LIST_RECENT, vec![count.to_string()])
    }

    pub fn record(id: impl Into<String>) -> Self {
        Self::new(methods::GET_RECORD_BY_ID, vec![id.into()])
    }

    pub fn style_tag(tag: impl Into<String>) -> Self {
        Self::new(methods::FILTER_BY_STYLE_TAG, vec![tag.into()])
    }

    pub fn dominant_color(color: impl Into<String>) -> Self {
        Self::new(methods::FILTER_BY_DOMINANT_COLOR, vec![color.into()])
    }

    /// General search. Missing criteria become `""`, `"0"` and `""`.
    pub fn search(rarity: Option<Rarity>, min_rating: Option<f64>, keyword: Option<&str>) -> Self {
        Self::new(
            methods::SEARCH,
            vec![
                rarity.map(|r| r.as_str().to_string()).unwrap_or_default(),
                min_rating
                    .map(format_rating)
                    .unwrap_or_else(|| "0".to_string()),
                keyword.unwrap_or_default().to_string(),
            ],
        )
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Whether this identity's method starts with `prefix`.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.method.starts_with(prefix)
    }

    /// Check a raw read result against the shape this method returns.
    pub fn decode(&self, value: JsonValue) -> Result<QueryData> {
        match self.method.as_str() {
            methods::COUNT_IMAGES => decode_count(&value).map(QueryData::Count),
            methods::GET_RECORD_BY_ID => match value {
                JsonValue::Null => Ok(QueryData::Record(None)),
                JsonValue::String(s) if s.is_empty() => Ok(QueryData::Record(None)),
                other => {
                    let record: ImageRecord = serde_json::from_value(other)?;
                    Ok(QueryData::Record(Some(Arc::new(record))))
                }
            },
            methods::LIST_RECENT
            | methods::FILTER_BY_STYLE_TAG
            | methods::FILTER_BY_DOMINANT_COLOR
            | methods::SEARCH => match value {
                JsonValue::Null => Ok(QueryData::Records(Arc::new(Vec::new()))),
                JsonValue::Array(_) => {
                    let records: Vec<ImageRecord> = serde_json::from_value(value)?;
                    Ok(QueryData::Records(Arc::new(records)))
                }
                other => Err(Error::Serialization(format!(
                    "{} returned {} where a record list was expected",
                    self.method,
                    json_kind(&other)
                ))),
            },
            other => Err(Error::Internal(format!("no decoder for method {}", other))),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.method, self.args.join(", "))
    }
}

/// Decoded result of a cached read.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryData {
    Count(u64),
    Records(Arc<Vec<ImageRecord>>),
    Record(Option<Arc<ImageRecord>>),
}

impl QueryData {
    pub fn as_count(&self) -> Option<u64> {
        match self {
            QueryData::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_records(&self) -> Option<&Arc<Vec<ImageRecord>>> {
        match self {
            QueryData::Records(records) => Some(records),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<Option<&Arc<ImageRecord>>> {
        match self {
            QueryData::Record(record) => Some(record.as_ref()),
            _ => None,
        }
    }

    /// Records carried by this result, as a sequence.
    pub fn to_records(&self) -> Arc<Vec<ImageRecord>> {
        match self {
            QueryData::Records(records) => Arc::clone(records),
            QueryData::Record(Some(record)) => Arc::new(vec![ImageRecord::clone(record)]),
            QueryData::Record(None) | QueryData::Count(_) => Arc::new(Vec::new()),
        }
    }

    /// Number of records (or the count itself for count reads).
    pub fn len(&self) -> usize {
        match self {
            QueryData::Count(n) => *n as usize,
            QueryData::Records(records) => records.len(),
            QueryData::Record(record) => usize::from(record.is_some()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shortest decimal rendering: `7.0` → `"7"`, `7.5` → `"7.5"`.
pub fn format_rating(rating: f64) -> String {
    rating.to_string()
}

fn decode_count(value: &JsonValue) -> Result<u64> {
    match value {
        JsonValue::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                    .map(|f| f as u64)
            })
            .ok_or_else(|| Error::Serialization(format!("invalid image count: {}", n))),
        JsonValue::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::Serialization(format!("invalid image count: {:?}", s))),
        other => Err(Error::Serialization(format!(
            "count_images returned {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
