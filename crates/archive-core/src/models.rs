//! Data models for image-archive.
//!
//! These mirror the JSON shapes returned by the archive contract. Records
//! and analyses are produced remotely and never mutated by the client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};

// =============================================================================
// RARITY
// =============================================================================

/// Rarity tier assigned by the analysis pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Unique,
    Rare,
    Common,
}

impl Rarity {
    /// All tiers, rarest first.
    pub const ALL: [Rarity; 3] = [Rarity::Unique, Rarity::Rare, Rarity::Common];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Unique => "unique",
            Rarity::Rare => "rare",
            Rarity::Common => "common",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "unique" => Ok(Rarity::Unique),
            "rare" => Ok(Rarity::Rare),
            "common" => Ok(Rarity::Common),
            other => Err(Error::Serialization(format!("unknown rarity: {}", other))),
        }
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// AI-generated analysis embedded in every record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    /// Rating, nominally 0.0 to 10.0.
    pub rating: f64,
    pub rarity: Rarity,
    #[serde(default)]
    pub color_profile: String,
    /// Hex tokens like `#1A2B3C`, most dominant first.
    #[serde(default)]
    pub dominant_colors: Vec<String>,
    #[serde(default)]
    pub style_tags: Vec<String>,
    #[serde(default)]
    pub emotion: String,
    #[serde(default)]
    pub rationale: String,
}

/// One uploaded image plus its analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Server-assigned identifier. Identity of the record.
    pub id: String,
    pub title: String,
    pub uploader: String,
    /// ISO-8601 submission timestamp.
    pub timestamp: String,
    /// Base64-encoded image bytes.
    #[serde(default)]
    pub image_base64: String,
    pub analysis: ImageAnalysis,
}

impl ImageRecord {
    /// Two records are the same entity iff their ids match.
    pub fn same_entity(&self, other: &ImageRecord) -> bool {
        self.id == other.id
    }

    /// Whether any style tag matches `tag` case-insensitively.
    pub fn has_style_tag(&self, tag: &str) -> bool {
        self.analysis
            .style_tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Verdict of a head-to-head comparison. Never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub verdict: String,
    pub image_a: ImageRecord,
    pub image_b: ImageRecord,
}

/// Confirmation returned by `add_image_and_rate`.
///
/// The contract returns either a bare identifier, a transaction hash, or an
/// object; the raw value is kept and the id is extracted on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadReceipt {
    pub raw: JsonValue,
}

impl UploadReceipt {
    pub fn new(raw: JsonValue) -> Self {
        Self { raw }
    }

    /// Record identifier, when the confirmation carries one.
    pub fn record_id(&self) -> Option<&str> {
        match &self.raw {
            JsonValue::String(s) if !s.is_empty() => Some(s.as_str()),
            JsonValue::Object(map) => map
                .get("id")
                .or_else(|| map.get("record_id"))
                .and_then(JsonValue::as_str),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_json(id: &str) -> JsonValue {
        json!({
            "id": id,
            "title": "Sunset",
            "uploader": "ana",
            "timestamp": "2026-01-02T03:04:05.000Z",
            "image_base64": "aGVsbG8=",
            "analysis": {
                "rating": 8.5,
                "rarity": "rare",
                "color_profile": "warm",
                "dominant_colors": ["#FF8800", "#112233"],
                "style_tags": ["landscape", "golden hour"],
                "emotion": "calm",
                "rationale": "Strong composition"
            }
        })
    }

    #[test]
    fn test_record_deserialization() {
        let record: ImageRecord = serde_json::from_value(record_json("img-1")).unwrap();
        assert_eq!(record.id, "img-1");
        assert_eq!(record.analysis.rarity, Rarity::Rare);
        assert_eq!(record.analysis.rating, 8.5);
        assert_eq!(record.analysis.dominant_colors[0], "#FF8800");
    }

    #[test]
    fn test_record_missing_lists_default_empty() {
        let record: ImageRecord = serde_json::from_value(json!({
            "id": "a",
            "title": "t",
            "uploader": "u",
            "timestamp": "2026-01-01T00:00:00Z",
            "analysis": {"rating": 1.0, "rarity": "common"}
        }))
        .unwrap();
        assert!(record.analysis.style_tags.is_empty());
        assert!(record.analysis.dominant_colors.is_empty());
        assert!(record.image_base64.is_empty());
    }

    #[test]
    fn test_record_with_unknown_rarity_is_rejected() {
        let mut value = record_json("a");
        value["analysis"]["rarity"] = json!("legendary");
        assert!(serde_json::from_value::<ImageRecord>(value).is_err());
    }

    #[test]
    fn test_same_entity_by_id_only() {
        let a: ImageRecord = serde_json::from_value(record_json("same")).unwrap();
        let mut b = a.clone();
        b.title = "Renamed".to_string();
        b.analysis.rating = 1.0;
        assert!(a.same_entity(&b));

        let c: ImageRecord = serde_json::from_value(record_json("other")).unwrap();
        assert!(!a.same_entity(&c));
    }

    #[test]
    fn test_rarity_parse_and_display() {
        assert_eq!("RARE".parse::<Rarity>().unwrap(), Rarity::Rare);
        assert_eq!(" unique ".parse::<Rarity>().unwrap(), Rarity::Unique);
        assert!("epic".parse::<Rarity>().is_err());
        assert_eq!(Rarity::Common.to_string(), "common");
        assert_eq!(serde_json::to_string(&Rarity::Unique).unwrap(), "\"unique\"");
    }

    #[test]
    fn test_has_style_tag_case_insensitive() {
        let record: ImageRecord = serde_json::from_value(record_json("a")).unwrap();
        assert!(record.has_style_tag("Landscape"));
        assert!(!record.has_style_tag("portrait"));
    }

    #[test]
    fn test_upload_receipt_record_id() {
        assert_eq!(UploadReceipt::new(json!("img-9")).record_id(), Some("img-9"));
        assert_eq!(
            UploadReceipt::new(json!({"id": "img-10", "status": "ok"})).record_id(),
            Some("img-10")
        );
        assert_eq!(
            UploadReceipt::new(json!({"record_id": "img-11"})).record_id(),
            Some("img-11")
        );
        assert_eq!(UploadReceipt::new(json!(true)).record_id(), None);
        assert_eq!(UploadReceipt::new(json!("")).record_id(), None);
    }

    #[test]
    fn test_comparison_deserialization() {
        let value = json!({
            "verdict": "A wins on composition",
            "image_a": record_json("a"),
            "image_b": record_json("b"),
        });
        let result: ComparisonResult = serde_json::from_value(value).unwrap();
        assert_eq!(result.image_a.id, "a");
        assert_eq!(result.image_b.id, "b");
        assert!(result.verdict.contains("composition"));
    }
}
