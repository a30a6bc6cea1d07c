//! Core traits for image-archive abstractions.
//!
//! The archive contract is reached only through [`ContractGateway`]. The
//! transport behind it is pluggable so the query layer can be exercised
//! headlessly against a scripted gateway.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::Result;

/// Contract method names and their argument order.
pub mod methods {
    /// `[]` → integer
    pub const COUNT_IMAGES: &str = "count_images";
    /// `[count]` → records, most recent first
    pub const LIST_RECENT: &str = "list_recent";
    /// `[id]` → record or null
    pub const GET_RECORD_BY_ID: &str = "get_record_by_id";
    /// `[tag]` → records
    pub const FILTER_BY_STYLE_TAG: &str = "filter_by_style_tag";
    /// `[color]` → records
    pub const FILTER_BY_DOMINANT_COLOR: &str = "filter_by_dominant_color";
    /// `[rarity_or_empty, min_rating_or_zero, keyword_or_empty]` → records
    pub const SEARCH: &str = "search";
    /// `[id_a, id_b]` → comparison result
    pub const COMPARE_IMAGES: &str = "compare_images";
    /// `[base64, title, uploader, iso_timestamp]` → confirmation
    pub const ADD_IMAGE_AND_RATE: &str = "add_image_and_rate";
}

/// Narrow boundary to the remote archive contract.
#[async_trait]
pub trait ContractGateway: Send + Sync {
    /// Side-effect-free read. Safe to retry.
    async fn query(&self, method: &str, args: &[String]) -> Result<JsonValue>;

    /// Write with side effects on the remote ledger. Never retried
    /// automatically.
    async fn mutate(&self, method: &str, args: &[String]) -> Result<JsonValue>;
}
