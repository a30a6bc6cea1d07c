//! Filter state to read call resolution.
//!
//! Precedence, first match wins:
//! 1. style tag → `filter_by_style_tag`
//! 2. dominant color → `filter_by_dominant_color`
//! 3. any other active field → `search(rarity, min_rating, keyword)`
//! 4. nothing active → no search; the baseline feed applies
//!
//! The contract has no combined lookup, so a style tag or color filter
//! drops the lower-priority fields.

use archive_core::SearchFilters;

use crate::key::QueryKey;

/// Map filters to the single read that serves them, or `None` for the
/// baseline feed.
pub fn resolve(filters: &SearchFilters) -> Option<QueryKey> {
    if let Some(tag) = &filters.style_tag {
        return Some(QueryKey::style_tag(tag.as_str()));
    }
    if let Some(color) = &filters.dominant_color {
        return Some(QueryKey::dominant_color(color.as_str()));
    }
    if filters.is_active() {
        return Some(QueryKey::search(
            filters.rarity,
            filters.min_rating,
            filters.keyword.as_deref(),
        ));
    }
    None
}

/// Whether `filters` set fields that the resolved read will not honor.
pub fn drops_fields(filters: &SearchFilters) -> bool {
    let secondary = filters.rarity.is_some()
        || filters.min_rating.is_some()
        || filters.keyword.is_some();
    (filters.style_tag.is_some() && (secondary || filters.dominant_color.is_some()))
        || (filters.dominant_color.is_some() && secondary)
}
