//! Search filter state.
//!
//! A [`SearchFilters`] value is the user's current search intent. Every
//! field is optional; a value with no fields set is the distinguished
//! "no filter" state, which routes to the baseline feed rather than to a
//! search call. Clearing a field must set it to `None`, never to an empty
//! string, so [`SearchFilters::is_active`] stays exact.

use serde::{Deserialize, Serialize};

use crate::defaults::{RATING_MAX, RATING_MIN};
use crate::error::ValidationError;
use crate::models::Rarity;

/// User-chosen search criteria.
///
/// # Example
///
/// ```
/// use archive_core::{Rarity, SearchFilters};
///
/// let filters = SearchFilters::new()
///     .with_rarity(Rarity::Rare)
///     .with_min_rating(7.0);
///
/// assert!(filters.is_active());
/// assert_eq!(filters.active_count(), 2);
/// assert!(!SearchFilters::default().is_active());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<Rarity>,

    /// Minimum rating. Values outside [0, 10] are carried as given; the
    /// panel setters clamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_tag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominant_color: Option<String>,
}

/// Clamp a rating into the selectable [0, 10] range.
pub fn clamp_rating(value: f64) -> f64 {
    if value.is_nan() {
        return RATING_MIN;
    }
    value.clamp(RATING_MIN, RATING_MAX)
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl SearchFilters {
    /// Create the "no filter" state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = Some(rarity);
        self
    }

    pub fn with_min_rating(mut self, rating: f64) -> Self {
        self.min_rating = Some(rating);
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_style_tag(mut self, tag: impl Into<String>) -> Self {
        self.style_tag = Some(tag.into());
        self
    }

    pub fn with_dominant_color(mut self, color: impl Into<String>) -> Self {
        self.dominant_color = Some(color.into());
        self
    }

    /// True iff at least one field is set.
    pub fn is_active(&self) -> bool {
        self.active_count() > 0
    }

    /// Number of fields currently set.
    pub fn active_count(&self) -> usize {
        [
            self.rarity.is_some(),
            self.min_rating.is_some(),
            self.keyword.is_some(),
            self.style_tag.is_some(),
            self.dominant_color.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    /// Set the free-text keyword; an empty or blank value clears it.
    pub fn set_keyword(&mut self, value: &str) {
        self.keyword = non_blank(value);
    }

    /// Select a rarity tier; selecting the current tier clears it.
    pub fn toggle_rarity(&mut self, rarity: Rarity) {
        self.rarity = if self.rarity == Some(rarity) {
            None
        } else {
            Some(rarity)
        };
    }

    /// Set the minimum rating from the range control.
    ///
    /// The value is clamped to [0, 10]; zero means "no minimum" and clears
    /// the field.
    pub fn set_min_rating(&mut self, value: f64) {
        let clamped = clamp_rating(value);
        self.min_rating = if clamped > RATING_MIN {
            Some(clamped)
        } else {
            None
        };
    }

    pub fn set_style_tag(&mut self, value: &str) {
        self.style_tag = non_blank(value);
    }

    pub fn set_dominant_color(&mut self, value: &str) {
        self.dominant_color = non_blank(value);
    }

    /// Reset to the "no filter" state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Strict check used by callers that refuse out-of-range ratings
    /// instead of clamping them.
    pub fn check_rating(&self) -> Result<(), ValidationError> {
        match self.min_rating {
            Some(r) if !(RATING_MIN..=RATING_MAX).contains(&r) => {
                Err(ValidationError::RatingOutOfRange(r))
            }
            _ => Ok(()),
        }
    }
}
