//! Aggregate statistics over a displayed record sequence.

use std::collections::HashMap;

use serde::Serialize;

use crate::defaults::TOP_STYLE_TAGS;
use crate::models::{ImageRecord, Rarity};

/// Count of records per rarity tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RarityDistribution {
    pub unique: usize,
    pub rare: usize,
    pub common: usize,
}

impl RarityDistribution {
    pub fn count(&self, rarity: Rarity) -> usize {
        match rarity {
            Rarity::Unique => self.unique,
            Rarity::Rare => self.rare,
            Rarity::Common => self.common,
        }
    }

    fn bump(&mut self, rarity: Rarity) {
        match rarity {
            Rarity::Unique => self.unique += 1,
            Rarity::Rare => self.rare += 1,
            Rarity::Common => self.common += 1,
        }
    }
}

/// A style tag and how many records carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Statistics shown for the current gallery view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub total_images: usize,
    pub average_rating: f64,
    pub rarity_distribution: RarityDistribution,
    pub common_style_tags: Vec<TagCount>,
}

impl CollectionStats {
    /// Compute statistics for `records`.
    ///
    /// Tags are ranked by count, ties keeping first-seen order, and capped
    /// at [`TOP_STYLE_TAGS`].
    pub fn from_records(records: &[ImageRecord]) -> Self {
        let total_images = records.len();
        let average_rating = if total_images == 0 {
            0.0
        } else {
            records.iter().map(|r| r.analysis.rating).sum::<f64>() / total_images as f64
        };

        let mut rarity_distribution = RarityDistribution::default();
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();

        for record in records {
            rarity_distribution.bump(record.analysis.rarity);
            for tag in &record.analysis.style_tags {
                let entry = counts.entry(tag.as_str()).or_insert_with(|| {
                    order.push(tag.as_str());
                    0
                });
                *entry += 1;
            }
        }

        let mut common_style_tags: Vec<TagCount> = order
            .into_iter()
            .map(|tag| TagCount {
                tag: tag.to_string(),
                count: counts.get(tag).copied().unwrap_or_default(),
            })
            .collect();
        // Stable sort keeps first-seen order among equal counts.
        common_style_tags.sort_by(|a, b| b.count.cmp(&a.count));
        common_style_tags.truncate(TOP_STYLE_TAGS);

        Self {
            total_images,
            average_rating,
            rarity_distribution,
            common_style_tags,
        }
    }

    /// Share of records in `rarity`, as a percentage of the total.
    pub fn rarity_percentage(&self, rarity: Rarity) -> f64 {
        if self.total_images == 0 {
            return 0.0;
        }
        self.rarity_distribution.count(rarity) as f64 * 100.0 / self.total_images as f64
    }

    pub fn is_empty(&self) -> bool {
        self.total_images == 0
    }
}
