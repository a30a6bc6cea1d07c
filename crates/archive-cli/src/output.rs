//! Text and JSON rendering.

use serde::Serialize;
use serde_json::Value;

use archive_core::{CollectionStats, ComparisonResult, ImageRecord, Rarity, UploadReceipt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Record as JSON without its image payload.
fn record_json(record: &ImageRecord) -> anyhow::Result<Value> {
    let mut value = serde_json::to_value(record)?;
    if let Some(object) = value.as_object_mut() {
        object.remove("image_base64");
    }
    Ok(value)
}

fn record_line(record: &ImageRecord) -> String {
    format!(
        "{:<20} {:>4.1}  {:<7} {} ({})",
        record.id,
        record.analysis.rating,
        record.analysis.rarity.as_str(),
        record.title,
        record.uploader
    )
}

pub fn count(format: Format, count: u64) -> anyhow::Result<String> {
    match format {
        Format::Text => Ok(count.to_string()),
        Format::Json => to_json(&serde_json::json!({ "count": count })),
    }
}

pub fn records(format: Format, records: &[ImageRecord]) -> anyhow::Result<String> {
    match format {
        Format::Text if records.is_empty() => Ok("No images found".to_string()),
        Format::Text => Ok(records
            .iter()
            .map(record_line)
            .collect::<Vec<_>>()
            .join("\n")),
        Format::Json => {
            let values = records
                .iter()
                .map(record_json)
                .collect::<anyhow::Result<Vec<_>>>()?;
            to_json(&values)
        }
    }
}

pub fn record(format: Format, record: &ImageRecord) -> anyhow::Result<String> {
    if format == Format::Json {
        return to_json(&record_json(record)?);
    }

    let analysis = &record.analysis;
    let mut lines = vec![
        format!("{} [{}]", record.title, record.id),
        format!("Uploaded by {} at {}", record.uploader, record.timestamp),
        format!("Rating:        {:.1}/10", analysis.rating),
        format!("Rarity:        {}", analysis.rarity),
    ];
    if !analysis.dominant_colors.is_empty() {
        lines.push(format!("Colors:        {}", analysis.dominant_colors.join(" ")));
    }
    if !analysis.style_tags.is_empty() {
        lines.push(format!("Style:         {}", analysis.style_tags.join(", ")));
    }
    if !analysis.color_profile.is_empty() {
        lines.push(format!("Color profile: {}", analysis.color_profile));
    }
    if !analysis.emotion.is_empty() {
        lines.push(format!("Emotion:       {}", analysis.emotion));
    }
    if !analysis.rationale.is_empty() {
        lines.push(String::new());
        lines.push(analysis.rationale.clone());
    }
    Ok(lines.join("\n"))
}

pub fn stats(format: Format, stats: &CollectionStats) -> anyhow::Result<String> {
    if format == Format::Json {
        return to_json(stats);
    }

    let mut lines = vec![
        format!("Total images:   {}", stats.total_images),
        format!("Average rating: {:.1}", stats.average_rating),
        "Rarity:".to_string(),
    ];
    for rarity in Rarity::ALL {
        lines.push(format!(
            "  {:<7} {:>4} ({:.1}%)",
            rarity.as_str(),
            stats.rarity_distribution.count(rarity),
            stats.rarity_percentage(rarity)
        ));
    }
    if !stats.common_style_tags.is_empty() {
        lines.push("Top style tags:".to_string());
        for tag in &stats.common_style_tags {
            lines.push(format!("  {} ({})", tag.tag, tag.count));
        }
    }
    Ok(lines.join("\n"))
}

pub fn comparison(format: Format, result: &ComparisonResult) -> anyhow::Result<String> {
    match format {
        Format::Json => to_json(&serde_json::json!({
            "verdict": result.verdict,
            "image_a": record_json(&result.image_a)?,
            "image_b": record_json(&result.image_b)?,
        })),
        Format::Text => Ok(format!(
            "{}\n{}\n\n{}",
            record_line(&result.image_a),
            record_line(&result.image_b),
            result.verdict
        )),
    }
}

pub fn receipt(format: Format, receipt: &UploadReceipt) -> anyhow::Result<String> {
    match format {
        Format::Json => to_json(receipt),
        Format::Text => Ok(match receipt.record_id() {
            Some(id) => format!("Uploaded {}", id),
            None => "Uploaded".to_string(),
        }),
    }
}

pub fn health(format: Format, endpoint: &str, healthy: bool) -> anyhow::Result<String> {
    match format {
        Format::Json => to_json(&serde_json::json!({ "endpoint": endpoint, "healthy": healthy })),
        Format::Text if healthy => Ok(format!("{} is reachable", endpoint)),
        Format::Text => Ok(format!("{} is unreachable", endpoint)),
    }
}
