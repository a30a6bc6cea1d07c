//! Contract record shapes flowing into filters and collection stats.

use archive_core::{
    decode_payload, detect_image_type, encode_payload, validate_image, CollectionStats,
    ComparisonResult, ImageRecord, Rarity, SearchFilters, UploadReceipt, ValidationError,
};
use serde_json::json;

fn contract_records() -> Vec<ImageRecord> {
    serde_json::from_value(json!([
        {
            "id": "img-1",
            "title": "Harbor at dawn",
            "uploader": "Ada",
            "timestamp": "2026-03-01T10:00:00.000Z",
            "image_base64": "AAAA",
            "analysis": {
                "rating": 8.5,
                "rarity": "unique",
                "color_profile": "cool",
                "dominant_colors": ["#112233", "#445566"],
                "style_tags": ["seascape", "minimal"],
                "emotion": "serene",
                "rationale": "Strong horizon line."
            }
        },
        {
            "id": "img-2",
            "title": "Alley",
            "uploader": "Anonymous",
            "timestamp": "2026-03-02T10:00:00.000Z",
            "analysis": {"rating": 5.5, "rarity": "common", "style_tags": ["noir", "minimal"]}
        },
        {
            "id": "img-3",
            "title": "Rooftops",
            "uploader": "Grace",
            "timestamp": "2026-03-03T10:00:00.000Z",
            "analysis": {"rating": 7.0, "rarity": "rare", "style_tags": ["noir"]}
        }
    ]))
    .expect("contract records should deserialize")
}

#[test]
fn test_sparse_analysis_fields_default() {
    let records = contract_records();
    let alley = &records[1];
    assert!(alley.image_base64.is_empty());
    assert!(alley.analysis.dominant_colors.is_empty());
    assert!(alley.analysis.rationale.is_empty());
    assert!(alley.has_style_tag("NOIR"));
}

#[test]
fn test_stats_over_contract_records() {
    let stats = CollectionStats::from_records(&contract_records());

    assert_eq!(stats.total_images, 3);
    assert!((stats.average_rating - 7.0).abs() < 1e-9);
    assert_eq!(stats.rarity_distribution.count(Rarity::Unique), 1);
    assert_eq!(stats.rarity_distribution.count(Rarity::Rare), 1);
    assert_eq!(stats.rarity_distribution.count(Rarity::Common), 1);

    // "minimal" is seen before "noir"; both appear twice.
    let tags: Vec<_> = stats.common_style_tags.iter().map(|t| t.tag.as_str()).collect();
    assert_eq!(tags, vec!["minimal", "noir", "seascape"]);
}

#[test]
fn test_empty_collection_stats() {
    let stats = CollectionStats::from_records(&[]);
    assert!(stats.is_empty());
    assert_eq!(stats.average_rating, 0.0);
    assert_eq!(stats.rarity_percentage(Rarity::Rare), 0.0);
}

#[test]
fn test_filter_panel_edits() {
    let mut filters = SearchFilters::new();
    filters.toggle_rarity(Rarity::Rare);
    filters.set_min_rating(12.0);
    assert_eq!(filters.min_rating, Some(10.0));
    assert_eq!(filters.active_count(), 2);

    filters.toggle_rarity(Rarity::Rare);
    filters.set_min_rating(0.0);
    assert!(!filters.is_active());

    filters.set_keyword("sunset");
    filters.clear();
    assert_eq!(filters, SearchFilters::default());
}

#[test]
fn test_strict_rating_check() {
    let filters = SearchFilters {
        min_rating: Some(-1.0),
        ..SearchFilters::default()
    };
    assert_eq!(
        filters.check_rating(),
        Err(ValidationError::RatingOutOfRange(-1.0))
    );
}

#[test]
fn test_comparison_and_receipt_shapes() {
    let records = contract_records();
    let result: ComparisonResult = serde_json::from_value(json!({
        "verdict": "The harbor wins on composition.",
        "image_a": serde_json::to_value(&records[0]).unwrap(),
        "image_b": serde_json::to_value(&records[2]).unwrap(),
    }))
    .unwrap();
    assert!(result.image_a.same_entity(&records[0]));
    assert!(!result.image_a.same_entity(&result.image_b));

    let receipt = UploadReceipt::new(json!({"id": "img-4"}));
    assert_eq!(receipt.record_id(), Some("img-4"));
}

#[test]
fn test_upload_payload_path() {
    let png: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
    let mime = detect_image_type("photo.bin", png, None);
    assert_eq!(mime, "image/png");
    assert!(validate_image(png, &mime).is_ok());

    let payload = encode_payload(png);
    let data_url = format!("data:{};base64,{}", mime, payload);
    assert_eq!(decode_payload(&data_url).unwrap(), png);

    let text = detect_image_type("notes.txt", b"hello", None);
    assert!(matches!(
        validate_image(b"hello", &text),
        Err(ValidationError::UnsupportedImageType(_))
    ));
}
