//! Upload pre-checks and transport payload encoding.
//!
//! Images are checked locally before any remote call:
//! 1. MIME type must be JPEG, PNG or WebP
//! 2. Size must not exceed [`MAX_UPLOAD_BYTES`]
//!
//! Accepted bytes travel to the contract as standard base64 without a
//! data-URL prefix.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::defaults::MAX_UPLOAD_BYTES;
use crate::error::{Error, Result, ValidationError};

/// MIME types accepted for upload.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/jpg", "image/webp"];

/// Whether `mime` is an accepted upload type.
pub fn is_allowed_image_type(mime: &str) -> bool {
    let normalized = mime.trim().to_lowercase();
    ALLOWED_IMAGE_TYPES.contains(&normalized.as_str())
}

/// Validate an image against the upload rules.
pub fn validate_image(data: &[u8], mime: &str) -> std::result::Result<(), ValidationError> {
    if !is_allowed_image_type(mime) {
        return Err(ValidationError::UnsupportedImageType(mime.to_string()));
    }

    let size = data.len() as u64;
    if size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::ImageTooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }

    Ok(())
}

/// Detect the content type of an image from its magic bytes.
///
/// Magic bytes are authoritative. When they are not recognized the claimed
/// type is used, falling back to the file extension. A claimed image type
/// whose bytes carry no image signature is downgraded to
/// `application/octet-stream` so it fails the upload check.
pub fn detect_image_type(filename: &str, data: &[u8], claimed: Option<&str>) -> String {
    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }

    let claimed = claimed
        .map(str::to_string)
        .or_else(|| mime_from_extension(filename).map(str::to_string));

    match claimed {
        Some(mime) if mime.starts_with("image/") => {
            tracing::debug!(
                filename,
                claimed = %mime,
                "Image signature not recognized, downgrading"
            );
            "application/octet-stream".to_string()
        }
        Some(mime) => mime,
        None => "application/octet-stream".to_string(),
    }
}

fn mime_from_extension(filename: &str) -> Option<&'static str> {
    let (_, ext) = filename.rsplit_once('.')?;
    match ext.to_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

/// Encode image bytes into the contract's transport payload.
pub fn encode_payload(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode a transport payload back into bytes.
///
/// Accepts an optional `data:<mime>;base64,` prefix, as produced by
/// browser file readers.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    let body = match payload.split_once(',') {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => payload,
    };
    STANDARD
        .decode(body.trim())
        .map_err(|e| Error::Serialization(format!("invalid base64 payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

    fn webp_header() -> Vec<u8> {
        let mut data = b"RIFF".to_vec();
        data.extend_from_slice(&[0x24, 0, 0, 0]);
        data.extend_from_slice(b"WEBPVP8 ");
        data
    }

    #[test]
    fn test_allowed_types() {
        assert!(is_allowed_image_type("image/jpeg"));
        assert!(is_allowed_image_type("image/jpg"));
        assert!(is_allowed_image_type("IMAGE/PNG"));
        assert!(is_allowed_image_type("image/webp"));
        assert!(!is_allowed_image_type("image/gif"));
        assert!(!is_allowed_image_type("application/pdf"));
    }

    #[test]
    fn test_validate_rejects_wrong_type() {
        let err = validate_image(b"GIF89a", "image/gif").unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedImageType("image/gif".to_string()));
    }

    #[test]
    fn test_validate_size_boundary() {
        let exact = vec![0u8; MAX_UPLOAD_BYTES as usize];
        assert!(validate_image(&exact, "image/png").is_ok());

        let over = vec![0u8; MAX_UPLOAD_BYTES as usize + 1];
        assert!(matches!(
            validate_image(&over, "image/png"),
            Err(ValidationError::ImageTooLarge { size, .. }) if size == MAX_UPLOAD_BYTES + 1
        ));
    }

    #[test]
    fn test_detect_from_magic_bytes() {
        assert_eq!(detect_image_type("x.bin", PNG_HEADER, None), "image/png");
        assert_eq!(detect_image_type("x", JPEG_HEADER, None), "image/jpeg");
        assert_eq!(detect_image_type("x", &webp_header(), None), "image/webp");
    }

    #[test]
    fn test_detect_magic_bytes_override_claim() {
        assert_eq!(
            detect_image_type("photo.jpg", PNG_HEADER, Some("image/jpeg")),
            "image/png"
        );
    }

    #[test]
    fn test_detect_downgrades_fake_image() {
        assert_eq!(
            detect_image_type("fake.png", b"not really an image", None),
            "application/octet-stream"
        );
        assert_eq!(
            detect_image_type("fake", b"plain", Some("image/webp")),
            "application/octet-stream"
        );
        assert_eq!(detect_image_type("notes.txt", b"hello", None), "text/plain");
    }

    #[test]
    fn test_payload_round_trip_is_byte_identical() {
        for data in [PNG_HEADER.to_vec(), JPEG_HEADER.to_vec(), webp_header(), vec![]] {
            let encoded = encode_payload(&data);
            assert_eq!(decode_payload(&encoded).unwrap(), data);
        }
    }

    #[test]
    fn test_round_trip_at_size_limit() {
        let mut data = PNG_HEADER.to_vec();
        data.resize(MAX_UPLOAD_BYTES as usize, 0xAB);
        assert!(validate_image(&data, "image/png").is_ok());
        assert_eq!(decode_payload(&encode_payload(&data)).unwrap(), data);
    }

    #[test]
    fn test_decode_strips_data_url_prefix() {
        let encoded = encode_payload(b"hello");
        let with_prefix = format!("data:image/png;base64,{}", encoded);
        assert_eq!(decode_payload(&with_prefix).unwrap(), b"hello");
    }

    #[test]
    fn test_decode_invalid_payload() {
        assert!(matches!(
            decode_payload("***not base64***"),
            Err(Error::Serialization(_))
        ));
    }
}
