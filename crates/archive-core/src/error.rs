//! Error types for image-archive.

use thiserror::Error;

/// Result type alias using image-archive's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for image-archive operations.
///
/// Cloneable so one outcome can be fanned out to every observer of a
/// cached query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Gateway unreachable or transport-level failure
    #[error("Request error: {0}")]
    Request(String),

    /// The remote contract reported an error
    #[error("Remote error: {0}")]
    Remote(String),

    /// Remote returned malformed or unexpected JSON
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Input rejected locally before any remote call
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for errors detected before any remote call was made.
    pub fn is_local(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

/// Local validation failures for uploads, comparisons and filters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please upload a valid image file (JPEG, PNG, WebP)")]
    UnsupportedImageType(String),

    #[error("Image size must be less than 10MB")]
    ImageTooLarge { size: u64, limit: u64 },

    #[error("Please provide an image and title")]
    MissingImage,

    #[error("Please provide an image and title")]
    EmptyTitle,

    #[error("Please select two images to compare")]
    IncompleteSelection,

    #[error("Please select two different images")]
    SameRecord(String),

    #[error("Minimum rating must be between 0 and 10, got {0}")]
    RatingOutOfRange(f64),

    #[error("Another {0} is already in progress")]
    MutationPending(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_request() {
        let err = Error::Request("network unreachable".to_string());
        assert_eq!(err.to_string(), "Request error: network unreachable");
    }

    #[test]
    fn test_error_display_remote() {
        let err = Error::Remote("execution reverted".to_string());
        assert_eq!(err.to_string(), "Remote error: execution reverted");
    }

    #[test]
    fn test_error_display_validation() {
        let err: Error = ValidationError::EmptyTitle.into();
        assert_eq!(err.to_string(), "Invalid input: Please provide an image and title");
        assert!(err.is_local());
    }

    #[test]
    fn test_compare_errors_are_distinct() {
        let incomplete = ValidationError::IncompleteSelection.to_string();
        let same = ValidationError::SameRecord("x1".to_string()).to_string();
        assert_ne!(incomplete, same);
        assert!(same.contains("different"));
    }

    #[test]
    fn test_remote_errors_are_not_local() {
        assert!(!Error::Remote("boom".to_string()).is_local());
        assert!(!Error::Request("down".to_string()).is_local());
        assert!(!Error::Serialization("bad".to_string()).is_local());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_error_is_send_sync_clone() {
        fn assert_bounds<T: Send + Sync + Clone>() {}
        assert_bounds::<Error>();
    }

    #[test]
    fn test_image_too_large_message() {
        let err = ValidationError::ImageTooLarge {
            size: 11 * 1024 * 1024,
            limit: 10 * 1024 * 1024,
        };
        assert_eq!(err.to_string(), "Image size must be less than 10MB");
    }
}
