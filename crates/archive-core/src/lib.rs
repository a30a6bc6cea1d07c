//! # archive-core
//!
//! Core types, traits, and abstractions for the image-archive client.
//!
//! This crate provides the data model returned by the archive contract,
//! the search filter state, upload pre-checks, and the gateway trait the
//! other crates build on.

pub mod defaults;
pub mod error;
pub mod file_safety;
pub mod filters;
pub mod logging;
pub mod models;
pub mod stats;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result, ValidationError};
pub use file_safety::{
    decode_payload, detect_image_type, encode_payload, is_allowed_image_type, validate_image,
};
pub use filters::{clamp_rating, SearchFilters};
pub use models::*;
pub use stats::{CollectionStats, RarityDistribution, TagCount};
pub use traits::*;
