//! Centralized default constants for the image-archive client.
//!
//! **This module is the single source of truth** for shared default values.
//! Other crates reference these constants instead of defining their own
//! magic numbers.

use std::time::Duration;

// =============================================================================
// QUERY CACHE
// =============================================================================

/// How long a successful read stays fresh after it completes (milliseconds).
pub const FRESHNESS_WINDOW_MS: u64 = 30_000;

/// Automatic retries for a failed read before the error is surfaced.
pub const READ_RETRIES: u32 = 1;

/// Delay before an automatic read retry (milliseconds).
pub const RETRY_DELAY_MS: u64 = 1_000;

/// Idle time after which an unobserved cache entry is evicted
/// (milliseconds). Entries with a call in flight are never evicted.
pub const CACHE_GC_MS: u64 = 300_000;

/// Freshness window as a `Duration`.
pub const fn freshness_window() -> Duration {
    Duration::from_millis(FRESHNESS_WINDOW_MS)
}

/// Cache eviction interval as a `Duration`.
pub const fn cache_gc() -> Duration {
    Duration::from_millis(CACHE_GC_MS)
}

/// Retry delay as a `Duration`.
pub const fn retry_delay() -> Duration {
    Duration::from_millis(RETRY_DELAY_MS)
}

// =============================================================================
// FILTERS
// =============================================================================

/// Trailing-edge debounce window for filter edits (milliseconds).
pub const DEBOUNCE_WINDOW_MS: u64 = 500;

/// Lowest selectable minimum rating.
pub const RATING_MIN: f64 = 0.0;

/// Highest selectable minimum rating.
pub const RATING_MAX: f64 = 10.0;

/// Debounce window as a `Duration`.
pub const fn debounce_window() -> Duration {
    Duration::from_millis(DEBOUNCE_WINDOW_MS)
}

// =============================================================================
// GALLERY
// =============================================================================

/// Number of records in the baseline "recent items" feed.
pub const RECENT_COUNT: usize = 50;

/// Number of style tags reported by collection statistics.
pub const TOP_STYLE_TAGS: usize = 8;

// =============================================================================
// UPLOAD
// =============================================================================

/// Maximum accepted image size in bytes (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Uploader name used when none is given.
pub const ANONYMOUS_UPLOADER: &str = "Anonymous";

// =============================================================================
// GATEWAY
// =============================================================================

/// Default contract RPC endpoint.
pub const RPC_URL: &str = "https://studio.genlayer.com";

/// Path of the JSON-RPC endpoint below the base URL.
pub const RPC_PATH: &str = "/api/rpc";

/// Request timeout for contract calls (seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Env var: contract RPC base URL.
pub const ENV_RPC_URL: &str = "ARCHIVE_RPC_URL";

/// Env var: address of the archive contract.
pub const ENV_CONTRACT_ADDRESS: &str = "ARCHIVE_CONTRACT_ADDRESS";

/// Env var: request timeout override (seconds).
pub const ENV_TIMEOUT_SECS: &str = "ARCHIVE_TIMEOUT_SECS";

/// Env var: optional path to a TOML config file.
pub const ENV_CONFIG_PATH: &str = "ARCHIVE_CONFIG";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows() {
        assert_eq!(freshness_window(), Duration::from_secs(30));
        assert_eq!(debounce_window(), Duration::from_millis(500));
        assert!(cache_gc() > freshness_window());
    }

    #[test]
    fn test_upload_limit_is_ten_mib() {
        assert_eq!(MAX_UPLOAD_BYTES, 10_485_760);
    }
}
