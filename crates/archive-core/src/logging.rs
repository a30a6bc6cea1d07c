//! Structured logging field name constants for image-archive.
//!
//! Span fields filled in after the span opens are recorded through these
//! constants (`span.record(logging::DURATION_MS, ..)`). Event macros take
//! literal field names, which must match the names below.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Operation failed and nothing will retry it |
//! | WARN  | Remote failure, automatic retry applied |
//! | INFO  | Mutation completions, startup |
//! | DEBUG | Cache decisions (hit, dedup, invalidate), resolved queries |
//! | TRACE | Per-record iteration |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "gateway", "cache", "gallery", "upload", "compare", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
pub const COMPONENT: &str = "component";

/// Logical operation name ("query", "mutate", "fetch", "invalidate").
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Contract method being invoked.
pub const METHOD: &str = "method";

/// Cache identity rendered as `method(args)`.
pub const CACHE_KEY: &str = "cache_key";

/// Record id being operated on.
pub const RECORD_ID: &str = "record_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of records returned by a read.
pub const RESULT_COUNT: &str = "result_count";

/// Attempt number of a read (1 = first try).
pub const ATTEMPT: &str = "attempt";

/// Upload payload size in bytes.
pub const PAYLOAD_BYTES: &str = "payload_bytes";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_names_are_unique_snake_case() {
        let names = [
            SUBSYSTEM,
            COMPONENT,
            OPERATION,
            METHOD,
            CACHE_KEY,
            RECORD_ID,
            DURATION_MS,
            RESULT_COUNT,
            ATTEMPT,
            PAYLOAD_BYTES,
            SUCCESS,
            ERROR_MSG,
        ];
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        for name in names {
            assert!(name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }
}
