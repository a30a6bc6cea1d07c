//! User-facing notices.
//!
//! Every completed or failed mutation, every read that fails after its
//! retry, and every locally rejected input produces one [`Notice`] on the
//! broadcast channel. Front ends subscribe
//! and render them as toasts, log lines, or exit messages.

use serde::Serialize;
use tokio::sync::broadcast;

/// Buffer size of the notice channel.
const NOTICE_CAPACITY: usize = 64;

pub const UPLOAD_SUCCEEDED: &str = "Image uploaded successfully! AI analysis in progress...";
pub const UPLOAD_FAILED: &str = "Upload failed. Please try again.";
pub const COMPARE_SUCCEEDED: &str = "Comparison complete!";
pub const COMPARE_FAILED: &str = "Comparison failed. Please try again.";
pub const LOAD_FAILED: &str = "Failed to load images. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Broadcast channel of notices.
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notice>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(NOTICE_CAPACITY)
    }
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.emit(NoticeLevel::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(NoticeLevel::Error, message.into());
    }

    fn emit(&self, level: NoticeLevel, message: String) {
        tracing::debug!(
            ?level,
            subscriber_count = self.tx.receiver_count(),
            message = %message,
            "Notice"
        );
        // No subscribers is fine; notices are best-effort.
        let _ = self.tx.send(Notice { level, message });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
