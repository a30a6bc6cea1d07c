//! Upload and comparison coordinators.
//!
//! Both follow `Idle → Pending → (Idle | Showing)`. Writes are issued once
//! and never retried automatically; local validation happens before any
//! remote call and leaves remote state untouched.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, field, info, instrument, Span};

use archive_core::{
    defaults, detect_image_type, logging, encode_payload, methods, validate_image, ComparisonResult,
    ContractGateway, Error, Result, UploadReceipt, ValidationError,
};

use crate::cache::QueryCache;
use crate::notify::{self, Notifier};

/// Identities made stale by a successful upload.
pub const UPLOAD_INVALIDATES: &[&str] = &[methods::LIST_RECENT, methods::COUNT_IMAGES];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationPhase {
    #[default]
    Idle,
    Pending,
    /// A comparison result is on display.
    Showing,
}

/// Holds a coordinator in `Pending`. Dropping it without [`finish`]
/// (for example when the caller's future is cancelled mid-call) returns
/// the phase to `Idle`.
///
/// [`finish`]: PendingGuard::finish
struct PendingGuard<'a> {
    phase: &'a watch::Sender<MutationPhase>,
    armed: bool,
}

impl<'a> PendingGuard<'a> {
    /// Move to `Pending` unless already there.
    fn begin(phase: &'a watch::Sender<MutationPhase>) -> Option<Self> {
        let entered = phase.send_if_modified(|current| {
            if *current == MutationPhase::Pending {
                false
            } else {
                *current = MutationPhase::Pending;
                true
            }
        });
        entered.then_some(Self { phase, armed: true })
    }

    fn finish(mut self, next: MutationPhase) {
        self.armed = false;
        self.phase.send_replace(next);
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            debug!("Mutation abandoned while pending");
            self.phase.send_replace(MutationPhase::Idle);
        }
    }
}

// =============================================================================
// UPLOAD
// =============================================================================

/// Image accepted by the upload pre-check.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftImage {
    pub filename: String,
    pub mime: String,
    pub data: Vec<u8>,
}

/// Pending upload input, kept across failed submissions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadDraft {
    pub image: Option<DraftImage>,
    pub title: String,
    pub uploader: String,
}

impl UploadDraft {
    pub fn uploader_or_default(&self) -> &str {
        match self.uploader.trim() {
            "" => defaults::ANONYMOUS_UPLOADER,
            name => name,
        }
    }

    fn check(&self) -> std::result::Result<&DraftImage, ValidationError> {
        let image = self.image.as_ref().ok_or(ValidationError::MissingImage)?;
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        validate_image(&image.data, &image.mime)?;
        Ok(image)
    }
}

pub struct UploadCoordinator {
    gateway: Arc<dyn ContractGateway>,
    cache: QueryCache,
    notifier: Notifier,
    draft: Mutex<UploadDraft>,
    phase: watch::Sender<MutationPhase>,
}

impl UploadCoordinator {
    pub fn new(gateway: Arc<dyn ContractGateway>, cache: QueryCache, notifier: Notifier) -> Self {
        Self {
            gateway,
            cache,
            notifier,
            draft: Mutex::new(UploadDraft::default()),
            phase: watch::channel(MutationPhase::Idle).0,
        }
    }

    pub fn phase(&self) -> watch::Receiver<MutationPhase> {
        self.phase.subscribe()
    }

    pub async fn draft(&self) -> UploadDraft {
        self.draft.lock().await.clone()
    }

    /// Pre-check an image and place it in the draft.
    ///
    /// The content type is sniffed from the bytes; `claimed` and the file
    /// extension are fallbacks only.
    pub async fn select_image(
        &self,
        filename: &str,
        data: Vec<u8>,
        claimed: Option<&str>,
    ) -> Result<()> {
        let mime = detect_image_type(filename, &data, claimed);
        if let Err(e) = validate_image(&data, &mime) {
            debug!(filename, mime = %mime, payload_bytes = data.len(), error = %e, "Image rejected");
            self.notifier.error(e.to_string());
            return Err(e.into());
        }

        self.draft.lock().await.image = Some(DraftImage {
            filename: filename.to_string(),
            mime,
            data,
        });
        Ok(())
    }

    pub async fn set_title(&self, title: impl Into<String>) {
        self.draft.lock().await.title = title.into();
    }

    pub async fn set_uploader(&self, uploader: impl Into<String>) {
        self.draft.lock().await.uploader = uploader.into();
    }

    pub async fn clear(&self) {
        *self.draft.lock().await = UploadDraft::default();
    }

    /// Submit the draft as one `add_image_and_rate` write.
    ///
    /// On success the recent feed and count are invalidated and the draft is
    /// cleared, unless it was edited while the write was pending. On failure
    /// the draft is kept for another attempt.
    #[instrument(
        name = "upload_submit",
        skip(self),
        fields(subsystem = "upload", payload_bytes = field::Empty, record_id = field::Empty)
    )]
    pub async fn submit(&self) -> Result<UploadReceipt> {
        let Some(pending) = PendingGuard::begin(&self.phase) else {
            let e = ValidationError::MutationPending("upload");
            self.notifier.error(e.to_string());
            return Err(e.into());
        };

        let (args, submitted) = {
            let draft = self.draft.lock().await;
            match draft.check() {
                Ok(image) => (
                    vec![
                        encode_payload(&image.data),
                        draft.title.trim().to_string(),
                        draft.uploader_or_default().to_string(),
                        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                    ],
                    draft.clone(),
                ),
                Err(e) => {
                    pending.finish(MutationPhase::Idle);
                    self.notifier.error(e.to_string());
                    return Err(e.into());
                }
            }
        };

        let payload_bytes = args[0].len();
        let span = Span::current();
        span.record(logging::PAYLOAD_BYTES, payload_bytes as u64);
        let outcome = self.gateway.mutate(methods::ADD_IMAGE_AND_RATE, &args).await;

        match outcome {
            Ok(raw) => {
                let receipt = UploadReceipt::new(raw);
                if let Some(id) = receipt.record_id() {
                    span.record(logging::RECORD_ID, id);
                }
                self.cache.invalidate(UPLOAD_INVALIDATES).await;
                {
                    let mut draft = self.draft.lock().await;
                    if *draft == submitted {
                        *draft = UploadDraft::default();
                    } else {
                        debug!(subsystem = "upload", "Draft edited during upload, keeping it");
                    }
                }
                pending.finish(MutationPhase::Idle);

                info!(
                    subsystem = "upload",
                    payload_bytes,
                    record_id = receipt.record_id().unwrap_or_default(),
                    "Image uploaded"
                );
                self.notifier.success(notify::UPLOAD_SUCCEEDED);
                Ok(receipt)
            }
            Err(e) => {
                pending.finish(MutationPhase::Idle);
                error!(subsystem = "upload", payload_bytes, error = %e, "Upload failed");
                self.notifier.error(notify::UPLOAD_FAILED);
                Err(e)
            }
        }
    }
}

// =============================================================================
// COMPARE
// =============================================================================

/// The two comparison slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompareSelection {
    pub first: Option<String>,
    pub second: Option<String>,
}

impl CompareSelection {
    pub fn pair(&self) -> std::result::Result<(&str, &str), ValidationError> {
        match (self.first.as_deref(), self.second.as_deref()) {
            (Some(a), Some(b)) if a == b => Err(ValidationError::SameRecord(a.to_string())),
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(ValidationError::IncompleteSelection),
        }
    }
}

fn slot(id: &str) -> Option<String> {
    let id = id.trim();
    (!id.is_empty()).then(|| id.to_string())
}

pub struct CompareCoordinator {
    gateway: Arc<dyn ContractGateway>,
    notifier: Notifier,
    selection: Mutex<CompareSelection>,
    result: Mutex<Option<ComparisonResult>>,
    phase: watch::Sender<MutationPhase>,
}

impl CompareCoordinator {
    pub fn new(gateway: Arc<dyn ContractGateway>, notifier: Notifier) -> Self {
        Self {
            gateway,
            notifier,
            selection: Mutex::new(CompareSelection::default()),
            result: Mutex::new(None),
            phase: watch::channel(MutationPhase::Idle).0,
        }
    }

    pub fn phase(&self) -> watch::Receiver<MutationPhase> {
        self.phase.subscribe()
    }

    /// Fill the first slot; a blank id empties it.
    pub async fn select_first(&self, id: &str) {
        self.selection.lock().await.first = slot(id);
    }

    /// Fill the second slot; a blank id empties it.
    pub async fn select_second(&self, id: &str) {
        self.selection.lock().await.second = slot(id);
    }

    pub async fn selection(&self) -> CompareSelection {
        self.selection.lock().await.clone()
    }

    pub async fn result(&self) -> Option<ComparisonResult> {
        self.result.lock().await.clone()
    }

    /// Compare the selected pair with one uncached `compare_images` call.
    pub async fn compare(&self) -> Result<ComparisonResult> {
        let args = {
            let selection = self.selection.lock().await;
            match selection.pair() {
                Ok((a, b)) => vec![a.to_string(), b.to_string()],
                Err(e) => {
                    self.notifier.error(e.to_string());
                    return Err(e.into());
                }
            }
        };

        let Some(pending) = PendingGuard::begin(&self.phase) else {
            let e = ValidationError::MutationPending("comparison");
            self.notifier.error(e.to_string());
            return Err(e.into());
        };

        let outcome = match self.gateway.query(methods::COMPARE_IMAGES, &args).await {
            Ok(value) => serde_json::from_value::<ComparisonResult>(value).map_err(Error::from),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(result) => {
                *self.result.lock().await = Some(result.clone());
                pending.finish(MutationPhase::Showing);
                info!(
                    subsystem = "compare",
                    image_a = %args[0],
                    image_b = %args[1],
                    "Comparison complete"
                );
                self.notifier.success(notify::COMPARE_SUCCEEDED);
                Ok(result)
            }
            Err(e) => {
                pending.finish(MutationPhase::Idle);
                error!(subsystem = "compare", error = %e, "Comparison failed");
                self.notifier.error(notify::COMPARE_FAILED);
                Err(e)
            }
        }
    }

    /// Dismiss the result and empty both slots.
    pub async fn reset(&self) {
        *self.result.lock().await = None;
        *self.selection.lock().await = CompareSelection::default();
        self.phase.send_if_modified(|current| {
            if *current == MutationPhase::Showing {
                *current = MutationPhase::Idle;
                true
            } else {
                false
            }
        });
    }
}
