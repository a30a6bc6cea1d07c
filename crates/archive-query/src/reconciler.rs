//! Gallery view reconciliation.
//!
//! Active filters display their resolved search identity; inactive filters
//! display the baseline feed of recent records. Both identities stay cached
//! independently, so switching back and forth needs no manual refetch.

use std::sync::Arc;

use archive_core::{defaults, CollectionStats, Error, ImageRecord, Result, SearchFilters};

use crate::cache::{QueryCache, QuerySnapshot, QueryStatus};
use crate::key::QueryKey;
use crate::notify::{self, Notifier};
use crate::resolver;

/// The one ordered record sequence the gallery, statistics and comparison
/// views consume.
#[derive(Debug, Clone)]
pub struct GalleryView {
    pub key: QueryKey,
    pub status: QueryStatus,
    pub records: Arc<Vec<ImageRecord>>,
    pub error: Option<Error>,
    /// True when the records come from a search rather than the baseline.
    pub filtered: bool,
}

impl GalleryView {
    fn from_snapshot(snapshot: QuerySnapshot, filtered: bool) -> Self {
        let records = snapshot
            .data
            .as_ref()
            .map(|d| d.to_records())
            .unwrap_or_default();
        Self {
            key: snapshot.key,
            status: snapshot.status,
            records,
            error: snapshot.error,
            filtered,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Aggregate statistics over exactly the displayed records.
    pub fn stats(&self) -> CollectionStats {
        CollectionStats::from_records(&self.records)
    }

    /// Look up a displayed record by id (comparison picker).
    pub fn find(&self, id: &str) -> Option<&ImageRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}

/// Chooses and resolves the identity behind the gallery.
#[derive(Clone)]
pub struct ViewReconciler {
    cache: QueryCache,
    notifier: Notifier,
    recent_count: usize,
}

impl ViewReconciler {
    pub fn new(cache: QueryCache) -> Self {
        Self::with_recent_count(cache, defaults::RECENT_COUNT)
    }

    pub fn with_recent_count(cache: QueryCache, recent_count: usize) -> Self {
        Self {
            cache,
            notifier: Notifier::default(),
            recent_count,
        }
    }

    /// Publish load failures on `notifier` instead of a private channel.
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn baseline(&self) -> QueryKey {
        QueryKey::recent(self.recent_count)
    }

    /// Search identity when filters are active, else the baseline.
    pub fn identity_for(&self, filters: &SearchFilters) -> QueryKey {
        resolver::resolve(filters).unwrap_or_else(|| self.baseline())
    }

    /// Resolve the view, fetching if needed. Failures degrade to an empty
    /// sequence with error status and publish an error notice.
    pub async fn reconcile(&self, filters: &SearchFilters) -> GalleryView {
        let key = self.identity_for(filters);
        let filtered = filters.is_active();

        if resolver::drops_fields(filters) {
            tracing::debug!(
                cache_key = %key,
                active_filters = filters.active_count(),
                "Fast-path filter ignores remaining criteria"
            );
        }

        match self.cache.fetch(&key).await {
            Ok(data) => GalleryView {
                key,
                status: QueryStatus::Success,
                records: data.to_records(),
                error: None,
                filtered,
            },
            Err(e) => {
                tracing::debug!(cache_key = %key, error = %e, "Gallery degraded to empty view");
                self.notifier.error(notify::LOAD_FAILED);
                GalleryView {
                    key,
                    status: QueryStatus::Error,
                    records: Arc::new(Vec::new()),
                    error: Some(e),
                    filtered,
                }
            }
        }
    }

    /// Report the view from cache without triggering a call.
    pub async fn peek(&self, filters: &SearchFilters) -> GalleryView {
        let key = self.identity_for(filters);
        GalleryView::from_snapshot(self.cache.snapshot(&key).await, filters.is_active())
    }

    /// Warm the baseline feed.
    pub async fn prefetch_baseline(&self) -> Result<()> {
        self.cache.fetch(&self.baseline()).await.map(|_| ())
    }
}
