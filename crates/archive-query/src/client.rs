//! Typed entry point over the query layer.

use std::sync::Arc;

use archive_core::{CollectionStats, ContractGateway, Error, ImageRecord, Result, SearchFilters};

use crate::cache::{CacheConfig, QueryCache};
use crate::debounce::GalleryController;
use crate::key::{QueryData, QueryKey};
use crate::mutation::{CompareCoordinator, UploadCoordinator};
use crate::notify::{self, Notifier};
use crate::reconciler::ViewReconciler;

/// Shares one cache and one notifier between reads and mutations.
#[derive(Clone)]
pub struct ArchiveClient {
    gateway: Arc<dyn ContractGateway>,
    cache: QueryCache,
    reconciler: ViewReconciler,
    notifier: Notifier,
}

impl ArchiveClient {
    pub fn new(gateway: Arc<dyn ContractGateway>) -> Self {
        Self::with_config(gateway, CacheConfig::default())
    }

    pub fn with_config(gateway: Arc<dyn ContractGateway>, config: CacheConfig) -> Self {
        let cache = QueryCache::with_config(Arc::clone(&gateway), config);
        let notifier = Notifier::default();
        Self {
            reconciler: ViewReconciler::new(cache.clone()).with_notifier(notifier.clone()),
            gateway,
            cache,
            notifier,
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn reconciler(&self) -> &ViewReconciler {
        &self.reconciler
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Total number of archived images.
    pub async fn count(&self) -> Result<u64> {
        let data = self.load(&QueryKey::count()).await?;
        data.as_count().ok_or_else(|| unexpected(&data))
    }

    /// The `count` most recent records, newest first.
    pub async fn recent(&self, count: usize) -> Result<Arc<Vec<ImageRecord>>> {
        let data = self.load(&QueryKey::recent(count)).await?;
        data.as_records().cloned().ok_or_else(|| unexpected(&data))
    }

    /// One record by id; `Ok(None)` when the archive has no such record.
    pub async fn record(&self, id: &str) -> Result<Option<Arc<ImageRecord>>> {
        let data = self.load(&QueryKey::record(id)).await?;
        match data.as_record() {
            Some(record) => Ok(record.cloned()),
            None => Err(unexpected(&data)),
        }
    }

    /// Records matching `filters`, or the baseline feed when none are set.
    pub async fn search(&self, filters: &SearchFilters) -> Result<Arc<Vec<ImageRecord>>> {
        let data = self.load(&self.reconciler.identity_for(filters)).await?;
        Ok(data.to_records())
    }

    /// Statistics over the records `filters` display.
    pub async fn stats(&self, filters: &SearchFilters) -> Result<CollectionStats> {
        let view = self.reconciler.reconcile(filters).await;
        match view.error {
            Some(e) => Err(e),
            None => Ok(view.stats()),
        }
    }

    /// Cached read that publishes a notice when it fails.
    async fn load(&self, key: &QueryKey) -> Result<QueryData> {
        let outcome = self.cache.fetch(key).await;
        if outcome.is_err() {
            self.notifier.error(notify::LOAD_FAILED);
        }
        outcome
    }

    pub fn gallery(&self) -> GalleryController {
        GalleryController::new(self.reconciler.clone())
    }

    pub fn uploads(&self) -> UploadCoordinator {
        UploadCoordinator::new(
            Arc::clone(&self.gateway),
            self.cache.clone(),
            self.notifier.clone(),
        )
    }

    pub fn comparisons(&self) -> CompareCoordinator {
        CompareCoordinator::new(Arc::clone(&self.gateway), self.notifier.clone())
    }
}

fn unexpected(data: &QueryData) -> Error {
    Error::Internal(format!("unexpected cached result shape: {:?}", data))
}
