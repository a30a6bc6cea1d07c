//! Identity-keyed result cache for contract reads.
//!
//! Each [`QueryKey`] owns one entry holding its last outcome (data or
//! error), when that outcome settled, and at most one in-flight call.
//! Concurrent requesters of the same identity share the in-flight call.
//!
//! ## Entry lifecycle
//!
//! ```text
//! Idle ──fetch──▶ Loading ──ok──▶ Success ──stale + fetch──▶ refetch
//!                    │
//!                    └──err (after retry)──▶ Error
//! ```
//!
//! A successful outcome is served for the freshness window. An error
//! replaces any earlier data and is served, without new calls, until the
//! identity is invalidated or explicitly refetched.
//!
//! Entries nobody has fetched, refetched or snapshotted for
//! [`CacheConfig::gc`] are evicted on the next access to the cache, unless
//! a call for them is still in flight.
//!
//! Every fetch is stamped with the entry's generation. Invalidation and
//! refetch bump the generation, so a late response from a superseded call
//! is returned to its own waiters but never written into the entry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use tokio::sync::{broadcast, Mutex};
use tokio::time::Instant;
use tracing::{debug, field, instrument, trace, warn, Span};

use archive_core::{defaults, logging, ContractGateway, Error, Result};

use crate::key::{QueryData, QueryKey};

/// Buffer size of the cache event channel.
const EVENT_CAPACITY: usize = 256;

type SharedFetch = Shared<BoxFuture<'static, Result<QueryData>>>;

/// Cache timing and retry policy.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// How long a settled outcome is served without a new call.
    pub freshness: Duration,
    /// Automatic retries of a failed read.
    pub retries: u32,
    /// Pause before each retry.
    pub retry_delay: Duration,
    /// Idle time after which an unobserved entry is evicted.
    pub gc: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            freshness: defaults::freshness_window(),
            retries: defaults::READ_RETRIES,
            retry_delay: defaults::retry_delay(),
            gc: defaults::cache_gc(),
        }
    }
}

/// Observable status of one identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    /// Never fetched.
    Idle,
    /// First fetch in flight, nothing cached yet.
    Loading,
    Success,
    Error,
}

/// Point-in-time view of one identity.
#[derive(Debug, Clone)]
pub struct QuerySnapshot {
    pub key: QueryKey,
    pub status: QueryStatus,
    pub data: Option<QueryData>,
    pub error: Option<Error>,
    pub fetched_at: Option<Instant>,
    pub is_fetching: bool,
    pub is_stale: bool,
}

/// Notifications published to cache subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEvent {
    FetchStarted { key: QueryKey },
    Updated { key: QueryKey },
    Failed { key: QueryKey, error: Error },
    Invalidated { key: QueryKey },
}

impl CacheEvent {
    pub fn key(&self) -> &QueryKey {
        match self {
            CacheEvent::FetchStarted { key }
            | CacheEvent::Updated { key }
            | CacheEvent::Failed { key, .. }
            | CacheEvent::Invalidated { key } => key,
        }
    }
}

/// Cache counters for monitoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub dedups: u64,
    pub remote_calls: u64,
    pub evictions: u64,
    pub entries: usize,
}

struct Entry {
    outcome: Option<Result<QueryData>>,
    settled_at: Option<Instant>,
    last_access: Instant,
    invalidated: bool,
    generation: u64,
    in_flight: Option<SharedFetch>,
}

impl Entry {
    fn new(now: Instant) -> Self {
        Self {
            outcome: None,
            settled_at: None,
            last_access: now,
            invalidated: false,
            generation: 0,
            in_flight: None,
        }
    }

    /// Errors do not age out; only invalidation or refetch clears them.
    fn is_fresh(&self, now: Instant, freshness: Duration) -> bool {
        if self.invalidated {
            return false;
        }
        match (&self.outcome, self.settled_at) {
            (Some(Err(_)), Some(_)) => true,
            (_, Some(at)) => now.saturating_duration_since(at) < freshness,
            _ => false,
        }
    }

    fn is_idle(&self, now: Instant, gc: Duration) -> bool {
        self.in_flight.is_none() && now.saturating_duration_since(self.last_access) >= gc
    }
}

struct CacheInner {
    gateway: Arc<dyn ContractGateway>,
    config: CacheConfig,
    entries: Mutex<HashMap<QueryKey, Entry>>,
    events: broadcast::Sender<CacheEvent>,
    hits: AtomicU64,
    misses: AtomicU64,
    dedups: AtomicU64,
    remote_calls: AtomicU64,
    evictions: AtomicU64,
}

/// Shared read cache over a contract gateway.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<CacheInner>,
}

impl QueryCache {
    pub fn new(gateway: Arc<dyn ContractGateway>) -> Self {
        Self::with_config(gateway, CacheConfig::default())
    }

    pub fn with_config(gateway: Arc<dyn ContractGateway>, config: CacheConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(CacheInner {
                gateway,
                config,
                entries: Mutex::new(HashMap::new()),
                events,
                hits: AtomicU64::new(0),
                misses: AtomicU64::new(0),
                dedups: AtomicU64::new(0),
                remote_calls: AtomicU64::new(0),
                evictions: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    pub fn gateway(&self) -> &Arc<dyn ContractGateway> {
        &self.inner.gateway
    }

    /// Resolve an identity, from cache when fresh.
    ///
    /// Attaches to the in-flight call if one exists; otherwise starts
    /// exactly one.
    pub async fn fetch(&self, key: &QueryKey) -> Result<QueryData> {
        let pending = {
            let now = Instant::now();
            let mut entries = self.inner.entries.lock().await;
            self.inner.evict_idle(&mut entries, now);
            let entry = entries
                .entry(key.clone())
                .or_insert_with(|| Entry::new(now));
            entry.last_access = now;

            if entry.is_fresh(now, self.inner.config.freshness) {
                if let Some(outcome) = &entry.outcome {
                    self.inner.hits.fetch_add(1, Ordering::Relaxed);
                    debug!(cache_key = %key, ok = outcome.is_ok(), "Query cache hit");
                    return outcome.clone();
                }
            }

            match &entry.in_flight {
                Some(in_flight) => {
                    self.inner.dedups.fetch_add(1, Ordering::Relaxed);
                    debug!(cache_key = %key, "Attaching to in-flight query");
                    in_flight.clone()
                }
                None => {
                    self.inner.misses.fetch_add(1, Ordering::Relaxed);
                    debug!(cache_key = %key, "Query cache miss");
                    self.start(key, entry)
                }
            }
        };

        pending.await
    }

    /// Force a new call for an identity, superseding any in-flight one.
    pub async fn refetch(&self, key: &QueryKey) -> Result<QueryData> {
        let pending = {
            let now = Instant::now();
            let mut entries = self.inner.entries.lock().await;
            self.inner.evict_idle(&mut entries, now);
            let entry = entries
                .entry(key.clone())
                .or_insert_with(|| Entry::new(now));
            entry.last_access = now;
            self.inner.misses.fetch_add(1, Ordering::Relaxed);
            debug!(cache_key = %key, "Forced refetch");
            self.start(key, entry)
        };
        pending.await
    }

    /// Current state of an identity, without triggering a call.
    pub async fn snapshot(&self, key: &QueryKey) -> QuerySnapshot {
        let now = Instant::now();
        let mut entries = self.inner.entries.lock().await;
        self.inner.evict_idle(&mut entries, now);

        let Some(entry) = entries.get_mut(key) else {
            return QuerySnapshot {
                key: key.clone(),
                status: QueryStatus::Idle,
                data: None,
                error: None,
                fetched_at: None,
                is_fetching: false,
                is_stale: false,
            };
        };

        entry.last_access = now;
        let is_fetching = entry.in_flight.is_some();
        let (status, data, error) = match &entry.outcome {
            None if is_fetching => (QueryStatus::Loading, None, None),
            None => (QueryStatus::Idle, None, None),
            Some(Ok(data)) => (QueryStatus::Success, Some(data.clone()), None),
            Some(Err(e)) => (QueryStatus::Error, None, Some(e.clone())),
        };

        QuerySnapshot {
            key: key.clone(),
            status,
            data,
            error,
            fetched_at: entry.settled_at,
            is_fetching,
            is_stale: entry.outcome.is_some() && !entry.is_fresh(now, self.inner.config.freshness),
        }
    }

    /// Mark every identity whose method starts with one of `prefixes` as
    /// stale and detach its in-flight call. Returns the affected keys.
    pub async fn invalidate(&self, prefixes: &[&str]) -> Vec<QueryKey> {
        let mut entries = self.inner.entries.lock().await;
        let mut affected = Vec::new();

        for (key, entry) in entries.iter_mut() {
            if !prefixes.iter().any(|p| key.matches_prefix(p)) {
                continue;
            }
            entry.invalidated = true;
            if entry.in_flight.take().is_some() {
                entry.generation += 1;
            }
            affected.push(key.clone());
        }

        for key in &affected {
            self.inner.emit(CacheEvent::Invalidated { key: key.clone() });
        }
        debug!(
            prefixes = ?prefixes,
            invalidated = affected.len(),
            "Invalidated query identities"
        );
        affected
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        let mut entries = self.inner.entries.lock().await;
        let count = entries.len();
        entries.clear();
        debug!(cleared = count, "Query cache cleared");
    }

    /// Subscribe to cache events. Slow receivers see `Lagged`.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.inner.events.subscribe()
    }

    pub async fn stats(&self) -> CacheStats {
        let entries = self.inner.entries.lock().await.len();
        CacheStats {
            hits: self.inner.hits.load(Ordering::Relaxed),
            misses: self.inner.misses.load(Ordering::Relaxed),
            dedups: self.inner.dedups.load(Ordering::Relaxed),
            remote_calls: self.inner.remote_calls.load(Ordering::Relaxed),
            evictions: self.inner.evictions.load(Ordering::Relaxed),
            entries,
        }
    }

    /// Spawn a fetch task for `key` and register it as the entry's
    /// in-flight call. Caller holds the entry lock.
    fn start(&self, key: &QueryKey, entry: &mut Entry) -> SharedFetch {
        entry.generation += 1;
        let generation = entry.generation;

        let inner = Arc::clone(&self.inner);
        let task_key = key.clone();
        let handle = tokio::spawn(async move { inner.run_fetch(task_key, generation).await });

        let shared = async move {
            match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(Error::Internal(format!("query task failed: {}", e))),
            }
        }
        .boxed()
        .shared();

        entry.in_flight = Some(shared.clone());
        self.inner.emit(CacheEvent::FetchStarted { key: key.clone() });
        shared
    }
}

impl CacheInner {
    fn emit(&self, event: CacheEvent) {
        trace!(
            cache_key = %event.key(),
            subscriber_count = self.events.receiver_count(),
            "Cache event"
        );
        let _ = self.events.send(event);
    }

    /// Drop entries that are idle past the gc interval. Caller holds the
    /// entry lock.
    fn evict_idle(&self, entries: &mut HashMap<QueryKey, Entry>, now: Instant) {
        let before = entries.len();
        entries.retain(|key, entry| {
            let idle = entry.is_idle(now, self.config.gc);
            if idle {
                trace!(cache_key = %key, "Evicting idle entry");
            }
            !idle
        });

        let evicted = before - entries.len();
        if evicted > 0 {
            self.evictions.fetch_add(evicted as u64, Ordering::Relaxed);
            debug!(evicted, remaining = entries.len(), "Evicted idle query entries");
        }
    }

    #[instrument(
        name = "query_fetch",
        skip(self, key),
        fields(
            subsystem = "cache",
            cache_key = %key,
            attempt = field::Empty,
            result_count = field::Empty,
            duration_ms = field::Empty,
            success = field::Empty,
        )
    )]
    async fn run_fetch(self: Arc<Self>, key: QueryKey, generation: u64) -> Result<QueryData> {
        let span = Span::current();
        let started = Instant::now();
        let mut attempt: u32 = 0;

        let outcome = loop {
            attempt += 1;
            span.record(logging::ATTEMPT, attempt);
            self.remote_calls.fetch_add(1, Ordering::Relaxed);

            let result = match self.gateway.query(key.method(), key.args()).await {
                Ok(value) => key.decode(value),
                Err(e) => Err(e),
            };

            match result {
                Ok(data) => break Ok(data),
                Err(e) if attempt <= self.config.retries => {
                    warn!(
                        cache_key = %key,
                        attempt,
                        error = %e,
                        "Query failed, retrying"
                    );
                    tokio::time::sleep(self.config.retry_delay).await;
                }
                Err(e) => break Err(e),
            }
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        span.record(logging::DURATION_MS, duration_ms);
        span.record(logging::SUCCESS, outcome.is_ok());
        if let Ok(data) = &outcome {
            span.record(logging::RESULT_COUNT, data.len() as u64);
        }
        match &outcome {
            Ok(data) => debug!(
                cache_key = %key,
                attempt,
                result_count = data.len(),
                duration_ms,
                "Query resolved"
            ),
            Err(e) => warn!(
                cache_key = %key,
                attempt,
                duration_ms,
                error = %e,
                "Query failed"
            ),
        }

        self.apply(&key, generation, &outcome).await;
        outcome
    }

    async fn apply(&self, key: &QueryKey, generation: u64, outcome: &Result<QueryData>) {
        let mut entries = self.entries.lock().await;
        let Some(entry) = entries.get_mut(key) else {
            debug!(cache_key = %key, "Entry cleared before query settled");
            return;
        };

        if entry.generation != generation {
            debug!(
                cache_key = %key,
                generation,
                current = entry.generation,
                "Discarding superseded query result"
            );
            return;
        }

        entry.outcome = Some(outcome.clone());
        entry.settled_at = Some(Instant::now());
        entry.invalidated = false;
        entry.in_flight = None;

        self.emit(match outcome {
            Ok(_) => CacheEvent::Updated { key: key.clone() },
            Err(e) => CacheEvent::Failed {
                key: key.clone(),
                error: e.clone(),
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archive_gateway::MockGateway;
    use serde_json::json;

    fn cache(gateway: &MockGateway) -> QueryCache {
        QueryCache::new(Arc::new(gateway.clone()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_result_served_from_cache() {
        let gw = MockGateway::new().with_response("count_images", json!(4));
        let cache = cache(&gw);

        assert_eq!(cache.fetch(&QueryKey::count()).await.unwrap(), QueryData::Count(4));
        tokio::time::advance(Duration::from_secs(29)).await;
        assert_eq!(cache.fetch(&QueryKey::count()).await.unwrap(), QueryData::Count(4));

        assert_eq!(gw.call_count("count_images"), 1);
        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_result_refetched_after_window() {
        let gw = MockGateway::new().with_response("count_images", json!(4));
        let cache = cache(&gw);

        cache.fetch(&QueryKey::count()).await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(cache.snapshot(&QueryKey::count()).await.is_stale);

        gw.set_response("count_images", json!(5));
        assert_eq!(cache.fetch(&QueryKey::count()).await.unwrap(), QueryData::Count(5));
        assert_eq!(gw.call_count("count_images"), 2);
    }

    #[tokio::test]
    async fn test_snapshot_of_unknown_identity_is_idle() {
        let cache = cache(&MockGateway::new());
        let snap = cache.snapshot(&QueryKey::recent(50)).await;
        assert_eq!(snap.status, QueryStatus::Idle);
        assert!(!snap.is_fetching);
        assert!(snap.data.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_status_while_in_flight() {
        let gw = MockGateway::new()
            .with_response("count_images", json!(1))
            .with_latency_ms(100);
        let cache = cache(&gw);

        let background = cache.clone();
        let task = tokio::spawn(async move { background.fetch(&QueryKey::count()).await });
        tokio::task::yield_now().await;

        let snap = cache.snapshot(&QueryKey::count()).await;
        assert_eq!(snap.status, QueryStatus::Loading);
        assert!(snap.is_fetching);

        task.await.unwrap().unwrap();
        let snap = cache.snapshot(&QueryKey::count()).await;
        assert_eq!(snap.status, QueryStatus::Success);
        assert!(!snap.is_fetching);
        assert!(snap.fetched_at.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_replaces_stale_data() {
        let gw = MockGateway::new().with_response("count_images", json!(2));
        let cache = cache(&gw);
        cache.fetch(&QueryKey::count()).await.unwrap();

        tokio::time::advance(Duration::from_secs(31)).await;
        gw.push_error("count_images", Error::Remote("down".into()));
        gw.push_error("count_images", Error::Remote("down".into()));

        assert!(cache.fetch(&QueryKey::count()).await.is_err());
        let snap = cache.snapshot(&QueryKey::count()).await;
        assert_eq!(snap.status, QueryStatus::Error);
        assert!(snap.data.is_none());
        assert_eq!(snap.error, Some(Error::Remote("down".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_held_until_invalidated() {
        let gw = MockGateway::new().with_error("count_images", Error::Request("offline".into()));
        let cache = cache(&gw);

        assert!(cache.fetch(&QueryKey::count()).await.is_err());
        assert_eq!(gw.call_count("count_images"), 2);

        // Errors do not age out with the freshness window.
        tokio::time::advance(Duration::from_secs(45)).await;
        gw.set_response("count_images", json!(9));
        assert!(cache.fetch(&QueryKey::count()).await.is_err());
        assert_eq!(gw.call_count("count_images"), 2);
        assert!(!cache.snapshot(&QueryKey::count()).await.is_stale);

        cache.invalidate(&["count_images"]).await;
        assert_eq!(cache.fetch(&QueryKey::count()).await.unwrap(), QueryData::Count(9));
        assert_eq!(gw.call_count("count_images"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetch_recovers_from_error() {
        let gw = MockGateway::new().with_error("count_images", Error::Request("offline".into()));
        let cache = cache(&gw);
        assert!(cache.fetch(&QueryKey::count()).await.is_err());

        gw.set_response("count_images", json!(1));
        assert_eq!(cache.refetch(&QueryKey::count()).await.unwrap(), QueryData::Count(1));
        assert_eq!(
            cache.snapshot(&QueryKey::count()).await.status,
            QueryStatus::Success
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_payload_is_an_error_state() {
        let gw = MockGateway::new().with_response("list_recent", json!({"oops": true}));
        let cache = cache(&gw);

        let err = cache.fetch(&QueryKey::recent(50)).await.unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        // Shape errors are retried like any remote failure.
        assert_eq!(gw.call_count("list_recent"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_matches_prefix_only() {
        let gw = MockGateway::new()
            .with_response("count_images", json!(1))
            .with_response("list_recent", json!([]))
            .with_response("filter_by_style_tag", json!([]));
        let cache = cache(&gw);

        cache.fetch(&QueryKey::count()).await.unwrap();
        cache.fetch(&QueryKey::recent(50)).await.unwrap();
        cache.fetch(&QueryKey::style_tag("x")).await.unwrap();

        let affected = cache.invalidate(&["list_recent", "count_images"]).await;
        assert_eq!(affected.len(), 2);

        cache.fetch(&QueryKey::count()).await.unwrap();
        cache.fetch(&QueryKey::recent(50)).await.unwrap();
        cache.fetch(&QueryKey::style_tag("x")).await.unwrap();

        assert_eq!(gw.call_count("count_images"), 2);
        assert_eq!(gw.call_count("list_recent"), 2);
        assert_eq!(gw.call_count("filter_by_style_tag"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_detaches_in_flight_call() {
        let gw = MockGateway::new()
            .with_response("count_images", json!(1))
            .with_latency_ms(100);
        let cache = cache(&gw);

        let background = cache.clone();
        let first = tokio::spawn(async move { background.fetch(&QueryKey::count()).await });
        tokio::task::yield_now().await;

        cache.invalidate(&["count_images"]).await;
        gw.set_response("count_images", json!(2));

        // The superseded call still answers its own waiter.
        assert_eq!(first.await.unwrap().unwrap(), QueryData::Count(1));

        // But its result is not applied, so the next read goes out again.
        assert_eq!(cache.fetch(&QueryKey::count()).await.unwrap(), QueryData::Count(2));
        assert_eq!(gw.call_count("count_images"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_published() {
        let gw = MockGateway::new().with_response("count_images", json!(1));
        let cache = cache(&gw);
        let mut rx = cache.subscribe();

        cache.fetch(&QueryKey::count()).await.unwrap();
        cache.invalidate(&["count_images"]).await;

        assert_eq!(
            rx.recv().await.unwrap(),
            CacheEvent::FetchStarted { key: QueryKey::count() }
        );
        assert_eq!(rx.recv().await.unwrap(), CacheEvent::Updated { key: QueryKey::count() });
        assert_eq!(
            rx.recv().await.unwrap(),
            CacheEvent::Invalidated { key: QueryKey::count() }
        );
    }

    #[tokio::test]
    async fn test_clear_drops_entries() {
        let gw = MockGateway::new().with_response("count_images", json!(1));
        let cache = cache(&gw);
        cache.fetch(&QueryKey::count()).await.unwrap();
        assert_eq!(cache.stats().await.entries, 1);

        cache.clear().await;
        assert_eq!(cache.stats().await.entries, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_search_identities_are_evicted() {
        let gw = MockGateway::new().with_response("search", json!([]));
        let cache = cache(&gw);

        for i in 0..1000 {
            let keyword = format!("kw{}", i);
            cache
                .fetch(&QueryKey::search(None, None, Some(&keyword)))
                .await
                .unwrap();
            tokio::time::advance(Duration::from_secs(60)).await;
        }

        // Only identities touched within the last gc interval survive.
        let stats = cache.stats().await;
        assert!(stats.entries <= 6, "entries = {}", stats.entries);
        assert!(stats.evictions >= 994);
    }

    #[tokio::test(start_paused = true)]
    async fn test_observed_and_in_flight_entries_survive_eviction() {
        let gw = MockGateway::new()
            .with_response("count_images", json!(1))
            .with_response("list_recent", json!([]))
            .with_latency_ms(400_000);
        let cache = cache(&gw);
        cache.fetch(&QueryKey::count()).await.unwrap();

        let background = cache.clone();
        let slow = tokio::spawn(async move { background.fetch(&QueryKey::recent(50)).await });
        tokio::task::yield_now().await;

        for _ in 0..6 {
            tokio::time::advance(Duration::from_secs(60)).await;
            cache.snapshot(&QueryKey::count()).await;
        }

        assert_eq!(cache.stats().await.evictions, 0);
        assert!(cache.snapshot(&QueryKey::recent(50)).await.is_fetching);
        slow.await.unwrap().unwrap();
        assert_eq!(gw.call_count("list_recent"), 1);
    }
}
