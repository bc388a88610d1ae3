//! Query cache engine
//!
//! `QueryClient` is an explicitly constructed store. Clones share the same
//! cache. For each key it guarantees at most one outstanding fetch: callers
//! that arrive while a fetch is running await that fetch instead of issuing
//! their own.

use super::entry::{CachedData, Entry, QueryState};
use crate::error::{Error, Result};
use crate::pagination::InfiniteData;
use crate::query::{InfiniteQueryDescriptor, QueryDescriptor, QueryKey};
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Default staleness threshold: 5 minutes
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(5 * 60);

/// Configuration for the query client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryClientConfig {
    /// Age after which cached data is refetched on next access
    pub stale_time: Duration,
}

impl Default for QueryClientConfig {
    fn default() -> Self {
        Self {
            stale_time: DEFAULT_STALE_TIME,
        }
    }
}

impl QueryClientConfig {
    /// Create a new config builder
    pub fn builder() -> QueryClientConfigBuilder {
        QueryClientConfigBuilder::default()
    }
}

/// Builder for query client config
#[derive(Default)]
pub struct QueryClientConfigBuilder {
    config: QueryClientConfig,
}

impl QueryClientConfigBuilder {
    /// Set the staleness threshold (zero means always stale)
    pub fn stale_time(mut self, stale_time: Duration) -> Self {
        self.config.stale_time = stale_time;
        self
    }

    /// Build the config
    pub fn build(self) -> QueryClientConfig {
        self.config
    }
}

type FetchOutput = std::result::Result<CachedData, Arc<Error>>;
type InFlight = Shared<BoxFuture<'static, FetchOutput>>;

/// What a coalesced fetch produced
enum Outcome {
    /// New data to store
    Fetched(CachedData),
    /// Existing pages plus one more. Keeps the entry's staleness if it was
    /// already stale, so older pages are still refetched later.
    Appended(CachedData),
    /// Nothing was fetched; the cache stays as is
    Unchanged(CachedData),
}

struct Inner {
    config: QueryClientConfig,
    entries: RwLock<HashMap<QueryKey, Entry>>,
    in_flight: Mutex<HashMap<QueryKey, InFlight>>,
}

impl Inner {
    async fn cached(&self, key: &QueryKey) -> Option<CachedData> {
        self.entries.read().await.get(key).map(|e| e.data.clone())
    }
}

/// Process-wide query cache
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

impl QueryClient {
    /// Create an empty cache
    pub fn new(config: QueryClientConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                entries: RwLock::new(HashMap::new()),
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// The client configuration
    pub fn config(&self) -> &QueryClientConfig {
        &self.inner.config
    }

    // ========================================================================
    // Plain queries
    // ========================================================================

    /// Return fresh cached data, or fetch it.
    pub async fn fetch_query(&self, descriptor: &QueryDescriptor) -> Result<Arc<Value>> {
        let key = descriptor.key();
        if let Some(data) = self.fresh(key).await {
            debug!(%key, "cache hit");
            return single(key, data);
        }

        let descriptor = descriptor.clone();
        let data = self
            .coalesce(key, move |_| load_single(descriptor).boxed())
            .await?;
        single(key, data)
    }

    /// Cached data for a plain query, fresh or not
    pub async fn get_query_data(&self, key: &QueryKey) -> Option<Arc<Value>> {
        self.inner.cached(key).await?.into_single()
    }

    /// Store data for a key as if it had just been fetched
    pub async fn set_query_data(&self, key: QueryKey, value: Value) {
        self.inner
            .entries
            .write()
            .await
            .insert(key, Entry::new(CachedData::Single(Arc::new(value))));
    }

    // ========================================================================
    // Infinite queries
    // ========================================================================

    /// Return fresh pages, or fetch them.
    ///
    /// With nothing cached the first page is fetched. Stale pages are
    /// refetched from the first page, following cursors, up to the number of
    /// pages previously loaded.
    pub async fn fetch_infinite_query(
        &self,
        descriptor: &InfiniteQueryDescriptor,
    ) -> Result<Arc<InfiniteData>> {
        let key = descriptor.key();
        if let Some(data) = self.fresh(key).await {
            debug!(%key, "cache hit");
            return infinite(key, data);
        }

        let descriptor = descriptor.clone();
        let data = self
            .coalesce(key, move |inner| load_pages(inner, descriptor).boxed())
            .await?;
        infinite(key, data)
    }

    /// Append the page after the last cached one.
    ///
    /// Loads the first page when nothing is cached. Once the last page has no
    /// cursor this returns the cached pages without fetching.
    pub async fn fetch_next_page(
        &self,
        descriptor: &InfiniteQueryDescriptor,
    ) -> Result<Arc<InfiniteData>> {
        let key = descriptor.key();
        let Some(current) = self.get_infinite_query_data(key).await else {
            return self.fetch_infinite_query(descriptor).await;
        };
        if !current.has_next_page() {
            debug!(%key, "no next page");
            return Ok(current);
        }

        let descriptor = descriptor.clone();
        let data = self
            .coalesce(key, move |inner| append_page(inner, descriptor, current).boxed())
            .await?;
        infinite(key, data)
    }

    /// Cached pages for an infinite query, fresh or not
    pub async fn get_infinite_query_data(&self, key: &QueryKey) -> Option<Arc<InfiniteData>> {
        self.inner.cached(key).await?.into_infinite()
    }

    // ========================================================================
    // Cache management
    // ========================================================================

    /// Mark every entry whose key starts with `prefix` as stale.
    ///
    /// Returns the number of entries marked.
    pub async fn invalidate_queries(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.inner.entries.write().await;
        let mut count = 0;
        for (key, entry) in entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.invalidate();
                count += 1;
            }
        }
        debug!(%prefix, count, "invalidated queries");
        count
    }

    /// Drop every entry whose key starts with `prefix`
    pub async fn remove_queries(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.inner.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        before - entries.len()
    }

    /// Drop every entry
    pub async fn clear(&self) {
        self.inner.entries.write().await.clear();
    }

    /// Freshness of a cached key
    pub async fn get_query_state(&self, key: &QueryKey) -> Option<QueryState> {
        let stale_time = self.inner.config.stale_time;
        self.inner
            .entries
            .read()
            .await
            .get(key)
            .map(|e| e.state(stale_time))
    }

    /// Whether a fetch for `key` is outstanding
    pub async fn is_fetching(&self, key: &QueryKey) -> bool {
        self.inner.in_flight.lock().await.contains_key(key)
    }

    /// Number of cached keys
    pub async fn len(&self) -> usize {
        self.inner.entries.read().await.len()
    }

    /// Whether nothing is cached
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn fresh(&self, key: &QueryKey) -> Option<CachedData> {
        let entries = self.inner.entries.read().await;
        entries
            .get(key)
            .filter(|e| !e.is_stale(self.inner.config.stale_time))
            .map(|e| e.data.clone())
    }

    /// Run `fetch` for `key` unless a fetch for it is already running, in
    /// which case await that one. Successful fetches are stored before any
    /// waiter resumes.
    ///
    /// The fetch runs on its own task, so it completes and populates the
    /// cache even when every caller stops waiting.
    async fn coalesce<F>(&self, key: &QueryKey, fetch: F) -> Result<CachedData>
    where
        F: FnOnce(Arc<Inner>) -> BoxFuture<'static, Result<Outcome>>,
    {
        let shared = {
            let mut in_flight = self.inner.in_flight.lock().await;
            if let Some(running) = in_flight.get(key) {
                debug!(%key, "joining in-flight fetch");
                running.clone()
            } else {
                debug!(%key, "cache miss, fetching");
                let inner = Arc::clone(&self.inner);
                let task = fetch(Arc::clone(&inner));
                let owned_key = key.clone();
                let handle = tokio::spawn(async move {
                    let output = match task.await {
                        Ok(Outcome::Fetched(data)) => {
                            inner
                                .entries
                                .write()
                                .await
                                .insert(owned_key.clone(), Entry::new(data.clone()));
                            Ok(data)
                        }
                        Ok(Outcome::Appended(data)) => {
                            let stale_time = inner.config.stale_time;
                            let mut entries = inner.entries.write().await;
                            let entry = match entries.get(&owned_key) {
                                Some(previous) if previous.is_stale(stale_time) => {
                                    previous.replaced(data.clone())
                                }
                                _ => Entry::new(data.clone()),
                            };
                            entries.insert(owned_key.clone(), entry);
                            Ok(data)
                        }
                        Ok(Outcome::Unchanged(data)) => Ok(data),
                        Err(e) => {
                            debug!(key = %owned_key, error = %e, "fetch failed");
                            Err(Arc::new(e))
                        }
                    };
                    inner.in_flight.lock().await.remove(&owned_key);
                    output
                });
                let shared = async move {
                    match handle.await {
                        Ok(output) => output,
                        Err(e) => Err(Arc::new(Error::from(e))),
                    }
                }
                .boxed()
                .shared();
                in_flight.insert(key.clone(), shared.clone());
                shared
            }
        };

        shared.await.map_err(Error::from_shared)
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(QueryClientConfig::default())
    }
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

async fn load_single(descriptor: QueryDescriptor) -> Result<Outcome> {
    let value = descriptor.fetch().await?;
    Ok(Outcome::Fetched(CachedData::Single(Arc::new(value))))
}

/// Fetch from the first page, following cursors up to the number of pages
/// cached before.
async fn load_pages(inner: Arc<Inner>, descriptor: InfiniteQueryDescriptor) -> Result<Outcome> {
    let key = descriptor.key();
    let previous_pages = inner
        .cached(key)
        .await
        .and_then(CachedData::into_infinite)
        .map_or(1, |d| d.page_count().max(1));

    let param = descriptor.initial_page_param().clone();
    let first = descriptor.fetch_page(param.clone()).await?;
    let mut data = InfiniteData::first(first, param);

    while data.page_count() < previous_pages {
        let next = data
            .pages
            .last()
            .and_then(|last| descriptor.get_next_page_param(last).into_param());
        let Some(param) = next else { break };
        let page = descriptor.fetch_page(param.clone()).await?;
        data.push(page, param);
    }

    debug!(%key, pages = data.page_count(), "fetched infinite query");
    Ok(Outcome::Fetched(CachedData::Infinite(Arc::new(data))))
}

async fn append_page(
    inner: Arc<Inner>,
    descriptor: InfiniteQueryDescriptor,
    seen: Arc<InfiniteData>,
) -> Result<Outcome> {
    let key = descriptor.key();
    // Another append may have landed since the caller looked.
    let current = inner
        .cached(key)
        .await
        .and_then(CachedData::into_infinite)
        .unwrap_or(seen);
    let next = current
        .pages
        .last()
        .and_then(|last| descriptor.get_next_page_param(last).into_param());
    let Some(param) = next else {
        return Ok(Outcome::Unchanged(CachedData::Infinite(current)));
    };

    let page = descriptor.fetch_page(param.clone()).await?;
    let mut data = (*current).clone();
    data.push(page, param);

    debug!(%key, pages = data.page_count(), "fetched next page");
    Ok(Outcome::Appended(CachedData::Infinite(Arc::new(data))))
}

fn single(key: &QueryKey, data: CachedData) -> Result<Arc<Value>> {
    data.into_single()
        .ok_or_else(|| Error::decode(format!("{key} holds paginated data")))
}

fn infinite(key: &QueryKey, data: CachedData) -> Result<Arc<InfiniteData>> {
    data.into_infinite()
        .ok_or_else(|| Error::decode(format!("{key} holds non-paginated data")))
}
