//! Read caches with a staleness window.
//!
//! Each [`QueryCache`] holds one entity list behind a `tokio::sync::RwLock`.
//! A list younger than the stale window is served from memory; an older or
//! invalidated list is fetched again on the next read. Optimistic commands
//! are applied to the cached list and can be rolled back by receipt.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use stockroom_client::ApiError;
use stockroom_core::store::{Applied, Command, Entity, EntityStore};
use stockroom_core::CoreError;

/// Default stale window for fetched lists.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(300);

/// The cached collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Products,
    Members,
    Shipments,
    Offices,
    Teams,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Members => "members",
            Self::Shipments => "shipments",
            Self::Offices => "offices",
            Self::Teams => "teams",
        }
    }

    /// Collections that embed or derive from this one and must be
    /// refetched after it changes.
    pub fn related(&self) -> &'static [Resource] {
        match self {
            Self::Products => &[Resource::Members, Resource::Shipments],
            Self::Members => &[Resource::Products],
            Self::Shipments => &[Resource::Products, Resource::Members],
            Self::Offices => &[],
            Self::Teams => &[Resource::Members],
        }
    }
}

struct CacheState<T> {
    store: EntityStore<T>,
    fetched_at: Option<Instant>,
    invalidated: bool,
}

pub struct QueryCache<T> {
    resource: Resource,
    stale_time: Duration,
    state: RwLock<CacheState<T>>,
    prefetching: AtomicBool,
}

impl<T: Entity> QueryCache<T> {
    pub fn new(resource: Resource, stale_time: Duration) -> Self {
        Self {
            resource,
            stale_time,
            state: RwLock::new(CacheState {
                store: EntityStore::default(),
                fetched_at: None,
                invalidated: false,
            }),
            prefetching: AtomicBool::new(false),
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// `true` if a list was fetched within the stale window and has not
    /// been invalidated since.
    pub async fn is_fresh(&self) -> bool {
        let state = self.state.read().await;
        !state.invalidated
            && state
                .fetched_at
                .is_some_and(|at| at.elapsed() < self.stale_time)
    }

    /// Current contents, fresh or not.
    pub async fn snapshot(&self) -> Vec<T> {
        self.state.read().await.store.items().to_vec()
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.state.read().await.store.get(id).cloned()
    }

    /// Serve the cached list if fresh, otherwise fetch and store it.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<Vec<T>, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, ApiError>>,
    {
        if self.is_fresh().await {
            tracing::trace!(resource = self.resource.as_str(), "Cache hit");
            return Ok(self.snapshot().await);
        }
        tracing::debug!(resource = self.resource.as_str(), "Cache stale, fetching");
        self.refetch(fetch).await
    }

    /// Fetch unconditionally and replace the cached list.
    pub async fn refetch<F, Fut>(&self, fetch: F) -> Result<Vec<T>, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, ApiError>>,
    {
        let items = fetch().await?;
        self.replace(items.clone()).await;
        Ok(items)
    }

    /// Warm the cache without blocking on the result.
    ///
    /// Concurrent prefetches collapse into one: a call made while another
    /// is running returns `false` without fetching. Failures are logged and
    /// ignored.
    pub async fn prefetch<F, Fut>(&self, fetch: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, ApiError>>,
    {
        if self
            .prefetching
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(resource = self.resource.as_str(), "Prefetch already running, skipping");
            return false;
        }

        if !self.is_fresh().await {
            if let Err(e) = self.refetch(fetch).await {
                tracing::warn!(
                    resource = self.resource.as_str(),
                    error = %e,
                    "Prefetch failed",
                );
            }
        }

        self.prefetching.store(false, Ordering::Release);
        true
    }

    pub fn is_prefetching(&self) -> bool {
        self.prefetching.load(Ordering::Acquire)
    }

    /// Mark the list stale so the next read refetches it.
    pub async fn invalidate(&self) {
        tracing::debug!(resource = self.resource.as_str(), "Invalidating cache");
        self.state.write().await.invalidated = true;
    }

    pub async fn replace(&self, items: Vec<T>) {
        let mut state = self.state.write().await;
        state.store.replace_all(items);
        state.fetched_at = Some(Instant::now());
        state.invalidated = false;
    }

    /// Apply an optimistic command.
    pub async fn apply(&self, command: Command<T>) -> Result<Applied<T>, CoreError> {
        self.state.write().await.store.apply(command)
    }

    pub async fn rollback(&self, applied: Applied<T>) {
        tracing::debug!(
            resource = self.resource.as_str(),
            entity_id = %applied.entity_id,
            kind = applied.kind.as_str(),
            "Rolling back optimistic change",
        );
        self.state.write().await.store.rollback(applied);
    }

    /// Run `f` against the store under the write lock.
    pub async fn with_store<R>(&self, f: impl FnOnce(&mut EntityStore<T>) -> R) -> R {
        f(&mut self.state.write().await.store)
    }
}
