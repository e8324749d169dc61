//! The view-scoped application context.
//!
//! One [`AppContext`] backs one mounted view tree. It owns the backend
//! handle, a cache per entity list, the view state, the notifier and the
//! pending confirmation. Nothing here is process-global; two contexts never
//! share state.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{Mutex, RwLock};

use stockroom_client::{ApiError, InventoryApi, InventoryBackend, RetryPolicy};
use stockroom_core::member::Member;
use stockroom_core::office::Office;
use stockroom_core::product::Product;
use stockroom_core::profile::UserProfile;
use stockroom_core::relocation::RelocationContext;
use stockroom_core::shipment::Shipment;
use stockroom_core::table::{filter_rows, paginate, PageParams};
use stockroom_core::team::Team;
use stockroom_core::view::ViewState;

use crate::cache::{QueryCache, Resource, DEFAULT_STALE_TIME};
use crate::config::AppConfig;
use crate::error::AppResult;
use crate::notifications::Notifier;
use crate::pending::PendingAction;

pub struct AppContext {
    backend: Arc<dyn InventoryBackend>,
    profile: UserProfile,
    pub products: QueryCache<Product>,
    pub members: QueryCache<Member>,
    pub shipments: QueryCache<Shipment>,
    pub offices: QueryCache<Office>,
    pub teams: QueryCache<Team>,
    pub notifier: Notifier,
    pub(crate) view: RwLock<ViewState>,
    pub(crate) pending: Mutex<Option<PendingAction>>,
}

/// Owned data a [`RelocationContext`] borrows from.
pub struct Directory {
    pub members: Vec<Member>,
    pub offices: Vec<Office>,
    pub profile: UserProfile,
}

impl Directory {
    pub fn relocation_context(&self) -> RelocationContext<'_> {
        RelocationContext {
            members: &self.members,
            offices: &self.offices,
            profile: &self.profile,
        }
    }
}

/// One rendered page of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total: usize,
    pub total_pages: usize,
    pub expanded_id: Option<String>,
}

impl AppContext {
    pub fn new(backend: Arc<dyn InventoryBackend>, profile: UserProfile, stale_time: Duration) -> Self {
        Self {
            backend,
            profile,
            products: QueryCache::new(Resource::Products, stale_time),
            members: QueryCache::new(Resource::Members, stale_time),
            shipments: QueryCache::new(Resource::Shipments, stale_time),
            offices: QueryCache::new(Resource::Offices, stale_time),
            teams: QueryCache::new(Resource::Teams, stale_time),
            notifier: Notifier::default(),
            view: RwLock::new(ViewState::default()),
            pending: Mutex::new(None),
        }
    }

    pub fn with_default_stale_time(backend: Arc<dyn InventoryBackend>, profile: UserProfile) -> Self {
        Self::new(backend, profile, DEFAULT_STALE_TIME)
    }

    /// Build a context talking to the HTTP backend described by `config`.
    pub fn from_config(config: &AppConfig, profile: UserProfile) -> AppResult<Self> {
        let api = InventoryApi::new(config.api_url.clone(), config.request_timeout())?
            .with_token(config.api_token.clone())
            .with_bulk_retry(RetryPolicy::default().with_max_attempts(config.bulk_create_max_attempts));
        tracing::info!(api_url = %config.api_url, "Created inventory client");
        Ok(Self::new(Arc::new(api), profile, config.stale_time()))
    }

    pub fn backend(&self) -> &dyn InventoryBackend {
        self.backend.as_ref()
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    // ---- reads ----

    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.products
            .get_or_fetch(|| self.backend.list_products())
            .await
    }

    pub async fn members(&self) -> Result<Vec<Member>, ApiError> {
        self.members.get_or_fetch(|| self.backend.list_members()).await
    }

    pub async fn shipments(&self) -> Result<Vec<Shipment>, ApiError> {
        self.shipments
            .get_or_fetch(|| self.backend.list_shipments())
            .await
    }

    pub async fn offices(&self) -> Result<Vec<Office>, ApiError> {
        self.offices.get_or_fetch(|| self.backend.list_offices()).await
    }

    pub async fn teams(&self) -> Result<Vec<Team>, ApiError> {
        self.teams.get_or_fetch(|| self.backend.list_teams()).await
    }

    /// Warm the member list, e.g. on hovering the members tab.
    pub async fn prefetch_members(&self) -> bool {
        self.members.prefetch(|| self.backend.list_members()).await
    }

    pub async fn prefetch_products(&self) -> bool {
        self.products.prefetch(|| self.backend.list_products()).await
    }

    /// One product: the cached record when present, otherwise the detail
    /// endpoint. Detail fetches do not touch the list cache.
    pub async fn product(&self, id: &str) -> Result<Product, ApiError> {
        match self.products.get(id).await {
            Some(product) => Ok(product),
            None => self.backend.get_product(id).await,
        }
    }

    pub async fn member(&self, id: &str) -> Result<Member, ApiError> {
        match self.members.get(id).await {
            Some(member) => Ok(member),
            None => self.backend.get_member(id).await,
        }
    }

    pub async fn shipment(&self, id: &str) -> Result<Shipment, ApiError> {
        match self.shipments.get(id).await {
            Some(shipment) => Ok(shipment),
            None => self.backend.get_shipment(id).await,
        }
    }

    /// Members, offices and the profile, as the relocation resolver needs.
    pub async fn directory(&self) -> Result<Directory, ApiError> {
        Ok(Directory {
            members: self.members().await?,
            offices: self.offices().await?,
            profile: self.profile.clone(),
        })
    }

    // ---- invalidation ----

    pub async fn invalidate(&self, resource: Resource) {
        match resource {
            Resource::Products => self.products.invalidate().await,
            Resource::Members => self.members.invalidate().await,
            Resource::Shipments => self.shipments.invalidate().await,
            Resource::Offices => self.offices.invalidate().await,
            Resource::Teams => self.teams.invalidate().await,
        }
    }

    /// Fetch a list again regardless of freshness.
    pub async fn refetch(&self, resource: Resource) -> Result<(), ApiError> {
        match resource {
            Resource::Products => {
                self.products.refetch(|| self.backend.list_products()).await?;
            }
            Resource::Members => {
                self.members.refetch(|| self.backend.list_members()).await?;
            }
            Resource::Shipments => {
                self.shipments.refetch(|| self.backend.list_shipments()).await?;
            }
            Resource::Offices => {
                self.offices.refetch(|| self.backend.list_offices()).await?;
            }
            Resource::Teams => {
                self.teams.refetch(|| self.backend.list_teams()).await?;
            }
        }
        Ok(())
    }

    /// Invalidate `resource` and everything derived from it, then refetch
    /// them. A failed refetch leaves that list stale for the next read.
    pub async fn invalidate_related(&self, resource: Resource) {
        let mut targets = vec![resource];
        targets.extend_from_slice(resource.related());

        for target in &targets {
            self.invalidate(*target).await;
        }
        let results = join_all(targets.iter().map(|t| self.refetch(*t))).await;
        for (target, result) in targets.iter().zip(results) {
            if let Err(e) = result {
                tracing::warn!(
                    resource = target.as_str(),
                    error = %e,
                    "Refetch after mutation failed",
                );
            }
        }
    }

    // ---- view state ----

    pub async fn view_state(&self) -> ViewState {
        self.view.read().await.clone()
    }

    pub async fn update_view<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R {
        f(&mut *self.view.write().await)
    }

    /// The product table as currently filtered and paged by the view.
    pub async fn product_table(&self) -> Result<TablePage<Product>, ApiError> {
        let products = self.products().await?;
        let view = self.view.read().await;
        let rows = filter_rows(&products, view.product_filters());
        let page = paginate(&rows, view.product_page());
        Ok(TablePage {
            items: page.items.into_iter().cloned().collect(),
            page: page.page,
            size: page.size,
            total: page.total,
            total_pages: page.total_pages,
            expanded_id: page.expanded_id,
        })
    }

    /// The shipments table for a URL query, expanding a deep-linked row.
    pub async fn shipments_table(&self, query: &str) -> Result<TablePage<Shipment>, ApiError> {
        let shipments = self.shipments().await?;
        let params: PageParams = self.update_view(|v| v.open_shipments_url(query)).await;
        let rows = filter_rows(&shipments, &[]);
        let page = paginate(&rows, &params);
        Ok(TablePage {
            items: page.items.into_iter().cloned().collect(),
            page: page.page,
            size: page.size,
            total: page.total,
            total_pages: page.total_pages,
            expanded_id: page.expanded_id,
        })
    }
}
