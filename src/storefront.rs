//! Storefront facade
//!
//! Binds one transport, the api base path and the configured page sizes
//! into the named queries the storefront pages use.

use crate::cache::QueryClient;
use crate::checkout::{self, CheckoutItem};
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::http::{HttpClient, SharedTransport};
use crate::query::{
    InfiniteQueryDescriptor, Placeholder, ProductFilters, QueryBuilder, QueryDescriptor, QueryKey,
};
use crate::types::Entity;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Named storefront queries plus the cache they run through
#[derive(Debug, Clone)]
pub struct Storefront {
    queries: QueryBuilder,
    client: QueryClient,
    product_page_size: u32,
    post_page_size: u32,
}

impl Storefront {
    /// Build over an existing transport and cache
    pub fn new(transport: SharedTransport, client: QueryClient, config: &StorefrontConfig) -> Self {
        Self {
            queries: QueryBuilder::new(transport, config.api_path.clone()),
            client,
            product_page_size: config.product_page_size,
            post_page_size: config.post_page_size,
        }
    }

    /// Build an HTTP transport and a fresh cache from configuration
    pub fn from_config(config: &StorefrontConfig) -> Result<Self> {
        config.validate()?;
        let transport: SharedTransport = Arc::new(HttpClient::with_config(config.http_config())?);
        let client = QueryClient::new(config.query_client_config());
        info!(base_url = %config.base_url, api_path = %config.api_path, "storefront client ready");
        Ok(Self::new(transport, client, config))
    }

    /// The cache every query runs through
    pub fn client(&self) -> &QueryClient {
        &self.client
    }

    /// The underlying descriptor builder
    pub fn queries(&self) -> &QueryBuilder {
        &self.queries
    }

    pub fn product_page_size(&self) -> u32 {
        self.product_page_size
    }

    pub fn post_page_size(&self) -> u32 {
        self.post_page_size
    }

    // ========================================================================
    // Named queries
    // ========================================================================

    /// Product list with a passthrough query string
    pub fn product_query(&self, filter_query: Option<&str>) -> QueryDescriptor {
        self.queries.list(Entity::Products, filter_query)
    }

    /// Post list with a passthrough query string
    pub fn post_query(&self, filter_query: Option<&str>) -> QueryDescriptor {
        self.queries.list(Entity::Posts, filter_query)
    }

    /// Cursor-paginated posts
    pub fn post_infinite_query(&self) -> InfiniteQueryDescriptor {
        self.queries
            .infinite_list(Entity::Posts, self.post_page_size, &ProductFilters::none())
    }

    pub fn one_post_query(&self, id: i64) -> QueryDescriptor {
        self.queries.detail(Entity::Posts, id)
    }

    /// Categories and product types offered as filters
    pub fn category_type_query(&self) -> QueryDescriptor {
        self.queries.category_types()
    }

    /// Cursor-paginated products narrowed by facets.
    ///
    /// Keeps the previous facets' pages visible while new ones load.
    pub fn product_infinite_query(&self, filters: &ProductFilters) -> InfiniteQueryDescriptor {
        self.queries
            .infinite_list(Entity::Products, self.product_page_size, filters)
            .with_placeholder(Placeholder::KeepPrevious)
    }

    pub fn one_product_query(&self, id: i64) -> QueryDescriptor {
        self.queries.detail(Entity::Products, id)
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Create a checkout session for the cart.
    ///
    /// On success every cached product query is marked stale.
    pub async fn create_checkout_session(&self, items: &[CheckoutItem]) -> Result<Value> {
        let session = checkout::create_checkout_session(
            self.queries.transport().as_ref(),
            self.queries.base_path(),
            items,
        )
        .await?;

        let invalidated = self
            .client
            .invalidate_queries(&QueryKey::new(Entity::Products.name()))
            .await;
        debug!(invalidated, "product queries invalidated after checkout");
        Ok(session)
    }
}
