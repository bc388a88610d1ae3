// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # storefront-query
//!
//! Cursor-paginated query cache for a storefront REST backend.
//!
//! ## Features
//!
//! - **Query Keys**: ordered key parts decide which requests share a cache entry
//! - **Request Coalescing**: concurrent fetches of one key share a single request
//! - **Staleness**: cached data is reused for `stale_time`, then refetched
//! - **Cursor Pagination**: infinite queries chain pages by `nextCursor`
//! - **Checkout**: pass-through session creation with product invalidation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use storefront_query::{ProductFilters, Storefront, StorefrontConfig};
//!
//! #[tokio::main]
//! async fn main() -> storefront_query::Result<()> {
//!     let store = Storefront::from_config(&StorefrontConfig::default())?;
//!
//!     let books = store.product_infinite_query(&ProductFilters::none().category("books"));
//!     let first = store.client().fetch_infinite_query(&books).await?;
//!     if first.has_next_page() {
//!         store.client().fetch_next_page(&books).await?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        Storefront                          │
//! │  product_infinite_query()  one_post_query()  checkout()    │
//! └────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────────┬──────────────┴───────────┬─────────────────┐
//! │    Query     │         Cache            │      HTTP       │
//! ├──────────────┼──────────────────────────┼─────────────────┤
//! │ Keys         │ Coalescing               │ GET/POST        │
//! │ Descriptors  │ Staleness                │ Retry (opt-in)  │
//! │ Filters      │ Infinite pages           │ Rate Limit      │
//! │              │ Invalidation             │                 │
//! └──────────────┴──────────────────────────┴─────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP transport with optional retry and rate limiting
pub mod http;

/// Cursor pages and infinite query state
pub mod pagination;

/// Query keys, filters and descriptor builders
pub mod query;

/// Query cache with coalescing and staleness
pub mod cache;

/// Checkout session creation
pub mod checkout;

/// Client configuration
pub mod config;

/// Named storefront queries
pub mod storefront;

/// Command-line interface
pub mod cli;

#[cfg(test)]
mod test_support;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use cache::{InfiniteQueryObserver, QueryClient, QueryClientConfig};
pub use checkout::CheckoutItem;
pub use config::StorefrontConfig;
pub use pagination::{Cursor, InfiniteData, Page, PageParam};
pub use query::{ProductFilters, QueryKey};
pub use storefront::Storefront;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
