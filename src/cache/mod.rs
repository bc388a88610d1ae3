//! Query cache module
//!
//! Caches descriptor results by key, coalesces concurrent fetches of the
//! same key, tracks staleness, and chains cursor pages for infinite queries.
//!
//! # Overview
//!
//! The cache module provides:
//! - `QueryClient` - the injectable cache store
//! - `QueryClientConfig` - staleness threshold (default 5 minutes)
//! - `InfiniteQueryObserver` - keep-previous-data view over changing keys

mod client;
mod entry;
mod observer;

pub use client::{QueryClient, QueryClientConfig, QueryClientConfigBuilder, DEFAULT_STALE_TIME};
pub use entry::{CachedData, QueryState};
pub use observer::{InfiniteQueryObserver, InfiniteQueryResult};
