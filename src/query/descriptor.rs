//! Query descriptors
//!
//! A descriptor pairs a [`QueryKey`] with a deferred fetcher. Building one
//! performs no I/O; the cache engine decides when to invoke the fetcher.

use super::key::QueryKey;
use crate::error::Result;
use crate::pagination::{next_page_param, NextPage, Page, PageParam};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Deferred fetch of a single value
pub type QueryFn = Arc<dyn Fn() -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// Deferred fetch of one page, given the continuation of the previous one
pub type PageFn = Arc<dyn Fn(PageParam) -> BoxFuture<'static, Result<Page>> + Send + Sync>;

/// What to show while a query whose key changed is loading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placeholder {
    /// Nothing until the new key has data
    #[default]
    None,
    /// Keep the previous key's data visible
    KeepPrevious,
}

/// A plain (non-paginated) query
#[derive(Clone)]
pub struct QueryDescriptor {
    key: QueryKey,
    fetcher: QueryFn,
}

impl QueryDescriptor {
    /// Create a descriptor from a key and a fetch function
    pub fn new<F, Fut>(key: QueryKey, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self {
            key,
            fetcher: Arc::new(move || fetch().boxed()),
        }
    }

    /// The cache key
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Invoke the fetcher
    pub fn fetch(&self) -> BoxFuture<'static, Result<Value>> {
        (self.fetcher)()
    }
}

impl fmt::Debug for QueryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryDescriptor")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// A cursor-paginated query
#[derive(Clone)]
pub struct InfiniteQueryDescriptor {
    key: QueryKey,
    fetcher: PageFn,
    initial_page_param: PageParam,
    placeholder: Placeholder,
}

impl InfiniteQueryDescriptor {
    /// Create a descriptor from a key and a page fetch function
    pub fn new<F, Fut>(key: QueryKey, fetch: F) -> Self
    where
        F: Fn(PageParam) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Page>> + Send + 'static,
    {
        Self {
            key,
            fetcher: Arc::new(move |param| fetch(param).boxed()),
            initial_page_param: PageParam::Initial,
            placeholder: Placeholder::None,
        }
    }

    /// Set the placeholder behavior
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// The cache key
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Parameter for the first page
    pub fn initial_page_param(&self) -> &PageParam {
        &self.initial_page_param
    }

    /// Placeholder behavior
    pub fn placeholder(&self) -> Placeholder {
        self.placeholder
    }

    /// Next-page rule applied to the last fetched page
    pub fn get_next_page_param(&self, last_page: &Page) -> NextPage {
        next_page_param(last_page)
    }

    /// Invoke the fetcher for one page
    pub fn fetch_page(&self, param: PageParam) -> BoxFuture<'static, Result<Page>> {
        (self.fetcher)(param)
    }
}

impl fmt::Debug for InfiniteQueryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfiniteQueryDescriptor")
            .field("key", &self.key)
            .field("initial_page_param", &self.initial_page_param)
            .field("placeholder", &self.placeholder)
            .finish_non_exhaustive()
    }
}
