//! Transport seam between query fetchers and the network

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Performs requests against the storefront api.
///
/// Paths are relative to the api root and may carry a query string.
/// Successful responses decode to `Some(body)`, or `None` when the
/// server answered 2xx with an empty body. Non-2xx statuses and network
/// failures are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET a path
    async fn get(&self, path: &str) -> Result<Option<Value>>;

    /// POST a JSON body to a path
    async fn post(&self, path: &str, body: Value) -> Result<Option<Value>>;
}

/// Shared handle to a transport, captured by every fetcher
pub type SharedTransport = Arc<dyn Transport>;
