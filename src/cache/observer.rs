//! Keep-previous-data observation of an infinite query

use super::client::QueryClient;
use crate::error::Result;
use crate::pagination::InfiniteData;
use crate::query::{InfiniteQueryDescriptor, Placeholder};
use std::sync::Arc;

/// What a consumer of an infinite query sees right now
#[derive(Debug, Clone, Default)]
pub struct InfiniteQueryResult {
    /// Pages to display, if any
    pub data: Option<Arc<InfiniteData>>,
    /// The pages belong to a previous key and are shown while the current one loads
    pub is_placeholder: bool,
    /// Whether `fetch_next_page` would fetch anything
    pub has_next_page: bool,
}

impl InfiniteQueryResult {
    fn current(data: Arc<InfiniteData>) -> Self {
        Self {
            has_next_page: data.has_next_page(),
            data: Some(data),
            is_placeholder: false,
        }
    }
}

/// Follows one infinite query whose descriptor may change over time,
/// e.g. a product list whose facets the user edits.
#[derive(Debug)]
pub struct InfiniteQueryObserver {
    client: QueryClient,
    descriptor: InfiniteQueryDescriptor,
    last_data: Option<Arc<InfiniteData>>,
}

impl InfiniteQueryObserver {
    /// Observe `descriptor` through `client`
    pub fn new(client: QueryClient, descriptor: InfiniteQueryDescriptor) -> Self {
        Self {
            client,
            descriptor,
            last_data: None,
        }
    }

    /// The descriptor currently observed
    pub fn descriptor(&self) -> &InfiniteQueryDescriptor {
        &self.descriptor
    }

    /// Switch to another descriptor. Data seen so far is kept as a
    /// placeholder candidate.
    pub fn set_descriptor(&mut self, descriptor: InfiniteQueryDescriptor) {
        self.descriptor = descriptor;
    }

    /// Current view without fetching.
    ///
    /// Cached pages of the current key win. Otherwise, with
    /// [`Placeholder::KeepPrevious`], the last pages seen under any key are
    /// returned flagged as placeholder.
    pub async fn current(&mut self) -> InfiniteQueryResult {
        if let Some(data) = self
            .client
            .get_infinite_query_data(self.descriptor.key())
            .await
        {
            self.last_data = Some(Arc::clone(&data));
            return InfiniteQueryResult::current(data);
        }

        match (&self.last_data, self.descriptor.placeholder()) {
            (Some(previous), Placeholder::KeepPrevious) => InfiniteQueryResult {
                data: Some(Arc::clone(previous)),
                is_placeholder: true,
                has_next_page: false,
            },
            _ => InfiniteQueryResult::default(),
        }
    }

    /// Fetch (or reuse fresh) pages of the current key
    pub async fn fetch(&mut self) -> Result<InfiniteQueryResult> {
        let data = self.client.fetch_infinite_query(&self.descriptor).await?;
        self.last_data = Some(Arc::clone(&data));
        Ok(InfiniteQueryResult::current(data))
    }

    /// Append the next page of the current key
    pub async fn fetch_next_page(&mut self) -> Result<InfiniteQueryResult> {
        let data = self.client.fetch_next_page(&self.descriptor).await?;
        self.last_data = Some(Arc::clone(&data));
        Ok(InfiniteQueryResult::current(data))
    }
}
