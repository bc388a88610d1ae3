//! Cached entries and their freshness

use crate::pagination::InfiniteData;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Data held for one key
#[derive(Debug, Clone)]
pub enum CachedData {
    /// Result of a plain query
    Single(Arc<Value>),
    /// Pages of an infinite query
    Infinite(Arc<InfiniteData>),
}

impl CachedData {
    pub(crate) fn into_single(self) -> Option<Arc<Value>> {
        match self {
            CachedData::Single(value) => Some(value),
            CachedData::Infinite(_) => None,
        }
    }

    pub(crate) fn into_infinite(self) -> Option<Arc<InfiniteData>> {
        match self {
            CachedData::Infinite(data) => Some(data),
            CachedData::Single(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub(crate) data: CachedData,
    fetched_at: Instant,
    updated_at: DateTime<Utc>,
    invalidated: bool,
}

impl Entry {
    pub(crate) fn new(data: CachedData) -> Self {
        Self {
            data,
            fetched_at: Instant::now(),
            updated_at: Utc::now(),
            invalidated: false,
        }
    }

    /// Stale once invalidated, or once older than `stale_time`.
    /// A zero `stale_time` makes every entry stale immediately.
    pub(crate) fn is_stale(&self, stale_time: Duration) -> bool {
        self.invalidated || stale_time.is_zero() || self.fetched_at.elapsed() > stale_time
    }

    /// New data under the old freshness: same fetch time, same invalidation
    pub(crate) fn replaced(&self, data: CachedData) -> Self {
        Self {
            data,
            fetched_at: self.fetched_at,
            updated_at: Utc::now(),
            invalidated: self.invalidated,
        }
    }

    pub(crate) fn invalidate(&mut self) {
        self.invalidated = true;
    }

    pub(crate) fn state(&self, stale_time: Duration) -> QueryState {
        QueryState {
            data_updated_at: self.updated_at,
            is_stale: self.is_stale(stale_time),
            is_invalidated: self.invalidated,
        }
    }
}

/// Freshness snapshot of one cached key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryState {
    /// Wall-clock time the data was stored
    pub data_updated_at: DateTime<Utc>,
    /// Whether the next fetch would hit the network
    pub is_stale: bool,
    /// Whether the entry was explicitly invalidated
    pub is_invalidated: bool,
}
