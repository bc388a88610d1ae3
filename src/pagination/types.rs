//! Cursor pagination types
//!
//! Defines the page shape returned by list endpoints and the continuation
//! values threaded between successive page fetches.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

// ============================================================================
// Cursor
// ============================================================================

/// Opaque continuation token.
///
/// The server currently sends the id of the last item of a page, sometimes
/// as a JSON number. Both forms are kept as text and never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a raw token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cursor {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl Serialize for Cursor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Cursor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Cursor(s),
            Raw::Number(n) => Cursor(n.to_string()),
        })
    }
}

// ============================================================================
// Page
// ============================================================================

/// One fetched batch of items plus its continuation cursor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T = Value> {
    /// Items of this page, in server order
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Cursor for the following page; `None` when this is the last page
    #[serde(rename = "nextCursor", default)]
    pub next_cursor: Option<Cursor>,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(items: Vec<T>, next_cursor: Option<Cursor>) -> Self {
        Self { items, next_cursor }
    }

    /// Apply the next-page rule to this page
    pub fn next_page(&self) -> NextPage {
        next_page_param(self)
    }
}

impl Page<Value> {
    /// Decode a raw response body into a page
    pub fn from_value(body: Value) -> Result<Self> {
        Ok(serde_json::from_value(body)?)
    }

    /// Decode the items into a concrete entity type
    pub fn decode_items<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.items
            .iter()
            .map(|item| Ok(T::deserialize(item)?))
            .collect()
    }
}

// ============================================================================
// Page Parameters
// ============================================================================

/// Parameter handed to an infinite fetcher
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PageParam {
    /// First page: no cursor has been requested yet
    #[default]
    Initial,
    /// Continue after this cursor
    Cursor(Cursor),
}

impl PageParam {
    /// The cursor to send, if any
    pub fn cursor(&self) -> Option<&Cursor> {
        match self {
            PageParam::Initial => None,
            PageParam::Cursor(cursor) => Some(cursor),
        }
    }
}

/// Result of the next-page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// Another page exists after this cursor
    Continue(Cursor),
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Page parameter for the following fetch
    pub fn into_param(self) -> Option<PageParam> {
        match self {
            NextPage::Continue(cursor) => Some(PageParam::Cursor(cursor)),
            NextPage::Done => None,
        }
    }
}

/// Extract the continuation from the last fetched page. Never fails.
pub fn next_page_param<T>(last_page: &Page<T>) -> NextPage {
    match &last_page.next_cursor {
        Some(cursor) => NextPage::Continue(cursor.clone()),
        None => NextPage::Done,
    }
}

// ============================================================================
// Infinite Data
// ============================================================================

/// Pages fetched so far for one infinite query, in fetch order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InfiniteData<T = Value> {
    /// Fetched pages
    pub pages: Vec<Page<T>>,
    /// The parameter each page was fetched with
    pub page_params: Vec<PageParam>,
}

impl<T> InfiniteData<T> {
    /// Start from a first page
    pub fn first(page: Page<T>, param: PageParam) -> Self {
        Self {
            pages: vec![page],
            page_params: vec![param],
        }
    }

    /// Append a page fetched with `param`
    pub fn push(&mut self, page: Page<T>, param: PageParam) {
        self.pages.push(page);
        self.page_params.push(param);
    }

    /// Continuation after the last page, `Done` when nothing was fetched
    pub fn next_page(&self) -> NextPage {
        self.pages.last().map_or(NextPage::Done, next_page_param)
    }

    /// True iff the last page carries a cursor
    pub fn has_next_page(&self) -> bool {
        !self.next_page().is_done()
    }

    /// Number of fetched pages
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All items across pages, in page order
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.pages.iter().flat_map(|page| page.items.iter())
    }
}
