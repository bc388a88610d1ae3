//! Pagination module
//!
//! Cursor-based pagination as served by the storefront list endpoints.
//!
//! # Overview
//!
//! A list endpoint answers `{items, nextCursor}`. The cursor of page N is
//! sent back as `cursor=` to fetch page N+1; a missing cursor ends the
//! sequence for good.

mod types;

pub use types::{next_page_param, Cursor, InfiniteData, NextPage, Page, PageParam};
