//! Query descriptor module
//!
//! Maps a logical request (entity, optional filters or id, pagination mode)
//! to a key plus a deferred fetcher.
//!
//! | Builder | Key |
//! |---|---|
//! | `list` | `[entity, filter_query]` |
//! | `detail` | `[entity, "detail", id]` |
//! | `infinite_list` | `[entity, "infinite", category, type]` |
//! | `category_types` | `["category", "type"]` |
//!
//! Unset optional values appear in keys as [`KeyPart::Absent`].

mod builder;
mod descriptor;
mod filters;
mod key;

pub use builder::{infinite_query_string, QueryBuilder};
pub use descriptor::{InfiniteQueryDescriptor, PageFn, Placeholder, QueryDescriptor, QueryFn};
pub use filters::ProductFilters;
pub use key::{KeyPart, QueryKey};
