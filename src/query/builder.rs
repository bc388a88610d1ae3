//! Descriptor builders for the storefront endpoints
//!
//! Every builder is pure: it captures the transport and its arguments and
//! returns a descriptor. Requests happen only when the fetcher runs.

use super::descriptor::{InfiniteQueryDescriptor, QueryDescriptor};
use super::filters::ProductFilters;
use super::key::{KeyPart, QueryKey};
use crate::error::Error;
use crate::http::SharedTransport;
use crate::pagination::{Page, PageParam};
use crate::types::Entity;
use tracing::debug;

/// Builds query descriptors against one transport and api base path
#[derive(Clone)]
pub struct QueryBuilder {
    transport: SharedTransport,
    base_path: String,
}

impl QueryBuilder {
    /// Create a builder; `base_path` is prefixed to every request path
    pub fn new(transport: SharedTransport, base_path: impl Into<String>) -> Self {
        Self {
            transport,
            base_path: base_path.into(),
        }
    }

    /// The api base path
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// The transport fetchers run against
    pub fn transport(&self) -> &SharedTransport {
        &self.transport
    }

    fn path(&self, relative: &str) -> String {
        format!("{}{relative}", self.base_path)
    }

    /// List query with an optional passthrough query string (e.g. `?category=books`).
    ///
    /// Key: `[entity, filter_query]`.
    pub fn list(&self, entity: Entity, filter_query: Option<&str>) -> QueryDescriptor {
        let filter_query = filter_query.filter(|q| !q.is_empty()).map(str::to_string);
        let key = QueryKey::new(entity.name()).with(KeyPart::optional(filter_query.clone()));
        let path = self.path(&format!(
            "{}{}",
            entity.list_path(),
            filter_query.as_deref().unwrap_or_default()
        ));
        let transport = self.transport.clone();

        QueryDescriptor::new(key, move || {
            let transport = transport.clone();
            let path = path.clone();
            async move {
                debug!("GET {path}");
                Ok(transport.get(&path).await?.unwrap_or_default())
            }
        })
    }

    /// Single entity by id. Key: `[entity, "detail", id]`.
    ///
    /// The fetcher fails with [`Error::NotFound`] when the server answers
    /// with an empty body.
    pub fn detail(&self, entity: Entity, id: i64) -> QueryDescriptor {
        let key = QueryKey::new(entity.name()).with("detail").with(id);
        let path = self.path(&entity.detail_path(id));
        let transport = self.transport.clone();

        QueryDescriptor::new(key, move || {
            let transport = transport.clone();
            let path = path.clone();
            async move {
                debug!("GET {path}");
                transport
                    .get(&path)
                    .await?
                    .ok_or_else(|| Error::not_found(path))
            }
        })
    }

    /// Cursor-paginated list. Key: `[entity, "infinite", category, type]`.
    pub fn infinite_list(
        &self,
        entity: Entity,
        page_size: u32,
        filters: &ProductFilters,
    ) -> InfiniteQueryDescriptor {
        let [category, kind] = filters.key_parts();
        let key = QueryKey::new(entity.name())
            .with("infinite")
            .with(category)
            .with(kind);
        let list_path = self.path(entity.list_path());
        let transport = self.transport.clone();
        let filters = filters.clone();

        InfiniteQueryDescriptor::new(key, move |param: PageParam| {
            let transport = transport.clone();
            let path = format!(
                "{list_path}{}",
                infinite_query_string(page_size, &param, &filters)
            );
            async move {
                debug!("GET {path}");
                match transport.get(&path).await? {
                    Some(body) => Page::from_value(body),
                    None => Ok(Page::new(Vec::new(), None)),
                }
            }
        })
    }

    /// Available categories and product types. Key: `["category", "type"]`.
    pub fn category_types(&self) -> QueryDescriptor {
        let key = QueryKey::new("category").with("type");
        let path = self.path("filter-type");
        let transport = self.transport.clone();

        QueryDescriptor::new(key, move || {
            let transport = transport.clone();
            let path = path.clone();
            async move {
                debug!("GET {path}");
                Ok(transport.get(&path).await?.unwrap_or_default())
            }
        })
    }
}

impl std::fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("base_path", &self.base_path)
            .finish_non_exhaustive()
    }
}

/// Query string of one infinite page: `?limit=N[&cursor=C][&category=X][&type=Y]`.
///
/// Parameters always appear in that order.
pub fn infinite_query_string(page_size: u32, param: &PageParam, filters: &ProductFilters) -> String {
    let mut query = format!("?limit={page_size}");
    if let Some(cursor) = param.cursor() {
        push_param(&mut query, "cursor", cursor.as_str());
    }
    if let Some(category) = filters.category_value() {
        push_param(&mut query, "category", category);
    }
    if let Some(kind) = filters.kind_value() {
        push_param(&mut query, "type", kind);
    }
    query
}

fn push_param(query: &mut String, name: &str, value: &str) {
    query.push('&');
    query.push_str(name);
    query.push('=');
    query.extend(url::form_urlencoded::byte_serialize(value.as_bytes()));
}
