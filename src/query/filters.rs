//! Catalog facets for product listings

use super::key::KeyPart;

/// Category and type facets of a product listing.
///
/// Values are passed through to the server as-is. An empty string is
/// treated the same as an unset facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProductFilters {
    category: Option<String>,
    kind: Option<String>,
}

impl ProductFilters {
    /// No facets
    pub fn none() -> Self {
        Self::default()
    }

    /// Build from optional raw values
    pub fn from_options(category: Option<&str>, kind: Option<&str>) -> Self {
        Self {
            category: normalize(category),
            kind: normalize(kind),
        }
    }

    /// Set the category facet
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = normalize(Some(category.into().as_str()));
        self
    }

    /// Set the type facet
    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = normalize(Some(kind.into().as_str()));
        self
    }

    /// The category facet, if set
    pub fn category_value(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// The type facet, if set
    pub fn kind_value(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Whether no facet is set
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.kind.is_none()
    }

    /// Key parts in key order: category, then type
    pub(crate) fn key_parts(&self) -> [KeyPart; 2] {
        [
            KeyPart::optional(self.category.clone()),
            KeyPart::optional(self.kind.clone()),
        ]
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(ToString::to_string)
}
