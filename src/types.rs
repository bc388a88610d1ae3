//! Common types used throughout storefront-query

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Entities
// ============================================================================

/// Resource families served by the storefront backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Products,
    Posts,
}

impl Entity {
    /// Name used as the first element of every query key
    pub fn name(self) -> &'static str {
        match self {
            Entity::Products => "products",
            Entity::Posts => "posts",
        }
    }

    /// Path of the list endpoint, relative to the api base path.
    ///
    /// Posts are only exposed through the cursor endpoint, even when no
    /// cursor parameters are sent.
    pub fn list_path(self) -> &'static str {
        match self {
            Entity::Products => "products",
            Entity::Posts => "posts/infinite",
        }
    }

    /// Path of a single entity
    pub fn detail_path(self, id: i64) -> String {
        format!("{}/{id}", self.name())
    }

    /// Page size the storefront uses for infinite lists
    pub fn default_page_size(self) -> u32 {
        match self {
            Entity::Products => 9,
            Entity::Posts => 6,
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Backoff strategy for transport retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_paths() {
        assert_eq!(Entity::Products.list_path(), "products");
        assert_eq!(Entity::Posts.list_path(), "posts/infinite");
        assert_eq!(Entity::Products.detail_path(12), "products/12");
        assert_eq!(Entity::Posts.detail_path(3), "posts/3");
    }

    #[test]
    fn test_entity_page_sizes() {
        assert_eq!(Entity::Products.default_page_size(), 9);
        assert_eq!(Entity::Posts.default_page_size(), 6);
    }

    #[test]
    fn test_backoff_type_serde() {
        let parsed: BackoffType = serde_json::from_str("\"linear\"").unwrap();
        assert_eq!(parsed, BackoffType::Linear);
        assert_eq!(BackoffType::default(), BackoffType::Exponential);
    }
}
