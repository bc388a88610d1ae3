//! Query keys
//!
//! A key is an ordered list of primitive parts. Two keys share a cache entry
//! iff they are element-wise equal.

use serde::Serialize;
use std::fmt;

/// One element of a query key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum KeyPart {
    /// The canonical placeholder for an unset optional value.
    /// Distinct from every string, including `""`.
    Absent,
    Int(i64),
    Str(String),
}

impl KeyPart {
    /// Map an optional value onto a part, using `Absent` for `None`
    pub fn optional<T: Into<KeyPart>>(value: Option<T>) -> Self {
        value.map_or(KeyPart::Absent, Into::into)
    }
}

impl From<&str> for KeyPart {
    fn from(value: &str) -> Self {
        KeyPart::Str(value.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(value: String) -> Self {
        KeyPart::Str(value)
    }
}

impl From<i64> for KeyPart {
    fn from(value: i64) -> Self {
        KeyPart::Int(value)
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Absent => f.write_str("null"),
            KeyPart::Int(n) => write!(f, "{n}"),
            KeyPart::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// Cache identity of a logical request
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct QueryKey(Vec<KeyPart>);

impl QueryKey {
    /// Start a key from its first part
    pub fn new(first: impl Into<KeyPart>) -> Self {
        Self(vec![first.into()])
    }

    /// Append a part
    #[must_use]
    pub fn with(mut self, part: impl Into<KeyPart>) -> Self {
        self.0.push(part.into());
        self
    }

    /// The parts of this key
    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }

    /// Check whether `prefix` matches the leading parts of this key
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl From<Vec<KeyPart>> for QueryKey {
    fn from(parts: Vec<KeyPart>) -> Self {
        Self(parts)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{part}")?;
        }
        f.write_str("]")
    }
}
