//! Namespaced store keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A client namespace, e.g. `Orion` or `Test.Desk1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    /// Creates a namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the namespace as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds a key for `id` within this namespace.
    #[must_use]
    pub fn key(&self, id: impl Into<String>) -> StoreKey {
        StoreKey {
            namespace: self.clone(),
            id: id.into(),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Namespace {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Namespace {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Fully-qualified store key.
///
/// Namespace and id stay separate values. The dotted `ns.id` form is for
/// display only; backends write the length-prefixed [`physical`](Self::physical)
/// form so that `("A", "X.Y")` and `("A.X", "Y")` never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoreKey {
    /// Owning namespace.
    pub namespace: Namespace,
    /// Item id within the namespace.
    pub id: String,
}

impl StoreKey {
    /// Creates a key.
    pub fn new(namespace: impl Into<Namespace>, id: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            id: id.into(),
        }
    }

    /// Physical key written by backends: `<len>:<namespace>:<id>`.
    #[must_use]
    pub fn physical(&self) -> String {
        format!("{}{}", Self::namespace_prefix(&self.namespace), self.id)
    }

    /// Prefix shared by the physical keys of every item in `namespace`.
    #[must_use]
    pub fn namespace_prefix(namespace: &Namespace) -> String {
        format!("{}:{}:", namespace.as_str().len(), namespace)
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.id)
    }
}
