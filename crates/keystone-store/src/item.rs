//! Stored items and property filters.

use chrono::{DateTime, Duration, Utc};
use keystone_core::types::{Properties, PropertyValue};
use serde::{Deserialize, Serialize};

use crate::key::StoreKey;

/// An item held by an [`ObjectStore`](crate::ObjectStore).
///
/// The payload is kept as JSON so the store stays agnostic of the object
/// types written into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredItem {
    /// Namespaced key.
    pub key: StoreKey,
    /// Serialized object.
    pub data: serde_json::Value,
    /// Queryable properties.
    pub properties: Properties,
    /// When the item was written.
    pub saved_at: DateTime<Utc>,
    /// When the item stops being visible, if it has a time-to-live.
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredItem {
    /// Creates an item stamped with the current time and no expiry.
    #[must_use]
    pub fn new(key: StoreKey, data: serde_json::Value, properties: Properties) -> Self {
        Self {
            key,
            data,
            properties,
            saved_at: Utc::now(),
            expires_at: None,
        }
    }

    /// Sets a time-to-live relative to `saved_at`.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.expires_at = ttl.map(|ttl| self.saved_at + ttl);
        self
    }

    /// Returns true once the time-to-live has elapsed at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| expiry <= now)
    }

    /// Returns true once the time-to-live has elapsed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Conjunction of property equality conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFilter {
    conditions: Vec<(String, PropertyValue)>,
}

impl PropertyFilter {
    /// Filter matching every item.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Adds an equality condition. Text compares case-insensitively.
    #[must_use]
    pub fn eq(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.conditions.push((key.to_string(), value.into()));
        self
    }

    /// Returns true if `properties` satisfies every condition.
    #[must_use]
    pub fn matches(&self, properties: &Properties) -> bool {
        self.conditions.iter().all(|(key, expected)| {
            properties
                .get(key)
                .is_some_and(|actual| actual.matches(expected))
        })
    }
}
