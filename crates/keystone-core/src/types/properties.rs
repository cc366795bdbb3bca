//! Ordered, case-insensitive property bags.
//!
//! A [`Properties`] bag is the lingua franca between the identifier parser,
//! the instrument factory and the object store: every stored item carries one,
//! and every constructor reads its inputs from one.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Date;

/// A typed property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// Free text (identifiers, terms, tags).
    Text(String),
    /// A calendar date.
    Date(Date),
    /// A decimal amount (notional, strike, coupon).
    Decimal(Decimal),
    /// A flag.
    Bool(bool),
}

impl PropertyValue {
    /// Returns the text payload, if this is a text value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Loose equality used by store filters: text compares case-insensitively.
    #[must_use]
    pub fn matches(&self, other: &PropertyValue) -> bool {
        match (self, other) {
            (PropertyValue::Text(a), PropertyValue::Text(b)) => a.eq_ignore_ascii_case(b),
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(s) => write!(f, "{s}"),
            PropertyValue::Date(d) => write!(f, "{d}"),
            PropertyValue::Decimal(d) => write!(f, "{}", d.normalize()),
            PropertyValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<Date> for PropertyValue {
    fn from(value: Date) -> Self {
        PropertyValue::Date(value)
    }
}

impl From<Decimal> for PropertyValue {
    fn from(value: Decimal) -> Self {
        PropertyValue::Decimal(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

/// Ordered mapping of property name to [`PropertyValue`].
///
/// Keys compare case-insensitively; the first spelling used for a key is kept
/// and insertion order is preserved, so two bags built by the same sequence of
/// `set` calls are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
    entries: Vec<(String, PropertyValue)>,
}

impl Properties {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a value, replacing any existing value under the same key.
    pub fn set(&mut self, key: &str, value: impl Into<PropertyValue>) {
        let value = value.into();
        match self.position(key) {
            Some(idx) => self.entries[idx].1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// Returns the value under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.position(key).map(|idx| &self.entries[idx].1)
    }

    /// Returns true if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Removes and returns the value under `key`.
    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        self.position(key).map(|idx| self.entries.remove(idx).1)
    }

    /// Returns a text value.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropertyValue::as_str)
    }

    /// Returns a date value; text values are parsed.
    #[must_use]
    pub fn get_date(&self, key: &str) -> Option<Date> {
        match self.get(key)? {
            PropertyValue::Date(d) => Some(*d),
            PropertyValue::Text(s) => Date::parse(s).ok(),
            _ => None,
        }
    }

    /// Returns a decimal value; text values are parsed (`,` accepted as the
    /// decimal separator).
    #[must_use]
    pub fn get_decimal(&self, key: &str) -> Option<Decimal> {
        match self.get(key)? {
            PropertyValue::Decimal(d) => Some(*d),
            PropertyValue::Text(s) => Decimal::from_str(&s.replace(',', ".")).ok(),
            _ => None,
        }
    }

    /// Returns a boolean value; `"true"`/`"false"` text is accepted.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            PropertyValue::Bool(b) => Some(*b),
            PropertyValue::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Copies every entry of `other` into this bag, overriding duplicates.
    pub fn merge(&mut self, other: &Properties) {
        for (key, value) in &other.entries {
            self.set(key, value.clone());
        }
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(key))
    }
}

impl<K: AsRef<str>, V: Into<PropertyValue>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Properties::new();
        for (k, v) in iter {
            props.set(k.as_ref(), v);
        }
        props
    }
}
