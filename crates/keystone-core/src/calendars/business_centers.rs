//! Business center sets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A deduplicated, ordered set of business center codes (e.g. `AUSY`, `GBLO`).
///
/// Two sets listing the same centers in any order or multiplicity are equal
/// and hash identically, which makes this the memoization key for calendars.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusinessCenters(BTreeSet<String>);

impl BusinessCenters {
    /// Builds a set from center codes. Codes are trimmed and uppercased;
    /// blanks are dropped.
    pub fn new<I, S>(centers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            centers
                .into_iter()
                .map(|c| c.as_ref().trim().to_uppercase())
                .filter(|c| !c.is_empty())
                .collect(),
        )
    }

    /// Parses a `-` separated list such as `AUSY-GBLO`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        Self::new(s.split('-'))
    }

    /// Iterates over the centers in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of distinct centers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no center is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for BusinessCenters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_dedup_and_order() {
        let a = BusinessCenters::new(["GBLO", "ausy", "GBLO"]);
        let b = BusinessCenters::parse("AUSY-GBLO");

        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.to_string(), "AUSY-GBLO");
    }

    #[test]
    fn test_hash_key() {
        let mut seen = HashSet::new();
        seen.insert(BusinessCenters::parse("AUSY-USNY"));
        assert!(seen.contains(&BusinessCenters::new(["USNY", "AUSY"])));
    }

    #[test]
    fn test_blank_centers_dropped() {
        assert!(BusinessCenters::parse(" - ").is_empty());
    }
}
