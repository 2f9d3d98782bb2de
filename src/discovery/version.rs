//! Canonical version keys and the concurrent set they are aggregated into

use dashmap::DashSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A .NET major version in its canonical `"<major>.x"` form (e.g. `8.x`).
///
/// The major digits are kept exactly as they appeared in the moniker, so
/// `net08.0` yields `08.x` and arbitrarily long majors never overflow.
/// Ordering is numeric on the major component, so `9.x` sorts before `17.x`;
/// spellings of the same number (`8.x`, `08.x`) are ordered by their text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionKey {
    digits: String,
}

impl VersionKey {
    pub fn new(major: u32) -> Self {
        Self {
            digits: major.to_string(),
        }
    }

    /// Builds a key from the major digits of a moniker. Returns `None` unless
    /// `digits` is a non-empty run of ASCII digits.
    pub fn from_digits(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self {
            digits: digits.to_string(),
        })
    }

    /// The major digits as written, without the `.x` suffix.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Numeric major version, if it fits in a `u32`.
    pub fn major(&self) -> Option<u32> {
        self.digits.parse().ok()
    }

    fn significant(&self) -> &str {
        self.digits.trim_start_matches('0')
    }
}

impl Ord for VersionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.significant(), other.significant());
        a.len()
            .cmp(&b.len())
            .then_with(|| a.cmp(b))
            .then_with(|| self.digits.cmp(&other.digits))
    }
}

impl PartialOrd for VersionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.x", self.digits)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid version key '{0}': expected '<major>.x'")]
pub struct ParseVersionKeyError(String);

impl FromStr for VersionKey {
    type Err = ParseVersionKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_suffix(".x")
            .and_then(VersionKey::from_digits)
            .ok_or_else(|| ParseVersionKeyError(s.to_string()))
    }
}

impl Serialize for VersionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Deduplicated set of version keys, safe to insert into from many tasks.
///
/// Values are never updated once present; readers should wait until every
/// writer has finished before calling [`VersionSet::sorted`].
#[derive(Debug, Default)]
pub struct VersionSet {
    keys: DashSet<VersionKey>,
}

impl VersionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `key` if absent. Returns `true` when the key was new.
    pub fn insert(&self, key: VersionKey) -> bool {
        self.keys.insert(key)
    }

    pub fn extend<I: IntoIterator<Item = VersionKey>>(&self, keys: I) {
        for key in keys {
            self.keys.insert(key);
        }
    }

    pub fn contains(&self, key: &VersionKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Members in ascending numeric order.
    pub fn sorted(&self) -> Vec<VersionKey> {
        let mut keys: Vec<VersionKey> = self.keys.iter().map(|k| k.key().clone()).collect();
        keys.sort();
        keys
    }
}

impl FromIterator<VersionKey> for VersionSet {
    fn from_iter<I: IntoIterator<Item = VersionKey>>(iter: I) -> Self {
        let set = VersionSet::new();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_display_uses_major_dot_x() {
        assert_eq!(VersionKey::new(8).to_string(), "8.x");
        assert_eq!(VersionKey::new(17).to_string(), "17.x");
    }

    #[test]
    fn test_parse_valid_key() {
        assert_eq!("3.x".parse::<VersionKey>().unwrap(), VersionKey::new(3));
        assert_eq!("10.x".parse::<VersionKey>().unwrap(), VersionKey::new(10));
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        for bad in ["", ".x", "8", "8.0", "x8.x", "8.X", "-1.x", "8.x.x"] {
            assert!(bad.parse::<VersionKey>().is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_leading_zeros_are_kept() {
        let key = VersionKey::from_digits("08").unwrap();
        assert_eq!(key.to_string(), "08.x");
        assert_eq!(key.major(), Some(8));
        assert_ne!(key, VersionKey::new(8));
        assert_eq!("08.x".parse::<VersionKey>().unwrap(), key);
    }

    #[test]
    fn test_majors_beyond_u32_are_kept_and_ordered() {
        let huge = VersionKey::from_digits("99999999999").unwrap();
        assert_eq!(huge.to_string(), "99999999999.x");
        assert_eq!(huge.major(), None);

        let set: VersionSet = [
            huge.clone(),
            VersionKey::new(17),
            VersionKey::from_digits("08").unwrap(),
            VersionKey::new(8),
            VersionKey::new(10),
        ]
        .into_iter()
        .collect();
        let rendered: Vec<String> = set.sorted().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["08.x", "8.x", "10.x", "17.x", "99999999999.x"]);
    }

    #[test]
    fn test_from_digits_rejects_non_digits() {
        assert!(VersionKey::from_digits("").is_none());
        assert!(VersionKey::from_digits("8a").is_none());
        assert!(VersionKey::from_digits("٨").is_none());
    }

    #[test]
    fn test_numeric_ordering_beats_lexicographic() {
        let set: VersionSet = [9, 3, 17].into_iter().map(VersionKey::new).collect();
        let rendered: Vec<String> = set.sorted().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["3.x", "9.x", "17.x"]);
    }

    #[test]
    fn test_insert_reports_new_keys_only() {
        let set = VersionSet::new();
        assert!(set.insert(VersionKey::new(8)));
        assert!(!set.insert(VersionKey::new(8)));
        assert!(set.insert(VersionKey::new(9)));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&VersionKey::new(9)));
    }

    #[test]
    fn test_serializes_as_plain_strings() {
        let json = serde_json::to_string(&vec![VersionKey::new(6), VersionKey::new(8)]).unwrap();
        assert_eq!(json, r#"["6.x","8.x"]"#);

        let back: Vec<VersionKey> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![VersionKey::new(6), VersionKey::new(8)]);
    }

    #[test]
    fn test_concurrent_inserts_dedupe() {
        let set = Arc::new(VersionSet::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let set = Arc::clone(&set);
                std::thread::spawn(move || {
                    for i in 0..500u32 {
                        set.insert(VersionKey::new((i + t) % 20));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(set.len(), 20);
        assert_eq!(set.sorted(), (0..20).map(VersionKey::new).collect::<Vec<_>>());
    }
}
