//! Implementor table data model.

use crate::error::FragmentError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static GROUP_KEY_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());

/// Name of the crate that defines the implementing types in one group.
///
/// Validated on parse and on deserialization; [`GroupKey::new_unchecked`] skips
/// validation for keys that are known-good at build time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey(String);

impl GroupKey {
    /// Create a key without validating it.
    pub fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for GroupKey {
    type Err = FragmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if GROUP_KEY_REGEX.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(FragmentError::InvalidGroupKey(s.to_string()))
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::borrow::Borrow<str> for GroupKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Serialize for GroupKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for GroupKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Rendered markup describing one implementing type. Opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImplementorEntry(String);

impl ImplementorEntry {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImplementorEntry {
    fn from(markup: &str) -> Self {
        Self::new(markup)
    }
}

impl fmt::Display for ImplementorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Implementors of one trait, grouped by the crate that provides them.
///
/// A single fragment only carries a partial table; the page aggregator
/// assembles the full picture from many of them. Entry order within a group
/// is preserved; groups iterate in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImplementorsTable {
    groups: BTreeMap<GroupKey, Vec<ImplementorEntry>>,
}

impl ImplementorsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entries for a group, returning the entries it replaced.
    pub fn insert(
        &mut self,
        key: GroupKey,
        entries: Vec<ImplementorEntry>,
    ) -> Option<Vec<ImplementorEntry>> {
        self.groups.insert(key, entries)
    }

    /// Append one entry to a group, creating the group if needed.
    pub fn push(&mut self, key: GroupKey, entry: ImplementorEntry) {
        self.groups.entry(key).or_default().push(entry);
    }

    pub fn get(&self, key: &str) -> Option<&[ImplementorEntry]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn contains_group(&self, key: &str) -> bool {
        self.groups.contains_key(key)
    }

    /// Iterate groups in key order.
    pub fn groups(&self) -> btree_map::Iter<'_, GroupKey, Vec<ImplementorEntry>> {
        self.groups.iter()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of entries across all groups.
    pub fn entry_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

impl FromIterator<(GroupKey, Vec<ImplementorEntry>)> for ImplementorsTable {
    fn from_iter<I: IntoIterator<Item = (GroupKey, Vec<ImplementorEntry>)>>(iter: I) -> Self {
        Self {
            groups: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ImplementorsTable {
    type Item = (GroupKey, Vec<ImplementorEntry>);
    type IntoIter = btree_map::IntoIter<GroupKey, Vec<ImplementorEntry>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl<'a> IntoIterator for &'a ImplementorsTable {
    type Item = (&'a GroupKey, &'a Vec<ImplementorEntry>);
    type IntoIter = btree_map::Iter<'a, GroupKey, Vec<ImplementorEntry>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}
