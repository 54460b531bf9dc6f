//! Page-wide implementor view assembled from fragment tables.

use crate::registry::Aggregator;
use crate::types::{GroupKey, ImplementorEntry, ImplementorsTable};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Aggregator that merges every received table into one view.
///
/// Entries for a group are appended in arrival order; nothing is
/// deduplicated or rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageImplementors {
    groups: BTreeMap<GroupKey, Vec<ImplementorEntry>>,
    #[serde(skip)]
    tables_received: usize,
}

impl PageImplementors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fragment tables merged so far.
    pub const fn tables_received(&self) -> usize {
        self.tables_received
    }

    pub fn get(&self, key: &str) -> Option<&[ImplementorEntry]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn entry_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Plain-text listing, one group header followed by its entries.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PageImplementors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, entries) in &self.groups {
            writeln!(f, "{} ({})", key, entries.len())?;
            for entry in entries {
                writeln!(f, "  {}", entry)?;
            }
        }
        Ok(())
    }
}

impl Aggregator for PageImplementors {
    fn register_implementors(&mut self, table: ImplementorsTable) {
        self.tables_received += 1;
        for (key, entries) in table {
            tracing::trace!(group = %key, entries = entries.len(), "Merging group");
            self.groups.entry(key).or_default().extend(entries);
        }
    }
}
