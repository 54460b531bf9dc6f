//! Shared test fixtures and utilities for integration tests.
//!
//! - [`FragmentDir`]: a temporary documentation output tree that fragment
//!   files can be written into.
//! - [`Recorder`]: an aggregator that keeps every table it receives, in order.
//! - [`table`]: shorthand for building an [`ImplementorsTable`].

use rstest::fixture;
use rustdoc_implementors::{Aggregator, GroupKey, ImplementorEntry, ImplementorsTable};
use std::path::Path;
use tempfile::TempDir;

/// A temporary directory holding generated fragment files.
///
/// Cleaned up automatically when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct FragmentDir {
    temp: TempDir,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl FragmentDir {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Creates a file with the given content, creating parent directories.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) {
        let full_path = self.temp.path().join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }

    /// Writes a fragment script in the `Object.fromEntries` form rustdoc emits.
    pub fn create_script(&self, path: &str, pairs: &[(&str, &[&str])]) {
        let payload: Vec<(&str, &[&str])> = pairs.to_vec();
        let payload = serde_json::to_string(&payload).expect("Failed to serialize payload");
        let script = format!(
            "(function() {{\n    var implementors = Object.fromEntries({payload});\n    \
             if (window.register_implementors) {{\n        \
             window.register_implementors(implementors);\n    }} else {{\n        \
             window.pending_implementors = implementors;\n    }}\n}})()\n"
        );
        self.create_file(path, &script);
    }
}

impl Default for FragmentDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture: an empty fragment directory.
#[allow(dead_code)] // Used across different integration test crates
#[fixture]
pub fn fragment_dir() -> FragmentDir {
    FragmentDir::new()
}

/// Aggregator that records every table it receives.
#[allow(dead_code)] // Used across different integration test crates
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Recorder {
    pub received: Vec<ImplementorsTable>,
}

impl Aggregator for Recorder {
    fn register_implementors(&mut self, table: ImplementorsTable) {
        self.received.push(table);
    }
}

/// Build a table from `(group, entries)` pairs.
#[allow(dead_code)] // Used across different integration test crates
pub fn table(pairs: &[(&str, &[&str])]) -> ImplementorsTable {
    pairs
        .iter()
        .map(|(key, entries)| {
            (
                GroupKey::new_unchecked(*key),
                entries.iter().copied().map(ImplementorEntry::from).collect(),
            )
        })
        .collect()
}
