//! Generated implementor fragments: decoding, script rendering and registration.

use crate::error::FragmentError;
use crate::registry::{Aggregator, Delivery, Registry};
use crate::shared::SharedRegistry;
use crate::types::{GroupKey, ImplementorEntry, ImplementorsTable};
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

/// Start of the table assignment in a generated script. Group 1 is present
/// when the payload is an array of `[key, entries]` pairs.
static PAYLOAD_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"(?:var|let|const)\s+implementors\s*=\s*(Object\.fromEntries\(\s*)?")
        .unwrap()
});

/// Per-group assignment used by older generated scripts, which start from
/// `var implementors = {};` and fill it in one `implementors["key"] = [...];`
/// line at a time.
static ASSIGNMENT_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r#"implementors\[\s*"([^"]*)"\s*\]\s*=\s*"#).unwrap()
});

/// One fragment's contribution: where it came from and its table.
///
/// Registering consumes the fragment, so a fragment's table reaches the
/// registry at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    source: String,
    table: ImplementorsTable,
}

impl Fragment {
    pub fn new(source: impl Into<String>, table: ImplementorsTable) -> Self {
        Self {
            source: source.into(),
            table,
        }
    }

    /// Decode a fragment whose content is the table as a JSON object.
    pub fn from_json(source: impl Into<String>, json: &str) -> Result<Self, FragmentError> {
        let source = source.into();
        let table = serde_json::from_str(json).map_err(|error| FragmentError::Malformed {
            source_name: source.clone(),
            error,
        })?;
        Ok(Self { source, table })
    }

    /// Extract the table from a generated script.
    ///
    /// Accepts `var implementors = {...};`,
    /// `var implementors = Object.fromEntries([[key, [...]], ...]);` and the
    /// older form that follows `var implementors = {};` with one
    /// `implementors["key"] = [...];` assignment per group. A later assignment
    /// to the same key replaces the earlier one. Only the payload is decoded;
    /// the surrounding handoff code is ignored.
    pub fn from_script(source: impl Into<String>, script: &str) -> Result<Self, FragmentError> {
        let source = source.into();
        let malformed = |error: serde_json::Error| FragmentError::Malformed {
            source_name: source.clone(),
            error,
        };

        let base = PAYLOAD_REGEX.captures(script);
        let mut assignments = ASSIGNMENT_REGEX.captures_iter(script).peekable();
        if base.is_none() && assignments.peek().is_none() {
            return Err(FragmentError::MissingPayload {
                source_name: source,
            });
        }

        let mut table = match base {
            Some(captures) => {
                let payload = &script[captures.get(0).map_or(script.len(), |m| m.end())..];
                let decoded = if captures.get(1).is_some() {
                    first_value::<Vec<(GroupKey, Vec<ImplementorEntry>)>>(payload)
                        .map(|pairs| pairs.into_iter().collect::<ImplementorsTable>())
                } else {
                    first_value::<ImplementorsTable>(payload)
                };
                decoded.map_err(malformed)?
            }
            None => ImplementorsTable::new(),
        };

        for captures in assignments {
            let key: GroupKey = captures[1].parse()?;
            let payload = &script[captures.get(0).map_or(script.len(), |m| m.end())..];
            let entries = first_value::<Vec<ImplementorEntry>>(payload).map_err(malformed)?;
            table.insert(key, entries);
        }

        Ok(Self { source, table })
    }

    /// Render the fragment as the script a documentation page loads.
    pub fn to_script(&self) -> crate::error::Result<String> {
        let payload = serde_json::to_string(&self.table)
            .with_context(|| format!("Failed to serialize implementors for {}", self.source))?;
        Ok(format!(
            "(function() {{\n    \
                var implementors = {payload};\n    \
                if (window.register_implementors) {{\n        \
                    window.register_implementors(implementors);\n    \
                }} else {{\n        \
                    window.pending_implementors = implementors;\n    \
                }}\n\
            }})()\n"
        ))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub const fn table(&self) -> &ImplementorsTable {
        &self.table
    }

    pub fn into_table(self) -> ImplementorsTable {
        self.table
    }

    /// Hand this fragment's table to the page registry.
    pub fn register<A: Aggregator>(self, registry: &mut Registry<A>) -> Delivery {
        let delivery = registry.submit(self.table);
        tracing::debug!(source = %self.source, ?delivery, "Registered fragment");
        delivery
    }

    /// Like [`Fragment::register`], through a shared page handle.
    pub fn register_shared<A: Aggregator>(self, registry: &SharedRegistry<A>) -> Delivery {
        let delivery = registry.submit(self.table);
        tracing::debug!(source = %self.source, ?delivery, "Registered fragment");
        delivery
    }
}

/// Decode the first JSON value in `text`, ignoring whatever follows it.
fn first_value<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    let mut stream = serde_json::Deserializer::from_str(text).into_iter::<T>();
    match stream.next() {
        Some(value) => value,
        // Empty input: let serde_json produce its own EOF error.
        None => serde_json::from_str(text),
    }
}
