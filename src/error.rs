//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for rustdoc-implementors operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when a generated fragment cannot be turned into a table.
///
/// Handing a table off never fails; only reading one from disk or from
/// script text does.
#[derive(Debug, thiserror::Error)]
pub enum FragmentError {
    /// Group key is empty or contains characters a crate name cannot have.
    #[error(
        "Invalid group key '{0}': must contain only alphanumeric characters, hyphens, and underscores"
    )]
    InvalidGroupKey(String),

    /// Script does not assign an implementors table anywhere.
    #[error("No implementors payload found in {source_name}")]
    MissingPayload { source_name: String },

    /// Payload was found but is not a valid table.
    #[error("Malformed implementors payload in {source_name}: {error}")]
    Malformed {
        source_name: String,
        #[source]
        error: serde_json::Error,
    },

    /// File is neither a `.js` script nor a `.json` table.
    #[error("Unsupported fragment file: {}", path.display())]
    UnsupportedExtension { path: PathBuf },
}
