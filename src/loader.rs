//! Discovery and loading of fragment files from a documentation output tree.

use crate::error::{FragmentError, Result};
use crate::fragment::Fragment;
use anyhow::Context;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Find every `.js` and `.json` fragment under `dir`, sorted by path.
pub fn discover_fragments(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkBuilder::new(dir)
        .build()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
        .map(ignore::DirEntry::into_path)
        .filter(|path| fragment_kind(path).is_some())
        .collect();

    paths.sort();
    paths
}

/// Read and decode one fragment file. The source label is `path` relative to `root`.
pub async fn load_fragment(root: &Path, path: &Path) -> Result<Fragment> {
    let kind = fragment_kind(path).ok_or_else(|| FragmentError::UnsupportedExtension {
        path: path.to_path_buf(),
    })?;

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read fragment {}", path.display()))?;

    let label = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned();

    let fragment = match kind {
        FragmentKind::Script => Fragment::from_script(label, &content)?,
        FragmentKind::Json => Fragment::from_json(label, &content)?,
    };
    Ok(fragment)
}

/// Load every fragment under `dir` in discovery order.
pub async fn load_fragments(dir: &Path) -> Result<Vec<Fragment>> {
    if !dir.is_dir() {
        anyhow::bail!("Fragment directory does not exist: {}", dir.display());
    }

    let paths = discover_fragments(dir);
    tracing::info!(dir = %dir.display(), count = paths.len(), "Discovered fragments");

    let mut fragments = Vec::with_capacity(paths.len());
    for path in &paths {
        fragments.push(load_fragment(dir, path).await?);
    }
    Ok(fragments)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FragmentKind {
    Script,
    Json,
}

fn fragment_kind(path: &Path) -> Option<FragmentKind> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("js") => Some(FragmentKind::Script),
        Some("json") => Some(FragmentKind::Json),
        _ => None,
    }
}
