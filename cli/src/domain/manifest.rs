//! Manifest selection among several candidates found in one tree.

use std::cmp::Ordering;
use std::path::{Component, Path, PathBuf};

/// Number of path segments, e.g. `mcp.json` is 1 and `a/b/mcp.json` is 3.
#[must_use]
pub fn depth(relative: &Path) -> usize {
    relative
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count()
}

/// Pick the manifest closest to the root.
///
/// Candidates are paths relative to the extraction root. Ties on depth go
/// to the lexicographically smallest `/`-joined path, so the result never
/// depends on directory traversal order.
#[must_use]
pub fn select_manifest(candidates: &[PathBuf]) -> Option<&PathBuf> {
    candidates.iter().min_by(|a, b| compare(a, b))
}

fn compare(a: &Path, b: &Path) -> Ordering {
    depth(a)
        .cmp(&depth(b))
        .then_with(|| slash_form(a).cmp(&slash_form(b)))
}

fn slash_form(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
