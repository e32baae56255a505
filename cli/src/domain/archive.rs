//! Archive layout rules: single-folder flattening and entry path mapping.
//!
//! Pure functions over entry names. Entry names always use `/` separators.

use std::path::PathBuf;

/// Shared first path segment to strip from every file entry, if any.
///
/// Scans file entries in archive order. The first entry's top-level folder
/// becomes the candidate; the first entry that does not live under it
/// cancels flattening and stops the scan. An entry without any folder
/// also cancels it.
pub fn flatten_prefix<'a, I>(file_entries: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut entries = file_entries.into_iter();
    let (first, _) = entries.next()?.split_once('/')?;
    if first.is_empty() {
        return None;
    }
    let prefix = format!("{first}/");
    for entry in entries {
        if !entry.starts_with(&prefix) {
            return None;
        }
    }
    Some(first.to_string())
}

/// Relative output path of an entry once `prefix` is stripped.
///
/// Rejects entries that would escape the extraction root.
///
/// # Errors
///
/// Returns a reason string for absolute paths, `..` components, and entries
/// that are empty after stripping.
pub fn entry_target(entry: &str, prefix: Option<&str>) -> Result<PathBuf, String> {
    let relative = match prefix {
        Some(p) => entry
            .strip_prefix(p)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(entry),
        None => entry,
    };
    if relative.starts_with('/') {
        return Err(format!("absolute entry path: {entry}"));
    }
    let mut target = PathBuf::new();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => return Err(format!("entry escapes extraction root: {entry}")),
            s => target.push(s),
        }
    }
    if target.as_os_str().is_empty() {
        return Err(format!("empty entry path: {entry}"));
    }
    Ok(target)
}

/// Archive file name without its `.zip` extension.
#[must_use]
pub fn archive_stem(archive_name: &str) -> &str {
    let base = archive_name.rsplit(['/', '\\']).next().unwrap_or(archive_name);
    base.strip_suffix(".zip").unwrap_or(base)
}
