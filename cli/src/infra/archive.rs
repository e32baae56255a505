//! Zip extraction with single-folder flattening.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use crate::domain::PipelineError;
use crate::domain::archive::{entry_target, flatten_prefix};

fn archive_error(archive_name: &str, reason: impl ToString) -> PipelineError {
    PipelineError::Archive {
        name: archive_name.to_string(),
        reason: reason.to_string(),
    }
}

/// File (non-directory) entry names in archive order.
fn file_entries<R: Read + Seek>(
    zip: &mut ZipArchive<R>,
    archive_name: &str,
) -> Result<Vec<String>, PipelineError> {
    let mut names = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        let entry = zip.by_index(i).map_err(|e| archive_error(archive_name, e))?;
        if !entry.is_dir() {
            names.push(entry.name().to_string());
        }
    }
    Ok(names)
}

/// Decode `bytes` as a zip archive and write its files below `dest`.
///
/// `dest` is destroyed and recreated first. When every file shares one
/// top-level folder, that folder is stripped. Directories are created on
/// demand as files are written; directory entries themselves are skipped.
///
/// # Errors
///
/// `Archive` for corrupt input or unsafe entry paths, `Filesystem` for write
/// failures.
pub fn extract_zip(bytes: &[u8], archive_name: &str, dest: &Path) -> Result<(), PipelineError> {
    let mut zip = ZipArchive::new(Cursor::new(bytes)).map_err(|e| archive_error(archive_name, e))?;

    let names = file_entries(&mut zip, archive_name)?;
    let prefix = flatten_prefix(names.iter().map(String::as_str));
    debug!(entries = names.len(), prefix = ?prefix, "extracting archive");

    if dest.exists() {
        std::fs::remove_dir_all(dest).map_err(|e| PipelineError::fs(dest, e))?;
    }
    std::fs::create_dir_all(dest).map_err(|e| PipelineError::fs(dest, e))?;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| archive_error(archive_name, e))?;
        if entry.is_dir() {
            continue;
        }
        let relative =
            entry_target(entry.name(), prefix.as_deref()).map_err(|r| archive_error(archive_name, r))?;
        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::fs(parent, e))?;
        }
        let mut file = std::fs::File::create(&target).map_err(|e| PipelineError::fs(&target, e))?;
        std::io::copy(&mut entry, &mut file).map_err(|e| PipelineError::fs(&target, e))?;
    }
    Ok(())
}
