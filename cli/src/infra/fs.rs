//! Filesystem infrastructure: implements the `SourceTree` port.

use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt;
use mcphub_common::MANIFEST_FILENAME;
use tracing::debug;
use walkdir::WalkDir;

use crate::application::ports::{ScratchGuard, SourceTree};
use crate::domain::PipelineError;
use crate::infra::archive::extract_zip;

/// Prefix of temporary export directories.
pub const SCRATCH_PREFIX: &str = "mcphub-";

/// Production `SourceTree` over the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalSourceTree;

/// Exclusive per-tag advisory lock.
///
/// The lock is tied to the open file handle, so the OS releases it when the
/// handle closes, including when the process is killed mid-build. The lock
/// file itself stays in place and is reused by later runs.
#[derive(Debug)]
pub struct TagLock {
    path: PathBuf,
    _file: File,
}

impl TagLock {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Lock file name for an image tag; path separators are not allowed in it.
#[must_use]
pub fn lock_file_name(tag: &str) -> String {
    let safe: String = tag
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    format!("{safe}.lock")
}

/// Take the exclusive lock for `tag`.
///
/// A lock file left behind by a run that died is not held by anyone and is
/// taken over. The holder's PID is recorded in the file for diagnostics.
///
/// # Errors
///
/// `TagLocked` when another live run holds the lock, `Filesystem` otherwise.
pub fn acquire_tag_lock(lock_dir: &Path, tag: &str) -> Result<TagLock, PipelineError> {
    std::fs::create_dir_all(lock_dir).map_err(|e| PipelineError::fs(lock_dir, e))?;
    let path = lock_dir.join(lock_file_name(tag));
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&path)
        .map_err(|e| PipelineError::fs(&path, e))?;

    let acquired = FileExt::try_lock_exclusive(&file).map_err(|e| PipelineError::fs(&path, e))?;
    if !acquired {
        return Err(PipelineError::TagLocked {
            tag: tag.to_string(),
            lock: path,
        });
    }

    file.set_len(0).map_err(|e| PipelineError::fs(&path, e))?;
    writeln!(file, "{}", std::process::id()).map_err(|e| PipelineError::fs(&path, e))?;
    debug!(tag, lock = %path.display(), "tag lock acquired");
    Ok(TagLock { path, _file: file })
}

impl SourceTree for LocalSourceTree {
    fn normalize(
        &self,
        archive: &[u8],
        archive_name: &str,
        dest: &Path,
    ) -> Result<(), PipelineError> {
        extract_zip(archive, archive_name, dest)
    }

    fn find_manifests(&self, root: &Path) -> Result<Vec<PathBuf>, PipelineError> {
        let mut found = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                PipelineError::fs(path, std::io::Error::other(e))
            })?;
            if entry.file_type().is_file() && entry.file_name() == MANIFEST_FILENAME {
                if let Ok(relative) = entry.path().strip_prefix(root) {
                    found.push(relative.to_path_buf());
                }
            }
        }
        Ok(found)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, PipelineError> {
        std::fs::read(path).map_err(|e| PipelineError::fs(path, e))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), PipelineError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::fs(parent, e))?;
        }
        std::fs::write(path, contents).map_err(|e| PipelineError::fs(path, e))
    }

    fn relocate(&self, from: &Path, to: &Path) -> Result<(), PipelineError> {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::fs(parent, e))?;
        }
        if std::fs::rename(from, to).is_ok() {
            return Ok(());
        }
        // rename fails across filesystems (temp dir on tmpfs, output on disk).
        std::fs::copy(from, to).map_err(|e| PipelineError::fs(to, e))?;
        std::fs::remove_file(from).map_err(|e| PipelineError::fs(from, e))
    }

    fn remove(&self, path: &Path) -> Result<(), PipelineError> {
        std::fs::remove_file(path).map_err(|e| PipelineError::fs(path, e))
    }

    fn absolute(&self, path: &Path) -> Result<PathBuf, PipelineError> {
        std::path::absolute(path).map_err(|e| PipelineError::fs(path, e))
    }

    fn scratch_dir(&self) -> Result<(PathBuf, ScratchGuard), PipelineError> {
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir()
            .map_err(|e| PipelineError::fs(std::env::temp_dir(), e))?;
        Ok((dir.path().to_path_buf(), Box::new(dir)))
    }

    fn lock_tag(&self, lock_dir: &Path, tag: &str) -> Result<ScratchGuard, PipelineError> {
        Ok(Box::new(acquire_tag_lock(lock_dir, tag)?))
    }
}
