//! Application service: upload an exported image archive to the store.

use mcphub_common::ObjectKey;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::application::ports::{ObjectStore, ProgressReporter, SourceTree};
use crate::domain::{BuildResult, PipelineError};

/// What was stored, for the summary shown to the user.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PublishOutcome {
    pub key: String,
    pub bytes: u64,
    pub sha256: String,
    /// Whether the local archive was deleted after upload.
    pub removed_local: bool,
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Upload `result.archive_path` under `<author>/<name>.tar`.
///
/// The local archive is removed after a successful upload unless
/// `keep_archive` is set; a failed upload never touches it.
///
/// # Errors
///
/// `Storage` for an unusable key or a failed upload, `Filesystem` when the
/// archive cannot be read.
pub async fn publish(
    tree: &impl SourceTree,
    store: &impl ObjectStore,
    reporter: &impl ProgressReporter,
    result: &BuildResult,
    keep_archive: bool,
) -> Result<PublishOutcome, PipelineError> {
    let server = &result.server;
    let key = ObjectKey::new(&server.author, &server.name)
        .map_err(|e| PipelineError::storage(format!("{}/{}", server.author, server.name), e))?;

    let bytes = tree.read(&result.archive_path)?;
    let size = bytes.len() as u64;
    let sha256 = sha256_hex(&bytes);

    reporter.step(&format!("Uploading {key}..."));
    store.put(&key, bytes).await?;
    info!(%key, size, "archive uploaded");

    let removed_local = if keep_archive {
        false
    } else {
        tree.remove(&result.archive_path)?;
        true
    };

    Ok(PublishOutcome {
        key: key.to_string(),
        bytes: size,
        sha256,
        removed_local,
    })
}
