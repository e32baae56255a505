//! Per-run identity and the result of a packaging run.

use std::path::{Path, PathBuf};

use anyhow::Result;
use mcphub_common::ServerDescriptor;
use serde::Serialize;

/// Identifies one pipeline run; scopes its scratch directories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Generate a fresh run identifier.
    ///
    /// Format: `run-` followed by 16 lowercase hex characters.
    /// Entropy sources: nanosecond timestamp and two independent `RandomState` hashes.
    #[must_use]
    pub fn generate() -> Self {
        use std::collections::hash_map::RandomState;
        use std::hash::{BuildHasher, Hasher};

        let mut hasher = RandomState::new().build_hasher();
        hasher.write_u128(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0),
        );
        hasher.write_u64(RandomState::new().build_hasher().finish());
        hasher.write_u64(RandomState::new().build_hasher().finish());
        Self(format!("run-{:016x}", hasher.finish()))
    }

    /// Parse an existing run identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID doesn't match `run-` + 16 hex chars.
    pub fn parse(id: &str) -> Result<Self> {
        let valid = id.len() == 20
            && id.starts_with("run-")
            && id[4..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase());
        anyhow::ensure!(valid, "Invalid run ID: {id}");
        Ok(Self(id.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extraction directory of this run for an archive stem.
    #[must_use]
    pub fn extraction_dir(&self, work_root: &Path, stem: &str) -> PathBuf {
        work_root.join(&self.0).join(stem)
    }

    /// Final location of this run's exported image archive.
    #[must_use]
    pub fn output_archive(&self, output_dir: &Path, stem: &str) -> PathBuf {
        output_dir.join(&self.0).join(format!("{stem}.tar"))
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a successful packaging run. All paths are absolute.
#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
    pub run_id: RunId,
    pub extracted_path: PathBuf,
    pub descriptor_path: PathBuf,
    pub image_tag: String,
    pub archive_path: PathBuf,
    pub server: ServerDescriptor,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
