//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::{Path, PathBuf};

use thiserror::Error;

// ── Pipeline errors ───────────────────────────────────────────────────────────

/// Every way a packaging run (or one of its collaborators) can fail.
///
/// Stages return their own variant and the orchestrator surfaces it as-is.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cannot read archive {name}: {reason}")]
    Archive { name: String, reason: String },

    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("mcp.json not found under {}", .root.display())]
    ManifestNotFound { root: PathBuf },

    #[error("invalid manifest {}: {reason}", .path.display())]
    ManifestInvalid {
        path: PathBuf,
        /// Required fields that were missing. Empty for decode failures.
        fields: Vec<&'static str>,
        reason: String,
    },

    #[error("image build failed for '{tag}'\nOutput: {output}")]
    BuildFailure { tag: String, output: String },

    #[error("image export failed for '{tag}'\nOutput: {output}")]
    ExportFailure { tag: String, output: String },

    #[error("container engine is not running or not installed: {reason}")]
    EngineUnavailable { reason: String },

    #[error("storage error for '{key}': {message}")]
    Storage { key: String, message: String },

    #[error("image '{tag}' is already being built by another run (lock: {})", .lock.display())]
    TagLocked { tag: String, lock: PathBuf },
}

impl PipelineError {
    /// Wrap an I/O error with the path it happened at.
    pub fn fs(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn storage(key: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Storage {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Stable machine-readable code used in JSON error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Archive { .. } => "archive_error",
            Self::Filesystem { .. } => "filesystem_error",
            Self::ManifestNotFound { .. } => "manifest_not_found",
            Self::ManifestInvalid { .. } => "manifest_invalid",
            Self::BuildFailure { .. } => "build_failure",
            Self::ExportFailure { .. } => "export_failure",
            Self::EngineUnavailable { .. } => "engine_unavailable",
            Self::Storage { .. } => "storage_error",
            Self::TagLocked { .. } => "tag_locked",
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}
