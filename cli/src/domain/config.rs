//! Domain types and validators for mcphub configuration.
//!
//! Pure functions only. No I/O, no async, no filesystem access.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "workspace.root",
    "workspace.output",
    "workspace.downloads",
    "engine.program",
    "storage.backend",
    "storage.root",
    "storage.endpoint",
    "storage.bucket",
    "limits.max_archive_mb",
];
pub const VALID_STORAGE_BACKENDS: &[&str] = &["fs", "s3"];

pub const DEFAULT_ENGINE_PROGRAM: &str = "docker";
pub const DEFAULT_BUCKET: &str = "mcp-servers";
pub const DEFAULT_MAX_ARCHIVE_MB: u64 = 100;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.mcphub/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct HubConfig {
    pub workspace: WorkspaceConfig,
    pub engine: EngineConfig,
    pub storage: StorageConfig,
    pub limits: LimitsConfig,
}

/// Local directories used by packaging runs. Unset entries live under the
/// mcphub home directory.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Scratch root holding per-run extraction directories and tag locks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    /// Where exported image archives are relocated after a run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Where pulled archives are downloaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloads: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Container engine executable, e.g. `docker` or `podman`.
    #[serde(default = "default_engine_program")]
    pub program: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: default_engine_program(),
        }
    }
}

/// Which object store backs `push`, `pull` and `list`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// A local directory acting as the bucket.
    #[default]
    Fs,
    /// An S3 bucket, or an S3-compatible service at `storage.endpoint`.
    S3,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Bucket directory for the `fs` backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    /// Custom endpoint for the `s3` backend (MinIO, LocalStack). AWS when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub bucket: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            root: None,
            endpoint: None,
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest archive `push` accepts, in MiB.
    pub max_archive_mb: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_archive_mb: DEFAULT_MAX_ARCHIVE_MB,
        }
    }
}

fn default_engine_program() -> String {
    DEFAULT_ENGINE_PROGRAM.to_string()
}

/// Directories after defaults have been filled in from the mcphub home.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub work_root: PathBuf,
    pub output_dir: PathBuf,
    pub downloads_dir: PathBuf,
    pub storage_root: PathBuf,
}

impl HubConfig {
    /// Fill unset directories with their defaults under `home`.
    #[must_use]
    pub fn resolve_paths(&self, home: &Path) -> ResolvedPaths {
        let pick = |value: &Option<PathBuf>, default: &str| {
            value.clone().unwrap_or_else(|| home.join(default))
        };
        ResolvedPaths {
            work_root: pick(&self.workspace.root, "work"),
            output_dir: pick(&self.workspace.output, "images"),
            downloads_dir: pick(&self.workspace.downloads, "downloads"),
            storage_root: pick(&self.storage.root, "registry"),
        }
    }

    /// Largest accepted archive in bytes.
    #[must_use]
    pub fn max_archive_bytes(&self) -> u64 {
        self.limits.max_archive_mb.saturating_mul(1024 * 1024)
    }

    /// Current value of a setting, `None` when unset.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());
        match key {
            "workspace.root" => path(&self.workspace.root),
            "workspace.output" => path(&self.workspace.output),
            "workspace.downloads" => path(&self.workspace.downloads),
            "engine.program" => Some(self.engine.program.clone()),
            "storage.backend" => Some(
                match self.storage.backend {
                    StorageBackend::Fs => "fs",
                    StorageBackend::S3 => "s3",
                }
                .to_string(),
            ),
            "storage.root" => path(&self.storage.root),
            "storage.endpoint" => self.storage.endpoint.clone(),
            "storage.bucket" => Some(self.storage.bucket.clone()),
            "limits.max_archive_mb" => Some(self.limits.max_archive_mb.to_string()),
            _ => None,
        }
    }

    /// Validate and apply a single `key = value` setting.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid for it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        match key {
            "workspace.root" => self.workspace.root = Some(PathBuf::from(value)),
            "workspace.output" => self.workspace.output = Some(PathBuf::from(value)),
            "workspace.downloads" => self.workspace.downloads = Some(PathBuf::from(value)),
            "engine.program" => self.engine.program = value.to_string(),
            "storage.backend" => {
                self.storage.backend = if value == "s3" {
                    StorageBackend::S3
                } else {
                    StorageBackend::Fs
                };
            }
            "storage.root" => self.storage.root = Some(PathBuf::from(value)),
            "storage.endpoint" => {
                self.storage.endpoint = Some(value.trim_end_matches('/').to_string());
            }
            "storage.bucket" => self.storage.bucket = value.to_string(),
            "limits.max_archive_mb" => self.limits.max_archive_mb = value.parse()?,
            _ => unreachable!("key validated above"),
        }
        Ok(())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |valid: &str| -> Result<()> {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            valid: valid.to_string(),
        }
        .into())
    };
    match key {
        "storage.backend" if !VALID_STORAGE_BACKENDS.contains(&value) => {
            invalid(&VALID_STORAGE_BACKENDS.join(", "))
        }
        "limits.max_archive_mb" if !value.parse::<u64>().is_ok_and(|n| n > 0) => {
            invalid("a positive integer")
        }
        "storage.endpoint"
            if !(value.starts_with("http://") || value.starts_with("https://")) =>
        {
            invalid("an http:// or https:// URL")
        }
        _ if value.trim().is_empty() => invalid("a non-empty string"),
        _ => Ok(()),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
