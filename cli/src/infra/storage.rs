//! Infrastructure implementations of the `ObjectStore` port.
//!
//! `FsObjectStore` treats a local directory as the bucket. `S3ObjectStore`
//! talks to S3, or an S3-compatible service, through the AWS SDK and the
//! default credential chain.

use std::path::{Path, PathBuf};

use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use mcphub_common::ObjectKey;
use tracing::debug;
use walkdir::WalkDir;

use crate::application::ports::ObjectStore;
use crate::domain::PipelineError;
use crate::domain::config::{StorageBackend, StorageConfig};

// ── Filesystem store ──────────────────────────────────────────────────────────

/// Bucket backed by a local directory.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, key: &ObjectKey) -> PathBuf {
        key.as_str().split('/').fold(self.root.clone(), |p, s| p.join(s))
    }
}

/// All keys below `root`, `/`-joined, that start with `prefix`.
fn walk_keys(root: &Path, prefix: &str) -> Result<Vec<String>, PipelineError> {
    if !root.exists() {
        return Ok(Vec::new());
    }
    let mut keys = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| PipelineError::storage(prefix, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let key = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if key.starts_with(prefix) {
            keys.push(key);
        }
    }
    Ok(keys)
}

impl ObjectStore for FsObjectStore {
    async fn put(&self, key: &ObjectKey, bytes: Vec<u8>) -> Result<(), PipelineError> {
        let path = self.object_path(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PipelineError::storage(key.as_str(), e))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| PipelineError::storage(key.as_str(), e))?;
        debug!(%key, path = %path.display(), "object stored");
        Ok(())
    }

    async fn get(&self, key: &ObjectKey) -> Result<Vec<u8>, PipelineError> {
        let path = self.object_path(key);
        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PipelineError::storage(key.as_str(), "object not found")
            } else {
                PipelineError::storage(key.as_str(), e)
            }
        })
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, PipelineError> {
        let root = self.root.clone();
        let owned = prefix.to_string();
        tokio::task::spawn_blocking(move || walk_keys(&root, &owned))
            .await
            .map_err(|e| PipelineError::storage(prefix, e))?
    }
}

// ── S3 store ──────────────────────────────────────────────────────────────────

/// Bucket reached through the AWS SDK.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    bucket: String,
    client: Client,
}

impl S3ObjectStore {
    /// Client from the environment (`AWS_*` variables, profiles, SSO, IMDS).
    ///
    /// With `endpoint` set, requests go there using path-style addressing.
    pub async fn new(bucket: &str, endpoint: Option<&str>) -> Self {
        let shared = aws_config::load_from_env().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        Self::with_client(bucket, Client::from_conf(builder.build()))
    }

    #[must_use]
    pub fn with_client(bucket: &str, client: Client) -> Self {
        Self {
            bucket: bucket.to_string(),
            client,
        }
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &ObjectKey, bytes: Vec<u8>) -> Result<(), PipelineError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .content_type("application/x-tar")
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| PipelineError::storage(key.as_str(), DisplayErrorContext(&e)))?;
        debug!(%key, bucket = %self.bucket, "object uploaded");
        Ok(())
    }

    async fn get(&self, key: &ObjectKey) -> Result<Vec<u8>, PipelineError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(GetObjectError::is_no_such_key) {
                    PipelineError::storage(key.as_str(), "object not found")
                } else {
                    PipelineError::storage(key.as_str(), DisplayErrorContext(&e))
                }
            })?;
        let data = output
            .body
            .collect()
            .await
            .map_err(|e| PipelineError::storage(key.as_str(), e))?;
        Ok(data.into_bytes().to_vec())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, PipelineError> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .into_paginator()
            .send();
        let mut keys = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| PipelineError::storage(prefix, DisplayErrorContext(&e)))?;
            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );
        }
        Ok(keys)
    }
}

// ── Configured store ──────────────────────────────────────────────────────────

/// The store selected by `storage.backend`.
#[derive(Debug, Clone)]
pub enum ConfiguredStore {
    Fs(FsObjectStore),
    S3(S3ObjectStore),
}

impl ConfiguredStore {
    /// Build the configured backend. `fs_root` is the resolved `storage.root`.
    pub async fn from_config(storage: &StorageConfig, fs_root: &Path) -> Self {
        match storage.backend {
            StorageBackend::Fs => Self::Fs(FsObjectStore::new(fs_root)),
            StorageBackend::S3 => Self::S3(
                S3ObjectStore::new(&storage.bucket, storage.endpoint.as_deref()).await,
            ),
        }
    }
}

impl ObjectStore for ConfiguredStore {
    async fn put(&self, key: &ObjectKey, bytes: Vec<u8>) -> Result<(), PipelineError> {
        match self {
            Self::Fs(s) => s.put(key, bytes).await,
            Self::S3(s) => s.put(key, bytes).await,
        }
    }

    async fn get(&self, key: &ObjectKey) -> Result<Vec<u8>, PipelineError> {
        match self {
            Self::Fs(s) => s.get(key).await,
            Self::S3(s) => s.get(key).await,
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, PipelineError> {
        match self {
            Self::Fs(s) => s.list(prefix).await,
            Self::S3(s) => s.list(prefix).await,
        }
    }
}
