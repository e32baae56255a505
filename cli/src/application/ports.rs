//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `mcphub_common`, never
//! from `crate::infra`, `crate::commands`, or `crate::output`.

use std::any::Any;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;
use mcphub_common::ObjectKey;

use crate::domain::PipelineError;
use crate::domain::config::HubConfig;

// ── Value Types ───────────────────────────────────────────────────────────────

/// Options for starting a container from a stored image.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions<'a> {
    /// Run in the background and return the container id.
    pub detached: bool,
    /// Optional `host:container` port mapping.
    pub port_mapping: Option<&'a str>,
    /// Name given to the container.
    pub container_name: &'a str,
}

/// Scratch resource whose cleanup happens on drop (temp dir, lock file).
pub type ScratchGuard = Box<dyn Any>;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// No timeout is applied; image builds may legitimately take minutes.
    /// Callers wanting a bound wrap the future themselves.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program inside `dir` and capture its output.
    async fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
}

// ── Container Engine Port ─────────────────────────────────────────────────────

/// The external container engine. Every call returns the raw process output;
/// services decide what a non-zero exit means.
#[allow(async_fn_in_trait)]
pub trait ContainerEngine {
    /// Whether the engine daemon answers at all.
    async fn is_available(&self) -> bool;
    /// Build `tag` from the descriptor inside `context_dir`.
    async fn build(&self, context_dir: &Path, tag: &str) -> Result<Output>;
    /// Save a built image to a single-file archive.
    async fn save(&self, tag: &str, dest: &Path) -> Result<Output>;
    /// Load an image archive into the engine.
    async fn load(&self, src: &Path) -> Result<Output>;
    /// Start a detached container. Stdout carries the container id.
    async fn run_detached(&self, tag: &str, opts: &RunOptions<'_>) -> Result<Output>;
    /// Start a foreground container attached to the terminal.
    async fn run_attached(&self, tag: &str, opts: &RunOptions<'_>) -> Result<ExitStatus>;
}

// ── Source Tree Port ──────────────────────────────────────────────────────────

/// Filesystem side of a packaging run: extraction, discovery and scratch space.
pub trait SourceTree {
    /// Extract `archive` into `dest`, destroying any previous content there.
    ///
    /// # Errors
    ///
    /// `Archive` for undecodable input, `Filesystem` for write failures.
    fn normalize(&self, archive: &[u8], archive_name: &str, dest: &Path)
    -> Result<(), PipelineError>;
    /// Every file named `mcp.json` under `root`, as paths relative to `root`.
    fn find_manifests(&self, root: &Path) -> Result<Vec<PathBuf>, PipelineError>;
    /// Read a whole file.
    fn read(&self, path: &Path) -> Result<Vec<u8>, PipelineError>;
    /// Write a whole file, creating parent directories.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), PipelineError>;
    /// Move a file, falling back to copy + remove across filesystems.
    fn relocate(&self, from: &Path, to: &Path) -> Result<(), PipelineError>;
    /// Delete a file.
    fn remove(&self, path: &Path) -> Result<(), PipelineError>;
    /// Absolute form of `path`.
    fn absolute(&self, path: &Path) -> Result<PathBuf, PipelineError>;
    /// Create a uniquely named temporary directory.
    ///
    /// Returns `(path, guard)`; the directory is deleted when `guard` drops.
    fn scratch_dir(&self) -> Result<(PathBuf, ScratchGuard), PipelineError>;
    /// Take the exclusive lock for `tag` under `lock_dir`.
    ///
    /// # Errors
    ///
    /// `TagLocked` when another run holds it.
    fn lock_tag(&self, lock_dir: &Path, tag: &str) -> Result<ScratchGuard, PipelineError>;
}

// ── Object Storage Port ───────────────────────────────────────────────────────

/// Remote (or local) bucket holding exported image archives.
#[allow(async_fn_in_trait)]
pub trait ObjectStore {
    /// Store `bytes` under `key`, replacing any existing object.
    async fn put(&self, key: &ObjectKey, bytes: Vec<u8>) -> Result<(), PipelineError>;
    /// Fetch the object stored under `key`.
    async fn get(&self, key: &ObjectKey) -> Result<Vec<u8>, PipelineError>;
    /// Raw keys that start with `prefix`.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, PipelineError>;
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when none is stored.
    fn load(&self) -> Result<HubConfig>;
    /// Persist the configuration.
    fn save(&self, config: &HubConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
