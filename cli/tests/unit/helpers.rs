//! Shared test helpers: mock ports, output constructors and archive fixtures.

#![allow(dead_code, clippy::expect_used)]

use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::sync::Mutex;

use anyhow::Result;
use mcphub_cli::application::ports::{ContainerEngine, ObjectStore, ProgressReporter, RunOptions};
use mcphub_cli::domain::PipelineError;
use mcphub_common::ObjectKey;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
/// On Windows `ExitStatusExt::from_raw` takes the exit code directly.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Archive fixtures ─────────────────────────────────────────────────────────

/// Zip archive with the given entries. Names ending in `/` become directory
/// entries.
pub fn zip_of(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = SimpleFileOptions::default();
    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, opts).expect("add dir");
        } else {
            writer.start_file(*name, opts).expect("start file");
            writer.write_all(data).expect("write entry");
        }
    }
    writer.finish().expect("finish zip").into_inner()
}

/// A manifest document with the fields the pipeline cares about.
pub fn manifest_json(name: &str, command: &str, args: &[&str], port: u16) -> Vec<u8> {
    serde_json::json!({
        "name": name,
        "version": "1.0.0",
        "description": "test server",
        "author": "alice",
        "run": { "command": command, "args": args, "port": port },
    })
    .to_string()
    .into_bytes()
}

// ── Container engine mock ────────────────────────────────────────────────────

/// Engine double that records every call and answers with canned outputs.
///
/// A successful `save` writes `IMAGE_BYTES` to the destination, like the real
/// engine would.
pub struct RecordingEngine {
    pub available: bool,
    pub build_output: Output,
    pub save_output: Output,
    pub load_output: Output,
    pub run_output: Output,
    pub calls: Mutex<Vec<String>>,
    pub build_context: Mutex<Option<PathBuf>>,
    pub save_dest: Mutex<Option<PathBuf>>,
}

pub const IMAGE_BYTES: &[u8] = b"fake image archive";

impl RecordingEngine {
    pub fn ok() -> Self {
        Self {
            available: true,
            build_output: ok_output(b"Successfully built abc123\n"),
            save_output: ok_output(b""),
            load_output: ok_output(b"Loaded image: demo:latest\n"),
            run_output: ok_output(b"c0ffee42\n"),
            calls: Mutex::new(Vec::new()),
            build_context: Mutex::new(None),
            save_dest: Mutex::new(None),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::ok()
        }
    }

    pub fn failing_build(stderr: &[u8]) -> Self {
        Self {
            build_output: err_output(1, stderr),
            ..Self::ok()
        }
    }

    pub fn failing_save(stderr: &[u8]) -> Self {
        Self {
            save_output: err_output(1, stderr),
            ..Self::ok()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

impl ContainerEngine for RecordingEngine {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn build(&self, context_dir: &Path, tag: &str) -> Result<Output> {
        self.record(format!("build {tag}"));
        *self.build_context.lock().expect("context lock") = Some(context_dir.to_path_buf());
        Ok(self.build_output.clone())
    }

    async fn save(&self, tag: &str, dest: &Path) -> Result<Output> {
        self.record(format!("save {tag}"));
        *self.save_dest.lock().expect("dest lock") = Some(dest.to_path_buf());
        if self.save_output.status.success() {
            std::fs::write(dest, IMAGE_BYTES)?;
        }
        Ok(self.save_output.clone())
    }

    async fn load(&self, src: &Path) -> Result<Output> {
        self.record(format!("load {}", src.display()));
        Ok(self.load_output.clone())
    }

    async fn run_detached(&self, tag: &str, opts: &RunOptions<'_>) -> Result<Output> {
        self.record(format!("run -d {tag} as {}", opts.container_name));
        Ok(self.run_output.clone())
    }

    async fn run_attached(&self, tag: &str, _: &RunOptions<'_>) -> Result<ExitStatus> {
        self.record(format!("run -it {tag}"));
        Ok(self.run_output.status)
    }
}

// ── Object store mock ────────────────────────────────────────────────────────

/// In-memory bucket.
#[derive(Default)]
pub struct MemoryStore {
    pub objects: Mutex<BTreeMap<String, Vec<u8>>>,
    pub fail_puts: bool,
}

impl MemoryStore {
    pub fn with(key: &str, bytes: &[u8]) -> Self {
        let store = Self::default();
        store
            .objects
            .lock()
            .expect("objects lock")
            .insert(key.to_string(), bytes.to_vec());
        store
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .expect("objects lock")
            .keys()
            .cloned()
            .collect()
    }
}

impl ObjectStore for MemoryStore {
    async fn put(&self, key: &ObjectKey, bytes: Vec<u8>) -> Result<(), PipelineError> {
        if self.fail_puts {
            return Err(PipelineError::storage(key.as_str(), "HTTP 503"));
        }
        self.objects
            .lock()
            .expect("objects lock")
            .insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get(&self, key: &ObjectKey) -> Result<Vec<u8>, PipelineError> {
        self.objects
            .lock()
            .expect("objects lock")
            .get(key.as_str())
            .cloned()
            .ok_or_else(|| PipelineError::storage(key.as_str(), "object not found"))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, PipelineError> {
        Ok(self
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(prefix))
            .collect())
    }
}

// ── Progress reporter mock ───────────────────────────────────────────────────

/// Reporter that drops every message.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}
