//! JSON output helpers.
//!
//! `JsonRenderer` prints command results as pretty JSON on stdout, and
//! `format_error` builds the error object used by every `--json` code path
//! when a command fails.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::services::fetch::PullOutcome;
use crate::application::services::launch::LaunchOutcome;
use crate::application::services::publish::PublishOutcome;
use crate::domain::BuildResult;
use crate::domain::config::{HubConfig, ResolvedPaths};
use mcphub_common::ServerDescriptor;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails (should not happen in
/// practice: `serde_json` only fails on non-finite floats and maps with
/// non-string keys, neither of which appear here).
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("JSON serialization failed")?
    );
    Ok(())
}

/// Renders results as machine-readable JSON.
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn render_version(version: &str) -> Result<()> {
        print(&serde_json::json!({ "version": version }))
    }

    pub fn render_init(manifest: &ServerDescriptor, path: &std::path::Path) -> Result<()> {
        print(&serde_json::json!({ "path": path, "manifest": manifest }))
    }

    pub fn render_push(result: &BuildResult, publish: &PublishOutcome) -> Result<()> {
        print(&serde_json::json!({ "build": result, "upload": publish }))
    }

    pub fn render_pull(reference: &str, outcome: &PullOutcome) -> Result<()> {
        print(&serde_json::json!({ "reference": reference, "pull": outcome }))
    }

    pub fn render_launch(tag: &str, outcome: &LaunchOutcome) -> Result<()> {
        print(&serde_json::json!({ "image": tag, "container": outcome }))
    }

    pub fn render_list(servers: &[String]) -> Result<()> {
        print(&serde_json::json!({ "servers": servers }))
    }

    pub fn render_config_set(key: &str, value: &str) -> Result<()> {
        print(&serde_json::json!({ "key": key, "value": value }))
    }

    pub fn render_config(
        config: &HubConfig,
        path: &std::path::Path,
        paths: &ResolvedPaths,
    ) -> Result<()> {
        print(&serde_json::json!({
            "path": path,
            "config": config,
            "resolved": {
                "work_root": paths.work_root,
                "output_dir": paths.output_dir,
                "downloads_dir": paths.downloads_dir,
                "storage_root": paths.storage_root,
            },
        }))
    }
}
