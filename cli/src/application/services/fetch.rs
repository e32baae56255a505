//! Application service: download a stored image and load it into the engine.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Result, bail};
use mcphub_common::ServerRef;
use regex::Regex;
use tracing::info;

use crate::application::ports::{ContainerEngine, ObjectStore, ProgressReporter, SourceTree};
use crate::application::services::image::{combined_output, ensure_engine};

static LOADED_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"Loaded image(?: ID)?:\s*(\S+)").expect("valid regex")
});

/// Result of a successful pull.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PullOutcome {
    pub archive_path: PathBuf,
    /// Image reference reported by the engine, when it printed one.
    pub image: Option<String>,
    /// Engine output, trimmed.
    pub output: String,
}

impl PullOutcome {
    /// Repository part of the loaded image, suitable for `mcphub run`.
    #[must_use]
    pub fn run_hint(&self) -> Option<&str> {
        let image = self.image.as_deref()?;
        if image.starts_with("sha256:") {
            return None;
        }
        Some(image.split(':').next().unwrap_or(image))
    }
}

/// First image reference in `docker load` output.
#[must_use]
pub fn parse_loaded_image(output: &str) -> Option<String> {
    LOADED_IMAGE
        .captures(output)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Download `reference` into `downloads_dir/<name>.tar` and load it.
///
/// # Errors
///
/// Fails when the engine is unavailable, the download fails, or the engine
/// rejects the archive.
pub async fn pull(
    tree: &impl SourceTree,
    store: &impl ObjectStore,
    engine: &impl ContainerEngine,
    reporter: &impl ProgressReporter,
    reference: &ServerRef,
    downloads_dir: &Path,
) -> Result<PullOutcome> {
    ensure_engine(engine).await?;

    let key = reference.object_key();
    reporter.step(&format!("Downloading {key}..."));
    let bytes = store.get(&key).await?;

    let archive_path = downloads_dir.join(format!("{}.tar", reference.name));
    tree.write(&archive_path, &bytes)?;
    info!(%key, path = %archive_path.display(), "archive downloaded");

    reporter.step(&format!("Loading image from {}...", archive_path.display()));
    let output = engine.load(&archive_path).await?;
    let text = combined_output(&output);
    if !output.status.success() {
        bail!("failed to load image: {}", text.trim());
    }

    let text = text.trim().to_string();
    Ok(PullOutcome {
        image: parse_loaded_image(&text),
        archive_path,
        output: text,
    })
}
