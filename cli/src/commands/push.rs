//! `mcphub push`: package an archive into an image and publish it.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::{pipeline, publish};
use crate::output::human::format_bytes;

/// Arguments for the push command.
#[derive(Args)]
pub struct PushArgs {
    /// Zip archive containing the server project and its mcp.json
    pub archive: PathBuf,

    /// Keep the exported image archive after a successful upload
    #[arg(long)]
    pub keep_archive: bool,

    /// Abort if packaging takes longer than this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Run the push command.
///
/// # Errors
///
/// Returns an error if the archive is missing or too large, or if any
/// pipeline or upload step fails.
pub async fn run(app: &AppContext, args: &PushArgs) -> Result<ExitCode> {
    let meta = std::fs::metadata(&args.archive)
        .with_context(|| format!("cannot access archive {}", args.archive.display()))?;
    anyhow::ensure!(meta.is_file(), "{} is not a file", args.archive.display());

    let limit = app.config.max_archive_bytes();
    anyhow::ensure!(
        meta.len() <= limit,
        "archive is {} but the limit is {} (limits.max_archive_mb)",
        format_bytes(meta.len()),
        format_bytes(limit)
    );

    let archive_name = args
        .archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("archive path has no file name")?;
    let bytes = tokio::fs::read(&args.archive)
        .await
        .with_context(|| format!("cannot read {}", args.archive.display()))?;

    let store = app.store().await;
    let reporter = app.reporter();
    let config = app.pipeline_config();

    let packaging = pipeline::run(
        &app.tree,
        &app.engine,
        &reporter,
        &config,
        &bytes,
        &archive_name,
    );
    let result = match args.timeout {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), packaging)
            .await
            .map_err(|_| anyhow::anyhow!("packaging timed out after {secs}s"))??,
        None => packaging.await?,
    };

    let outcome =
        publish::publish(&app.tree, &store, &reporter, &result, args.keep_archive).await?;
    drop(reporter);

    app.renderer().render_push(&result, &outcome)?;
    Ok(ExitCode::SUCCESS)
}
