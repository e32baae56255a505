//! `mcphub pull`: download a published image and load it into the engine.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use mcphub_common::ServerRef;

use crate::app::AppContext;
use crate::application::services::fetch;

/// Arguments for the pull command.
#[derive(Args)]
pub struct PullArgs {
    /// Server to download, as <author>/<name>
    pub reference: String,
}

/// Run the pull command.
///
/// # Errors
///
/// Returns an error if the reference is malformed, the engine is
/// unavailable, or the download or load fails.
pub async fn run(app: &AppContext, args: &PullArgs) -> Result<ExitCode> {
    let reference: ServerRef = args.reference.parse()?;
    let store = app.store().await;
    let reporter = app.reporter();

    let outcome = fetch::pull(
        &app.tree,
        &store,
        &app.engine,
        &reporter,
        &reference,
        &app.paths.downloads_dir,
    )
    .await?;
    drop(reporter);

    app.renderer()
        .render_pull(&reference.to_string(), &outcome)?;
    Ok(ExitCode::SUCCESS)
}
