//! `mcphub list`: show servers published to the configured store.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::catalog;

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Only show servers whose key starts with this prefix (e.g. an author)
    pub prefix: Option<String>,
}

/// Run the list command.
///
/// # Errors
///
/// Returns an error if the store cannot be listed.
pub async fn run(app: &AppContext, args: &ListArgs) -> Result<ExitCode> {
    let store = app.store().await;
    let servers = catalog::list_servers(&store, args.prefix.as_deref().unwrap_or("")).await?;
    app.renderer().render_list(&servers)?;
    Ok(ExitCode::SUCCESS)
}
