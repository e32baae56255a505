//! `mcphub init`: scaffold an `mcp.json` in the current directory.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use dialoguer::Input;
use mcphub_common::{MANIFEST_FILENAME, ServerDescriptor};

use crate::app::AppContext;
use crate::application::services::scaffold::{
    DEFAULT_ARGS, DEFAULT_COMMAND, DEFAULT_LICENSE, DEFAULT_PORT, DEFAULT_REPOSITORY_TYPE,
    DEFAULT_VERSION, InitAnswers, default_manifest, from_answers, render,
};

/// Arguments for the init command.
#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing mcp.json
    #[arg(long)]
    pub force: bool,
}

/// Run the init command.
///
/// # Errors
///
/// Returns an error if the current directory is unusable, a prompt fails,
/// or the file cannot be written.
pub fn run(app: &AppContext, args: &InitArgs) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    let path = cwd.join(MANIFEST_FILENAME);

    if path.exists()
        && !args.force
        && !app.confirm(&format!("{MANIFEST_FILENAME} already exists. Overwrite?"), false)?
    {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }

    let manifest = if app.non_interactive {
        default_manifest(&project_name(&cwd))
    } else {
        prompt_manifest(&project_name(&cwd))?
    };
    manifest
        .validate()
        .context("project name and run command are required")?;

    write_manifest(&path, &manifest)?;
    app.renderer().render_init(&manifest, &path)?;
    Ok(ExitCode::SUCCESS)
}

/// Directory name used as the default project name.
fn project_name(cwd: &Path) -> String {
    cwd.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "my-project".to_string())
}

fn write_manifest(path: &Path, manifest: &ServerDescriptor) -> Result<()> {
    std::fs::write(path, render(manifest)?)
        .with_context(|| format!("cannot write {}", path.display()))
}

fn ask(prompt: &str, default: &str) -> Result<String> {
    let input = Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true);
    let input = if default.is_empty() {
        input
    } else {
        input.default(default.to_string())
    };
    input.interact_text().with_context(|| format!("reading {prompt}"))
}

fn prompt_manifest(default_name: &str) -> Result<ServerDescriptor> {
    let answers = InitAnswers {
        name: ask("Project name", default_name)?,
        version: ask("Version", DEFAULT_VERSION)?,
        description: ask("Description", "")?,
        author: ask("Author", "")?,
        license: ask("License", DEFAULT_LICENSE)?,
        keywords: ask("Keywords (comma separated)", "")?,
        repository_type: ask("Repository type", DEFAULT_REPOSITORY_TYPE)?,
        repository_url: ask("Repository URL", "")?,
        command: ask("Run command", DEFAULT_COMMAND)?,
        args: ask("Run arguments (comma separated)", &DEFAULT_ARGS.join(","))?,
        port: ask("Port", &DEFAULT_PORT.to_string())?.trim().parse().ok(),
    };
    Ok(from_answers(&answers))
}
