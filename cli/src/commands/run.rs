//! `mcphub run`: start a container from a loaded image.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::RunOptions;
use crate::application::services::launch::{self, LaunchOutcome};

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Image to start, as printed by `mcphub pull`
    pub image: String,

    /// Run in the background
    #[arg(
        short,
        long,
        default_value_t = true,
        action = clap::ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub detach: bool,

    /// Port mapping, host:container
    #[arg(short, long, value_name = "HOST:CONTAINER")]
    pub port: Option<String>,

    /// Container name (defaults to the image name)
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Run the run command.
///
/// # Errors
///
/// Returns an error if the engine is unavailable or refuses to start the
/// container.
pub async fn run(app: &AppContext, args: &RunArgs) -> Result<ExitCode> {
    let name = args.name.as_deref().unwrap_or(&args.image);
    let opts = RunOptions {
        detached: args.detach,
        port_mapping: args.port.as_deref(),
        container_name: name,
    };
    let outcome = launch::start(&app.engine, &args.image, &opts).await?;
    app.renderer()
        .render_launch(&args.image, &outcome, args.port.as_deref())?;

    Ok(match outcome {
        LaunchOutcome::Exited { code: Some(code) } if code != 0 => {
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
        LaunchOutcome::Exited { code: None } => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}
