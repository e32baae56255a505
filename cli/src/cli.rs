//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;
use crate::domain::PipelineError;

/// Package MCP server archives into container images and share them
#[derive(Parser)]
#[command(
    name = "mcphub",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip prompts and use defaults
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an mcp.json in the current directory
    Init(commands::init::InitArgs),

    /// Build an image from a zip archive and upload it
    Push(commands::push::PushArgs),

    /// Download a published image and load it
    Pull(commands::pull::PullArgs),

    /// Start a container from a loaded image
    Run(commands::run::RunArgs),

    /// List published servers
    List(commands::list::ListArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the context cannot be built or the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose: _,
            yes,
            command,
        } = self;

        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes },
        })?;

        match command {
            Command::Init(args) => commands::init::run(&app, &args),
            Command::Push(args) => commands::push::run(&app, &args).await,
            Command::Pull(args) => commands::pull::run(&app, &args).await,
            Command::Run(args) => commands::run::run(&app, &args).await,
            Command::List(args) => commands::list::run(&app, &args).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Version => commands::version::run(&app),
        }
    }
}

/// Stable error code for `--json` output.
///
/// Pipeline failures carry their own code; everything else is reported as
/// a generic `error`.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<PipelineError>())
        .map_or("error", PipelineError::code)
}
