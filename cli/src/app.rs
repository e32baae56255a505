//! Application context: unified state passed to every command handler.
//!
//! `AppContext` is built once from the top-level flags and the loaded
//! configuration. Services receive explicit values taken from it and never
//! read configuration on their own.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::application::services::pipeline::PipelineConfig;
use crate::domain::config::{HubConfig, ResolvedPaths};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::{YamlConfigStore, hub_home};
use crate::infra::engine::DockerEngine;
use crate::infra::fs::LocalSourceTree;
use crate::infra::storage::ConfiguredStore;
use crate::output::{HumanRenderer, OutputContext, Renderer, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `MCPHUB_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Configuration file access.
    pub config_store: YamlConfigStore,
    /// Configuration as loaded at startup.
    pub config: HubConfig,
    /// Directories with defaults filled in.
    pub paths: ResolvedPaths,
    /// Local filesystem adapter.
    pub tree: LocalSourceTree,
    /// Container engine adapter.
    pub engine: DockerEngine<TokioCommandRunner>,
    /// When `true`, skip interactive prompts and use defaults.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be found or the config
    /// file cannot be parsed.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("MCPHUB_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let config_store = YamlConfigStore;
        let config = config_store.load()?;
        let paths = config.resolve_paths(&hub_home()?);
        let engine = DockerEngine::with_program(&config.engine.program);

        Ok(Self {
            // JSON mode keeps stdout for the result document only.
            output: OutputContext::new(
                flags.output.no_color,
                flags.output.quiet || flags.output.json,
            ),
            mode,
            config_store,
            config,
            paths,
            tree: LocalSourceTree,
            engine,
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json,
        }
    }

    /// Progress reporter for long-running services.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Object store selected by `storage.backend`.
    pub async fn store(&self) -> ConfiguredStore {
        ConfiguredStore::from_config(&self.config.storage, &self.paths.storage_root).await
    }

    /// Directories a packaging run works in.
    #[must_use]
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            work_root: self.paths.work_root.clone(),
            output_dir: self.paths.output_dir.clone(),
            publishable: true,
        }
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `MCPHUB_YES` env),
    /// returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
