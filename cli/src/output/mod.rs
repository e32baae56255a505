//! Output formatting module

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use std::path::Path;

use anyhow::Result;
use console::Term;
use mcphub_common::ServerDescriptor;
use owo_colors::OwoColorize as _;

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

use crate::application::services::fetch::PullOutcome;
use crate::application::services::launch::LaunchOutcome;
use crate::application::services::publish::PublishOutcome;
use crate::domain::BuildResult;
use crate::domain::config::{HubConfig, ResolvedPaths};

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

/// Picks human or JSON rendering once, so commands never branch on `--json`.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json,
}

impl Renderer<'_> {
    pub fn render_version(&self, version: &str) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_version(version);
                Ok(())
            }
            Self::Json => JsonRenderer::render_version(version),
        }
    }

    pub fn render_init(&self, manifest: &ServerDescriptor, path: &Path) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_init(manifest, path);
                Ok(())
            }
            Self::Json => JsonRenderer::render_init(manifest, path),
        }
    }

    pub fn render_push(&self, result: &BuildResult, publish: &PublishOutcome) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_push(result, publish);
                Ok(())
            }
            Self::Json => JsonRenderer::render_push(result, publish),
        }
    }

    pub fn render_pull(&self, reference: &str, outcome: &PullOutcome) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_pull(outcome);
                Ok(())
            }
            Self::Json => JsonRenderer::render_pull(reference, outcome),
        }
    }

    pub fn render_launch(
        &self,
        tag: &str,
        outcome: &LaunchOutcome,
        port: Option<&str>,
    ) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_launch(tag, outcome, port);
                Ok(())
            }
            Self::Json => JsonRenderer::render_launch(tag, outcome),
        }
    }

    pub fn render_list(&self, servers: &[String]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_list(servers);
                Ok(())
            }
            Self::Json => JsonRenderer::render_list(servers),
        }
    }

    pub fn render_config_set(&self, key: &str, value: &str) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_config_set(key, value);
                Ok(())
            }
            Self::Json => JsonRenderer::render_config_set(key, value),
        }
    }

    pub fn render_config(
        &self,
        config: &HubConfig,
        path: &Path,
        paths: &ResolvedPaths,
    ) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_config(config, path, paths);
                Ok(())
            }
            Self::Json => JsonRenderer::render_config(config, path, paths),
        }
    }
}
