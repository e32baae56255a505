//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;
use mcphub_common::ServerDescriptor;

use crate::application::services::fetch::PullOutcome;
use crate::application::services::launch::LaunchOutcome;
use crate::application::services::publish::PublishOutcome;
use crate::domain::BuildResult;
use crate::domain::config::{HubConfig, ResolvedPaths, VALID_CONFIG_KEYS};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    pub fn render_version(&self, version: &str) {
        println!("mcphub {version}");
    }

    pub fn render_init(&self, manifest: &ServerDescriptor, path: &Path) {
        self.ctx
            .success(&format!("{} created", path.display()));
        self.ctx
            .kv("Project:", &format!("{} v{}", manifest.name, manifest.version));
        if !manifest.description.is_empty() {
            self.ctx.kv("Description:", &manifest.description);
        }
    }

    /// Summary after a successful `push`.
    pub fn render_push(&self, result: &BuildResult, publish: &PublishOutcome) {
        if self.ctx.quiet {
            return;
        }
        let server = &result.server;
        println!();
        self.ctx.header(&format!("{} v{}", server.name, server.version));
        self.ctx
            .kv("Extracted to:", &result.extracted_path.display().to_string());
        self.ctx
            .kv("Descriptor:  ", &result.descriptor_path.display().to_string());
        self.ctx.kv(
            "Image:       ",
            &result.image_tag.style(self.ctx.styles.accent).to_string(),
        );
        self.ctx.kv("Stored as:   ", &publish.key);
        self.ctx.kv("SHA-256:     ", &publish.sha256);
        self.ctx.kv("Size:        ", &format_bytes(publish.bytes));
        if publish.removed_local {
            self.ctx.kv("Archive:     ", "removed after upload");
        } else {
            self.ctx
                .kv("Archive:     ", &result.archive_path.display().to_string());
        }
        if !server.description.is_empty() {
            self.ctx.kv("Description: ", &server.description);
        }
        if !server.author.is_empty() {
            self.ctx.kv("Author:      ", &server.author);
        }
        if !server.keywords.is_empty() {
            let keywords: Vec<&str> = server.keywords.iter().map(String::as_str).collect();
            self.ctx.kv("Keywords:    ", &keywords.join(", "));
        }
        println!();
        self.ctx.info(&format!("Pull it elsewhere with: mcphub pull {}", key_reference(&publish.key)));
    }

    pub fn render_pull(&self, outcome: &PullOutcome) {
        self.ctx.success("Image loaded");
        if let Some(image) = &outcome.image {
            self.ctx.kv("Image:", image);
        }
        if let Some(hint) = outcome.run_hint() {
            self.ctx.info(&format!("You can now run: mcphub run {hint}"));
        }
    }

    pub fn render_launch(&self, tag: &str, outcome: &LaunchOutcome, port: Option<&str>) {
        match outcome {
            LaunchOutcome::Detached { container_id, name } => {
                self.ctx.success(&format!("Container started from {tag}"));
                self.ctx.kv("Container ID:  ", container_id);
                self.ctx.kv("Container name:", name);
                if let Some(port) = port {
                    self.ctx.kv("Port mapping:  ", port);
                }
                self.ctx.info(&format!("To view logs: docker logs {name}"));
                self.ctx.info(&format!("To stop: docker stop {name}"));
            }
            LaunchOutcome::Exited { code: Some(0) } => {
                self.ctx.success("Container exited");
            }
            LaunchOutcome::Exited { code } => {
                let code = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                self.ctx.warn(&format!("Container exited with status {code}"));
            }
        }
    }

    pub fn render_list(&self, servers: &[String]) {
        if servers.is_empty() {
            if !self.ctx.quiet {
                println!("No servers published yet. Publish one: mcphub push <archive.zip>");
            }
            return;
        }
        for server in servers {
            println!("  {server}");
        }
    }

    pub fn render_config_set(&self, key: &str, value: &str) {
        self.ctx.success(&format!("Set {key} = {value}"));
    }

    /// Render the current mcphub configuration.
    pub fn render_config(&self, config: &HubConfig, path: &Path, paths: &ResolvedPaths) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        for key in VALID_CONFIG_KEYS {
            let value = config.get(key).unwrap_or_else(|| "(default)".to_string());
            println!("  {:<24} {value}", format!("{key}:"));
        }
        println!();
        println!("  {}", "Effective paths:".style(self.ctx.styles.bold));
        println!("    {:<18} {}", "work root:", paths.work_root.display());
        println!("    {:<18} {}", "images:", paths.output_dir.display());
        println!("    {:<18} {}", "downloads:", paths.downloads_dir.display());
        println!("    {:<18} {}", "registry:", paths.storage_root.display());
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["MCPHUB_CONFIG", "MCPHUB_LOG", "NO_COLOR"] {
            println!(
                "    {:<18} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
    }
}

/// `author/name` from a storage key.
fn key_reference(key: &str) -> &str {
    key.strip_suffix(".tar").unwrap_or(key)
}

/// Human-readable byte count, e.g. `12.3 MB`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
