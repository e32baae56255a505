//! Application service: scaffold a new `mcp.json`.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use mcphub_common::{Repository, RunConfig, ServerDescriptor};

pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_LICENSE: &str = "MIT";
pub const DEFAULT_REPOSITORY_TYPE: &str = "git";
pub const DEFAULT_COMMAND: &str = "node";
pub const DEFAULT_ARGS: &[&str] = &["index.js"];
pub const DEFAULT_PORT: u16 = 5050;

/// Answers collected from the user. Blank answers fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct InitAnswers {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
    pub license: String,
    pub keywords: String,
    pub repository_type: String,
    pub repository_url: String,
    pub command: String,
    pub args: String,
    pub port: Option<u16>,
}

/// Manifest used by `init --yes`.
#[must_use]
pub fn default_manifest(project_name: &str) -> ServerDescriptor {
    ServerDescriptor {
        name: project_name.to_string(),
        version: DEFAULT_VERSION.to_string(),
        license: DEFAULT_LICENSE.to_string(),
        repository: Repository {
            kind: DEFAULT_REPOSITORY_TYPE.to_string(),
            url: String::new(),
        },
        run: RunConfig {
            command: DEFAULT_COMMAND.to_string(),
            args: DEFAULT_ARGS.iter().map(ToString::to_string).collect(),
            port: DEFAULT_PORT,
        },
        ..ServerDescriptor::default()
    }
}

/// Split a comma-separated answer, trimming items and dropping blanks.
#[must_use]
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn or_default(value: &str, default: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Build a manifest from interactive answers.
#[must_use]
pub fn from_answers(answers: &InitAnswers) -> ServerDescriptor {
    let args = split_list(&answers.args);
    ServerDescriptor {
        name: answers.name.trim().to_string(),
        version: or_default(&answers.version, DEFAULT_VERSION),
        description: answers.description.trim().to_string(),
        author: answers.author.trim().to_string(),
        license: or_default(&answers.license, DEFAULT_LICENSE),
        keywords: split_list(&answers.keywords).into_iter().collect::<BTreeSet<_>>(),
        repository: Repository {
            kind: or_default(&answers.repository_type, DEFAULT_REPOSITORY_TYPE),
            url: answers.repository_url.trim().to_string(),
        },
        run: RunConfig {
            command: or_default(&answers.command, DEFAULT_COMMAND),
            args: if args.is_empty() {
                DEFAULT_ARGS.iter().map(ToString::to_string).collect()
            } else {
                args
            },
            port: answers.port.filter(|p| *p > 0).unwrap_or(DEFAULT_PORT),
        },
        ..ServerDescriptor::default()
    }
}

/// Manifest text with 2-space indentation and a trailing newline.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render(manifest: &ServerDescriptor) -> Result<String> {
    let mut text = serde_json::to_string_pretty(manifest).context("cannot serialize manifest")?;
    text.push('\n');
    Ok(text)
}
