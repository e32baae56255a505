//! Build-descriptor (Dockerfile) generation.
//!
//! The descriptor is assembled as an ordered list of typed [`Directive`]s
//! grouped into blocks, and only serialized at the end. Everything that
//! depends on the run command lives in [`TOOLCHAINS`]; supporting another
//! language means adding a table entry.

use std::fmt;

use mcphub_common::ServerDescriptor;

/// File name the descriptor is written under, next to the manifest.
pub const DESCRIPTOR_FILENAME: &str = "Dockerfile";

pub const WORKDIR: &str = "/app";
pub const HEALTH_PATH: &str = "/health";
pub const INSTALL_PLACEHOLDER: &str = "Add any custom installation commands here";

// ── Toolchain table ──────────────────────────────────────────────────────────

/// A dependency install step, run only when `marker` exists in the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallStep {
    pub marker: &'static str,
    pub command: &'static str,
}

/// Base image and install recipe for one command family.
#[derive(Debug, PartialEq, Eq)]
pub struct Toolchain {
    pub family: &'static str,
    /// Run commands that select this toolchain.
    pub commands: &'static [&'static str],
    pub base_image: &'static str,
    pub installs: &'static [InstallStep],
}

pub const TOOLCHAINS: &[Toolchain] = &[
    Toolchain {
        family: "node",
        commands: &["node"],
        base_image: "node:18-alpine",
        installs: &[
            InstallStep {
                marker: "package.json",
                command: "npm install --only=production",
            },
            InstallStep {
                marker: "yarn.lock",
                command: "yarn install --production",
            },
        ],
    },
    Toolchain {
        family: "python",
        commands: &["python", "python3"],
        base_image: "python:3.11-slim",
        installs: &[
            InstallStep {
                marker: "requirements.txt",
                command: "pip install --no-cache-dir -r requirements.txt",
            },
            InstallStep {
                marker: "pyproject.toml",
                command: "pip install uv && uv pip install --system .",
            },
            InstallStep {
                marker: "Pipfile",
                command: "pip install pipenv && pipenv install --system --deploy",
            },
        ],
    },
    Toolchain {
        family: "go",
        commands: &["go"],
        base_image: "golang:1.21-alpine",
        installs: &[
            InstallStep {
                marker: "go.mod",
                command: "go mod download",
            },
            InstallStep {
                marker: "go.mod",
                command: "go build -o main .",
            },
        ],
    },
];

/// Fallback for commands no entry claims.
pub const GENERIC_TOOLCHAIN: Toolchain = Toolchain {
    family: "generic",
    commands: &[],
    base_image: "ubuntu:22.04",
    installs: &[],
};

/// Toolchain for a run command. Matching is exact.
#[must_use]
pub fn toolchain_for(command: &str) -> &'static Toolchain {
    TOOLCHAINS
        .iter()
        .find(|t| t.commands.contains(&command))
        .unwrap_or(&GENERIC_TOOLCHAIN)
}

// ── Directives ───────────────────────────────────────────────────────────────

/// Health probe parameters. Only the port varies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheck {
    pub interval_secs: u32,
    pub timeout_secs: u32,
    pub start_period_secs: u32,
    pub retries: u32,
    pub port: u16,
}

impl HealthCheck {
    #[must_use]
    pub fn http(port: u16) -> Self {
        Self {
            interval_secs: 30,
            timeout_secs: 3,
            start_period_secs: 5,
            retries: 3,
            port,
        }
    }

    #[must_use]
    pub fn url(&self) -> String {
        format!("http://localhost:{}{HEALTH_PATH}", self.port)
    }
}

/// One instruction of the build descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    From(String),
    Workdir(String),
    Label { key: &'static str, value: String },
    Copy { src: String, dest: String },
    Run(String),
    Comment(String),
    Expose(u16),
    Healthcheck(HealthCheck),
    Cmd(Vec<String>),
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::From(image) => write!(f, "FROM {image}"),
            Self::Workdir(dir) => write!(f, "WORKDIR {dir}"),
            Self::Label { key, value } => write!(f, "LABEL {key}=\"{}\"", escape_label(value)),
            Self::Copy { src, dest } => write!(f, "COPY {src} {dest}"),
            Self::Run(cmd) => write!(f, "RUN {cmd}"),
            Self::Comment(text) => write!(f, "# {text}"),
            Self::Expose(port) => write!(f, "EXPOSE {port}"),
            Self::Healthcheck(h) => write!(
                f,
                "HEALTHCHECK --interval={}s --timeout={}s --start-period={}s --retries={} \\\n  CMD curl -f {} || exit 1",
                h.interval_secs,
                h.timeout_secs,
                h.start_period_secs,
                h.retries,
                h.url()
            ),
            Self::Cmd(argv) => write!(f, "CMD {}", exec_form(argv)),
        }
    }
}

fn escape_label(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// JSON array form of an argv, `[""]` when empty.
fn exec_form(argv: &[String]) -> String {
    if argv.is_empty() {
        return "[\"\"]".to_string();
    }
    let quoted: Vec<String> = argv
        .iter()
        .map(|a| serde_json::to_string(a).unwrap_or_else(|_| format!("\"{a}\"")))
        .collect();
    format!("[{}]", quoted.join(", "))
}

// ── Descriptor ───────────────────────────────────────────────────────────────

/// A generated build descriptor: blocks of directives separated by blank lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDescriptor {
    blocks: Vec<Vec<Directive>>,
}

impl BuildDescriptor {
    #[must_use]
    pub fn builder() -> DescriptorBuilder {
        DescriptorBuilder::default()
    }

    pub fn directives(&self) -> impl Iterator<Item = &Directive> {
        self.blocks.iter().flatten()
    }

    #[must_use]
    pub fn blocks(&self) -> &[Vec<Directive>] {
        &self.blocks
    }

    /// Serialize to descriptor text.
    #[must_use]
    pub fn render(&self) -> String {
        self.blocks
            .iter()
            .map(|block| block.iter().map(|d| format!("{d}\n")).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Default)]
pub struct DescriptorBuilder {
    blocks: Vec<Vec<Directive>>,
}

impl DescriptorBuilder {
    /// Append a block. Empty blocks are dropped.
    #[must_use]
    pub fn block(mut self, directives: impl IntoIterator<Item = Directive>) -> Self {
        let block: Vec<Directive> = directives.into_iter().collect();
        if !block.is_empty() {
            self.blocks.push(block);
        }
        self
    }

    #[must_use]
    pub fn build(self) -> BuildDescriptor {
        BuildDescriptor {
            blocks: self.blocks,
        }
    }
}

/// Derive the build descriptor for a validated manifest.
///
/// Pure and deterministic: the same descriptor always yields the same text.
#[must_use]
pub fn generate(server: &ServerDescriptor) -> BuildDescriptor {
    let toolchain = toolchain_for(&server.run.command);

    let mut labels = vec![
        label("name", &server.name),
        label("version", &server.version),
        label("description", &server.description),
    ];
    if !server.author.is_empty() {
        labels.push(label("author", &server.author));
    }

    let installs: Vec<Directive> = if toolchain.installs.is_empty() {
        vec![Directive::Comment(INSTALL_PLACEHOLDER.to_string())]
    } else {
        toolchain
            .installs
            .iter()
            .map(|step| {
                Directive::Run(format!(
                    "if [ -f {} ]; then {}; fi",
                    step.marker, step.command
                ))
            })
            .collect()
    };

    let mut builder = BuildDescriptor::builder()
        .block([Directive::From(toolchain.base_image.to_string())])
        .block([Directive::Workdir(WORKDIR.to_string())])
        .block(labels)
        .block([Directive::Copy {
            src: ".".to_string(),
            dest: ".".to_string(),
        }])
        .block(installs);

    if server.run.port > 0 {
        builder = builder
            .block([Directive::Expose(server.run.port)])
            .block([Directive::Healthcheck(HealthCheck::http(server.run.port))]);
    }

    builder.block([Directive::Cmd(server.entrypoint())]).build()
}

fn label(key: &'static str, value: &str) -> Directive {
    Directive::Label {
        key,
        value: value.to_string(),
    }
}
