//! Infrastructure implementation of the `ContainerEngine` port.
//!
//! `DockerEngine<R>` drives a docker-compatible CLI through a `CommandRunner`,
//! so tests can inject a mock runner without spawning real processes.

use std::path::Path;
use std::process::{ExitStatus, Output};

use anyhow::Result;
use tracing::debug;

use crate::application::ports::{CommandRunner, ContainerEngine, RunOptions};
use crate::domain::config::DEFAULT_ENGINE_PROGRAM;
use crate::infra::command_runner::{PROBE_TIMEOUT, TokioCommandRunner};

/// Docker CLI adapter.
pub struct DockerEngine<R: CommandRunner> {
    program: String,
    runner: R,
}

impl<R: CommandRunner> DockerEngine<R> {
    /// Engine invoking `program` (e.g. `docker` or `podman`) through `runner`.
    pub fn new(program: impl Into<String>, runner: R) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl DockerEngine<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn with_program(program: &str) -> Self {
        let program = if program.trim().is_empty() {
            DEFAULT_ENGINE_PROGRAM
        } else {
            program
        };
        Self::new(program, TokioCommandRunner::new())
    }
}

/// Arguments for `run`, shared by the detached and attached forms.
fn run_args<'a>(tag: &'a str, opts: &RunOptions<'a>) -> Vec<&'a str> {
    let mut args = vec!["run", if opts.detached { "-d" } else { "-it" }];
    args.extend(["--name", opts.container_name]);
    if let Some(mapping) = opts.port_mapping {
        args.extend(["-p", mapping]);
    }
    args.push(tag);
    args
}

impl<R: CommandRunner> ContainerEngine for DockerEngine<R> {
    async fn is_available(&self) -> bool {
        match self
            .runner
            .run_with_timeout(&self.program, &["info"], PROBE_TIMEOUT)
            .await
        {
            Ok(out) => out.status.success(),
            Err(e) => {
                debug!(program = %self.program, error = %e, "engine probe failed");
                false
            }
        }
    }

    async fn build(&self, context_dir: &Path, tag: &str) -> Result<Output> {
        self.runner
            .run_in(context_dir, &self.program, &["build", "-t", tag, "."])
            .await
    }

    async fn save(&self, tag: &str, dest: &Path) -> Result<Output> {
        let dest = dest.to_string_lossy();
        self.runner
            .run(&self.program, &["save", "-o", &dest, tag])
            .await
    }

    async fn load(&self, src: &Path) -> Result<Output> {
        let src = src.to_string_lossy();
        self.runner.run(&self.program, &["load", "-i", &src]).await
    }

    async fn run_detached(&self, tag: &str, opts: &RunOptions<'_>) -> Result<Output> {
        let opts = RunOptions {
            detached: true,
            ..*opts
        };
        self.runner.run(&self.program, &run_args(tag, &opts)).await
    }

    async fn run_attached(&self, tag: &str, opts: &RunOptions<'_>) -> Result<ExitStatus> {
        let opts = RunOptions {
            detached: false,
            ..*opts
        };
        self.runner
            .run_status(&self.program, &run_args(tag, &opts))
            .await
    }
}
