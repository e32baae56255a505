//! Application service: start a container from a loaded image.

use anyhow::{Result, bail};
use tracing::info;

use crate::application::ports::{ContainerEngine, RunOptions};
use crate::application::services::image::{combined_output, ensure_engine};

/// How a started container ended up.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum LaunchOutcome {
    /// Running in the background.
    Detached { container_id: String, name: String },
    /// Ran in the foreground and has exited.
    Exited { code: Option<i32> },
}

/// Start `tag` with the given options.
///
/// # Errors
///
/// Fails when the engine is unavailable or refuses to start the container.
pub async fn start(
    engine: &impl ContainerEngine,
    tag: &str,
    opts: &RunOptions<'_>,
) -> Result<LaunchOutcome> {
    ensure_engine(engine).await?;

    if !opts.detached {
        let status = engine.run_attached(tag, opts).await?;
        return Ok(LaunchOutcome::Exited {
            code: status.code(),
        });
    }

    let output = engine.run_detached(tag, opts).await?;
    if !output.status.success() {
        bail!("failed to run container: {}", combined_output(&output).trim());
    }
    let container_id = String::from_utf8_lossy(&output.stdout).trim().to_string();
    info!(tag, container = %container_id, "container started");
    Ok(LaunchOutcome::Detached {
        container_id,
        name: opts.container_name.to_string(),
    })
}
