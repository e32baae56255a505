//! Application service: image build and export over the engine port.
//!
//! Maps raw engine process results onto the pipeline error taxonomy.

use std::path::Path;
use std::process::Output;

use tracing::{debug, info};

use crate::application::ports::ContainerEngine;
use crate::domain::PipelineError;

/// Stdout followed by stderr, lossily decoded.
#[must_use]
pub fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

/// Fail with `EngineUnavailable` unless the engine answers.
pub async fn ensure_engine(engine: &impl ContainerEngine) -> Result<(), PipelineError> {
    if engine.is_available().await {
        Ok(())
    } else {
        Err(PipelineError::EngineUnavailable {
            reason: "engine did not respond to an info request".to_string(),
        })
    }
}

/// Build `tag` with `context_dir` as the build context.
///
/// # Errors
///
/// `EngineUnavailable` if the engine process cannot be started, `BuildFailure`
/// with the captured output on a non-zero exit.
pub async fn build(
    engine: &impl ContainerEngine,
    context_dir: &Path,
    tag: &str,
) -> Result<(), PipelineError> {
    debug!(tag, context = %context_dir.display(), "building image");
    let output = engine
        .build(context_dir, tag)
        .await
        .map_err(|e| PipelineError::EngineUnavailable {
            reason: format!("{e:#}"),
        })?;
    if !output.status.success() {
        return Err(PipelineError::BuildFailure {
            tag: tag.to_string(),
            output: combined_output(&output),
        });
    }
    info!(tag, "image built");
    Ok(())
}

/// Save the built `tag` into `dest`.
///
/// # Errors
///
/// `EngineUnavailable` if the engine process cannot be started, `ExportFailure`
/// with the captured output on a non-zero exit.
pub async fn export(
    engine: &impl ContainerEngine,
    tag: &str,
    dest: &Path,
) -> Result<(), PipelineError> {
    debug!(tag, dest = %dest.display(), "exporting image");
    let output = engine
        .save(tag, dest)
        .await
        .map_err(|e| PipelineError::EngineUnavailable {
            reason: format!("{e:#}"),
        })?;
    if !output.status.success() {
        return Err(PipelineError::ExportFailure {
            tag: tag.to_string(),
            output: combined_output(&output),
        });
    }
    info!(tag, "image exported");
    Ok(())
}
