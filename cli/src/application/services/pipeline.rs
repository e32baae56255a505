//! Application service: the archive-to-image packaging pipeline.
//!
//! normalize → locate → parse → generate → build → export, short-circuiting on
//! the first failure and returning that stage's error untouched.

use std::path::{Path, PathBuf};

use mcphub_common::{KeyError, ManifestError, ObjectKey, ServerDescriptor};
use tracing::{debug, info, instrument};

use crate::application::ports::{ContainerEngine, ProgressReporter, SourceTree};
use crate::application::services::image;
use crate::domain::archive::archive_stem;
use crate::domain::descriptor::{DESCRIPTOR_FILENAME, generate};
use crate::domain::manifest::select_manifest;
use crate::domain::{BuildResult, PipelineError, RunId};

/// Directories a run works in. Passed explicitly; never read from globals.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Scratch root; extraction dirs and tag locks live below it.
    pub work_root: PathBuf,
    /// Final home of exported image archives, one subdirectory per run.
    pub output_dir: PathBuf,
    /// Fail before building when the manifest cannot yield a storage key.
    pub publishable: bool,
}

impl PipelineConfig {
    #[must_use]
    pub fn lock_dir(&self) -> PathBuf {
        self.work_root.join("locks")
    }
}

/// Where the selected manifest lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLocation {
    pub path: PathBuf,
    pub dir: PathBuf,
}

/// Extract `archive` into this run's extraction directory and return it.
pub fn normalize(
    tree: &impl SourceTree,
    archive: &[u8],
    archive_name: &str,
    work_root: &Path,
    run_id: &RunId,
) -> Result<PathBuf, PipelineError> {
    let root = run_id.extraction_dir(work_root, archive_stem(archive_name));
    tree.normalize(archive, archive_name, &root)?;
    debug!(root = %root.display(), "archive extracted");
    Ok(root)
}

/// Find the manifest closest to `root`.
///
/// # Errors
///
/// `ManifestNotFound` when the tree holds no `mcp.json`.
pub fn locate(tree: &impl SourceTree, root: &Path) -> Result<ManifestLocation, PipelineError> {
    let candidates = tree.find_manifests(root)?;
    if candidates.len() > 1 {
        debug!(count = candidates.len(), "multiple manifests found");
    }
    let relative = select_manifest(&candidates).ok_or_else(|| PipelineError::ManifestNotFound {
        root: root.to_path_buf(),
    })?;
    let path = root.join(relative);
    let dir = path.parent().unwrap_or(root).to_path_buf();
    Ok(ManifestLocation { path, dir })
}

/// Decode and validate the manifest at `path`.
///
/// # Errors
///
/// `ManifestInvalid` on decode failure or when a required field is empty.
pub fn parse(tree: &impl SourceTree, path: &Path) -> Result<ServerDescriptor, PipelineError> {
    let bytes = tree.read(path)?;
    ServerDescriptor::from_slice(&bytes).map_err(|e| {
        let fields = match &e {
            ManifestError::MissingFields(fields) => fields.clone(),
            ManifestError::Decode(_) => Vec::new(),
        };
        PipelineError::ManifestInvalid {
            path: path.to_path_buf(),
            fields,
            reason: e.to_string(),
        }
    })
}

/// Reject manifests whose `author`/`name` cannot form a storage key.
///
/// # Errors
///
/// `ManifestInvalid` naming the offending field.
pub fn check_publishable(server: &ServerDescriptor, path: &Path) -> Result<(), PipelineError> {
    ObjectKey::new(&server.author, &server.name)
        .map(|_| ())
        .map_err(|e| {
            let field = match &e {
                KeyError::Empty(field) | KeyError::Separator { field, .. } => *field,
                KeyError::InvalidReference(_) => "name",
            };
            PipelineError::ManifestInvalid {
                path: path.to_path_buf(),
                fields: vec![field],
                reason: format!("cannot publish: {e}"),
            }
        })
}

/// Run the whole pipeline for one archive.
///
/// The extraction directory is left in place. The temporary export directory
/// is removed on every exit path once the archive has been moved out of it.
#[instrument(skip_all, fields(archive = archive_name))]
pub async fn run(
    tree: &impl SourceTree,
    engine: &impl ContainerEngine,
    reporter: &impl ProgressReporter,
    config: &PipelineConfig,
    archive: &[u8],
    archive_name: &str,
) -> Result<BuildResult, PipelineError> {
    let run_id = RunId::generate();
    debug!(%run_id, "starting run");

    reporter.step(&format!("Extracting {archive_name}..."));
    let root = normalize(tree, archive, archive_name, &config.work_root, &run_id)?;

    let location = locate(tree, &root)?;
    let server = parse(tree, &location.path)?;
    let tag = server.image_tag();
    if config.publishable {
        check_publishable(&server, &location.path)?;
    }
    reporter.success(&format!("Found {} v{}", server.name, server.version));

    let _lock = tree.lock_tag(&config.lock_dir(), &tag)?;

    let descriptor = generate(&server);
    let descriptor_path = location.dir.join(DESCRIPTOR_FILENAME);
    tree.write(&descriptor_path, descriptor.render().as_bytes())?;
    debug!(path = %descriptor_path.display(), "descriptor written");

    image::ensure_engine(engine).await?;
    reporter.step(&format!("Building image {tag}..."));
    image::build(engine, &location.dir, &tag).await?;
    reporter.success(&format!("Built image {tag}"));

    let (scratch, _scratch_guard) = tree.scratch_dir()?;
    let stem = archive_stem(archive_name);
    let exported = scratch.join(format!("{stem}.tar"));
    reporter.step(&format!("Exporting image {tag}..."));
    image::export(engine, &tag, &exported).await?;

    let archive_path = run_id.output_archive(&config.output_dir, stem);
    tree.relocate(&exported, &archive_path)?;
    reporter.success(&format!("Exported {}", archive_path.display()));

    let archive_path = tree.absolute(&archive_path)?;
    info!(%run_id, tag, archive = %archive_path.display(), "run complete");
    Ok(BuildResult {
        message: Some(format!(
            "Successfully processed {archive_name}. Image saved as {}",
            archive_path.display()
        )),
        extracted_path: tree.absolute(&root)?,
        descriptor_path: tree.absolute(&descriptor_path)?,
        image_tag: tag,
        archive_path,
        run_id,
        server,
        success: true,
    })
}
