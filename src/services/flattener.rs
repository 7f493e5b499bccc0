use crate::config::FlattenConfig;
use crate::error::FlattenError;
use crate::models::{FileEntry, RunResult};
use crate::utils::{
    copy_file_with_metadata, list_files_with_extensions, resolve_location, CollisionTable,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, info_span};

/// Progress notifications emitted while a run is in flight.
#[derive(Debug, Clone, Copy)]
pub enum FlattenEvent<'a> {
    /// The scan finished; `total` files will be copied.
    ScanComplete { total: usize },
    /// One file was attempted.
    FileProcessed { entry: &'a FileEntry, success: bool },
}

/// Copy every matching file under `config.source_dir` into `config.dest_dir`
/// under its flattened name.
///
/// Returns `Err` only when the run is aborted before copying starts. Per-file
/// failures are logged and collected in the returned [`RunResult`].
pub fn flatten(config: &FlattenConfig) -> Result<RunResult, FlattenError> {
    flatten_with(config, copy_file_with_metadata, |_| {})
}

/// [`flatten`] with a caller-supplied copy function and progress callback.
pub fn flatten_with<C, O>(
    config: &FlattenConfig,
    mut copier: C,
    mut on_event: O,
) -> Result<RunResult, FlattenError>
where
    C: FnMut(&Path, &Path) -> anyhow::Result<()>,
    O: FnMut(FlattenEvent<'_>),
{
    let mut result = RunResult::new(&config.source_dir, &config.dest_dir);
    let span = info_span!("flatten", run_id = %result.run_id);
    let _guard = span.enter();

    debug!("Validating {} -> {}", config.source_dir.display(), config.dest_dir.display());
    let (source_root, dest_root) = match prepare_directories(config) {
        Ok(roots) => roots,
        Err(e) => {
            error!("{}", e);
            debug!("Aborted before copying");
            return Err(e);
        }
    };

    debug!("Scanning for {}", config.extensions);
    let entries = list_files_with_extensions(&source_root, &config.extensions, Some(&dest_root));
    result.files_scanned = entries.len();
    on_event(FlattenEvent::ScanComplete {
        total: entries.len(),
    });

    if entries.is_empty() {
        info!("no target files found");
        return Ok(complete(result));
    }

    info!("scan complete: {} target files found", entries.len());
    info!("destination: {}", config.dest_dir.display());
    debug!("Copying {} files", entries.len());

    let mut collisions = CollisionTable::new();
    for entry in &entries {
        let target_name = collisions.assign(&entry.flattened_name());
        let destination = config.dest_dir.join(&target_name);

        let success = match copier(&entry.path, &destination) {
            Ok(()) => {
                debug!(
                    "copied {} -> {}",
                    entry.relative_path.display(),
                    target_name.to_string_lossy()
                );
                result.record_success(entry.path.clone(), destination);
                true
            }
            Err(e) => {
                let detail = format!("{e:#}");
                error!("failed to copy {}: {}", entry.file_name(), detail);
                result.record_failure(entry.path.clone(), detail);
                false
            }
        };

        on_event(FlattenEvent::FileProcessed { entry, success });
    }

    Ok(complete(result))
}

/// Check the source and destination, then create the destination.
/// Returns both roots in resolved form.
fn prepare_directories(config: &FlattenConfig) -> Result<(PathBuf, PathBuf), FlattenError> {
    let source = &config.source_dir;
    let dest = &config.dest_dir;

    if !source.exists() {
        return Err(FlattenError::SourceNotFound(source.clone()));
    }
    if !source.is_dir() {
        return Err(FlattenError::SourceNotDirectory(source.clone()));
    }

    let source_root = resolve_location(source);
    if source_root == resolve_location(dest) {
        return Err(FlattenError::SameLocation(source.clone()));
    }

    fs::create_dir_all(dest).map_err(|e| FlattenError::CreateDestination {
        path: dest.clone(),
        source: e,
    })?;

    Ok((source_root, resolve_location(dest)))
}

fn complete(mut result: RunResult) -> RunResult {
    debug!("Reporting");
    result.finish();
    info!("{}", result.summary_line());
    result
}
