use crate::config::TargetExtensionSet;
use crate::models::FileEntry;
use anyhow::{Context, Result};
use filetime::FileTime;
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Recursively list regular files under `root` whose extension is in `extensions`.
///
/// Symlinks are followed. Entries come back in a stable, name-sorted, depth-first
/// order. A directory that resolves to `exclude` is not descended into.
/// Unreadable entries are logged and skipped.
pub fn list_files_with_extensions(
    root: &Path,
    extensions: &TargetExtensionSet,
    exclude: Option<&Path>,
) -> Vec<FileEntry> {
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !exclude.is_some_and(|excluded| is_same_location(entry.path(), excluded))
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !matches_extensions(entry.path(), extensions) {
            continue;
        }

        if let Some(file) = FileEntry::from_root(root, entry.into_path()) {
            files.push(file);
        }
    }

    files
}

/// Check if the file's extension is in the target set, ignoring case.
fn matches_extensions(path: &Path, extensions: &TargetExtensionSet) -> bool {
    extensions.matches(path)
}

/// Copy file content, then carry over permissions and access/modification times.
pub fn copy_file_with_metadata(source: &Path, destination: &Path) -> Result<()> {
    fs::copy(source, destination).with_context(|| {
        format!(
            "Failed to copy file from {:?} to {:?}",
            source, destination
        )
    })?;

    let metadata = fs::metadata(source)
        .with_context(|| format!("Failed to read metadata for: {:?}", source))?;

    fs::set_permissions(destination, metadata.permissions())
        .with_context(|| format!("Failed to set permissions on: {:?}", destination))?;

    filetime::set_file_times(
        destination,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )
    .with_context(|| format!("Failed to set file times on: {:?}", destination))?;

    Ok(())
}

/// Absolute, symlink-resolved form of `path`, which need not exist.
///
/// The deepest existing ancestor is canonicalized and the remaining
/// components are appended lexically.
pub fn resolve_location(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut existing = normalize_lexically(&absolute);
    let mut missing = Vec::new();
    while !existing.exists() {
        match existing.file_name() {
            Some(name) => missing.push(name.to_os_string()),
            None => break,
        }
        if !existing.pop() {
            break;
        }
    }

    let mut resolved = fs::canonicalize(&existing).unwrap_or(existing);
    resolved.extend(missing.iter().rev());
    resolved
}

/// Whether two paths name the same directory or file once resolved.
pub fn is_same_location(a: &Path, b: &Path) -> bool {
    resolve_location(a) == resolve_location(b)
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
