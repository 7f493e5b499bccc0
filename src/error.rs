use std::path::PathBuf;
use thiserror::Error;

/// Conditions that abort a run before any file is copied.
#[derive(Debug, Error)]
pub enum FlattenError {
    #[error("source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("source path is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),

    #[error("source and destination are identical: {}", .0.display())]
    SameLocation(PathBuf),

    #[error("failed to create destination directory {}: {source}", path.display())]
    CreateDestination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
