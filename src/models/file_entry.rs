use crate::utils::naming;
use std::borrow::Cow;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// A regular file discovered under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub relative_path: PathBuf,
}

impl FileEntry {
    pub fn new(path: PathBuf, relative_path: PathBuf) -> Self {
        Self {
            path,
            relative_path,
        }
    }

    /// Build an entry for `path` relative to `root`; `None` if `path` is not under `root`.
    pub fn from_root(root: &Path, path: PathBuf) -> Option<Self> {
        let relative_path = path.strip_prefix(root).ok()?.to_path_buf();
        if relative_path.as_os_str().is_empty() {
            return None;
        }
        Some(Self::new(path, relative_path))
    }

    /// Bare file name, used in log lines.
    pub fn file_name(&self) -> Cow<'_, str> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_else(|| self.path.to_string_lossy())
    }

    /// Relative path segments joined into a single file name.
    pub fn flattened_name(&self) -> OsString {
        naming::flattened_name(&self.relative_path)
    }
}
