use serde::Serialize;
use std::collections::BTreeSet;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const ENV_TARGET_EXTENSIONS: &str = "TARGET_EXTENSIONS";
pub const ENV_LOG_FILE: &str = "LOG_FILE";
pub const ENV_SOURCE_DIR: &str = "SOURCE_DIR";
pub const ENV_DEST_DIR: &str = "DEST_DIR";

/// Extensions copied when nothing else is configured.
pub const DEFAULT_TARGET_EXTENSIONS: [&str; 4] = [".xlsx", ".xls", ".pptx", ".ppt"];

/// Lowercase, dot-prefixed extensions eligible for copying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetExtensionSet(BTreeSet<String>);

impl TargetExtensionSet {
    /// Build a set from individual entries. Entries are trimmed, lowercased and
    /// given a leading dot when missing. Returns `None` when no entry is usable.
    pub fn from_entries<I, S>(entries: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: BTreeSet<String> = entries
            .into_iter()
            .filter_map(|entry| normalize_extension(entry.as_ref()))
            .collect();

        if set.is_empty() {
            None
        } else {
            Some(Self(set))
        }
    }

    /// Parse a delimited list such as `".xlsx, .xls;pptx"`.
    /// Commas, semicolons and whitespace all separate entries.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::from_entries(raw.split(|c: char| c == ',' || c == ';' || c.is_whitespace()))
    }

    /// Case-insensitive membership test for a bare (`xlsx`) or dotted (`.XLSX`) extension.
    pub fn contains(&self, extension: &str) -> bool {
        normalize_extension(extension)
            .map(|ext| self.0.contains(&ext))
            .unwrap_or(false)
    }

    /// Whether the file's extension is in the set.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.contains(ext))
            .unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for TargetExtensionSet {
    fn default() -> Self {
        Self(DEFAULT_TARGET_EXTENSIONS.iter().map(|ext| ext.to_string()).collect())
    }
}

impl fmt::Display for TargetExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(", "))
    }
}

fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!(".{}", trimmed.to_lowercase()))
}

/// Inputs of a single flatten run.
#[derive(Debug, Clone)]
pub struct FlattenConfig {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub extensions: TargetExtensionSet,
}

impl FlattenConfig {
    /// Create a config using the default extension set.
    pub fn new(source_dir: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            dest_dir: dest_dir.into(),
            extensions: TargetExtensionSet::default(),
        }
    }

    pub fn with_extensions(mut self, extensions: TargetExtensionSet) -> Self {
        self.extensions = extensions;
        self
    }
}

/// Raw settings read from the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvSettings {
    pub target_extensions: Option<String>,
    pub log_file: Option<PathBuf>,
    pub source_dir: Option<PathBuf>,
    pub dest_dir: Option<PathBuf>,
}

impl EnvSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            target_extensions: get(ENV_TARGET_EXTENSIONS),
            log_file: get(ENV_LOG_FILE).map(PathBuf::from),
            source_dir: get(ENV_SOURCE_DIR).map(PathBuf::from),
            dest_dir: get(ENV_DEST_DIR).map(PathBuf::from),
        }
    }
}

/// Pick the active extension set: explicit entries win over the environment
/// value, which wins over the built-in default.
pub fn resolve_extensions(cli_entries: &[String], env_value: Option<&str>) -> TargetExtensionSet {
    if !cli_entries.is_empty() {
        if let Some(set) = TargetExtensionSet::from_entries(cli_entries) {
            return set;
        }
        warn!("No usable extension in --ext {:?}, using defaults", cli_entries);
        return TargetExtensionSet::default();
    }

    match env_value {
        Some(raw) => TargetExtensionSet::parse(raw).unwrap_or_else(|| {
            warn!(
                "{} has no usable extension ({:?}), using defaults",
                ENV_TARGET_EXTENSIONS, raw
            );
            TargetExtensionSet::default()
        }),
        None => TargetExtensionSet::default(),
    }
}
