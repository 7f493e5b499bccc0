//! Flattened file names and per-run collision handling.

use std::collections::{HashMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::path::{Component, Path};

/// Joins path segments in a flattened name.
pub const SEGMENT_SEPARATOR: &str = "_";

/// Join every normal segment of `relative` with [`SEGMENT_SEPARATOR`].
///
/// `a/b/c.xlsx` becomes `a_b_c.xlsx`. The last segment is kept as-is,
/// extension casing included.
pub fn flattened_name(relative: &Path) -> OsString {
    let mut name = OsString::new();
    let segments = relative.components().filter_map(|component| match component {
        Component::Normal(segment) => Some(segment),
        _ => None,
    });

    for (index, segment) in segments.enumerate() {
        if index > 0 {
            name.push(SEGMENT_SEPARATOR);
        }
        name.push(segment);
    }
    name
}

/// Insert `_<n>` before the last extension: `a_b.xlsx` -> `a_b_1.xlsx`.
pub fn suffixed_name(name: &OsStr, n: usize) -> OsString {
    let path = Path::new(name);
    let mut suffixed = path.file_stem().unwrap_or(name).to_os_string();
    suffixed.push(format!("{SEGMENT_SEPARATOR}{n}"));
    if let Some(extension) = path.extension() {
        suffixed.push(".");
        suffixed.push(extension);
    }
    suffixed
}

/// Tracks the names handed out during one run so no two copies share a name.
///
/// Keys are case-folded, so `A.XLSX` and `a.xlsx` are treated as the same name.
#[derive(Debug, Default)]
pub struct CollisionTable {
    counts: HashMap<String, usize>,
    assigned: HashSet<String>,
}

impl CollisionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the name to write for `base`, recording it as taken.
    ///
    /// The first occurrence keeps `base`. Occurrence N+1 becomes `<stem>_N<ext>`,
    /// skipping any candidate already handed out in this run.
    pub fn assign(&mut self, base: &OsStr) -> OsString {
        let key = fold(base);
        let count = self.counts.get(&key).copied().unwrap_or(0);

        if count == 0 && !self.assigned.contains(&key) {
            self.counts.insert(key.clone(), 1);
            self.assigned.insert(key);
            return base.to_os_string();
        }

        let mut n = count.max(1);
        let candidate = loop {
            let candidate = suffixed_name(base, n);
            if !self.assigned.contains(&fold(&candidate)) {
                break candidate;
            }
            n += 1;
        };

        self.counts.insert(key, n + 1);
        self.assigned.insert(fold(&candidate));
        candidate
    }

    /// Number of distinct names handed out so far.
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

fn fold(name: &OsStr) -> String {
    name.to_string_lossy().to_lowercase()
}
