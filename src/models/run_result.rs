use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Outcome of one flatten run, built up while copying and reported at the end.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub run_id: Uuid,
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Files that matched the extension filter.
    pub files_scanned: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub copied_files: Vec<CopiedFile>,
    pub failures: Vec<CopyFailure>,
}

impl RunResult {
    pub fn new(source_dir: &Path, dest_dir: &Path) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            source_dir: source_dir.to_path_buf(),
            dest_dir: dest_dir.to_path_buf(),
            started_at: Utc::now(),
            finished_at: None,
            files_scanned: 0,
            succeeded: 0,
            failed: 0,
            copied_files: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn record_success(&mut self, source: PathBuf, destination: PathBuf) {
        self.succeeded += 1;
        self.copied_files.push(CopiedFile {
            source,
            destination,
        });
    }

    pub fn record_failure(&mut self, source: PathBuf, error: String) {
        self.failed += 1;
        self.failures.push(CopyFailure { source, error });
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn total_processed(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.total_processed();
        if total == 0 {
            0.0
        } else {
            self.succeeded as f64 / total as f64
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// The completion line written at the end of every run that gets past validation.
    pub fn summary_line(&self) -> String {
        format!(
            "processing complete: {} succeeded / {} failed",
            self.succeeded, self.failed
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CopiedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct CopyFailure {
    pub source: PathBuf,
    pub error: String,
}
