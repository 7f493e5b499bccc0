pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;

use std::path::PathBuf;

// Re-export commonly used types
pub use config::{EnvSettings, FlattenConfig, TargetExtensionSet, DEFAULT_TARGET_EXTENSIONS};
pub use error::FlattenError;
pub use models::{CopiedFile, CopyFailure, FileEntry, RunResult};
pub use services::{flatten, flatten_with, FlattenEvent};

// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub flatten: FlattenConfig,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub show_progress: bool,
    pub json_summary: bool,
}
