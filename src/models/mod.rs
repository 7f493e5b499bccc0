pub mod file_entry;
pub mod run_result;

pub use file_entry::FileEntry;
pub use run_result::{CopiedFile, CopyFailure, RunResult};
