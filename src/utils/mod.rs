pub mod file_operations;
pub mod naming;

pub use file_operations::{
    copy_file_with_metadata, is_same_location, list_files_with_extensions, resolve_location,
};
pub use naming::{flattened_name, suffixed_name, CollisionTable};
