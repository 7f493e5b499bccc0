pub mod flattener;

pub use flattener::{flatten, flatten_with, FlattenEvent};
