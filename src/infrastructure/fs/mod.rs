//! Local file system access

mod walker;

pub use walker::{walk_source_tree, LocalFile, WalkEntry};
