//! FileToUpload entity - a local file selected for the next upload

use std::path::PathBuf;

/// A local file that differs from the remote copy (or is missing there)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileToUpload {
    /// POSIX path relative to the source root, used for display and archive entries
    pub trimmed_path: String,
    /// Path readable on disk
    pub full_path: PathBuf,
}

impl FileToUpload {
    pub fn new(trimmed_path: impl Into<String>, full_path: impl Into<PathBuf>) -> Self {
        Self {
            trimmed_path: trimmed_path.into(),
            full_path: full_path.into(),
        }
    }
}
