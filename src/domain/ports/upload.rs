//! Upload Port
//!
//! Hands the packaged archive to the remote target directory.

use std::path::Path;

use crate::error::DeployResult;

/// Transfers the deployment archive
pub trait ArchiveUploader {
    /// Command line shown instead of uploading under `--act`, secrets masked
    fn display_command(&self, archive: &Path, remote_dir: &str) -> String;

    fn upload(&self, archive: &Path, remote_dir: &str) -> DeployResult<()>;
}
