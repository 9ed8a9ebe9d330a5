//! Error types for ftpdeploy
//!
//! Library code returns [`DeployError`]; the binary wraps it in `anyhow`.
//! Expected early stops (nothing to upload, dry-run checkpoint, `local:finish`)
//! are not errors, see [`crate::application::RunOutcome`].

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::value_objects::HostRole;

/// Result type alias for deployment operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Coarse error taxonomy used for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or incomplete configuration, detected before remote I/O
    Configuration,
    /// Remote data that cannot be trusted (clock, listings)
    Integrity,
    /// Command, SSH or upload failures
    Transport,
    /// Local filesystem or archive failures
    Io,
    /// Ctrl-C
    Interrupted,
}

/// Main error type for deployment operations
#[derive(Error, Debug)]
pub enum DeployError {
    /// `config.project_type` names no known platform
    #[error("unknown project type '{0}' (expected one of: iis, laravel)")]
    UnknownProjectType(String),

    /// The deploy YAML could not be parsed or failed validation
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// The config file does not exist
    #[error("config file '{0}' does not exist")]
    ConfigNotFound(PathBuf),

    /// Step list is inconsistent with the configuration
    #[error("step {index} ({step}): {message}")]
    InvalidStep {
        index: usize,
        step: String,
        message: String,
    },

    /// The clock query failed or printed something without an hour
    #[error("could not read the {host} clock: {message}")]
    ClockQuery { host: HostRole, message: String },

    /// Windows write-time and creation-time listings disagree
    #[error(
        "the number of files from server is different for mtime ({mtime_count}) and ctime ({ctime_count})"
    )]
    ListingMismatch {
        mtime_count: usize,
        ctime_count: usize,
    },

    /// The remote listing output is malformed
    #[error("could not parse the remote file listing: {0}")]
    InventoryParse(String),

    /// A shell command failed under the `throw` policy
    #[error("command failed on {host}: {command}\n{stderr}")]
    CommandFailed {
        host: String,
        command: String,
        stderr: String,
    },

    /// SSH rejected the configured credentials
    #[error("invalid SSH credentials given for {destination}")]
    InvalidCredentials { destination: String },

    /// SSH connection could not be established or was already closed
    #[error("SSH connection to {destination} failed: {message}")]
    Connection {
        destination: String,
        message: String,
    },

    /// The upload client binary is not installed
    #[error("{tool} is not installed on your system! {hint}")]
    UploadToolMissing { tool: String, hint: String },

    /// The upload client ran but failed
    #[error("ftp upload failed: {0}")]
    UploadFailed(String),

    /// Zip archive error
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Ctrl-C was pressed between steps
    #[error("deployment interrupted")]
    Interrupted,
}

impl DeployError {
    /// Taxonomy bucket of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeployError::UnknownProjectType(_)
            | DeployError::InvalidConfig { .. }
            | DeployError::ConfigNotFound(_)
            | DeployError::InvalidStep { .. } => ErrorKind::Configuration,
            DeployError::ClockQuery { .. }
            | DeployError::ListingMismatch { .. }
            | DeployError::InventoryParse(_) => ErrorKind::Integrity,
            DeployError::CommandFailed { .. }
            | DeployError::InvalidCredentials { .. }
            | DeployError::Connection { .. }
            | DeployError::UploadToolMissing { .. }
            | DeployError::UploadFailed(_) => ErrorKind::Transport,
            DeployError::Archive(_) | DeployError::Io(_) => ErrorKind::Io,
            DeployError::Interrupted => ErrorKind::Interrupted,
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Interrupted => 130,
            _ => 1,
        }
    }

    pub(crate) fn invalid_config(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        DeployError::InvalidConfig {
            file: file.into(),
            message: message.into(),
        }
    }
}
