//! Pipeline step entities
//!
//! A deployment is an ordered list of [`Step`]s executed left to right.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What to do when a shell command fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Abort the pipeline
    #[default]
    Throw,
    /// Swallow the failure silently
    Ignore,
    /// Report the failure as a warning and continue
    Print,
}

/// A raw shell command step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellStep {
    /// Command with arguments already substituted
    pub command: String,
    /// Printed before running; `${command}` already expanded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Run over the remote session, inside the target directory
    pub ssh: bool,
    pub on_error: ErrorPolicy,
    pub suppress_stdout: bool,
}

impl ShellStep {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            message: None,
            ssh: false,
            on_error: ErrorPolicy::Throw,
            suppress_stdout: false,
        }
    }

    pub fn remote(mut self) -> Self {
        self.ssh = true;
        self
    }

    pub fn with_policy(mut self, on_error: ErrorPolicy) -> Self {
        self.on_error = on_error;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Built-in pipeline operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PredefinedStep {
    DisposeSsh,
    ExitIfDryRun,
    Finish,
    DeleteZip,
    FindNewFiles,
    Unzip,
    UploadFiles,
    Sleep { ms: u64 },
    RestartIisSite { pool: String, site: String },
}

impl PredefinedStep {
    /// Every name accepted in `predefined:`
    pub const NAMES: [&'static str; 9] = [
        "local:dispose_ssh",
        "local:exit_if_dry_run",
        "local:finish",
        "server:delete_zip",
        "server:find_new_files",
        "server:unzip",
        "server:upload_files",
        "local:sleep",
        "server:restart_iis_site",
    ];

    /// YAML name of this step
    pub fn name(&self) -> &'static str {
        match self {
            PredefinedStep::DisposeSsh => "local:dispose_ssh",
            PredefinedStep::ExitIfDryRun => "local:exit_if_dry_run",
            PredefinedStep::Finish => "local:finish",
            PredefinedStep::DeleteZip => "server:delete_zip",
            PredefinedStep::FindNewFiles => "server:find_new_files",
            PredefinedStep::Unzip => "server:unzip",
            PredefinedStep::UploadFiles => "server:upload_files",
            PredefinedStep::Sleep { .. } => "local:sleep",
            PredefinedStep::RestartIisSite { .. } => "server:restart_iis_site",
        }
    }

    /// Parameterless step for a YAML name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "local:dispose_ssh" => Some(PredefinedStep::DisposeSsh),
            "local:exit_if_dry_run" => Some(PredefinedStep::ExitIfDryRun),
            "local:finish" => Some(PredefinedStep::Finish),
            "server:delete_zip" => Some(PredefinedStep::DeleteZip),
            "server:find_new_files" => Some(PredefinedStep::FindNewFiles),
            "server:unzip" => Some(PredefinedStep::Unzip),
            "server:upload_files" => Some(PredefinedStep::UploadFiles),
            _ => None,
        }
    }

    /// Whether this step talks to the remote session.
    ///
    /// A fresh run never lists the remote side, so finding files is local only.
    pub fn requires_session(&self, fresh: bool) -> bool {
        match self {
            PredefinedStep::DeleteZip
            | PredefinedStep::Unzip
            | PredefinedStep::RestartIisSite { .. } => true,
            PredefinedStep::FindNewFiles => !fresh,
            _ => false,
        }
    }
}

impl fmt::Display for PredefinedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of the `steps:` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Predefined(PredefinedStep),
    Shell(ShellStep),
    Log(String),
}

impl Step {
    /// Whether running this step needs the remote session
    pub fn requires_session(&self, fresh: bool) -> bool {
        match self {
            Step::Predefined(p) => p.requires_session(fresh),
            Step::Shell(s) => s.ssh,
            Step::Log(_) => false,
        }
    }

    /// Short label used in error messages and events
    pub fn label(&self) -> String {
        match self {
            Step::Predefined(p) => p.name().to_string(),
            Step::Shell(s) => format!("shell: {}", s.command),
            Step::Log(_) => "log".to_string(),
        }
    }
}
