//! Configuration types
//!
//! `Raw*` types mirror the YAML file; [`DeployDocument`] is the validated,
//! fully substituted result.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;

use crate::domain::entities::{ErrorPolicy, Step};
use crate::domain::value_objects::{ProjectType, SshTarget};

/// FTP login used for the archive upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FtpConfig {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Remote path that the FTP root maps to
    pub base_path: String,
}

/// SSH login for remote steps; an empty password means key-based auth
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SshConfig {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// The `config:` section after validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployConfig {
    pub project_type: ProjectType,
    pub host: String,
    pub source_basepath: PathBuf,
    pub target_basepath: String,
    pub ftp: FtpConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh: Option<SshConfig>,
    pub dist_dirs: Vec<String>,
    pub ignores: Vec<String>,
}

impl DeployConfig {
    /// Remote shell target, when `ssh` is configured
    pub fn ssh_target(&self) -> Option<SshTarget> {
        self.ssh
            .as_ref()
            .map(|ssh| SshTarget::new(&self.host, &ssh.username, &ssh.password))
    }
}

/// A loaded deploy file: settings plus the ordered step list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployDocument {
    pub config: DeployConfig,
    pub steps: Vec<Step>,
}

// ---------------------------------------------------------------------------
// Raw YAML shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct RawDocument {
    pub config: Option<RawConfig>,
    pub steps: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawConfig {
    pub project_type: Option<String>,
    pub host: Option<String>,
    pub source_basepath: Option<String>,
    pub target_basepath: Option<String>,
    pub ftp: Option<RawFtp>,
    pub ssh: Option<RawSsh>,
    #[serde(default)]
    pub dist_dirs: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawFtp {
    pub username: Option<String>,
    pub password: Option<String>,
    pub base_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSsh {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// One `steps:` entry; exactly one field must be set
#[derive(Debug, Deserialize)]
pub(crate) struct RawStep {
    pub predefined: Option<RawPredefined>,
    pub shell: Option<RawShell>,
    pub log: Option<RawLog>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawPredefined {
    Name(String),
    Call {
        method: String,
        #[serde(flatten)]
        params: BTreeMap<String, Value>,
    },
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawShell {
    pub command: RawCommand,
    pub message: Option<String>,
    #[serde(default)]
    pub ssh: bool,
    #[serde(default)]
    pub on_error: ErrorPolicy,
    #[serde(default)]
    pub ignore_stdout: bool,
    #[serde(default)]
    pub args: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawCommand {
    Plain(String),
    PerPlatform { windows: String, other: String },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawLog {
    Text(String),
    Object { message: String },
}

impl RawLog {
    pub fn into_message(self) -> String {
        match self {
            RawLog::Text(text) => text,
            RawLog::Object { message } => message,
        }
    }
}
