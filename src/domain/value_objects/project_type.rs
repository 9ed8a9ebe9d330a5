//! Project type value object
//!
//! - `Iis`: Windows host running IIS, commands go through `cmd.exe`
//! - `Laravel`: Unix host, commands go through a POSIX shell

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::DeployError;

/// Kind of remote target, selects the platform profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Iis,
    Laravel,
}

impl ProjectType {
    /// All supported project types
    pub const ALL: [ProjectType; 2] = [ProjectType::Iis, ProjectType::Laravel];

    /// YAML name of this project type
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Iis => "iis",
            ProjectType::Laravel => "laravel",
        }
    }

    /// Returns true for Windows targets
    pub fn is_windows(&self) -> bool {
        matches!(self, ProjectType::Iis)
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iis" => Ok(ProjectType::Iis),
            "laravel" => Ok(ProjectType::Laravel),
            other => Err(DeployError::UnknownProjectType(other.to_string())),
        }
    }
}
