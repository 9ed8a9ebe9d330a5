//! Host role value object

use std::fmt;

/// Which side of the deployment a command or clock belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRole {
    /// The machine running ftpdeploy
    Local,
    /// The deployment target reached over SSH
    Remote,
}

impl fmt::Display for HostRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostRole::Local => write!(f, "local"),
            HostRole::Remote => write!(f, "remote"),
        }
    }
}
