//! Shell Ports
//!
//! A [`ShellHost`] runs one command string and reports its output. The local
//! machine and the remote SSH session both implement it, so the runner and
//! every step handler are agnostic of where a command executes.

use crate::domain::value_objects::{HostRole, SshTarget};
use crate::error::DeployResult;

/// Captured result of one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Something that can execute shell commands
pub trait ShellHost {
    /// Local machine or remote target
    fn role(&self) -> HostRole;

    /// Human-readable name (`local`, `deploy@example.com`)
    fn describe(&self) -> String;

    /// Run a command to completion.
    ///
    /// A command that ran but failed is `Ok` with `success == false`;
    /// `Err` is reserved for spawn and connection failures.
    fn execute(&mut self, command: &str) -> DeployResult<CommandOutput>;
}

/// The remote connection owned by a deployment
pub trait RemoteSession: ShellHost {
    /// Close the connection. Calling it again is a no-op.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}

/// Opens remote sessions
pub trait SessionConnector {
    fn connect(&self, target: &SshTarget) -> DeployResult<Box<dyn RemoteSession>>;
}
