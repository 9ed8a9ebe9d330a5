//! OpenSSH remote session
//!
//! Shells out to the `ssh` client. One master connection is opened per run
//! (`ControlMaster`, socket inside a private temp directory) and every remote
//! command is multiplexed over it. Passwords are handed to `sshpass -e`
//! through the environment, never on the command line.

use std::fs::{self, File};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tempfile::TempDir;

use crate::domain::ports::{CommandOutput, RemoteSession, SessionConnector, ShellHost};
use crate::domain::value_objects::{HostRole, SshTarget};
use crate::error::{DeployError, DeployResult};

const CONNECT_TIMEOUT_SECS: u32 = 15;

/// Opens [`SshSession`]s with the system OpenSSH client
#[derive(Debug, Clone)]
pub struct OpenSshConnector {
    ssh_program: PathBuf,
    sshpass_program: PathBuf,
}

impl Default for OpenSshConnector {
    fn default() -> Self {
        Self {
            ssh_program: PathBuf::from("ssh"),
            sshpass_program: PathBuf::from("sshpass"),
        }
    }
}

impl OpenSshConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific `ssh` binary
    pub fn with_ssh_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.ssh_program = program.into();
        self
    }

    /// Use a specific `sshpass` binary
    pub fn with_sshpass_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.sshpass_program = program.into();
        self
    }

    fn master_command(&self, target: &SshTarget) -> Command {
        match target.password() {
            Some(password) => {
                let mut cmd = Command::new(&self.sshpass_program);
                cmd.arg("-e").arg(&self.ssh_program).env("SSHPASS", password);
                cmd
            }
            None => {
                let mut cmd = Command::new(&self.ssh_program);
                cmd.args(["-o", "BatchMode=yes"]);
                cmd
            }
        }
    }
}

impl SessionConnector for OpenSshConnector {
    fn connect(&self, target: &SshTarget) -> DeployResult<Box<dyn RemoteSession>> {
        let control_dir = tempfile::Builder::new().prefix("ftpdeploy-ssh").tempdir()?;
        let control_path = control_dir.path().join("master.sock");
        let log_path = control_dir.path().join("connect.log");
        let destination = target.destination();

        // `-f` forks the master into the background; it keeps any piped
        // stderr open, so diagnostics go to a file instead.
        let log = File::create(&log_path)?;
        let status = self
            .master_command(target)
            .arg("-o")
            .arg("ControlMaster=yes")
            .arg("-o")
            .arg(format!("ControlPath={}", control_path.display()))
            .args(["-o", "ControlPersist=yes"])
            .args(["-o", "LogLevel=ERROR"])
            .arg("-o")
            .arg(format!("ConnectTimeout={}", CONNECT_TIMEOUT_SECS))
            .args(["-o", "StrictHostKeyChecking=accept-new"])
            .args(["-N", "-f"])
            .arg(&destination)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(log))
            .status()?;

        if !status.success() {
            let message = fs::read_to_string(&log_path).unwrap_or_default();
            let message = message.trim().to_string();
            if message.contains("Permission denied") {
                return Err(DeployError::InvalidCredentials { destination });
            }
            return Err(DeployError::Connection {
                destination,
                message: if message.is_empty() {
                    format!("ssh exited with {}", status)
                } else {
                    message
                },
            });
        }

        Ok(Box::new(SshSession {
            ssh_program: self.ssh_program.clone(),
            destination,
            control_path,
            _control_dir: control_dir,
            disposed: false,
        }))
    }
}

/// A live multiplexed SSH connection
#[derive(Debug)]
pub struct SshSession {
    ssh_program: PathBuf,
    destination: String,
    control_path: PathBuf,
    _control_dir: TempDir,
    disposed: bool,
}

impl SshSession {
    fn client(&self) -> Command {
        let mut cmd = Command::new(&self.ssh_program);
        cmd.arg("-S")
            .arg(&self.control_path)
            .args(["-o", "LogLevel=ERROR"]);
        cmd
    }
}

impl ShellHost for SshSession {
    fn role(&self) -> HostRole {
        HostRole::Remote
    }

    fn describe(&self) -> String {
        self.destination.clone()
    }

    /// A remote command fails on a non-zero exit or any stderr output
    fn execute(&mut self, command: &str) -> DeployResult<CommandOutput> {
        if self.disposed {
            return Err(DeployError::Connection {
                destination: self.destination.clone(),
                message: "session already disposed".to_string(),
            });
        }

        let output = self
            .client()
            .arg(&self.destination)
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        Ok(CommandOutput {
            success: output.status.success() && stderr.trim().is_empty(),
            stdout,
            stderr,
        })
    }
}

impl RemoteSession for SshSession {
    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        let _ = self
            .client()
            .args(["-O", "exit"])
            .arg(&self.destination)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Drop for SshSession {
    fn drop(&mut self) {
        self.dispose();
    }
}
