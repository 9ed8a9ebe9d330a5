//! Local shell
//!
//! Runs commands through the system shell: `sh -c` on Unix, `%COMSPEC% /C`
//! on Windows.

use std::process::{Command, Stdio};

use crate::domain::ports::{CommandOutput, ShellHost};
use crate::domain::value_objects::HostRole;
use crate::error::DeployResult;

fn shell_program() -> String {
    #[cfg(windows)]
    {
        std::env::var("COMSPEC").unwrap_or_else(|_| "cmd".to_string())
    }

    #[cfg(not(windows))]
    {
        "sh".to_string()
    }
}

/// Build a [`Command`] running `cmd` through the system shell
pub fn shell_command(cmd: &str) -> Command {
    let mut c = Command::new(shell_program());
    if cfg!(windows) {
        c.arg("/C").arg(cmd);
    } else {
        c.arg("-c").arg(cmd);
    }
    c
}

/// The machine ftpdeploy runs on
#[derive(Debug, Default)]
pub struct LocalShell;

impl LocalShell {
    pub fn new() -> Self {
        Self
    }
}

impl ShellHost for LocalShell {
    fn role(&self) -> HostRole {
        HostRole::Local
    }

    fn describe(&self) -> String {
        "local".to_string()
    }

    fn execute(&mut self, command: &str) -> DeployResult<CommandOutput> {
        let output = shell_command(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
