//! Command runner
//!
//! Runs one command on a [`ShellHost`] and applies the error policy of the
//! invocation. Under `--act` mutating commands are echoed instead of run;
//! read-only queries still execute.

use crate::domain::entities::ErrorPolicy;
use crate::domain::ports::{CommandOutput, DeployEvent, DeployEventSink, LogLevel, ShellHost};
use crate::error::{DeployError, DeployResult};

/// One command invocation
#[derive(Debug, Clone)]
pub struct ShellRequest<'a> {
    pub command: &'a str,
    /// Printed before running
    pub message: Option<&'a str>,
    pub on_error: ErrorPolicy,
    pub suppress_stdout: bool,
    /// Queries that change nothing run even under `--act`
    pub read_only: bool,
    /// A failure whose stdout contains this text is returned as-is
    pub expected_failure: Option<&'a str>,
}

impl<'a> ShellRequest<'a> {
    pub fn new(command: &'a str) -> Self {
        Self {
            command,
            message: None,
            on_error: ErrorPolicy::Throw,
            suppress_stdout: false,
            read_only: false,
            expected_failure: None,
        }
    }

    pub fn with_policy(mut self, on_error: ErrorPolicy) -> Self {
        self.on_error = on_error;
        self
    }

    pub fn with_message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }

    pub fn quiet(mut self) -> Self {
        self.suppress_stdout = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn expecting_failure(mut self, notice: Option<&'a str>) -> Self {
        self.expected_failure = notice;
        self
    }

    fn is_expected_failure(&self, output: &CommandOutput) -> bool {
        self.expected_failure
            .is_some_and(|notice| output.stdout.contains(notice))
    }
}

/// What happened to a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// It ran; `output.success` tells whether it worked
    Ran(CommandOutput),
    /// `--act`: printed, not run
    Echoed,
}

impl CommandResult {
    pub fn succeeded(&self) -> bool {
        matches!(self, CommandResult::Ran(out) if out.success)
    }

    pub fn stdout(&self) -> Option<&str> {
        match self {
            CommandResult::Ran(out) => Some(&out.stdout),
            CommandResult::Echoed => None,
        }
    }
}

/// Executes commands and reports them through the event sink
pub struct CommandRunner<'a> {
    act: bool,
    sink: &'a dyn DeployEventSink,
}

impl<'a> CommandRunner<'a> {
    pub fn new(act: bool, sink: &'a dyn DeployEventSink) -> Self {
        Self { act, sink }
    }

    pub fn run<H: ShellHost + ?Sized>(
        &self,
        host: &mut H,
        request: &ShellRequest<'_>,
    ) -> DeployResult<CommandResult> {
        if let Some(message) = request.message {
            self.sink.on_event(DeployEvent::Message {
                level: LogLevel::Info,
                text: message.to_string(),
            });
        }

        if self.act && !request.read_only {
            self.sink.on_event(DeployEvent::CommandEcho {
                host: host.role(),
                command: request.command.to_string(),
            });
            return Ok(CommandResult::Echoed);
        }

        let output = match host.execute(request.command) {
            Ok(output) => output,
            Err(err) if request.on_error != ErrorPolicy::Throw => {
                CommandOutput::failed(err.to_string())
            }
            Err(err) => return Err(err),
        };

        if !request.suppress_stdout && !output.stdout.trim().is_empty() {
            self.sink.on_event(DeployEvent::CommandOutput {
                host: host.role(),
                output: output.stdout.trim_end().to_string(),
            });
        }

        if !output.success && !request.is_expected_failure(&output) {
            match request.on_error {
                ErrorPolicy::Throw => {
                    return Err(DeployError::CommandFailed {
                        host: host.describe(),
                        command: request.command.to_string(),
                        stderr: output.stderr.trim().to_string(),
                    });
                }
                ErrorPolicy::Print => self.sink.on_event(DeployEvent::CommandFailed {
                    host: host.role(),
                    command: request.command.to_string(),
                    stderr: output.stderr.trim().to_string(),
                }),
                ErrorPolicy::Ignore => {}
            }
        }

        Ok(CommandResult::Ran(output))
    }
}
