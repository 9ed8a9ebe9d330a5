//! Deploy Event Port
//!
//! Provides an observable interface for deploy operations.
//! Enables console rendering, JSON event streams, and test recording.

use std::path::PathBuf;

use crate::domain::entities::RemoteFileRecord;
use crate::domain::services::{FileVerdict, SummaryLine};
use crate::domain::value_objects::{HostRole, UtcOffset};

/// Severity of a free-form message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Plain,
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Plain => "plain",
            LogLevel::Info => "info",
            LogLevel::Success => "success",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

/// Event emitted during a deployment
#[derive(Debug, Clone)]
pub enum DeployEvent {
    /// A pipeline step is about to run
    StepStarted { index: usize, label: String },

    /// Operator-facing message (`log` steps, step banners, warnings)
    Message { level: LogLevel, text: String },

    /// Command printed instead of executed (`--act`)
    CommandEcho { host: HostRole, command: String },

    /// Standard output of a command
    CommandOutput { host: HostRole, output: String },

    /// A command failed under the `print` policy
    CommandFailed {
        host: HostRole,
        command: String,
        stderr: String,
    },

    /// Clock offsets resolved for this pass
    ClockResolved {
        local_offset: UtcOffset,
        remote_offset: Option<UtcOffset>,
    },

    /// Remote inventory snapshot taken
    InventoryFetched { count: usize },

    /// A local path matched the ignore rules (`--log-files`)
    FileIgnored { path: String },

    /// Per-file comparison details (`--log-files`)
    FileCompared {
        path: String,
        verdict: FileVerdict,
        /// Normalized local mtime, epoch seconds
        local_mtime: i64,
        local_size: u64,
        remote: Option<RemoteFileRecord>,
    },

    /// Grouped list of files selected for upload
    ChangeSummary { lines: Vec<SummaryLine>, total: usize },

    /// Archive built; `path` is `None` for an in-memory dry-run archive
    ArchiveCreated {
        path: Option<PathBuf>,
        entries: usize,
        bytes: u64,
    },

    /// Archive handed to the FTP client successfully
    Uploaded { remote_dir: String },

    /// Nothing differs from the remote; the pipeline stops
    NoNewFiles,

    /// `--dry-run` reached its checkpoint
    DryRunStopped,

    /// `local:finish` reached
    Finished { elapsed_ms: u128 },
}

/// Trait for receiving deploy events
///
/// Implementations can be:
/// - ConsoleEventSink: colored terminal output (binary)
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: Silent operation
pub trait DeployEventSink: Send + Sync {
    /// Handle a deploy event
    fn on_event(&self, event: DeployEvent);

    /// Check if this sink wants detailed events (per-file diagnostics)
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}
