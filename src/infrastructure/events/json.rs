//! JSON Event Sink
//!
//! Outputs deploy events as NDJSON for CI/automation consumption.

use crate::domain::ports::{DeployEvent, DeployEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: DeployEvent) {
        let json = match event {
            DeployEvent::StepStarted { index, label } => serde_json::json!({
                "event": "step_start",
                "index": index,
                "step": label,
            }),

            DeployEvent::Message { level, text } => serde_json::json!({
                "event": "message",
                "level": level.as_str(),
                "text": text,
            }),

            DeployEvent::CommandEcho { host, command } => serde_json::json!({
                "event": "command_echo",
                "host": host.to_string(),
                "command": command,
            }),

            DeployEvent::CommandOutput { host, output } => serde_json::json!({
                "event": "command_output",
                "host": host.to_string(),
                "output": output,
            }),

            DeployEvent::CommandFailed {
                host,
                command,
                stderr,
            } => serde_json::json!({
                "event": "command_failed",
                "host": host.to_string(),
                "command": command,
                "stderr": stderr,
            }),

            DeployEvent::ClockResolved {
                local_offset,
                remote_offset,
            } => serde_json::json!({
                "event": "clock",
                "local_offset": local_offset.seconds(),
                "remote_offset": remote_offset.map(|o| o.seconds()),
            }),

            DeployEvent::InventoryFetched { count } => serde_json::json!({
                "event": "inventory",
                "count": count,
            }),

            DeployEvent::FileIgnored { path } => serde_json::json!({
                "event": "item_ignored",
                "path": path,
            }),

            DeployEvent::FileCompared {
                path,
                verdict,
                local_mtime,
                local_size,
                remote,
            } => serde_json::json!({
                "event": "item_compared",
                "path": path,
                "verdict": verdict.as_str(),
                "local_mtime": local_mtime,
                "local_size": local_size,
                "remote": remote.map(|r| serde_json::json!({
                    "mtime": r.mtime,
                    "ctime": r.ctime,
                    "size": r.size,
                })),
            }),

            DeployEvent::ChangeSummary { lines, total } => serde_json::json!({
                "event": "changes",
                "total": total,
                "lines": lines,
            }),

            DeployEvent::ArchiveCreated {
                path,
                entries,
                bytes,
            } => serde_json::json!({
                "event": "archive",
                "path": path.map(|p| p.display().to_string()),
                "entries": entries,
                "bytes": bytes,
            }),

            DeployEvent::Uploaded { remote_dir } => serde_json::json!({
                "event": "uploaded",
                "remote_dir": remote_dir,
            }),

            DeployEvent::NoNewFiles => serde_json::json!({
                "event": "complete",
                "status": "no_new_files",
            }),

            DeployEvent::DryRunStopped => serde_json::json!({
                "event": "complete",
                "status": "dry_run",
            }),

            DeployEvent::Finished { elapsed_ms } => serde_json::json!({
                "event": "complete",
                "status": "success",
                "elapsed_ms": elapsed_ms as u64,
            }),
        };

        self.write_event(json);
    }

    fn wants_detailed_events(&self) -> bool {
        true // JSON mode wants all events
    }
}
