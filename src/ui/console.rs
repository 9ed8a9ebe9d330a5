//! Console event sink
//!
//! Renders deploy events as colored, human-readable lines.

use std::io::{self, Write};
use std::sync::Mutex;

use ftpdeploy::domain::ports::{DeployEvent, DeployEventSink, LogLevel};
use ftpdeploy::domain::value_objects::HostRole;

use super::theme::{colors, Icon, Theme};

/// Human-friendly duration of a clock difference, e.g. `3m 12s`
pub fn format_diff(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let s = seconds.unsigned_abs();
    if s < 60 {
        format!("{sign}{s}s")
    } else if s < 3600 {
        format!("{sign}{}m {}s", s / 60, s % 60)
    } else {
        format!("{sign}{}h {}m", s / 3600, (s % 3600) / 60)
    }
}

pub struct ConsoleEventSink {
    theme: Theme,
    detailed: bool,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleEventSink {
    pub fn stdout(theme: Theme, detailed: bool) -> Self {
        Self::with_writer(io::stdout(), theme, detailed)
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W, theme: Theme, detailed: bool) -> Self {
        Self {
            theme,
            detailed,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn host_tag(&self, host: HostRole) -> String {
        let icon = match host {
            HostRole::Local => Icon::Arrow,
            HostRole::Remote => Icon::Remote,
        };
        self.theme
            .paint(&format!("{} {}", self.theme.icon(icon), host), colors::DIM)
    }

    fn render(&self, event: DeployEvent) -> String {
        let t = &self.theme;
        match event {
            DeployEvent::StepStarted { index, label } => format!(
                "{} {}",
                t.paint(&format!("[{}]", index), colors::DIM),
                t.bold(&label)
            ),
            DeployEvent::Message { level, text } => match level {
                LogLevel::Plain => text,
                LogLevel::Info => t.paint(&text, colors::INFO),
                LogLevel::Success => {
                    t.paint(&format!("{} {}", t.icon(Icon::Success), text), colors::SUCCESS)
                }
                LogLevel::Warning => {
                    t.paint(&format!("{} {}", t.icon(Icon::Warning), text), colors::WARNING)
                }
                LogLevel::Error => {
                    t.paint(&format!("{} {}", t.icon(Icon::Error), text), colors::ERROR)
                }
            },
            DeployEvent::CommandEcho { host, command } => {
                format!("{} {}", self.host_tag(host), t.paint(&command, colors::INFO))
            }
            DeployEvent::CommandOutput { output, .. } => output.trim_end().to_string(),
            DeployEvent::CommandFailed {
                host,
                command,
                stderr,
            } => {
                let head = t.paint(
                    &format!("{} command failed on {}: {}", t.icon(Icon::Error), host, command),
                    colors::ERROR,
                );
                if stderr.trim().is_empty() {
                    head
                } else {
                    format!("{}\n{}", head, stderr.trim_end())
                }
            }
            DeployEvent::ClockResolved {
                local_offset,
                remote_offset,
            } => {
                let remote = remote_offset
                    .map(|o| o.to_string())
                    .unwrap_or_else(|| "skipped".to_string());
                t.paint(
                    &format!("clock offsets: local {}, remote {}", local_offset, remote),
                    colors::DIM,
                )
            }
            DeployEvent::InventoryFetched { count } => t.paint(
                &format!("{} {} files found on the server", t.icon(Icon::Remote), count),
                colors::INFO,
            ),
            DeployEvent::FileIgnored { path } => t.paint(
                &format!("{} ignored: {}", t.icon(Icon::Ignored), path),
                colors::DIM,
            ),
            DeployEvent::FileCompared {
                path,
                verdict,
                local_mtime,
                local_size,
                remote,
            } => match remote {
                Some(remote) => format!(
                    "{} {} size {} / {}, mtime diff {} (local {}, remote {}, ctime {})",
                    t.paint(verdict.as_str(), colors::INFO),
                    path,
                    local_size,
                    remote.size,
                    format_diff(local_mtime - remote.mtime),
                    local_mtime,
                    remote.mtime,
                    remote.ctime
                ),
                None => format!("{} {}", t.paint(verdict.as_str(), colors::INFO), path),
            },
            DeployEvent::ChangeSummary { lines, total } => {
                let mut out = t.paint(
                    &format!("{} {} files to upload", t.icon(Icon::Deploy), total),
                    colors::INFO,
                );
                for line in lines {
                    out.push_str(&format!("\n  {}", line));
                }
                out
            }
            DeployEvent::ArchiveCreated {
                path,
                entries,
                bytes,
            } => {
                let place = path
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "memory".to_string());
                t.paint(
                    &format!("archive: {} entries, {} bytes ({})", entries, bytes, place),
                    colors::DIM,
                )
            }
            DeployEvent::Uploaded { remote_dir } => t.paint(
                &format!("{} uploaded to {}", t.icon(Icon::Success), remote_dir),
                colors::SUCCESS,
            ),
            DeployEvent::NoNewFiles => t.paint(
                &format!("{} No new files to upload", t.icon(Icon::Success)),
                colors::SUCCESS,
            ),
            DeployEvent::DryRunStopped => t.paint(
                &format!("{} Dry run, stopping here", t.icon(Icon::Warning)),
                colors::WARNING,
            ),
            DeployEvent::Finished { elapsed_ms } => {
                let icon = t.icon(Icon::Finished);
                t.paint(
                    &format!("{icon} FINISHED SUCCESSFULLY in {elapsed_ms} ms {icon}"),
                    colors::SUCCESS,
                )
            }
        }
    }
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        let line = self.render(event);
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }

    fn wants_detailed_events(&self) -> bool {
        self.detailed
    }
}
