//! Clock skew resolution
//!
//! Each host is asked for its wall-clock hour once per pass; the difference
//! to the UTC hour becomes that host's offset.

use chrono::Timelike;

use crate::domain::ports::ShellHost;
use crate::domain::value_objects::UtcOffset;
use crate::error::{DeployError, DeployResult};
use crate::infrastructure::platform::Platform;

/// Offsets used for every comparison in one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockOffsets {
    pub local: UtcOffset,
    /// `None` on fresh runs, which never compare
    pub remote: Option<UtcOffset>,
}

/// Current UTC hour
pub fn utc_hour_now() -> u32 {
    chrono::Utc::now().hour()
}

/// Query `host`'s clock and derive its offset from `utc_hour`
pub fn query_offset<H: ShellHost + ?Sized>(
    host: &mut H,
    platform: &dyn Platform,
    utc_hour: u32,
) -> DeployResult<UtcOffset> {
    let role = host.role();
    let clock_error = |message: String| DeployError::ClockQuery { host: role, message };

    let command = platform.clock_query_command();
    let output = host.execute(command)?;
    if !output.success {
        return Err(clock_error(format!(
            "'{}' failed: {}",
            command,
            output.stderr.trim()
        )));
    }

    let line = output
        .stdout
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("");
    let host_hour = platform
        .parse_clock_hour(line)
        .ok_or_else(|| clock_error(format!("unexpected output of '{}': {:?}", command, line)))?;

    Ok(UtcOffset::from_hours(utc_hour, host_hour))
}
