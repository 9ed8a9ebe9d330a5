//! Remote inventory fetching
//!
//! Runs the platform's listing commands inside the target directory and
//! parses them into one [`Inventory`] snapshot. A missing target directory
//! (first deploy) or a blank listing yields an empty inventory with a
//! warning. Any other listing failure aborts the run.

use crate::domain::entities::Inventory;
use crate::domain::ports::{DeployEvent, DeployEventSink, LogLevel, ShellHost};
use crate::domain::value_objects::UtcOffset;
use crate::error::DeployResult;
use crate::infrastructure::platform::{ListingContext, Platform};

use super::runner::{CommandResult, CommandRunner, ShellRequest};

/// Inputs of one listing run
pub struct InventoryRequest<'a> {
    pub target_basepath: &'a str,
    pub ignores: &'a [String],
    pub remote_offset: UtcOffset,
}

/// List the remote target and build the snapshot for this pass
pub fn fetch_inventory<H: ShellHost + ?Sized>(
    session: &mut H,
    platform: &dyn Platform,
    runner: &CommandRunner<'_>,
    sink: &dyn DeployEventSink,
    request: &InventoryRequest<'_>,
) -> DeployResult<Inventory> {
    let target = match request.target_basepath.trim_end_matches(['/', '\\']) {
        "" => request.target_basepath,
        trimmed => trimmed,
    };

    let notice = platform.missing_target_notice(target);
    let mut outputs = Vec::new();
    for listing in platform.inventory_commands(request.ignores) {
        let command = platform.in_target_dir(target, &listing);
        let result = runner.run(
            &mut *session,
            &ShellRequest::new(&command)
                .read_only()
                .quiet()
                .expecting_failure(notice.as_deref()),
        )?;
        match result {
            CommandResult::Ran(out) if out.success => outputs.push(out.stdout),
            _ => {
                warn_empty(sink, &format!("'{}' does not exist yet, treating it as empty", target));
                return Ok(Inventory::empty());
            }
        }
    }

    if outputs.iter().any(|o| o.trim().is_empty()) {
        warn_empty(sink, "no files found on the server");
        return Ok(Inventory::empty());
    }

    let ctx = ListingContext {
        target_basepath: target.replace('\\', "/"),
        remote_offset: request.remote_offset,
    };
    let records = platform.parse_inventory(&outputs, &ctx)?;
    sink.on_event(DeployEvent::InventoryFetched {
        count: records.len(),
    });
    Ok(Inventory::new(records))
}

fn warn_empty(sink: &dyn DeployEventSink, text: &str) {
    sink.on_event(DeployEvent::Message {
        level: LogLevel::Warning,
        text: text.to_string(),
    });
    sink.on_event(DeployEvent::InventoryFetched { count: 0 });
}
