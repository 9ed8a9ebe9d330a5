//! Unix/Laravel platform profile
//!
//! The inventory comes from a single `find -printf` run that emits one JSON
//! object per file.

use serde::Deserialize;

use super::{ListingContext, Platform};
use crate::domain::entities::RemoteFileRecord;
use crate::domain::value_objects::ProjectType;
use crate::error::{DeployError, DeployResult};

const PRINTF_FORMAT: &str = r#"'{"time":%As,"size":%s,"path":"%p"},'"#;

/// Unix target reached through a POSIX shell
#[derive(Debug, Clone, Copy, Default)]
pub struct LaravelPlatform;

impl Platform for LaravelPlatform {
    fn project_type(&self) -> ProjectType {
        ProjectType::Laravel
    }

    fn line_ending(&self) -> &'static str {
        "\n"
    }

    fn clock_query_command(&self) -> &'static str {
        "date +%H"
    }

    fn parse_clock_hour(&self, text: &str) -> Option<u32> {
        text.trim().parse::<u32>().ok().filter(|h| *h < 24)
    }

    fn has_second_precision(&self) -> bool {
        true
    }

    fn delete_command(&self) -> &'static str {
        "rm"
    }

    fn unzip_command(&self) -> &'static str {
        "unzip -o"
    }

    fn prepend_working_dir(&self, target: &str, command: &str) -> String {
        format!(
            "cd {target} || {{ echo \"'{target}' doesn't exist\"; exit 1; }}; {command}"
        )
    }

    fn missing_target_notice(&self, target: &str) -> Option<String> {
        Some(format!("'{target}' doesn't exist"))
    }

    fn inventory_commands(&self, ignores: &[String]) -> Vec<String> {
        vec![find_command(ignores)]
    }

    fn parse_inventory(
        &self,
        outputs: &[String],
        ctx: &ListingContext,
    ) -> DeployResult<Vec<RemoteFileRecord>> {
        let output = outputs.first().map(String::as_str).unwrap_or_default();
        parse_find_output(output, ctx)
    }
}

/// Translate one ignore entry into a `find -path` pattern.
///
/// Returns `None` for entries that would prune the whole tree.
fn prune_path(ignore: &str) -> Option<String> {
    let ignore = ignore.trim();
    if ignore.is_empty() || ignore.starts_with('#') || ignore.starts_with('!') {
        return None;
    }
    if ignore == "/.*" || ignore == "/*.*" {
        return None;
    }
    let trimmed = ignore.trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    let path = if trimmed.starts_with('/') {
        format!(".{}", trimmed)
    } else if trimmed.contains('/') {
        format!("./{}", trimmed)
    } else {
        format!("*/{}", trimmed)
    };
    Some(path)
}

/// The `find` invocation listing every non-ignored file with size and time
pub fn find_command(ignores: &[String]) -> String {
    let mut cmd = String::from("find . ");
    for path in ignores.iter().filter_map(|i| prune_path(i)) {
        cmd.push_str(&format!("-not \\( -path \"{}\" -prune \\) ", path));
    }
    cmd.push_str("-type f -printf ");
    cmd.push_str(PRINTF_FORMAT);
    cmd
}

#[derive(Debug, Deserialize)]
struct FindRecord {
    time: f64,
    size: u64,
    path: String,
}

/// Parse `find -printf` output into offset-corrected records
pub fn parse_find_output(
    output: &str,
    ctx: &ListingContext,
) -> DeployResult<Vec<RemoteFileRecord>> {
    let body = output.trim().trim_end_matches(',');
    if body.is_empty() {
        return Ok(Vec::new());
    }
    let records: Vec<FindRecord> = serde_json::from_str(&format!("[{}]", body))
        .map_err(|e| DeployError::InventoryParse(e.to_string()))?;

    Ok(records
        .into_iter()
        .map(|r| {
            let time = ctx.remote_offset.normalize(r.time.round() as i64);
            let path = r.path.strip_prefix("./").unwrap_or(&r.path).to_string();
            RemoteFileRecord::new(path, time, time, r.size)
        })
        .collect())
}
