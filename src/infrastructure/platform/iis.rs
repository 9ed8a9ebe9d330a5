//! Windows/IIS platform profile
//!
//! `dir` can only show one timestamp per listing, so the inventory is built
//! from two passes (write time, creation time) merged by position. Listing
//! times carry minutes only.

use chrono::{NaiveDate, TimeZone};
use regex::Regex;
use std::sync::LazyLock;

use super::{ListingContext, Platform};
use crate::domain::entities::RemoteFileRecord;
use crate::domain::value_objects::{ProjectType, UtcOffset};
use crate::error::{DeployError, DeployResult};

// 05.03.2024  17:09              2571 web.config
static DATA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2})\.(\d{2})\.(\d{4})\s+(\d{2}):(\d{2})\s+(\d+)\s+(\S.*)$")
        .expect("dir data line regex")
});

const WRITE_TIME_LISTING: &str = "dir /s /a:-D /t:w /-c";
const CREATION_TIME_LISTING: &str = "dir /s /a:-D /t:c /-c";

/// Windows target reached through `cmd.exe`
#[derive(Debug, Clone, Copy, Default)]
pub struct IisPlatform;

impl Platform for IisPlatform {
    fn project_type(&self) -> ProjectType {
        ProjectType::Iis
    }

    fn line_ending(&self) -> &'static str {
        "\r\n"
    }

    fn clock_query_command(&self) -> &'static str {
        "echo %time%"
    }

    fn parse_clock_hour(&self, text: &str) -> Option<u32> {
        text.split(':')
            .next()?
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|h| *h < 24)
    }

    fn has_second_precision(&self) -> bool {
        false
    }

    fn delete_command(&self) -> &'static str {
        "del"
    }

    fn unzip_command(&self) -> &'static str {
        "7z x -aoa"
    }

    fn prepend_working_dir(&self, target: &str, command: &str) -> String {
        format!("cd {} && {}", target, command)
    }

    fn inventory_commands(&self, _ignores: &[String]) -> Vec<String> {
        vec![
            WRITE_TIME_LISTING.to_string(),
            CREATION_TIME_LISTING.to_string(),
        ]
    }

    fn parse_inventory(
        &self,
        outputs: &[String],
        ctx: &ListingContext,
    ) -> DeployResult<Vec<RemoteFileRecord>> {
        let [written, created] = outputs else {
            return Err(DeployError::InventoryParse(format!(
                "expected 2 dir listings, got {}",
                outputs.len()
            )));
        };
        let tz = chrono::Local;
        let written = parse_dir_listing(written, &ctx.target_basepath, &tz, ctx.remote_offset)?;
        let created = parse_dir_listing(created, &ctx.target_basepath, &tz, ctx.remote_offset)?;
        merge_listings(written, created)
    }
}

/// One data line of a `dir /s` listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Path relative to the target directory
    pub path: String,
    /// Listed time, epoch seconds, offset-corrected
    pub time: i64,
    pub size: u64,
}

fn relative_path(folder: &str, target: &str, name: &str) -> String {
    let rest = folder
        .strip_prefix(target)
        .unwrap_or("")
        .trim_matches('/');
    if rest.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", rest, name)
    }
}

/// Parse a `dir /s /a:-D /t:? /-c` listing.
///
/// Lines containing the target path switch the current folder; lines shaped
/// like `DD.MM.YYYY  HH:MM  SIZE  NAME` become entries. The naive time is read
/// in `tz`, then corrected by the remote offset.
pub fn parse_dir_listing<Tz: TimeZone>(
    output: &str,
    target: &str,
    tz: &Tz,
    remote_offset: UtcOffset,
) -> DeployResult<Vec<DirEntry>> {
    let target = target.replace('\\', "/");
    let target = target.trim_end_matches('/');
    let mut folder = String::new();
    let mut entries = Vec::new();

    for raw in output.lines() {
        let line = raw.replace('\\', "/");
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !target.is_empty() {
            if let Some(idx) = line.find(target) {
                folder = line[idx..].trim().to_string();
                continue;
            }
        }
        let Some(caps) = DATA_LINE.captures(line) else {
            continue;
        };

        let num = |i: usize| caps[i].parse::<u32>().unwrap_or(0);
        let naive = NaiveDate::from_ymd_opt(caps[3].parse::<i32>().unwrap_or(0), num(2), num(1))
            .and_then(|d| d.and_hms_opt(num(4), num(5), 0))
            .ok_or_else(|| DeployError::InventoryParse(format!("invalid date in '{}'", line)))?;
        let local_secs = tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.timestamp())
            .unwrap_or_else(|| naive.and_utc().timestamp());
        let size = caps[6]
            .parse::<u64>()
            .map_err(|e| DeployError::InventoryParse(format!("{}: '{}'", e, line)))?;

        entries.push(DirEntry {
            path: relative_path(&folder, target, caps[7].trim()),
            time: remote_offset.normalize(local_secs),
            size,
        });
    }

    Ok(entries)
}

/// Combine the write-time and creation-time passes by position.
///
/// Both passes must enumerate the same files; a count mismatch is an
/// integrity error and nothing is merged.
pub fn merge_listings(
    written: Vec<DirEntry>,
    created: Vec<DirEntry>,
) -> DeployResult<Vec<RemoteFileRecord>> {
    if written.len() != created.len() {
        return Err(DeployError::ListingMismatch {
            mtime_count: written.len(),
            ctime_count: created.len(),
        });
    }
    Ok(written
        .into_iter()
        .zip(created)
        .map(|(w, c)| RemoteFileRecord::new(w.path, w.time, c.time, w.size))
        .collect())
}
