//! Change detection
//!
//! Decides per local file whether it must be uploaded, using size and
//! modification time only. Both sides are first brought into UTC with the
//! offsets resolved for the pass.

use crate::domain::entities::RemoteFileRecord;
use crate::domain::value_objects::UtcOffset;

/// Creation time on the remote lags the local mtime by the unzip delay
const CTIME_TOLERANCE_SECS: i64 = 60;

/// The bits of local file metadata the decision needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalFileStat {
    pub size: u64,
    /// Modification time in epoch milliseconds (host wall clock)
    pub mtime_ms: i64,
}

/// Per-pass comparison settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffSettings {
    /// Upload everything without comparing
    pub fresh: bool,
    pub local_offset: UtcOffset,
    /// False for targets whose listings only carry minutes
    pub remote_has_seconds: bool,
}

/// Outcome of comparing one local file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileVerdict {
    /// Fresh run, no comparison made
    Fresh,
    /// Not present on the remote
    New,
    /// Present but differs in size or is newer locally
    Changed,
    /// Already deployed
    Unchanged,
}

impl FileVerdict {
    pub fn needs_upload(&self) -> bool {
        !matches!(self, FileVerdict::Unchanged)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileVerdict::Fresh => "fresh",
            FileVerdict::New => "new",
            FileVerdict::Changed => "changed",
            FileVerdict::Unchanged => "unchanged",
        }
    }
}

/// Integer division rounding half up, like `Math.round(n / d)`
fn div_round(n: i64, d: i64) -> i64 {
    (n + d / 2).div_euclid(d)
}

/// Local mtime in epoch seconds shifted by the local offset, rounded to the
/// remote's precision.
///
/// Without second precision the value is rounded to the nearest minute
/// (`round(x / 60) * 60`), never truncated.
pub fn normalize_local_mtime(mtime_ms: i64, local_offset: UtcOffset, has_seconds: bool) -> i64 {
    let secs = div_round(mtime_ms - local_offset.millis(), 1000);
    if has_seconds {
        secs
    } else {
        div_round(secs, 60) * 60
    }
}

/// True when the remote copy is at least as new as the local file
pub fn is_up_to_date(local_mtime: i64, size: u64, remote: &RemoteFileRecord) -> bool {
    remote.size == size
        && local_mtime <= remote.mtime
        && (remote.ctime == 0 || local_mtime <= remote.ctime + CTIME_TOLERANCE_SECS)
}

/// Decide whether one file needs uploading
pub fn classify(
    stat: LocalFileStat,
    remote: Option<&RemoteFileRecord>,
    settings: &DiffSettings,
) -> FileVerdict {
    if settings.fresh {
        return FileVerdict::Fresh;
    }
    let Some(remote) = remote else {
        return FileVerdict::New;
    };
    let local = normalize_local_mtime(
        stat.mtime_ms,
        settings.local_offset,
        settings.remote_has_seconds,
    );
    if is_up_to_date(local, stat.size, remote) {
        FileVerdict::Unchanged
    } else {
        FileVerdict::Changed
    }
}
