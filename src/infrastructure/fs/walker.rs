//! Source tree walker
//!
//! Depth-first, name-sorted traversal of the local source directory.
//! Symlinks are never followed or reported, ignored entries are reported but
//! not descended into, and the deployment archive at the root is skipped.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::services::LocalFileStat;
use crate::domain::value_objects::IgnorePatterns;
use crate::error::DeployResult;
use crate::infrastructure::archive::ARCHIVE_FILE_NAME;

/// A regular file found under the source root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// POSIX path relative to the source root
    pub trimmed_path: String,
    pub full_path: PathBuf,
    pub stat: LocalFileStat,
}

/// One walk result, in traversal order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEntry {
    File(LocalFile),
    /// Matched the ignore rules; directories are not descended into
    Ignored { path: String, is_dir: bool },
}

/// Epoch milliseconds, negative before 1970
fn epoch_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_millis() as i64,
        Err(e) => -(e.duration().as_millis() as i64),
    }
}

/// Walk `root` and return every regular file and ignored entry
pub fn walk_source_tree(root: &Path, ignores: &IgnorePatterns) -> DeployResult<Vec<WalkEntry>> {
    let mut out = Vec::new();
    visit(root, "", ignores, &mut out)?;
    Ok(out)
}

fn visit(
    root: &Path,
    rel_dir: &str,
    ignores: &IgnorePatterns,
    out: &mut Vec<WalkEntry>,
) -> DeployResult<()> {
    let dir = if rel_dir.is_empty() {
        root.to_path_buf()
    } else {
        root.join(rel_dir)
    };

    let mut entries = fs::read_dir(&dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let rel = if rel_dir.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", rel_dir, name)
        };

        let meta = fs::symlink_metadata(entry.path())?;
        let file_type = meta.file_type();
        if file_type.is_symlink() {
            continue;
        }
        if rel_dir.is_empty() && name == ARCHIVE_FILE_NAME && file_type.is_file() {
            continue;
        }

        let is_dir = file_type.is_dir();
        if ignores.is_ignored(Path::new(&rel), is_dir) {
            out.push(WalkEntry::Ignored { path: rel, is_dir });
            continue;
        }

        if is_dir {
            visit(root, &rel, ignores, out)?;
        } else if file_type.is_file() {
            let mtime_ms = meta.modified().map(epoch_millis).unwrap_or(0);
            out.push(WalkEntry::File(LocalFile {
                full_path: entry.path(),
                trimmed_path: rel,
                stat: LocalFileStat {
                    size: meta.len(),
                    mtime_ms,
                },
            }));
        }
    }

    Ok(())
}
