//! Find-new-files pass
//!
//! Walks the source tree, compares every file against the remote inventory
//! and packages the files that need uploading.

use std::path::{Path, PathBuf};

use crate::domain::entities::{FileToUpload, Inventory};
use crate::domain::ports::{DeployEvent, DeployEventSink};
use crate::domain::services::{classify, normalize_local_mtime, summarize, DiffSettings};
use crate::domain::value_objects::IgnorePatterns;
use crate::error::DeployResult;
use crate::infrastructure::archive::{build_archive, ArchiveReport};
use crate::infrastructure::fs::{walk_source_tree, WalkEntry};

/// Inputs of one change scan
pub struct ChangeScan<'a> {
    pub source_root: &'a Path,
    pub ignores: &'a IgnorePatterns,
    pub settings: DiffSettings,
    /// Emit per-file diagnostics
    pub log_files: bool,
}

/// Result of packaging the changed files
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageOutcome {
    /// Nothing differs; no archive was built
    NoNewFiles,
    /// `--dry-run`: archive built in memory only
    DryRun(ArchiveReport),
    /// Archive written to disk, ready for upload
    Packaged { archive: PathBuf, report: ArchiveReport },
}

/// Files under `scan.source_root` that differ from `inventory`, in walk order
pub fn scan_changes(
    scan: &ChangeScan<'_>,
    inventory: &Inventory,
    sink: &dyn DeployEventSink,
) -> DeployResult<Vec<FileToUpload>> {
    let detailed = scan.log_files && sink.wants_detailed_events();
    let mut files = Vec::new();

    for entry in walk_source_tree(scan.source_root, scan.ignores)? {
        let file = match entry {
            WalkEntry::Ignored { path, .. } => {
                if detailed {
                    sink.on_event(DeployEvent::FileIgnored { path });
                }
                continue;
            }
            WalkEntry::File(file) => file,
        };

        let remote = inventory.get(&file.trimmed_path);
        let verdict = classify(file.stat, remote, &scan.settings);

        if detailed && !scan.settings.fresh {
            sink.on_event(DeployEvent::FileCompared {
                path: file.trimmed_path.clone(),
                verdict,
                local_mtime: normalize_local_mtime(
                    file.stat.mtime_ms,
                    scan.settings.local_offset,
                    scan.settings.remote_has_seconds,
                ),
                local_size: file.stat.size,
                remote: remote.cloned(),
            });
        }

        if verdict.needs_upload() {
            files.push(FileToUpload::new(file.trimmed_path, file.full_path));
        }
    }

    Ok(files)
}

/// Report and archive the changed files
pub fn package_changes(
    files: &[FileToUpload],
    source_root: &Path,
    dist_dirs: &[String],
    dry_run: bool,
    sink: &dyn DeployEventSink,
) -> DeployResult<PackageOutcome> {
    if files.is_empty() {
        return Ok(PackageOutcome::NoNewFiles);
    }

    sink.on_event(DeployEvent::ChangeSummary {
        lines: summarize(files, dist_dirs),
        total: files.len(),
    });

    let report = build_archive(files, source_root, !dry_run)?;
    sink.on_event(DeployEvent::ArchiveCreated {
        path: report.path.clone(),
        entries: report.entries,
        bytes: report.bytes,
    });

    Ok(match report.path.clone() {
        Some(archive) => PackageOutcome::Packaged { archive, report },
        None => PackageOutcome::DryRun(report),
    })
}
