//! Zip packaging of the files to upload

use std::fs::File;
use std::io::{self, Cursor, Seek, Write};
use std::path::{Path, PathBuf};

use chrono::{Datelike, Timelike};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::domain::entities::FileToUpload;
use crate::error::DeployResult;

/// Name of the archive at the source root and in the remote target dir
pub const ARCHIVE_FILE_NAME: &str = "ftpdeploy_archive.zip";

/// What was packaged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
    /// On-disk location, `None` for an in-memory dry-run archive
    pub path: Option<PathBuf>,
    pub entries: usize,
    pub bytes: u64,
}

fn archive_timestamp() -> DateTime {
    let now = chrono::Local::now();
    DateTime::from_date_and_time(
        now.year().clamp(1980, 2107) as u16,
        now.month() as u8,
        now.day() as u8,
        now.hour() as u8,
        now.minute() as u8,
        now.second().min(58) as u8,
    )
    .unwrap_or_default()
}

/// Write one deflated entry per file, named by its trimmed path
pub fn write_archive<W: Write + Seek>(writer: W, files: &[FileToUpload]) -> DeployResult<W> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(archive_timestamp());

    let mut zip = ZipWriter::new(writer);
    for file in files {
        let name = file.trimmed_path.trim_start_matches('/');
        zip.start_file(name, options)?;
        let mut source = File::open(&file.full_path)?;
        io::copy(&mut source, &mut zip)?;
    }
    Ok(zip.finish()?)
}

/// Package `files` into `<source_root>/ftpdeploy_archive.zip`, or into memory
/// when `persist` is false
pub fn build_archive(
    files: &[FileToUpload],
    source_root: &Path,
    persist: bool,
) -> DeployResult<ArchiveReport> {
    if !persist {
        let buffer = write_archive(Cursor::new(Vec::new()), files)?;
        return Ok(ArchiveReport {
            path: None,
            entries: files.len(),
            bytes: buffer.get_ref().len() as u64,
        });
    }

    let path = source_root.join(ARCHIVE_FILE_NAME);
    let file = File::create(&path)?;
    let mut file = write_archive(file, files)?;
    file.flush()?;
    let bytes = file.metadata()?.len();
    Ok(ArchiveReport {
        path: Some(path),
        entries: files.len(),
        bytes,
    })
}

/// Delete the local archive if it exists
pub fn remove_archive(path: &Path) -> DeployResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
