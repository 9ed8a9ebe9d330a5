//! Upload summary grouping
//!
//! Files inside a configured dist directory are reported as one `<dir>/*`
//! line; everything else is listed individually.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::domain::entities::FileToUpload;

/// One line of the change summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum SummaryLine {
    /// A dist directory with at least one changed file
    Group(String),
    /// A single changed file
    File(String),
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryLine::Group(dir) => write!(f, "{}/*", dir),
            SummaryLine::File(path) => f.write_str(path),
        }
    }
}

/// Strip `./` prefixes and trailing slashes from a dist dir
pub fn normalize_dist_dir(dir: &str) -> String {
    let mut d = dir.trim();
    while let Some(rest) = d.strip_prefix("./") {
        d = rest;
    }
    d.trim_end_matches('/').to_string()
}

fn is_under(path: &str, dir: &str) -> bool {
    path == dir
        || path
            .strip_prefix(dir)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Build the grouped summary in upload order
pub fn summarize(files: &[FileToUpload], dist_dirs: &[String]) -> Vec<SummaryLine> {
    let dirs: Vec<String> = dist_dirs
        .iter()
        .map(|d| normalize_dist_dir(d))
        .filter(|d| !d.is_empty())
        .collect();

    let mut printed: HashSet<&str> = HashSet::new();
    let mut lines = Vec::new();

    for file in files {
        let mut grouped = false;
        for dir in &dirs {
            if !is_under(&file.trimmed_path, dir) {
                continue;
            }
            grouped = true;
            if printed.insert(dir.as_str()) {
                lines.push(SummaryLine::Group(dir.clone()));
            }
        }
        if !grouped {
            lines.push(SummaryLine::File(file.trimmed_path.clone()));
        }
    }

    lines
}
