//! Property tests for change summary grouping.

use proptest::prelude::*;

use ftpdeploy::domain::entities::FileToUpload;
use ftpdeploy::domain::services::{summarize, SummaryLine};

fn relative_path() -> impl Strategy<Value = String> {
    let segment = proptest::string::string_regex("[a-z]{1,6}").unwrap();
    proptest::collection::vec(segment, 1..=3).prop_map(|segments| segments.join("/"))
}

proptest! {
    /// PROPERTY: every file is covered by exactly one summary line, and
    /// each group appears once.
    #[test]
    fn property_every_file_is_covered(
        paths in proptest::collection::btree_set(relative_path(), 0..20),
        dist in proptest::collection::vec("[a-z]{1,6}", 0..3),
    ) {
        let files: Vec<FileToUpload> = paths
            .iter()
            .map(|p| FileToUpload::new(p.clone(), format!("/src/{}", p)))
            .collect();
        let mut dist = dist;
        dist.sort();
        dist.dedup();
        let lines = summarize(&files, &dist);

        let mut seen_groups = std::collections::HashSet::new();
        for line in &lines {
            if let SummaryLine::Group(dir) = line {
                prop_assert!(seen_groups.insert(dir.clone()));
            }
        }
        for file in &files {
            let direct = lines.contains(&SummaryLine::File(file.trimmed_path.clone()));
            let grouped = dist.iter().any(|d| {
                file.trimmed_path.starts_with(&format!("{}/", d))
                    && lines.contains(&SummaryLine::Group(d.clone()))
            }) || dist.iter().any(|d| &file.trimmed_path == d);
            prop_assert!(direct != grouped, "{} covered twice or not at all", file.trimmed_path);
        }
    }
}
