//! Scenario: Incremental deploy
//!
//! Journey: a developer deploys a project, deploys again without changes,
//! edits one file and deploys once more.
//!
//! Success Criteria:
//! - First deploy uploads every non-ignored file
//! - A repeat deploy with no edits uploads nothing
//! - Only the edited file goes out afterwards

use ftpdeploy::domain::ports::DeployEvent;
use ftpdeploy::domain::services::SummaryLine;
use ftpdeploy::{RunFlags, RunOutcome};

use crate::common::*;

fn uploaded_names(project: &TestProject) -> Vec<Vec<String>> {
    project
        .server
        .lock()
        .unwrap()
        .uploads
        .iter()
        .map(|(_, names)| names.clone())
        .collect()
}

/// SCENARIO: first deploy of a small project to an empty server
#[test]
fn scenario_first_deploy_uploads_everything() {
    let project = TestProject::new();
    project.write("a.txt", "alpha");
    project.write("dir/b.txt", "beta");
    project.write("debug.log", "ignored");

    let document = project.document(deploy_steps());
    let result = project.run(&document, RunFlags::default());

    assert!(matches!(result.outcome(), RunOutcome::Finished { .. }));
    assert_eq!(
        uploaded_names(&project),
        vec![vec!["a.txt".to_string(), "dir/b.txt".to_string()]]
    );

    let server = project.server.lock().unwrap();
    assert_eq!(server.uploads[0].0, "/app");
    assert_eq!(server.connects, 1);
    assert!(server.ran("unzip -o ftpdeploy_archive.zip"));
    assert!(server.ran("rm ftpdeploy_archive.zip"));
    assert!(!project.archive_path().exists(), "local archive is removed after upload");

    assert!(result.has(|e| matches!(e, DeployEvent::Uploaded { remote_dir } if remote_dir == "/app")));
    assert!(result.has(|e| matches!(e, DeployEvent::Finished { .. })));
}

/// SCENARIO: deploying twice without local edits
#[test]
fn scenario_repeat_deploy_is_a_no_op() {
    let project = TestProject::new();
    project.write("a.txt", "alpha");
    project.write("b.txt", "beta");
    let document = project.document(deploy_steps());

    project.run(&document, RunFlags::default()).outcome();
    let second = project.run(&document, RunFlags::default());

    assert_eq!(second.outcome(), RunOutcome::NoNewFiles);
    assert!(second.has(|e| matches!(e, DeployEvent::NoNewFiles)));
    assert!(!second.has(|e| matches!(e, DeployEvent::ArchiveCreated { .. })));
    assert_eq!(uploaded_names(&project).len(), 1);
}

/// SCENARIO: remote already up to date before the first run
#[test]
fn scenario_server_already_current() {
    let project = TestProject::new();
    project.write("a.txt", "alpha");
    project.write("b.txt", "beta");
    {
        let mut server = project.server.lock().unwrap();
        server.put("a.txt", LOCAL_MTIME as i64 + 5, 5);
        server.put("b.txt", LOCAL_MTIME as i64, 4);
    }

    let result = project.run(&project.document(deploy_steps()), RunFlags::default());

    assert_eq!(result.outcome(), RunOutcome::NoNewFiles);
    let server = project.server.lock().unwrap();
    assert!(server.uploads.is_empty());
    assert!(!server.ran("unzip"), "steps after the diff do not run");
}

/// SCENARIO: one file edited since the last deploy
#[test]
fn scenario_only_changed_file_is_uploaded() {
    let project = TestProject::new();
    project.write("a.txt", "alpha");
    project.write("b.txt", "BETA");
    {
        let mut server = project.server.lock().unwrap();
        server.put("a.txt", LOCAL_MTIME as i64, 5);
        // Same size, older than the local edit
        server.put("b.txt", LOCAL_MTIME as i64 - 120, 4);
    }

    let result = project.run(&project.document(deploy_steps()), RunFlags::default());

    assert!(matches!(result.outcome(), RunOutcome::Finished { .. }));
    assert_eq!(uploaded_names(&project), vec![vec!["b.txt".to_string()]]);
}

/// SCENARIO: `--fresh` ignores what the server has
#[test]
fn scenario_fresh_uploads_everything_without_listing() {
    let project = TestProject::new();
    project.write("a.txt", "alpha");
    project.write("b.txt", "beta");
    {
        let mut server = project.server.lock().unwrap();
        server.put("a.txt", LOCAL_MTIME as i64 + 100, 5);
        server.put("b.txt", LOCAL_MTIME as i64 + 100, 4);
    }

    let flags = RunFlags {
        fresh: true,
        ..RunFlags::default()
    };
    let result = project.run(&project.document(deploy_steps()), flags);

    assert!(matches!(result.outcome(), RunOutcome::Finished { .. }));
    assert_eq!(uploaded_names(&project)[0].len(), 2);
    let server = project.server.lock().unwrap();
    assert!(!server.ran("find . "));
    assert!(!server.ran("date +%H"));
    assert!(result.has(|e| matches!(
        e,
        DeployEvent::ClockResolved { remote_offset: None, .. }
    )));
}

/// SCENARIO: dist directories are summarized as one line
#[test]
fn scenario_dist_dir_is_grouped_in_summary() {
    let project = TestProject::new();
    project.write("index.php", "<?php");
    project.write("public/build/app.js", "js");
    project.write("public/build/app.css", "css");

    let result = project.run(&project.document(deploy_steps()), RunFlags::default());
    result.outcome();

    let summary = result.events.iter().find_map(|e| match e {
        DeployEvent::ChangeSummary { lines, total } => Some((lines.clone(), *total)),
        _ => None,
    });
    assert_eq!(
        summary,
        Some((
            vec![
                SummaryLine::File("index.php".to_string()),
                SummaryLine::Group("public/build".to_string()),
            ],
            3
        ))
    );
    assert!(result.has(|e| matches!(e, DeployEvent::ArchiveCreated { entries: 3, .. })));
    assert_eq!(uploaded_names(&project)[0].len(), 3);
}
