//! Scenario: Previewing a deploy
//!
//! Journey: before a risky deploy the developer checks what would happen,
//! first with `--dry-run`, then with `--act`.
//!
//! Success Criteria:
//! - Neither mode uploads or changes anything on the server
//! - `--dry-run` stops after the change summary, leaving no archive behind
//! - `--act` prints the mutating commands with the FTP password masked

use ftpdeploy::domain::ports::DeployEvent;
use ftpdeploy::domain::value_objects::HostRole;
use ftpdeploy::{RunFlags, RunOutcome};

use crate::common::*;

/// SCENARIO: `--dry-run` shows the changes and stops
#[test]
fn scenario_dry_run_stops_after_summary() {
    let project = TestProject::new();
    project.write("a.txt", "alpha");
    project.write("b.txt", "beta");

    let flags = RunFlags {
        dry_run: true,
        ..RunFlags::default()
    };
    let result = project.run(&project.document(deploy_steps()), flags);

    assert_eq!(result.outcome(), RunOutcome::DryRunStopped);
    assert!(result.has(|e| matches!(e, DeployEvent::ChangeSummary { total: 2, .. })));
    assert!(result.has(|e| matches!(
        e,
        DeployEvent::ArchiveCreated { path: None, entries: 2, .. }
    )));
    assert!(result.has(|e| matches!(e, DeployEvent::DryRunStopped)));
    assert!(!project.archive_path().exists());

    let server = project.server.lock().unwrap();
    assert!(server.uploads.is_empty());
    assert!(!server.ran("unzip"));
}

/// SCENARIO: `--act` echoes instead of executing
#[test]
fn scenario_act_echoes_mutating_commands() {
    let project = TestProject::new();
    project.write("a.txt", "alpha");

    let flags = RunFlags {
        act: true,
        ..RunFlags::default()
    };
    let result = project.run(&project.document(deploy_steps()), flags);

    assert!(matches!(result.outcome(), RunOutcome::Finished { .. }));

    let echoed: Vec<(HostRole, String)> = result
        .events
        .iter()
        .filter_map(|e| match e {
            DeployEvent::CommandEcho { host, command } => Some((*host, command.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(echoed.len(), 3, "upload, unzip and delete are echoed: {:?}", echoed);
    assert_eq!(echoed[0].0, HostRole::Local);
    assert!(echoed[0].1.contains("********"));
    assert!(!echoed[0].1.contains("secret"));
    assert!(echoed[1].1.contains("unzip -o ftpdeploy_archive.zip"));
    assert!(echoed[2].1.contains("rm ftpdeploy_archive.zip"));

    let server = project.server.lock().unwrap();
    assert!(server.uploads.is_empty());
    assert!(server.ran("find . "), "read-only listing still runs");
    assert!(!server.ran("unzip"));
    assert!(project.archive_path().exists(), "archive is kept for inspection");
}
