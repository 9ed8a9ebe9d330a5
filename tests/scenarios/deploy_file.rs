//! Scenario: Deploy driven by ftp-deploy.yml
//!
//! Journey: the project keeps its deploy recipe in YAML with secrets in a
//! sibling `.env`; the recipe mixes built-in steps with shell and log steps.
//!
//! Success Criteria:
//! - Secrets are resolved from `.env`
//! - Shell arguments and references are substituted before running
//! - Remote shell steps run inside the target directory

use std::fs;

use tempfile::TempDir;

use ftpdeploy::domain::ports::{DeployEvent, LogLevel};
use ftpdeploy::{load_deploy_file, RunFlags, RunOutcome};

use crate::common::*;

fn deploy_yaml(source: &std::path::Path) -> String {
    format!(
        r#"
config:
  project_type: laravel
  host: example.com
  source_basepath: '{}'
  target_basepath: /var/www/app
  ftp:
    username: deploy
    password: "${{env.FTP_PASSWORD}}"
    base_path: /var/www
  ssh:
    username: deploy
    password: ""
  dist_dirs: [public/build]
  ignores: ["*.log"]
steps:
  - log: Deploying to ${{env.STAGE}}
  - shell:
      command: npm run {{{{0}}}}
      args: [build]
  - predefined: server:find_new_files
  - predefined: server:upload_files
  - predefined: server:unzip
  - shell:
      command: php artisan {{{{0}}}} --force
      args: [migrate]
      ssh: true
      message: "running ${{command}}"
  - predefined: server:delete_zip
  - predefined: local:dispose_ssh
  - predefined: local:finish
"#,
        source.display()
    )
}

/// SCENARIO: a complete recipe loaded from disk
#[test]
fn scenario_recipe_from_yaml_with_dotenv() {
    let project = TestProject::new();
    project.write("index.php", "<?php");

    let recipe_dir = TempDir::new().unwrap();
    let recipe = recipe_dir.path().join("ftp-deploy.yml");
    fs::write(&recipe, deploy_yaml(project.source.path())).unwrap();
    fs::write(
        recipe_dir.path().join(".env"),
        "FTP_PASSWORD=from-dotenv\nSTAGE=production\n",
    )
    .unwrap();

    let loaded = load_deploy_file(&recipe).unwrap();
    assert!(loaded.warnings.is_empty());
    assert_eq!(loaded.document.config.ftp.password, "from-dotenv");

    let result = project.run(&loaded.document, RunFlags::default());
    assert!(matches!(result.outcome(), RunOutcome::Finished { .. }));

    assert!(result.has(|e| matches!(
        e,
        DeployEvent::Message { level: LogLevel::Plain, text } if text == "Deploying to production"
    )));
    assert!(result.has(|e| matches!(
        e,
        DeployEvent::Message { text, .. } if text == "running php artisan migrate --force"
    )));
    assert_eq!(project.local_commands(), vec!["npm run build".to_string()]);

    let server = project.server.lock().unwrap();
    let migrate = server
        .commands
        .iter()
        .find(|c| c.contains("php artisan migrate --force"))
        .expect("migration ran remotely");
    assert!(migrate.starts_with("cd /var/www/app"));
    assert_eq!(server.uploads.len(), 1);
    assert_eq!(server.disposes, 1);
}
