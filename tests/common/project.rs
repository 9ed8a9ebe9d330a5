//! Test project builder: a temp source tree wired to the fakes.

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use tempfile::TempDir;

use ftpdeploy::config::{FtpConfig, SshConfig};
use ftpdeploy::domain::entities::Step;
use ftpdeploy::domain::ports::DeployEvent;
use ftpdeploy::domain::value_objects::ProjectType;
use ftpdeploy::{DeployConfig, DeployDocument, DeployPipeline, DeployResult, RunFlags, RunOutcome};

use super::fakes::*;

/// Local file mtime used by most tests, well before any fake upload
pub const LOCAL_MTIME: u64 = 1_600_000_000;

/// The usual deploy: diff, upload, unpack on the server, clean up
pub fn deploy_steps() -> Vec<Step> {
    use ftpdeploy::domain::entities::PredefinedStep::*;
    [FindNewFiles, ExitIfDryRun, UploadFiles, Unzip, DeleteZip, Finish]
        .into_iter()
        .map(Step::Predefined)
        .collect()
}

/// Result of one pipeline run
#[derive(Debug)]
pub struct RunResult {
    pub outcome: DeployResult<RunOutcome>,
    pub events: Vec<DeployEvent>,
}

impl RunResult {
    pub fn outcome(&self) -> RunOutcome {
        match &self.outcome {
            Ok(outcome) => *outcome,
            Err(e) => panic!("run failed: {}\nevents: {:#?}", e, self.events),
        }
    }

    pub fn has(&self, pred: impl Fn(&DeployEvent) -> bool) -> bool {
        self.events.iter().any(pred)
    }
}

/// Isolated source tree plus a fake server.
pub struct TestProject {
    pub source: TempDir,
    pub server: SharedServer,
    pub local: FakeLocalShell,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            source: TempDir::new().unwrap(),
            server: FakeServer::shared(),
            local: FakeLocalShell::default(),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.source.path().join(relative)
    }

    /// Write a file and pin its mtime to `secs` since the epoch
    pub fn write_at(&self, relative: &str, content: &str, secs: u64) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    pub fn write(&self, relative: &str, content: &str) {
        self.write_at(relative, content, LOCAL_MTIME);
    }

    pub fn config(&self) -> DeployConfig {
        DeployConfig {
            project_type: ProjectType::Laravel,
            host: "example.com".to_string(),
            source_basepath: self.source.path().to_path_buf(),
            target_basepath: "/var/www/app".to_string(),
            ftp: FtpConfig {
                username: "deploy".to_string(),
                password: "secret".to_string(),
                base_path: "/var/www".to_string(),
            },
            ssh: Some(SshConfig {
                username: "deploy".to_string(),
                password: String::new(),
            }),
            dist_dirs: vec!["public/build".to_string()],
            ignores: vec!["*.log".to_string()],
        }
    }

    pub fn document(&self, steps: Vec<Step>) -> DeployDocument {
        DeployDocument {
            config: self.config(),
            steps,
        }
    }

    pub fn run(&self, document: &DeployDocument, flags: RunFlags) -> RunResult {
        self.run_with_cancel(document, flags, Arc::new(AtomicBool::new(false)))
    }

    pub fn run_with_cancel(
        &self,
        document: &DeployDocument,
        flags: RunFlags,
        cancel: Arc<AtomicBool>,
    ) -> RunResult {
        let connector = FakeConnector {
            server: self.server.clone(),
        };
        let uploader = FakeUploader {
            server: self.server.clone(),
        };
        let sink = Arc::new(RecordingSink::default());
        let outcome = DeployPipeline::new(document, &connector, &uploader)
            .with_event_sink(sink.clone())
            .with_local_host(Box::new(self.local.clone()))
            .with_cancel_flag(cancel)
            .with_utc_hour(CLOCK_HOUR)
            .run(flags);
        RunResult {
            outcome,
            events: sink.take(),
        }
    }

    pub fn archive_path(&self) -> PathBuf {
        self.path(ftpdeploy::infrastructure::ARCHIVE_FILE_NAME)
    }

    pub fn local_commands(&self) -> Vec<String> {
        self.local.commands.lock().unwrap().clone()
    }
}
