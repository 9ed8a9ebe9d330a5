//! In-memory stand-ins for the remote server, the local shell and the uploader.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use ftpdeploy::domain::ports::{
    ArchiveUploader, CommandOutput, DeployEvent, DeployEventSink, RemoteSession,
    SessionConnector, ShellHost,
};
use ftpdeploy::domain::value_objects::{HostRole, SshTarget};
use ftpdeploy::{DeployError, DeployResult};

/// Hour every fake clock reports; tests pin the UTC hour to the same value
pub const CLOCK_HOUR: u32 = 10;

/// Remote file metadata kept by the fake server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeFile {
    pub mtime: i64,
    pub size: u64,
}

/// State shared by the fake session, connector and uploader
#[derive(Debug, Default)]
pub struct FakeServer {
    /// Target-relative path -> metadata
    pub files: BTreeMap<String, FakeFile>,
    /// Every command run over SSH, in order
    pub commands: Vec<String>,
    /// Remote commands containing one of these fail
    pub fail_on: Vec<String>,
    pub connects: usize,
    pub disposes: usize,
    /// `(remote_dir, archive entry names)` per upload
    pub uploads: Vec<(String, Vec<String>)>,
}

pub type SharedServer = Arc<Mutex<FakeServer>>;

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

fn is_clock_query(command: &str) -> bool {
    command == "date +%H" || command == "echo %time%"
}

impl FakeServer {
    pub fn shared() -> SharedServer {
        Arc::new(Mutex::new(FakeServer::default()))
    }

    pub fn put(&mut self, path: &str, mtime: i64, size: u64) {
        self.files
            .insert(path.to_string(), FakeFile { mtime, size });
    }

    /// `find -printf` output for the current file set
    fn listing(&self) -> String {
        self.files
            .iter()
            .map(|(path, f)| {
                format!(
                    r#"{{"time":{},"size":{},"path":"./{}"}},"#,
                    f.mtime, f.size, path
                )
            })
            .collect()
    }

    pub fn ran(&self, needle: &str) -> bool {
        self.commands.iter().any(|c| c.contains(needle))
    }
}

/// Fake SSH session backed by a [`FakeServer`]
pub struct FakeSession {
    server: SharedServer,
    disposed: bool,
}

impl ShellHost for FakeSession {
    fn role(&self) -> HostRole {
        HostRole::Remote
    }

    fn describe(&self) -> String {
        "deploy@example.com".to_string()
    }

    fn execute(&mut self, command: &str) -> DeployResult<CommandOutput> {
        if self.disposed {
            return Err(DeployError::Connection {
                destination: self.describe(),
                message: "session already closed".to_string(),
            });
        }
        let mut server = self.server.lock().unwrap();
        server.commands.push(command.to_string());

        if is_clock_query(command) {
            return Ok(CommandOutput::ok(format!("{}\n", CLOCK_HOUR)));
        }
        if server.fail_on.iter().any(|f| command.contains(f.as_str())) {
            return Ok(CommandOutput::failed("remote command failed"));
        }
        if command.contains("find . ") {
            return Ok(CommandOutput::ok(server.listing()));
        }
        Ok(CommandOutput::ok(""))
    }
}

impl RemoteSession for FakeSession {
    fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.server.lock().unwrap().disposes += 1;
        }
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

pub struct FakeConnector {
    pub server: SharedServer,
}

impl SessionConnector for FakeConnector {
    fn connect(&self, _target: &SshTarget) -> DeployResult<Box<dyn RemoteSession>> {
        self.server.lock().unwrap().connects += 1;
        Ok(Box::new(FakeSession {
            server: self.server.clone(),
            disposed: false,
        }))
    }
}

/// Unpacks the archive straight into the fake server's file set
pub struct FakeUploader {
    pub server: SharedServer,
}

impl ArchiveUploader for FakeUploader {
    fn display_command(&self, archive: &Path, remote_dir: &str) -> String {
        format!(
            "ncftpput -R -v -u \"deploy\" -p \"********\" example.com {} {}",
            remote_dir,
            archive.display()
        )
    }

    fn upload(&self, archive: &Path, remote_dir: &str) -> DeployResult<()> {
        let mut zip = zip::ZipArchive::new(File::open(archive)?)?;
        let uploaded_at = now_secs();
        let mut names = Vec::new();
        let mut server = self.server.lock().unwrap();
        for i in 0..zip.len() {
            let entry = zip.by_index(i)?;
            names.push(entry.name().to_string());
            server.put(entry.name(), uploaded_at, entry.size());
        }
        server.uploads.push((remote_dir.to_string(), names));
        Ok(())
    }
}

/// Local shell that records commands instead of spawning them
#[derive(Clone, Default)]
pub struct FakeLocalShell {
    pub commands: Arc<Mutex<Vec<String>>>,
}

impl ShellHost for FakeLocalShell {
    fn role(&self) -> HostRole {
        HostRole::Local
    }

    fn describe(&self) -> String {
        "local".to_string()
    }

    fn execute(&mut self, command: &str) -> DeployResult<CommandOutput> {
        if is_clock_query(command) {
            return Ok(CommandOutput::ok(format!("{}\n", CLOCK_HOUR)));
        }
        self.commands.lock().unwrap().push(command.to_string());
        if command.contains("false") {
            return Ok(CommandOutput::failed("local command failed"));
        }
        Ok(CommandOutput::ok(format!("ran {}\n", command)))
    }
}

/// Event sink that records every event
#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<DeployEvent>>,
}

impl RecordingSink {
    pub fn take(&self) -> Vec<DeployEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl DeployEventSink for RecordingSink {
    fn on_event(&self, event: DeployEvent) {
        self.events.lock().unwrap().push(event);
    }
}
