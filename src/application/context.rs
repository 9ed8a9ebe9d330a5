//! Per-run deployment state
//!
//! Everything a pass accumulates (session, clock offsets, inventory, the
//! packaged archive) lives here instead of in globals. Dropping the context
//! disposes the remote session exactly once.

use std::path::PathBuf;
use std::time::Instant;

use crate::domain::entities::Inventory;
use crate::domain::ports::RemoteSession;
use crate::error::{DeployError, DeployResult};

use super::clock::ClockOffsets;

/// Flags that change how a run behaves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunFlags {
    /// Upload everything without comparing
    pub fresh: bool,
    /// Print mutating commands instead of running them
    pub act: bool,
    /// Stop after packaging; nothing is written or uploaded
    pub dry_run: bool,
    /// Per-file diagnostics
    pub log_files: bool,
}

/// State of one pipeline run
pub struct DeploymentContext {
    pub flags: RunFlags,
    pub started: Instant,
    session: Option<Box<dyn RemoteSession>>,
    destination: String,
    pub offsets: Option<ClockOffsets>,
    pub inventory: Option<Inventory>,
    /// Archive written by `server:find_new_files`, consumed by the upload
    pub archive: Option<PathBuf>,
}

impl DeploymentContext {
    pub fn new(flags: RunFlags, destination: impl Into<String>) -> Self {
        Self {
            flags,
            started: Instant::now(),
            session: None,
            destination: destination.into(),
            offsets: None,
            inventory: None,
            archive: None,
        }
    }

    pub fn attach_session(&mut self, session: Box<dyn RemoteSession>) {
        self.session = Some(session);
    }

    /// The live session, or an error when none was opened or it was disposed
    pub fn session(&mut self) -> DeployResult<&mut dyn RemoteSession> {
        match self.session.as_deref_mut() {
            Some(session) if !session.is_disposed() => Ok(session),
            _ => Err(DeployError::Connection {
                destination: self.destination.clone(),
                message: "no open SSH session (missing config.ssh or already disposed)"
                    .to_string(),
            }),
        }
    }

    pub fn has_session(&self) -> bool {
        self.session.as_ref().is_some_and(|s| !s.is_disposed())
    }

    /// Close the session; later calls do nothing
    pub fn dispose_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.dispose();
        }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }
}

impl Drop for DeploymentContext {
    fn drop(&mut self) {
        self.dispose_session();
    }
}
